use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PUNCT: Regex = Regex::new(r"[[:punct:]]").expect("valid regex");
}

/// Normalize text for indexing and querying: every ASCII punctuation
/// character becomes a space, whitespace runs collapse to single spaces,
/// the result is trimmed and lowercased.
pub fn normalize(text: &str) -> String {
    let stripped = PUNCT.replace_all(text, " ");
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Split normalized text on single spaces.
///
/// Empty input normalizes to the empty string, which splits into a single
/// empty token. That token flows through indexing and scoring like any
/// other term; callers must not assume tokens are non-empty.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text).split(' ').map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_normalize() {
        assert_eq!(normalize("Hello, World!!  Foo."), "hello world foo");
    }

    #[test]
    fn punctuation_becomes_token_boundary() {
        assert_eq!(tokenize("don't-stop"), vec!["don", "t", "stop"]);
    }

    #[test]
    fn empty_input_yields_one_empty_token() {
        assert_eq!(tokenize(""), vec![String::new()]);
        assert_eq!(tokenize("  \t "), vec![String::new()]);
    }
}
