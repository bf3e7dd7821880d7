use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use sift_core::engine::{DEFAULT_B, DEFAULT_K1};
use sift_core::SearchEngine;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// One corpus record. The identifier field is `id`; `url` is accepted as
/// an alias since web corpora usually key documents by URL.
#[derive(Debug, Deserialize)]
struct InputDoc {
    #[serde(alias = "url")]
    id: String,
    text: String,
}

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Build and query a BM25 full-text index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index from JSON corpus files (a file or a directory)
    Build {
        /// Input path (.json file or directory of .json files)
        #[arg(long)]
        input: PathBuf,
        /// Output index file
        #[arg(long)]
        output: PathBuf,
        /// BM25 term-frequency saturation
        #[arg(long, default_value_t = DEFAULT_K1)]
        k1: f32,
        /// BM25 length-normalization strength
        #[arg(long, default_value_t = DEFAULT_B)]
        b: f32,
    },
    /// Run a query against a saved index
    Search {
        /// Index file produced by `sift build`
        #[arg(long)]
        index: PathBuf,
        /// Free-text query
        query: String,
        /// Maximum number of results to print
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Print summary statistics for a saved index
    Inspect {
        #[arg(long)]
        index: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, k1, b } => build(&input, &output, k1, b),
        Commands::Search { index, query, limit } => search(&index, &query, limit),
        Commands::Inspect { index } => inspect(&index),
    }
}

fn build(input: &Path, output: &Path, k1: f32, b: f32) -> Result<()> {
    let mut engine = SearchEngine::with_params(k1, b);

    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(p.to_path_buf());
            }
        }
    } else {
        files.push(input.to_path_buf());
    }

    for file in &files {
        let docs = read_corpus(file)
            .with_context(|| format!("reading corpus file {}", file.display()))?;
        tracing::info!(file = %file.display(), records = docs.len(), "loaded corpus file");
        engine.bulk_index(docs.into_iter().map(|d| (d.id, d.text)));
    }

    engine
        .save_path(output)
        .with_context(|| format!("writing index to {}", output.display()))?;
    tracing::info!(
        documents = engine.document_count(),
        terms = engine.term_count(),
        output = %output.display(),
        "index built"
    );
    Ok(())
}

fn read_corpus(path: &Path) -> Result<Vec<InputDoc>> {
    let reader = BufReader::new(File::open(path)?);
    let docs = serde_json::from_reader(reader)?;
    Ok(docs)
}

fn search(index: &Path, query: &str, limit: usize) -> Result<()> {
    let mut engine = SearchEngine::new();
    engine
        .load_path(index)
        .with_context(|| format!("loading index {}", index.display()))?;

    let results = engine.search(query)?;
    if results.is_empty() {
        println!("no matches");
        return Ok(());
    }
    for (rank, (id, score)) in results.iter().take(limit).enumerate() {
        let preview: String = engine.document(id)?.chars().take(80).collect();
        println!("{:>3}. {score:>8.4}  {id}", rank + 1);
        println!("     {}", preview.trim_end());
    }
    Ok(())
}

fn inspect(index: &Path) -> Result<()> {
    let mut engine = SearchEngine::new();
    engine
        .load_path(index)
        .with_context(|| format!("loading index {}", index.display()))?;

    println!("documents:      {}", engine.document_count());
    println!("distinct terms: {}", engine.term_count());
    println!("avg doc length: {:.1} chars", engine.average_length()?);
    Ok(())
}
