//! Binary persistence for the coupled (index, store) pair.
//!
//! Layout: 4 magic bytes, a little-endian u32 format version, a
//! little-endian u32 CRC32 of the payload, then the bincode payload
//! holding the `(InvertedIndex, DocumentStore)` tuple. The format is
//! private to this crate and carries no cross-version guarantee beyond
//! the version field.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::store::DocumentStore;

const MAGIC: [u8; 4] = *b"SIFT";
const VERSION: u32 = 1;

pub fn save<W: Write>(index: &InvertedIndex, store: &DocumentStore, mut writer: W) -> Result<()> {
    let payload =
        bincode::serialize(&(index, store)).map_err(|e| Error::Io(std::io::Error::other(e)))?;
    writer.write_all(&MAGIC)?;
    writer.write_all(&VERSION.to_le_bytes())?;
    writer.write_all(&crc32fast::hash(&payload).to_le_bytes())?;
    writer.write_all(&payload)?;
    Ok(())
}

pub fn load<R: Read>(mut reader: R) -> Result<(InvertedIndex, DocumentStore)> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(Error::CorruptData("bad magic bytes".into()));
    }

    let mut word = [0u8; 4];
    reader.read_exact(&mut word)?;
    let version = u32::from_le_bytes(word);
    if version != VERSION {
        return Err(Error::CorruptData(format!(
            "unsupported format version {version}"
        )));
    }

    reader.read_exact(&mut word)?;
    let expected = u32::from_le_bytes(word);
    let mut payload = Vec::new();
    reader.read_to_end(&mut payload)?;
    if crc32fast::hash(&payload) != expected {
        return Err(Error::CorruptData("payload checksum mismatch".into()));
    }

    bincode::deserialize(&payload).map_err(|e| Error::CorruptData(e.to_string()))
}

pub fn save_path<P: AsRef<Path>>(
    index: &InvertedIndex,
    store: &DocumentStore,
    path: P,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    save(index, store, &mut writer)?;
    writer.flush()?;
    tracing::debug!(path = %path.as_ref().display(), "saved index");
    Ok(())
}

pub fn load_path<P: AsRef<Path>>(path: P) -> Result<(InvertedIndex, DocumentStore)> {
    let file = File::open(path.as_ref())?;
    let loaded = load(BufReader::new(file))?;
    tracing::debug!(path = %path.as_ref().display(), "loaded index");
    Ok(loaded)
}
