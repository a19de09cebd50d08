//! Encrypted archive import and export.
//!
//! [`RayConfig`] is the high-level handle over a `.rayconfig` archive. The
//! full pipeline, outside in:
//!
//! ```text
//! archive bytes = AES-256-CBC( pkcs7( random_header[16] || gzip(config json) ) )
//! ```
//!
//! Import runs the pipeline in reverse and treats the three inner stages
//! (decrypt, decompress, parse) as a single unit: any failure surfaces as
//! one opaque [`RayError::BadPassphraseOrCorrupt`]. The cipher layer alone
//! cannot reliably tell a wrong passphrase from corrupted input, and
//! reporting which stage failed would leak more than it helps. File-level
//! I/O problems are reported normally; they have nothing to do with the
//! passphrase.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Deserialize;
use serde_json::Value;

use crate::crypto::cipher;
use crate::error::{RayError, Result};
use crate::notes::NoteRecord;

/// Config key under which the notes package stores its state.
const NOTES_PACKAGE_KEY: &str = "builtin_package_raycastNotes";

/// An encrypted config archive, holding the decrypted JSON bytes once
/// loaded.
///
/// A fresh handle is empty. `import_*` replaces the held bytes only after
/// the whole pipeline has succeeded, so a failed import leaves any
/// previously loaded state intact. `export_*` re-encrypts the held bytes
/// without consuming them.
#[derive(Debug, Default)]
pub struct RayConfig {
    raw: Vec<u8>,
}

impl RayConfig {
    /// Create an empty handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decrypt an archive and load its config into this handle.
    ///
    /// # Errors
    ///
    /// Returns `RayError::BadPassphraseOrCorrupt` on any decrypt,
    /// decompress, or parse failure. The stages are deliberately not
    /// distinguished.
    pub fn import_bytes(&mut self, encrypted: &[u8], passphrase: &str) -> Result<()> {
        let raw = decode_archive(encrypted, passphrase)
            .map_err(|_| RayError::BadPassphraseOrCorrupt)?;
        self.raw = raw;
        Ok(())
    }

    /// Read an archive file and load its config into this handle.
    ///
    /// # Errors
    ///
    /// Returns `RayError::Io` if the file cannot be read, otherwise as
    /// [`RayConfig::import_bytes`].
    pub fn import_file(&mut self, path: &Path, passphrase: &str) -> Result<()> {
        let encrypted = fs::read(path)?;
        self.import_bytes(&encrypted, passphrase)
    }

    /// Encrypt the held config bytes into archive form.
    pub fn export_bytes(&self, passphrase: &str) -> Result<Vec<u8>> {
        let compressed = compress(&self.raw)?;
        Ok(cipher::encrypt(&compressed, passphrase))
    }

    /// Encrypt the held config bytes and write them to a file.
    pub fn export_file(&self, path: &Path, passphrase: &str) -> Result<()> {
        let encrypted = self.export_bytes(passphrase)?;
        fs::write(path, encrypted)?;
        Ok(())
    }

    /// Parse the held bytes as JSON.
    ///
    /// Unlike import, this reports JSON problems as they are: the held
    /// bytes were either validated during import or injected through
    /// [`RayConfig::set_raw_data`], so a failure here means the caller put
    /// bad data in.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_slice(&self.raw)?)
    }

    /// Extract the note records from the held config.
    ///
    /// Returns `None` when the notes package or its `notes` key is absent,
    /// and `Some` with all records (possibly zero) when present. Records
    /// are returned as stored; validity filtering belongs to
    /// [`crate::notes::parse_all_notes`].
    pub fn notes(&self) -> Result<Option<Vec<NoteRecord>>> {
        let config = self.json()?;
        let Some(package) = config.get(NOTES_PACKAGE_KEY) else {
            return Ok(None);
        };
        match package.get("notes") {
            Some(Value::Null) | None => Ok(None),
            Some(notes) => Ok(Some(Vec::<NoteRecord>::deserialize(notes)?)),
        }
    }

    /// The held decrypted bytes, empty before any import.
    pub fn raw_data(&self) -> &[u8] {
        &self.raw
    }

    /// Replace the held bytes without touching an archive.
    ///
    /// The bytes are not validated here; [`RayConfig::json`] will reject
    /// non-JSON content on the next read.
    pub fn set_raw_data(&mut self, raw: Vec<u8>) {
        self.raw = raw;
    }
}

/// Run the import pipeline: decrypt, decompress, verify the result parses
/// as JSON. The caller collapses any error into the opaque import failure.
fn decode_archive(encrypted: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    let compressed = cipher::decrypt(encrypted, passphrase)?;
    let raw = decompress(&compressed)?;
    serde_json::from_slice::<Value>(&raw)?;
    Ok(raw)
}

fn compress(raw: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raw)?;
    Ok(encoder.finish()?)
}

fn decompress(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(compressed);
    let mut raw = Vec::new();
    decoder
        .read_to_end(&mut raw)
        .map_err(|_| RayError::Decompression)?;
    Ok(raw)
}
