//! # Raynotes Core
//!
//! Core library for Raynotes - a reader and writer for password-protected
//! Raycast `.rayconfig` archives and the notes they contain.
//!
//! This crate provides the archive pipeline, document model, and Markdown
//! rendering independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **crypto**: Key derivation and the AES-256-CBC payload cipher
//! - **archive**: Archive import/export and config access ([`RayConfig`])
//! - **document**: Typed model of the rich-text document tree
//! - **markdown**: Document tree to Markdown rendering
//! - **notes**: Note records and their conversion to Markdown files
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use raynotes_core::{parse_all_notes, RayConfig};
//!
//! fn main() -> raynotes_core::Result<()> {
//!     let mut config = RayConfig::new();
//!     config.import_file(Path::new("backup.rayconfig"), "passphrase")?;
//!
//!     for note in parse_all_notes(&config.notes()?.unwrap_or_default()) {
//!         println!("{}: {}", note.id, note.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod crypto;
pub mod document;
pub mod error;
pub mod markdown;
pub mod notes;

pub use archive::RayConfig;
pub use document::{DocumentNode, ListKind, Mark};
pub use error::{RayError, Result};
pub use markdown::{render, render_from};
pub use notes::{
    note_filename, parse_all_notes, parse_note, sanitize_title, NoteRecord, ParsedNote,
};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
