//! Raynotes CLI - Export notes from password-protected Raycast config archives
//!
//! This is the command-line interface for Raynotes. It provides a
//! user-friendly interface to the core library functionality: listing and
//! exporting notes from an encrypted `.rayconfig` archive, inspecting the
//! decrypted config, and packing a plain config back into archive form.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use dialoguer::Password;
use raynotes_core::{note_filename, parse_all_notes, RayConfig, VERSION};

/// Raynotes - Read and write password-protected Raycast config archives
#[derive(Parser)]
#[command(name = "raynotes")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the encrypted .rayconfig archive
    #[arg(short, long, global = true, env = "RAYNOTES_ARCHIVE")]
    archive: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the notes stored in the archive
    Notes {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export notes as Markdown files
    Export {
        /// Directory to write the Markdown files into
        #[arg(long, value_name = "DIR", default_value = ".")]
        out: String,
    },

    /// Print the decrypted config JSON
    Dump {
        /// Print the decrypted bytes verbatim instead of pretty-printing
        #[arg(long)]
        raw: bool,
    },

    /// Encrypt a plain config JSON file into an archive
    Pack {
        /// Path to the plain config JSON
        #[arg(value_name = "JSON")]
        input: String,

        /// Destination archive path
        #[arg(long, value_name = "PATH")]
        out: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let Cli {
        archive,
        command,
        quiet,
    } = Cli::parse();

    match command {
        Some(Commands::Notes { json }) => {
            let config = open_archive(archive.as_deref())?;
            let Some(records) = config.notes()? else {
                if !quiet {
                    println!("No notes found in the archive.");
                }
                return Ok(());
            };
            let notes = parse_all_notes(&records);

            if json {
                println!("{}", serde_json::to_string_pretty(&notes)?);
            } else {
                if !quiet {
                    println!("ID | MODIFIED_AT | TITLE");
                }
                for note in &notes {
                    let title = if note.title.is_empty() {
                        "untitled"
                    } else {
                        note.title.as_str()
                    };
                    println!("{} | {} | {}", note.id, note.modified_at, title);
                }
            }
        }
        Some(Commands::Export { out }) => {
            let config = open_archive(archive.as_deref())?;
            let records = config.notes()?.unwrap_or_default();
            let notes = parse_all_notes(&records);
            if notes.is_empty() {
                if !quiet {
                    println!("No notes to export.");
                }
                return Ok(());
            }

            let out_dir = PathBuf::from(out);
            std::fs::create_dir_all(&out_dir).map_err(|e| {
                anyhow::anyhow!("Failed to create {}: {}", out_dir.display(), e)
            })?;

            for note in &notes {
                let path = out_dir.join(note_filename(note));
                std::fs::write(&path, note.content.as_bytes())
                    .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
                set_modified_time(&path, note.modified_at)?;
                if !quiet {
                    println!("Saved {}", path.display());
                }
            }

            if !quiet {
                println!(
                    "Exported {} of {} notes to {}",
                    notes.len(),
                    records.len(),
                    out_dir.display()
                );
            }
        }
        Some(Commands::Dump { raw }) => {
            let config = open_archive(archive.as_deref())?;
            if raw {
                io::stdout().write_all(config.raw_data())?;
            } else {
                println!("{}", serde_json::to_string_pretty(&config.json()?)?);
            }
        }
        Some(Commands::Pack { input, out }) => {
            let raw = std::fs::read(&input)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input, e))?;
            // Refuse to produce an archive no importer could open.
            serde_json::from_slice::<serde_json::Value>(&raw)
                .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {}", input, e))?;

            let passphrase = prompt_pack_passphrase()?;
            let mut config = RayConfig::new();
            config.set_raw_data(raw);
            config.export_file(Path::new(&out), &passphrase)?;

            if !quiet {
                println!("Packed {} into {}", input, out);
            }
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "raynotes", &mut std::io::stdout());
        }
        None => {
            println!("Raynotes v{}", VERSION);
            println!("\nRun `raynotes --help` for usage information.");
        }
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_archive(archive: Option<&str>) -> anyhow::Result<RayConfig> {
    let path = archive.ok_or_else(|| {
        anyhow::anyhow!("No archive path provided. Use --archive or set RAYNOTES_ARCHIVE.")
    })?;
    let passphrase = prompt_passphrase()?;

    let mut config = RayConfig::new();
    config.import_file(Path::new(path), &passphrase)?;
    Ok(config)
}

fn prompt_passphrase() -> anyhow::Result<String> {
    if let Ok(value) = std::env::var("RAYNOTES_PASSPHRASE") {
        if !value.trim().is_empty() {
            return Ok(value);
        }
    }
    Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

fn prompt_pack_passphrase() -> anyhow::Result<String> {
    if let Ok(value) = std::env::var("RAYNOTES_PASSPHRASE") {
        if !value.trim().is_empty() {
            return Ok(value);
        }
    }
    Password::new()
        .with_prompt("Enter passphrase")
        .with_confirmation("Confirm passphrase", "Passphrases do not match")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

/// Stamp an exported file with the note's modification time, so exported
/// Markdown sorts the way the notes did.
fn set_modified_time(path: &Path, modified_at: DateTime<Utc>) -> anyhow::Result<()> {
    let file = std::fs::File::options().write(true).open(path)?;
    file.set_modified(SystemTime::from(modified_at))
        .map_err(|e| anyhow::anyhow!("Failed to set mtime on {}: {}", path.display(), e))?;
    Ok(())
}
