use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use raynotes_core::RayConfig;

const PASSPHRASE: &str = "test-passphrase-secure-123";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_raynotes"))
}

fn temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{}_{}_{}", prefix, std::process::id(), nanos));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn sample_config_json() -> String {
    let shopping = serde_json::json!({
        "type": "doc",
        "content": [
            {"type": "heading", "attrs": {"level": 1},
             "content": [{"type": "text", "text": "Shopping"}]},
            {"type": "list", "attrs": {"kind": "task", "checked": true},
             "content": [{"type": "text", "text": "Milk"}]},
            {"type": "list", "attrs": {"kind": "task", "checked": false},
             "content": [{"type": "text", "text": "Bread"}]}
        ]
    });
    let meeting = serde_json::json!({
        "type": "doc",
        "content": [
            {"type": "paragraph", "content": [
                {"type": "text", "text": "Discuss "},
                {"type": "text", "text": "roadmap", "marks": [{"type": "bold"}]}
            ]}
        ]
    });

    serde_json::json!({
        "builtin_package_raycastNotes": {
            "notes": [
                {
                    "id": "note-1",
                    "title": "Shopping: List",
                    "document": STANDARD.encode(shopping.to_string()),
                    "modifiedAt": "2024-03-01T10:30:00Z"
                },
                {
                    "id": "note-2",
                    "title": "Meeting",
                    "document": STANDARD.encode(meeting.to_string()),
                    "modifiedAt": "2024-03-02T09:00:00Z"
                }
            ]
        }
    })
    .to_string()
}

fn write_archive(dir: &Path, name: &str, config_json: &str) -> PathBuf {
    let path = dir.join(name);
    let mut config = RayConfig::new();
    config.set_raw_data(config_json.as_bytes().to_vec());
    config.export_file(&path, PASSPHRASE).expect("export archive");
    path
}

#[test]
fn test_cli_pack_then_export_flow() {
    let dir = temp_dir("raynotes_cli_flow");
    let config_path = dir.join("config.json");
    std::fs::write(&config_path, sample_config_json()).expect("write config json");
    let archive_path = dir.join("packed.rayconfig");
    let out_dir = dir.join("exported");

    let pack = Command::new(bin())
        .arg("pack")
        .arg(&config_path)
        .arg("--out")
        .arg(&archive_path)
        .env("RAYNOTES_PASSPHRASE", PASSPHRASE)
        .output()
        .expect("run pack");
    assert!(
        pack.status.success(),
        "pack failed: stdout={}, stderr={}",
        String::from_utf8_lossy(&pack.stdout),
        String::from_utf8_lossy(&pack.stderr)
    );
    assert!(archive_path.exists(), "archive file should exist");

    let export = Command::new(bin())
        .arg("export")
        .arg("--archive")
        .arg(&archive_path)
        .arg("--out")
        .arg(&out_dir)
        .env("RAYNOTES_PASSPHRASE", PASSPHRASE)
        .output()
        .expect("run export");
    assert!(
        export.status.success(),
        "export failed: stdout={}, stderr={}",
        String::from_utf8_lossy(&export.stdout),
        String::from_utf8_lossy(&export.stderr)
    );
    let stdout = String::from_utf8_lossy(&export.stdout);
    assert!(stdout.contains("Exported 2 of 2 notes"));

    let shopping = out_dir.join("note-1-Shopping- List.md");
    let contents = std::fs::read_to_string(&shopping).expect("read exported note");
    assert_eq!(contents, "# Shopping\n- [x] Milk\n- [ ] Bread\n");

    let meeting = out_dir.join("note-2-Meeting.md");
    let contents = std::fs::read_to_string(&meeting).expect("read exported note");
    assert_eq!(contents, "Discuss **roadmap**\n");

    // Exported files carry the note's modification time.
    let expected: SystemTime = chrono::DateTime::parse_from_rfc3339("2024-03-01T10:30:00Z")
        .expect("parse fixture time")
        .into();
    let modified = std::fs::metadata(&shopping)
        .expect("stat exported note")
        .modified()
        .expect("read mtime");
    assert_eq!(modified, expected);
}

#[test]
fn test_cli_notes_table_output() {
    let dir = temp_dir("raynotes_cli_notes");
    let archive_path = write_archive(&dir, "notes.rayconfig", &sample_config_json());

    let notes = Command::new(bin())
        .arg("notes")
        .arg("--archive")
        .arg(&archive_path)
        .env("RAYNOTES_PASSPHRASE", PASSPHRASE)
        .output()
        .expect("run notes");
    assert!(notes.status.success());
    let stdout = String::from_utf8_lossy(&notes.stdout);
    assert!(stdout.contains("ID | MODIFIED_AT | TITLE"));
    assert!(stdout.contains("note-1"));
    assert!(stdout.contains("Shopping- List"));
    assert!(stdout.contains("note-2"));
}

#[test]
fn test_cli_notes_json_output() {
    let dir = temp_dir("raynotes_cli_notes_json");
    let archive_path = write_archive(&dir, "notes.rayconfig", &sample_config_json());

    let notes = Command::new(bin())
        .arg("notes")
        .arg("--json")
        .arg("--archive")
        .arg(&archive_path)
        .env("RAYNOTES_PASSPHRASE", PASSPHRASE)
        .output()
        .expect("run notes");
    assert!(notes.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&notes.stdout).expect("parse notes json");
    let array = value.as_array().expect("notes output array");
    assert_eq!(array.len(), 2);
    assert_eq!(array[0].get("id").and_then(|v| v.as_str()), Some("note-1"));
    assert_eq!(
        array[0].get("content").and_then(|v| v.as_str()),
        Some("# Shopping\n- [x] Milk\n- [ ] Bread\n")
    );
    assert_eq!(
        array[1].get("modifiedAt").and_then(|v| v.as_str()),
        Some("2024-03-02T09:00:00Z")
    );
}

#[test]
fn test_cli_notes_empty_archive_message() {
    let dir = temp_dir("raynotes_cli_notes_empty");
    let archive_path = write_archive(&dir, "empty.rayconfig", r#"{"other_key": {}}"#);

    let notes = Command::new(bin())
        .arg("notes")
        .arg("--archive")
        .arg(&archive_path)
        .env("RAYNOTES_PASSPHRASE", PASSPHRASE)
        .output()
        .expect("run notes");
    assert!(notes.status.success());
    let stdout = String::from_utf8_lossy(&notes.stdout);
    assert!(stdout.contains("No notes found in the archive."));
}

#[test]
fn test_cli_dump_round_trips_config_json() {
    let dir = temp_dir("raynotes_cli_dump");
    let config_json = sample_config_json();
    let archive_path = write_archive(&dir, "dump.rayconfig", &config_json);

    let dump = Command::new(bin())
        .arg("dump")
        .arg("--raw")
        .arg("--archive")
        .arg(&archive_path)
        .env("RAYNOTES_PASSPHRASE", PASSPHRASE)
        .output()
        .expect("run dump");
    assert!(dump.status.success());
    assert_eq!(dump.stdout, config_json.as_bytes());

    let pretty = Command::new(bin())
        .arg("dump")
        .arg("--archive")
        .arg(&archive_path)
        .env("RAYNOTES_PASSPHRASE", PASSPHRASE)
        .output()
        .expect("run dump pretty");
    assert!(pretty.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&pretty.stdout).expect("parse dumped json");
    assert!(value.get("builtin_package_raycastNotes").is_some());
}

#[test]
fn test_cli_wrong_passphrase_fails() {
    let dir = temp_dir("raynotes_cli_wrong_pass");
    let archive_path = write_archive(&dir, "locked.rayconfig", &sample_config_json());

    let notes = Command::new(bin())
        .arg("notes")
        .arg("--archive")
        .arg(&archive_path)
        .env("RAYNOTES_PASSPHRASE", "wrong-passphrase")
        .output()
        .expect("run notes");

    assert!(!notes.status.success());
    let stderr = String::from_utf8_lossy(&notes.stderr);
    assert!(stderr.contains("Invalid decryption password or corrupted file"));
}

#[test]
fn test_cli_missing_archive_message() {
    let notes = Command::new(bin())
        .arg("notes")
        .env_remove("RAYNOTES_ARCHIVE")
        .env("RAYNOTES_PASSPHRASE", PASSPHRASE)
        .output()
        .expect("run notes");

    assert!(!notes.status.success());
    let stderr = String::from_utf8_lossy(&notes.stderr);
    assert!(stderr.contains("No archive path provided"));
}

#[test]
fn test_cli_missing_archive_file_fails() {
    let dir = temp_dir("raynotes_cli_missing_file");
    let missing = dir.join("does-not-exist.rayconfig");

    let notes = Command::new(bin())
        .arg("notes")
        .arg("--archive")
        .arg(&missing)
        .env("RAYNOTES_PASSPHRASE", PASSPHRASE)
        .output()
        .expect("run notes");

    assert!(!notes.status.success());
}

#[test]
fn test_cli_archive_env_var_is_used() {
    let dir = temp_dir("raynotes_cli_env_archive");
    let archive_path = write_archive(&dir, "env.rayconfig", &sample_config_json());

    let notes = Command::new(bin())
        .arg("notes")
        .env("RAYNOTES_ARCHIVE", &archive_path)
        .env("RAYNOTES_PASSPHRASE", PASSPHRASE)
        .output()
        .expect("run notes");

    assert!(notes.status.success());
    let stdout = String::from_utf8_lossy(&notes.stdout);
    assert!(stdout.contains("note-1"));
}

#[test]
fn test_cli_pack_rejects_invalid_json() {
    let dir = temp_dir("raynotes_cli_pack_invalid");
    let config_path = dir.join("broken.json");
    std::fs::write(&config_path, "{not json").expect("write broken json");
    let archive_path = dir.join("broken.rayconfig");

    let pack = Command::new(bin())
        .arg("pack")
        .arg(&config_path)
        .arg("--out")
        .arg(&archive_path)
        .env("RAYNOTES_PASSPHRASE", PASSPHRASE)
        .output()
        .expect("run pack");

    assert!(!pack.status.success());
    let stderr = String::from_utf8_lossy(&pack.stderr);
    assert!(stderr.contains("not valid JSON"));
    assert!(!archive_path.exists(), "no archive should be written");
}

#[test]
fn test_cli_quiet_suppresses_export_chatter() {
    let dir = temp_dir("raynotes_cli_quiet");
    let archive_path = write_archive(&dir, "quiet.rayconfig", &sample_config_json());
    let out_dir = dir.join("exported");

    let export = Command::new(bin())
        .arg("export")
        .arg("--quiet")
        .arg("--archive")
        .arg(&archive_path)
        .arg("--out")
        .arg(&out_dir)
        .env("RAYNOTES_PASSPHRASE", PASSPHRASE)
        .output()
        .expect("run export");

    assert!(export.status.success());
    let stdout = String::from_utf8_lossy(&export.stdout);
    assert!(stdout.trim().is_empty());
    assert!(out_dir.join("note-2-Meeting.md").exists());
}

#[test]
fn test_cli_version_banner() {
    let output = Command::new(bin()).output().expect("run raynotes");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Raynotes v"));
    assert!(stdout.contains("raynotes --help"));
}

#[test]
fn test_cli_invalid_args_exit_code() {
    let output = Command::new(bin()).arg("pack").output().expect("run pack");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage:") || stderr.contains("error:"));
}

#[test]
fn test_cli_export_skips_undecodable_notes() {
    let dir = temp_dir("raynotes_cli_skip_bad");
    let config_json = serde_json::json!({
        "builtin_package_raycastNotes": {
            "notes": [
                {
                    "id": "good",
                    "title": "Good",
                    "document": STANDARD.encode(r#"{"type":"doc","content":[]}"#),
                    "modifiedAt": "2024-03-01T10:30:00Z"
                },
                {
                    "id": "bad",
                    "title": "Bad",
                    "document": "@@not-base64@@",
                    "modifiedAt": "2024-03-01T10:30:00Z"
                }
            ]
        }
    })
    .to_string();
    let archive_path = write_archive(&dir, "mixed.rayconfig", &config_json);
    let out_dir = dir.join("exported");

    let export = Command::new(bin())
        .arg("export")
        .arg("--archive")
        .arg(&archive_path)
        .arg("--out")
        .arg(&out_dir)
        .env("RAYNOTES_PASSPHRASE", PASSPHRASE)
        .output()
        .expect("run export");

    assert!(export.status.success());
    let stdout = String::from_utf8_lossy(&export.stdout);
    assert!(stdout.contains("Exported 1 of 2 notes"));
    assert!(out_dir.join("good-Good.md").exists());
    assert!(!out_dir.join("bad-Bad.md").exists());
}
