//! Library-level round trips: collect, store in an in-memory gist, apply
//! into a scratch root, collect again.

use cursor_sync::applier::{Applier, KEYBINDINGS_HEADER};
use cursor_sync::collector::Collector;
use cursor_sync::commands::{self, CommandResult};
use cursor_sync::gist::{GistStore, MemoryGists};
use cursor_sync::paths::EditorPaths;
use cursor_sync::reporter::MemoryReporter;
use cursor_sync::snapshot::{ExtensionRecord, Snapshot};
use serde_json::json;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LABEL: &str = "Cursor Editor Settings Sync";
const FILE: &str = "cursor-settings.json";

fn seed_editor(root: &Path) -> EditorPaths {
    let paths = EditorPaths::under(root);
    fs::create_dir_all(&paths.snippets).unwrap();
    fs::write(
        &paths.settings,
        r#"{"editor.fontSize": 13, "workbench.colorTheme": "Default Dark+", "files.exclude": {"**/.git": true}}"#,
    )
    .unwrap();
    fs::write(
        &paths.keybindings,
        "// Place your key bindings in this file to override the defaults\n[\n  {\"key\": \"ctrl+shift+p\", \"command\": \"workbench.action.showCommands\"}\n]\n",
    )
    .unwrap();
    fs::write(
        paths.snippets.join("python.json"),
        r#"{"main": {"prefix": "main", "body": ["if __name__ == '__main__':"]}}"#,
    )
    .unwrap();
    fs::write(paths.snippets.join("notes.txt"), "not a snippet").unwrap();

    let with_manifest = paths.extensions.join("ms-python.python-2024.1.0");
    fs::create_dir_all(&with_manifest).unwrap();
    fs::write(
        with_manifest.join("package.json"),
        r#"{"name": "python", "version": "2024.1.0", "publisher": "ms-python"}"#,
    )
    .unwrap();
    fs::create_dir_all(paths.extensions.join("foo-bar")).unwrap();
    paths
}

fn extension_set(extensions: &[ExtensionRecord]) -> HashSet<ExtensionRecord> {
    extensions.iter().cloned().collect()
}

#[test]
fn test_collect_apply_collect_reproduces_configuration() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let source_paths = seed_editor(source.path());
    let target_paths = EditorPaths::under(target.path());
    let reporter = MemoryReporter::new();

    let original = Collector::new(&source_paths, &reporter).collect();
    let report = Applier::new(&target_paths, &reporter).apply(&original);
    assert!(report.is_success());

    let reapplied = Collector::new(&target_paths, &reporter).collect();
    assert_eq!(reapplied.settings, original.settings);
    assert_eq!(reapplied.keybindings, original.keybindings);
    assert_eq!(reapplied.snippets, original.snippets);
    assert_eq!(original.snippets.len(), 1);

    // Extensions are only reported, so the target has none installed
    assert!(reapplied.extensions.is_empty());
    assert_eq!(
        extension_set(&original.extensions),
        extension_set(&[
            ExtensionRecord::new("python", "2024.1.0", "ms-python"),
            ExtensionRecord::bare("foo-bar"),
        ])
    );
}

#[test]
fn test_written_keybindings_carry_header() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let source_paths = seed_editor(source.path());
    let target_paths = EditorPaths::under(target.path());
    let reporter = MemoryReporter::new();

    let snapshot = Collector::new(&source_paths, &reporter).collect();
    Applier::new(&target_paths, &reporter).apply(&snapshot);

    let written = fs::read_to_string(&target_paths.keybindings).unwrap();
    assert!(written.starts_with(KEYBINDINGS_HEADER));
    assert!(written.contains("  {\n    \"key\": \"ctrl+shift+p\",\n    \"command\""));
}

#[test]
fn test_missing_editor_yields_empty_snapshot() {
    let empty = TempDir::new().unwrap();
    let paths = EditorPaths::under(&empty.path().join("does-not-exist"));
    let reporter = MemoryReporter::new();

    let snapshot = Collector::new(&paths, &reporter).collect();
    assert!(snapshot.settings.is_empty());
    assert_eq!(snapshot.keybindings, json!({}));
    assert!(snapshot.extensions.is_empty());
    assert!(snapshot.snippets.is_empty());
    assert_eq!(snapshot.format_version, "1.0");
}

#[test]
fn test_apply_continues_after_settings_failure() {
    let target = TempDir::new().unwrap();
    let paths = EditorPaths::under(target.path());
    // A directory where settings.json should go makes that write fail
    fs::create_dir_all(&paths.settings).unwrap();
    let reporter = MemoryReporter::new();

    let mut snapshot = Snapshot::new("Linux");
    snapshot.settings.insert("a".to_string(), json!(1));
    snapshot.keybindings = json!([{"key": "ctrl+a", "command": "noop"}]);
    snapshot
        .snippets
        .insert("go".to_string(), json!({"p": {"prefix": "p"}}));

    let report = Applier::new(&paths, &reporter).apply(&snapshot);
    assert!(!report.is_success());
    assert_eq!(report.failures().count(), 1);
    assert!(paths.keybindings.is_file());
    let snippet: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(paths.snippets.join("go.json")).unwrap()).unwrap();
    assert_eq!(snippet, json!({"p": {"prefix": "p"}}));
}

#[test]
fn test_push_pull_between_machines() {
    let laptop = TempDir::new().unwrap();
    let desktop = TempDir::new().unwrap();
    let laptop_paths = seed_editor(laptop.path());
    let desktop_paths = EditorPaths::under(desktop.path());
    let api = MemoryGists::new();
    let reporter = MemoryReporter::new();
    let store = GistStore::new(&api, FILE, &reporter);

    let pushed = commands::push(
        &Collector::new(&laptop_paths, &reporter),
        &store,
        LABEL,
        &reporter,
    )
    .unwrap();
    assert!(pushed.to_human().contains(&pushed.url));

    let pulled = commands::pull(
        &store,
        &Applier::new(&desktop_paths, &reporter),
        LABEL,
        &reporter,
    )
    .unwrap();
    assert!(pulled.success);
    assert_eq!(pulled.extensions, 2);

    let said = reporter.said();
    assert!(said.iter().any(|line| line == "  - ms-python.python (v2024.1.0)"));
    assert!(said.iter().any(|line| line == "  - unknown.foo-bar (vunknown)"));

    let settings: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&desktop_paths.settings).unwrap()).unwrap();
    assert_eq!(settings["editor.fontSize"], 13);
}

#[test]
fn test_apply_keeps_user_key_order() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let source_paths = EditorPaths::under(source.path());
    let target_paths = EditorPaths::under(target.path());
    fs::create_dir_all(&source_paths.snippets).unwrap();

    let settings = "{\n  \"workbench.colorTheme\": \"Dark\",\n  \"editor.fontSize\": 14,\n  \"a.first\": true\n}";
    let snippet = "{\n  \"zeta\": {\n    \"prefix\": \"z\",\n    \"body\": [\n      \"z()\"\n    ]\n  },\n  \"alpha\": {\n    \"prefix\": \"a\",\n    \"body\": []\n  }\n}";
    let keybindings = "[\n  {\n    \"key\": \"ctrl+k\",\n    \"command\": \"noop\",\n    \"when\": \"editorFocus\"\n  }\n]";
    fs::write(&source_paths.settings, settings).unwrap();
    fs::write(source_paths.snippets.join("rust.json"), snippet).unwrap();
    fs::write(&source_paths.keybindings, keybindings).unwrap();

    let reporter = MemoryReporter::new();
    let collected = Collector::new(&source_paths, &reporter).collect();
    // The stored blob keeps the order too
    let pulled = Snapshot::from_json(&collected.to_json().unwrap()).unwrap();
    assert!(Applier::new(&target_paths, &reporter).apply(&pulled).is_success());

    assert_eq!(fs::read_to_string(&target_paths.settings).unwrap(), settings);
    assert_eq!(
        fs::read_to_string(target_paths.snippets.join("rust.json")).unwrap(),
        snippet
    );
    assert_eq!(
        fs::read_to_string(&target_paths.keybindings).unwrap(),
        format!("{KEYBINDINGS_HEADER}{keybindings}")
    );
}
