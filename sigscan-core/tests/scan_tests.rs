//! Integration tests for directory scanning

use sigscan_core::config::SigscanConfig;
use sigscan_core::{render_json, scan, scan_with_config, ScanOptions};
use std::fs;
use std::path::Path;

fn write_script(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
}

fn fixture_tree(root: &Path) {
    write_script(
        root,
        "scripts/give.py",
        "# name: Give Item\n# params: [actor, item]\n# nexts: [ok, fail]\ndef execute(actor, item):\n    return actor, item\n",
    );
    write_script(
        root,
        "scripts/sub/heal.py",
        "def execute(target):\n    return target\n",
    );
    write_script(root, "scripts/broken.py", "def execute(:\n");
    write_script(
        root,
        "scripts/__pycache__/stale.py",
        "def execute():\n    return 1\n",
    );
    write_script(root, "scripts/notes.txt", "not a script");
}

#[test]
fn test_scan_reports_good_scripts_and_skips_bad_ones() {
    let dir = tempfile::tempdir().unwrap();
    fixture_tree(dir.path());

    // independently count candidate scripts outside skipped dirs
    let candidates = walkdir::WalkDir::new(dir.path())
        .into_iter()
        .filter_entry(|e| e.file_name() != "__pycache__")
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "py"))
        .count();
    assert_eq!(candidates, 3);

    let reports = scan(dir.path(), ScanOptions::default()).unwrap();
    // broken.py is skipped with a warning, stale.py sits in a skipped dir
    assert_eq!(reports.len(), 2);

    // deterministic order: file path ascending
    assert!(reports[0].file.ends_with("give.py"));
    assert!(reports[1].file.ends_with("heal.py"));

    // header garnish is attached where present
    let header = reports[0].header.as_ref().unwrap();
    assert_eq!(header.name, "Give Item");
    assert_eq!(header.nexts, vec!["ok", "fail"]);
    assert!(reports[1].header.is_none());
}

#[test]
fn test_scan_single_file() {
    let dir = tempfile::tempdir().unwrap();
    fixture_tree(dir.path());

    let reports = scan(&dir.path().join("scripts/sub/heal.py"), ScanOptions::default()).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].param_count, 1);
    assert_eq!(reports[0].return_count, 1);
    assert_eq!(reports[0].line, 1);
}

#[test]
fn test_scan_without_headers() {
    let dir = tempfile::tempdir().unwrap();
    fixture_tree(dir.path());

    let options = ScanOptions {
        headers: Some(false),
        ..Default::default()
    };
    let reports = scan(dir.path(), options).unwrap();
    assert!(reports.iter().all(|r| r.header.is_none()));
}

#[test]
fn test_strict_scan_fails_on_broken_script() {
    let dir = tempfile::tempdir().unwrap();
    fixture_tree(dir.path());

    let options = ScanOptions {
        strict: true,
        ..Default::default()
    };
    let err = scan(dir.path(), options).unwrap_err();
    assert!(err.to_string().contains("broken.py"));
}

#[test]
fn test_scan_respects_config_excludes() {
    let dir = tempfile::tempdir().unwrap();
    fixture_tree(dir.path());

    let config = SigscanConfig {
        exclude: vec!["**/sub/**".to_string(), "**/broken.py".to_string()],
        ..Default::default()
    };
    let resolved = config.resolve().unwrap();

    let reports = scan_with_config(dir.path(), ScanOptions::default(), Some(&resolved)).unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].file.ends_with("give.py"));
}

#[test]
fn test_scan_output_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    fixture_tree(dir.path());

    let first = render_json(&scan(dir.path(), ScanOptions::default()).unwrap());
    let second = render_json(&scan(dir.path(), ScanOptions::default()).unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let reports = scan(dir.path(), ScanOptions::default()).unwrap();
    assert!(reports.is_empty());
}
