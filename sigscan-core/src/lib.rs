//! Sigscan core library - `execute` signature extraction for Python node scripts

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Analysis is strictly per-script
// - No global mutable state
// - No randomness, clocks, threads, or async
// - Deterministic traversal order must be explicit
// - Formatting, comments, and whitespace must not affect results
// - Identical input yields byte-for-byte identical output

pub mod ast;
pub mod config;
pub mod error;
pub mod extract;
pub mod header;
pub mod report;
pub mod span;

pub use config::ResolvedConfig;
pub use error::{ExtractError, HeaderError};
pub use extract::{extract, extract_from_file, Signature};
pub use header::{parse_header, ScriptHeader};
pub use report::{render_json, render_text, sort_reports, HeaderReport, ScriptReport};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Options for a scan over a file or directory of scripts
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Attach metadata headers to reports (None: defer to config)
    pub headers: Option<bool>,
    /// Fail on the first script that cannot be inspected instead of skipping
    pub strict: bool,
}

/// Inspect one script's source text into a report
///
/// The metadata header is optional garnish: a script whose header is absent
/// or malformed still reports its signature.
pub fn inspect_source(
    source: &str,
    file: &str,
    with_header: bool,
) -> std::result::Result<ScriptReport, ExtractError> {
    let module = ast::parse_module(source)?;
    let function = extract::locate_entry_point(&module)?;
    let signature = extract::signature_of(function)?;

    let header = if with_header {
        header::parse_header(source).ok().map(HeaderReport::from)
    } else {
        None
    };

    Ok(ScriptReport {
        file: file.to_string(),
        line: function.span.start_line,
        param_count: signature.param_count,
        return_count: signature.return_count,
        header,
    })
}

/// Inspect one script file into a report
///
/// Follows the same error contract as [`extract_from_file`]: a missing path
/// yields "File not found: {path}", every other failure is re-wrapped into
/// "Error when parsing: {original message}".
pub fn inspect_file(
    path: &Path,
    with_header: bool,
) -> std::result::Result<ScriptReport, ExtractError> {
    if !path.is_file() {
        return Err(ExtractError::FileNotFound(path.display().to_string()));
    }

    let source = std::fs::read_to_string(path)
        .map_err(|e| ExtractError::Wrapped(e.to_string()))?;

    inspect_source(&source, &path.display().to_string(), with_header)
        .map_err(|e| ExtractError::Wrapped(e.to_string()))
}

/// Scan scripts at the given path with default configuration
pub fn scan(path: &Path, options: ScanOptions) -> Result<Vec<ScriptReport>> {
    scan_with_config(path, options, None)
}

/// Scan scripts at the given path with optional resolved configuration
pub fn scan_with_config(
    path: &Path,
    options: ScanOptions,
    resolved_config: Option<&ResolvedConfig>,
) -> Result<Vec<ScriptReport>> {
    let with_headers = match (options.headers, resolved_config) {
        (Some(flag), _) => flag,
        (None, Some(config)) => config.headers,
        (None, None) => true,
    };

    let script_files = collect_script_files(path)?;

    let mut reports = Vec::new();
    let mut skipped: usize = 0;
    for file_path in script_files {
        // Apply config include/exclude filter
        if let Some(config) = resolved_config {
            if !config.should_include(&file_path) {
                continue;
            }
        }

        match inspect_file(&file_path, with_headers) {
            Ok(report) => reports.push(report),
            Err(e) => {
                if options.strict {
                    return Err(anyhow::Error::new(e)
                        .context(format!("failed to inspect {}", file_path.display())));
                }
                eprintln!("warning: skipping script {}: {}", file_path.display(), e);
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        eprintln!("Skipped {} script(s) due to extraction errors", skipped);
    }

    Ok(sort_reports(reports))
}

/// Check if a file is a Python script
fn is_script_file(filename: &str) -> bool {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext == "py" || ext == "pyw")
}

/// Collect all scripts from a path (file or directory)
fn collect_script_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
            if is_script_file(filename) {
                files.push(path.to_path_buf());
            }
        }
    } else if path.is_dir() {
        collect_script_files_recursive(path, &mut files)?;
    }

    // Sort files for deterministic order
    files.sort();

    Ok(files)
}

/// Returns true for directory names that should not be traversed
fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.')
        || name == "__pycache__"
        || name == "node_modules"
        || name == "venv"
        || name == "dist"
        || name == "build"
}

/// Process one directory entry, pushing scripts or recursing into dirs
fn process_dir_entry(path: PathBuf, metadata: std::fs::Metadata, files: &mut Vec<PathBuf>) -> Result<()> {
    use std::ffi::OsStr;

    if metadata.is_symlink() {
        return Ok(());
    }

    if metadata.is_dir() {
        if let Some(name) = path.file_name().and_then(|n: &OsStr| n.to_str()) {
            if is_skipped_dir(name) {
                return Ok(());
            }
        }
        collect_script_files_recursive(&path, files)?;
    } else if metadata.is_file() {
        if let Some(filename) = path.file_name().and_then(|n: &OsStr| n.to_str()) {
            if is_script_file(filename) {
                files.push(path);
            }
        }
    }

    Ok(())
}

/// Recursively collect scripts from a directory
fn collect_script_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry_result in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry_result?;
        let path = entry.path();
        let metadata = std::fs::symlink_metadata(&path)
            .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
        process_dir_entry(path, metadata, files)?;
    }

    Ok(())
}
