//! Metadata comment header above `def execute`
//!
//! Node scripts carry a short comment block directly above the entry point
//! describing how the editor should draw the node:
//!
//! ```text
//! # name: Give Item
//! # params: [actor, item]
//! # nexts: [ok, fail]
//! def execute(actor, item):
//!     ...
//! ```
//!
//! Header parsing is line-based on purpose: it must work even for scripts
//! that fail syntax-tree extraction, and key order within the block does not
//! matter.

use crate::error::HeaderError;
use regex::Regex;

/// Parsed metadata header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptHeader {
    pub name: String,
    pub params: Vec<String>,
    pub nexts: Vec<String>,
}

/// Parse the metadata header above the first `def execute` line
///
/// The definition must have at least two lines above it; up to three lines
/// are scanned for the `name:`, `params: [...]`, and `nexts: [...]` keys.
/// All three must be present and non-empty.
pub fn parse_header(source: &str) -> Result<ScriptHeader, HeaderError> {
    let lines: Vec<&str> = source.lines().collect();
    let def_index = lines
        .iter()
        .position(|line| line.trim_start().starts_with("def execute"))
        .ok_or(HeaderError::CommentNotFound)?;
    if def_index < 2 {
        return Err(HeaderError::CommentNotFound);
    }

    let mut name = None;
    let mut params = Vec::new();
    let mut nexts = Vec::new();

    for line in &lines[def_index.saturating_sub(3)..def_index] {
        let clean = line.trim().trim_start_matches('#').trim();
        if let Some(rest) = clean.strip_prefix("name:") {
            let rest = rest.trim();
            if !rest.is_empty() {
                name = Some(rest.to_string());
            }
        } else if clean.starts_with("params:") {
            params = bracket_list(clean);
        } else if clean.starts_with("nexts:") {
            nexts = bracket_list(clean);
        }
    }

    let name = name.ok_or(HeaderError::InvalidFormat)?;
    if params.is_empty() || nexts.is_empty() {
        return Err(HeaderError::InvalidFormat);
    }

    Ok(ScriptHeader {
        name,
        params,
        nexts,
    })
}

/// Extract the comma-separated entries of the first `[...]` on the line
fn bracket_list(line: &str) -> Vec<String> {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\[(.*?)\]").unwrap());

    match re.captures(line) {
        Some(caps) => caps[1]
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}
