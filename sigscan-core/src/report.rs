//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs

use crate::header::ScriptHeader;
use serde::{Deserialize, Serialize};

/// Inspection result for one script
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScriptReport {
    pub file: String,
    /// 1-indexed line of the selected `execute` definition
    pub line: u32,
    pub param_count: usize,
    pub return_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderReport>,
}

/// Metadata header in report format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderReport {
    pub name: String,
    pub params: Vec<String>,
    pub nexts: Vec<String>,
}

impl From<ScriptHeader> for HeaderReport {
    fn from(header: ScriptHeader) -> Self {
        HeaderReport {
            name: header.name,
            params: header.params,
            nexts: header.nexts,
        }
    }
}

/// Sort reports deterministically
pub fn sort_reports(mut reports: Vec<ScriptReport>) -> Vec<ScriptReport> {
    reports.sort_by(|a, b| {
        // 1. File path ascending
        a.file
            .cmp(&b.file)
            // 2. Line number ascending
            .then_with(|| a.line.cmp(&b.line))
    });
    reports
}

/// Render reports as text output
pub fn render_text(reports: &[ScriptReport]) -> String {
    let mut output = String::new();
    let show_headers = reports.iter().any(|r| r.header.is_some());

    // Header
    if show_headers {
        output.push_str(&format!(
            "{:<30} {:<6} {:<7} {:<8} {:<20} {}\n",
            "FILE", "LINE", "PARAMS", "RETURNS", "NAME", "NEXTS"
        ));
    } else {
        output.push_str(&format!(
            "{:<30} {:<6} {:<7} {}\n",
            "FILE", "LINE", "PARAMS", "RETURNS"
        ));
    }

    // Reports
    for report in reports {
        if show_headers {
            let (name, nexts) = match &report.header {
                Some(h) => (h.name.as_str(), h.nexts.join(", ")),
                None => ("-", "-".to_string()),
            };
            output.push_str(&format!(
                "{:<30} {:<6} {:<7} {:<8} {:<20} {}\n",
                truncate_or_pad(&report.file, 30),
                report.line,
                report.param_count,
                report.return_count,
                truncate_or_pad(name, 20),
                nexts,
            ));
        } else {
            output.push_str(&format!(
                "{:<30} {:<6} {:<7} {}\n",
                truncate_or_pad(&report.file, 30),
                report.line,
                report.param_count,
                report.return_count,
            ));
        }
    }

    output
}

/// Render reports as JSON output
pub fn render_json(reports: &[ScriptReport]) -> String {
    serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".to_string())
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.len() > width {
        format!("{}...", &s[..width.saturating_sub(3)])
    } else {
        format!("{:<width$}", s, width = width)
    }
}
