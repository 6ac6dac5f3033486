//! Extraction report generation
//!
//! Renders a batch of [`ParseOutcome`]s as JSON, Markdown or a one-line
//! summary.

use serde::Serialize;

use crate::parsers::Lib;
use crate::processor::ParseOutcome;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub files: usize,
    pub valid: usize,
    pub invalid: usize,
    pub libs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub file_path: String,
    pub format: &'static str,
    pub lang: &'static str,
    pub valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub libs: Vec<Lib>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_class: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub summary: ReportSummary,
    pub files: Vec<ReportEntry>,
}

impl Report {
    pub fn from_outcomes(outcomes: &[ParseOutcome]) -> Self {
        let files: Vec<ReportEntry> = outcomes
            .iter()
            .map(|outcome| ReportEntry {
                file_path: outcome.path().to_string(),
                format: outcome.format().id(),
                lang: outcome.format().lang_name(),
                valid: outcome.is_valid(),
                libs: outcome.libs().to_vec(),
                error_class: outcome.error().map(|err| err.kind()),
                error: outcome.error_message(),
            })
            .collect();

        let valid = files.iter().filter(|entry| entry.valid).count();
        let summary = ReportSummary {
            files: files.len(),
            valid,
            invalid: files.len() - valid,
            libs: files.iter().map(|entry| entry.libs.len()).sum(),
        };

        Self { summary, files }
    }
}

pub fn generate_json_report(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn generate_summary(report: &Report) -> String {
    let summary = &report.summary;
    format!(
        "{} files parsed: {} valid, {} invalid, {} libraries",
        summary.files, summary.valid, summary.invalid, summary.libs
    )
}

pub fn generate_markdown_report(root: &str, report: &Report) -> String {
    let summary = &report.summary;
    let mut lines = vec![
        "# Dependency Report".to_string(),
        String::new(),
        format!("**Root**: {root}"),
        String::new(),
        "## Summary".to_string(),
        "| Files | Valid | Invalid | Libraries |".to_string(),
        "|-------|-------|---------|-----------|".to_string(),
        format!(
            "| {} | {} | {} | {} |",
            summary.files, summary.valid, summary.invalid, summary.libs
        ),
        String::new(),
    ];

    if report.files.is_empty() {
        lines.push("## No manifest files found".to_string());
        return lines.join("\n");
    }

    for entry in &report.files {
        lines.push(format!("### {} ({}, {})", entry.file_path, entry.lang, entry.format));
        lines.push(String::new());

        if let Some(error) = &entry.error {
            lines.push(format!(
                "- ✗ {}: {}",
                entry.error_class.unwrap_or_default(),
                error
            ));
        } else {
            lines.extend(entry.libs.iter().map(|lib| format!("- {}", lib.display_name())));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
