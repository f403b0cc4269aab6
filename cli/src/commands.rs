use anyhow::{bail, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use travel_rules_core::parsing::compute_sha256_hex;
use travel_rules_core::{validate_xml, DocumentKind, RuleSet, ValidationResult};
use walkdir::WalkDir;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFile {
    pub path: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub sha256: Option<String>,
    pub kind: Option<DocumentKind>,
    pub result: Option<ValidationResult>,
    /// Set when the file could not be read or parsed; `result` is then `None`.
    pub error: Option<String>,
}

impl FileReport {
    pub fn passed(&self) -> bool {
        self.result.as_ref().is_some_and(|r| r.is_valid)
    }
}

pub fn scan_folder(dir: &Path) -> Result<Vec<DocumentFile>> {
    if !dir.is_dir() {
        bail!("Provided path is not a directory: {}", dir.display());
    }
    let mut result = Vec::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        if entry.file_type().is_file() {
            let p = entry.path();
            if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                if ext.eq_ignore_ascii_case("xml") {
                    let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
                    result.push(DocumentFile {
                        path: p.display().to_string(),
                        size_bytes,
                    });
                }
            }
        }
    }
    result.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(result)
}

pub fn validate_file(
    path: &Path,
    kind: Option<DocumentKind>,
    rules: &RuleSet,
    as_of: Option<NaiveDateTime>,
) -> FileReport {
    let mut report = FileReport {
        path: path.display().to_string(),
        sha256: None,
        kind: None,
        result: None,
        error: None,
    };
    let xml = match std::fs::read_to_string(path) {
        Ok(xml) => xml,
        Err(e) => {
            tracing::warn!(path=%report.path, error=%e, "failed to read document");
            report.error = Some(e.to_string());
            return report;
        }
    };
    report.sha256 = Some(compute_sha256_hex(&xml));

    match validate_xml(&xml, kind, rules, as_of) {
        Ok((kind, result)) => {
            tracing::info!(
                path=%report.path,
                kind=kind.as_str(),
                valid=result.is_valid,
                errors=result.errors.len(),
                warnings=result.warnings.len(),
                "validated document"
            );
            report.kind = Some(kind);
            report.result = Some(result);
        }
        Err(e) => {
            tracing::warn!(path=%report.path, error=%e, "document rejected");
            report.error = Some(e.to_string());
        }
    }
    report
}

pub fn validate_documents(
    paths: &[PathBuf],
    kind: Option<DocumentKind>,
    rules: &RuleSet,
    as_of: Option<NaiveDateTime>,
) -> Vec<FileReport> {
    paths
        .iter()
        .map(|p| validate_file(p, kind, rules, as_of))
        .collect()
}

pub fn render_text(report: &FileReport) -> String {
    let mut out = report.path.clone();
    if let Some(kind) = report.kind {
        out.push_str(&format!(" [{}]", kind.as_str()));
    }
    match (&report.result, &report.error) {
        (Some(result), _) => {
            out.push_str(if result.is_valid { ": VALID" } else { ": INVALID" });
            for e in &result.errors {
                out.push_str(&format!("\n  error: {e}"));
            }
            for w in &result.warnings {
                out.push_str(&format!("\n  warning: {w}"));
            }
        }
        (None, Some(error)) => out.push_str(&format!(": FAILED ({error})")),
        (None, None) => out.push_str(": SKIPPED"),
    }
    out
}
