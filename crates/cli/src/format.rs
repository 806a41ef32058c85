//! Output formatting for the CLI.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use casebook::{
    AttachmentInfo, BulkReport, CaseFile, FolderNode, ImportReport, MoveOutcome, Statistics,
};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Result of a command, ready to be printed.
#[derive(Debug)]
pub enum Output {
    Tree(FolderNode),
    Cases(Vec<CaseFile>),
    Document(Value),
    Text(String),
    Created(PathBuf),
    Updated(PathBuf),
    Moved(Vec<(PathBuf, MoveOutcome)>),
    Bulk(BulkReport),
    Attachments(Vec<AttachmentInfo>),
    Stats(Statistics),
    Values(Vec<String>),
    Import(Vec<(PathBuf, ImportReport)>),
}

impl Output {
    /// Whether the command partly failed (rejected moves, item errors).
    pub fn has_failures(&self) -> bool {
        match self {
            Output::Moved(moves) => moves
                .iter()
                .any(|(_, outcome)| matches!(outcome, MoveOutcome::Rejected(_))),
            Output::Bulk(report) => !report.is_clean(),
            Output::Import(reports) => reports.iter().any(|(_, r)| !r.errors.is_empty()),
            _ => false,
        }
    }
}

fn shown(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// Format a command result.
pub fn format_output(output: &Output, root: &Path, mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format_human(output, root),
        OutputMode::Json => {
            let value = to_json(output, root);
            serde_json::to_string_pretty(&value).unwrap_or_else(|e| e.to_string())
        }
    }
}

/// Format an error.
pub fn format_error(error: &anyhow::Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format!("(error) {:#}", error),
        OutputMode::Json => json!({ "error": format!("{:#}", error) }).to_string(),
    }
}

// =========================================================================
// Human
// =========================================================================

fn format_human(output: &Output, root: &Path) -> String {
    match output {
        Output::Tree(node) => {
            let mut out = String::new();
            write_tree(&mut out, node, 0);
            out.trim_end().to_string()
        }
        Output::Cases(cases) => {
            if cases.is_empty() {
                return "(no cases)".to_string();
            }
            cases
                .iter()
                .map(|f| format!("{}\t{}", shown(&f.path, root), f.case.name))
                .collect::<Vec<_>>()
                .join("\n")
        }
        Output::Document(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|e| e.to_string())
        }
        Output::Text(text) => text.clone(),
        Output::Created(path) => format!("created {}", shown(path, root)),
        Output::Updated(path) => format!("updated {}", shown(path, root)),
        Output::Moved(moves) => moves
            .iter()
            .map(|(source, outcome)| match outcome {
                MoveOutcome::Moved(dest) => {
                    format!("{} -> {}", shown(source, root), shown(dest, root))
                }
                MoveOutcome::Rejected(reason) => {
                    format!("{}: not moved ({})", shown(source, root), reason)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Output::Bulk(report) => {
            let mut out = format!("{} done", report.succeeded);
            for error in &report.errors {
                let _ = write!(out, "\n(error) {}", error);
            }
            out
        }
        Output::Attachments(files) => {
            if files.is_empty() {
                return "(no attachments)".to_string();
            }
            files
                .iter()
                .map(|a| {
                    let steps: Vec<String> = a.steps.iter().map(|i| (i + 1).to_string()).collect();
                    if steps.is_empty() {
                        format!("{}\t(unlinked)", a.name)
                    } else {
                        format!("{}\tsteps {}", a.name, steps.join(", "))
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        Output::Stats(stats) => format!(
            "total: {}\npending: {}\npassed: {}\nfailed: {}\nskipped: {}",
            stats.total, stats.pending, stats.passed, stats.failed, stats.skipped
        ),
        Output::Values(values) => values.join("\n"),
        Output::Import(reports) => {
            let mut out = String::new();
            for (file, report) in reports {
                let _ = writeln!(out, "{}: {} created", file.display(), report.created);
                for error in &report.errors {
                    let _ = writeln!(out, "(error) {}", error);
                }
            }
            out.trim_end().to_string()
        }
    }
}

fn write_tree(out: &mut String, node: &FolderNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{}{}/", indent, node.name);
    for folder in &node.folders {
        write_tree(out, folder, depth + 1);
    }
    for case in &node.cases {
        let _ = writeln!(out, "{}  {}", indent, case.display_name());
    }
}

// =========================================================================
// JSON
// =========================================================================

fn tree_json(node: &FolderNode, root: &Path) -> Value {
    json!({
        "name": node.name,
        "path": shown(&node.path, root),
        "folders": node.folders.iter().map(|f| tree_json(f, root)).collect::<Vec<_>>(),
        "cases": node.cases.iter().map(|c| json!({
            "name": c.name,
            "path": shown(&c.path, root),
            "status": c.status,
        })).collect::<Vec<_>>(),
    })
}

fn to_json(output: &Output, root: &Path) -> Value {
    match output {
        Output::Tree(node) => tree_json(node, root),
        Output::Cases(cases) => Value::Array(
            cases
                .iter()
                .map(|f| {
                    json!({
                        "path": shown(&f.path, root),
                        "id": f.case.id,
                        "name": f.case.name,
                        "status": f.case.status,
                    })
                })
                .collect(),
        ),
        Output::Document(value) => value.clone(),
        Output::Text(text) => json!({ "text": text }),
        Output::Created(path) => json!({ "created": shown(path, root) }),
        Output::Updated(path) => json!({ "updated": shown(path, root) }),
        Output::Moved(moves) => Value::Array(
            moves
                .iter()
                .map(|(source, outcome)| match outcome {
                    MoveOutcome::Moved(dest) => json!({
                        "source": shown(source, root),
                        "moved_to": shown(dest, root),
                    }),
                    MoveOutcome::Rejected(reason) => json!({
                        "source": shown(source, root),
                        "rejected": reason.to_string(),
                    }),
                })
                .collect(),
        ),
        Output::Bulk(report) => json!({
            "succeeded": report.succeeded,
            "errors": report.errors,
        }),
        Output::Attachments(files) => Value::Array(
            files
                .iter()
                .map(|a| {
                    json!({
                        "name": a.name,
                        "path": shown(&a.path, root),
                        "steps": a.steps.iter().map(|i| i + 1).collect::<Vec<_>>(),
                    })
                })
                .collect(),
        ),
        Output::Stats(stats) => serde_json::to_value(stats).unwrap_or(Value::Null),
        Output::Values(values) => json!(values),
        Output::Import(reports) => Value::Array(
            reports
                .iter()
                .map(|(file, report)| {
                    json!({
                        "file": file.display().to_string(),
                        "created": report.created,
                        "errors": report.errors,
                    })
                })
                .collect(),
        ),
    }
}
