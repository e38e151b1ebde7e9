pub mod check;
pub mod export;
pub mod graph;
pub mod init;
pub mod list;
pub mod play;
pub mod run;
pub mod show;

use std::path::Path;

use colored::Colorize;
use nv_core::{Node, ScriptError, ScriptGraph, ValidationIssue};

/// Load and validate a script, printing every validation issue.
fn load_script(path: &Path) -> Result<ScriptGraph, String> {
    match ScriptGraph::from_path(path) {
        Ok(graph) => Ok(graph),
        Err(ScriptError::Validation(err)) => {
            print_issues(err.issues(), path);
            Err(format!("{} failed validation", path.display()))
        }
        Err(e) => Err(e.to_string()),
    }
}

/// Print validation issues to stderr.
fn print_issues(issues: &[ValidationIssue], path: &Path) {
    for issue in issues {
        eprintln!("  {} {}: {issue}", "error".red().bold(), path.display());
    }
    let count = issues.len();
    eprintln!("  {} error{}", count, if count == 1 { "" } else { "s" });
}

/// One-word description of how a node continues.
fn node_kind(node: &Node) -> &'static str {
    if node.is_ending {
        "ending"
    } else if node.has_choices() {
        "choice"
    } else if node.auto_advance.is_some() {
        "transition"
    } else if node.next.is_some() {
        "passage"
    } else {
        "dialogue"
    }
}

/// First line of `text`, shortened to `max` characters.
fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > max {
        let cut: String = line.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else if line.is_empty() {
        "—".to_string()
    } else if text.lines().nth(1).is_some() {
        format!("{line} …")
    } else {
        line.to_string()
    }
}
