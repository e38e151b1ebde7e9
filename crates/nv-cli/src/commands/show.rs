use std::path::Path;

use colored::Colorize;
use nv_core::EdgeKind;

pub fn run(path: &Path, id: &str) -> Result<(), String> {
    let graph = super::load_script(path)?;
    let node = graph.get(id).map_err(|e| e.to_string())?;

    // Header
    println!("  {} [{}]", node.id.as_str().bold(), super::node_kind(node).dimmed());
    println!();

    if let Some(speaker) = node.speaker() {
        println!("  {}", speaker.cyan());
    }
    for line in node.text.lines() {
        println!("  {line}");
    }
    println!();

    if !node.background.is_empty() {
        println!("  background: {}", node.background);
    }
    if !node.character.is_empty() {
        println!("  character:  {}", node.character);
    }

    if node.has_choices() {
        println!();
        println!("  {}", "Choices:".dimmed());
        for (i, choice) in node.choices.iter().enumerate() {
            println!("    {}. {} -> {}", i + 1, choice.label, choice.goto);
        }
    }
    if let Some(auto) = &node.auto_advance {
        let effect = auto
            .effect
            .as_deref()
            .map(|e| format!(", effect {e}"))
            .unwrap_or_default();
        println!("  auto-advance after {} ms{effect} -> {}", auto.delay_ms, auto.goto);
    }
    if let Some(next) = &node.next {
        println!("  next -> {next}");
    }
    if node.is_ending {
        println!("  {}", "(ending: continuing restarts the chapter)".dimmed());
    }

    // Incoming links
    let incoming: Vec<_> = graph
        .edges()
        .into_iter()
        .filter(|e| e.to == &node.id)
        .collect();
    println!();
    if incoming.is_empty() {
        println!("  {} (none)", "Reached from:".dimmed());
    } else {
        println!("  {}", "Reached from:".dimmed());
        for edge in incoming {
            let how = match &edge.kind {
                EdgeKind::Choice(label) => format!("choice \"{label}\""),
                EdgeKind::Next => "next".to_string(),
                EdgeKind::AutoAdvance => "auto-advance".to_string(),
            };
            println!("    {} via {how}", edge.from);
        }
    }

    Ok(())
}
