use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(path: &Path, endings_only: bool) -> Result<(), String> {
    let graph = super::load_script(path)?;

    let nodes: Vec<_> = graph
        .nodes()
        .filter(|n| !endings_only || n.is_ending)
        .collect();

    if nodes.is_empty() {
        println!("  No nodes found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Kind", "Speaker", "Text", "Exits"]);

    for node in &nodes {
        let id = if *graph.start_id() == node.id {
            format!("{} (start)", node.id)
        } else {
            node.id.to_string()
        };
        let exits: Vec<String> = node.targets().map(ToString::to_string).collect();
        let exits = if exits.is_empty() {
            "—".to_string()
        } else {
            exits.join(", ")
        };

        table.add_row(vec![
            id,
            super::node_kind(node).to_string(),
            node.speaker().unwrap_or("—").to_string(),
            super::preview(&node.text, 48),
            exits,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} nodes", nodes.len());

    Ok(())
}
