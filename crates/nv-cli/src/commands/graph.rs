use std::path::Path;

use nv_core::{Edge, EdgeKind, ScriptGraph};

pub fn run(path: &Path, focus: Option<&str>) -> Result<(), String> {
    let graph = super::load_script(path)?;

    if let Some(id) = focus {
        let node = graph.get(id).map_err(|e| e.to_string())?;
        println!("  Graph for: {}", node.id);
        println!();
        print!("{}", render_focused(&graph, id));
    } else {
        println!("  Node graph for '{}'", graph.chapter());
        println!();
        print!("{}", render_full(&graph));
    }

    Ok(())
}

fn edge_label(edge: &Edge<'_>) -> String {
    match &edge.kind {
        EdgeKind::Choice(label) => format!("\"{label}\""),
        EdgeKind::Next => "next".to_string(),
        EdgeKind::AutoAdvance => "auto".to_string(),
    }
}

fn render_focused(graph: &ScriptGraph, center: &str) -> String {
    let edges: Vec<_> = graph
        .edges()
        .into_iter()
        .filter(|e| e.from == center || e.to == center)
        .collect();

    let mut out = format!("  [{center}]\n");
    if edges.is_empty() {
        out.push_str("    (no links)\n");
        return out;
    }

    for edge in &edges {
        if edge.from == center {
            out.push_str(&format!("    --> {} --> [{}]\n", edge_label(edge), edge.to));
        }
    }
    for edge in &edges {
        if edge.to == center && edge.from != center {
            out.push_str(&format!("    <-- {} <-- [{}]\n", edge_label(edge), edge.from));
        }
    }
    out
}

fn render_full(graph: &ScriptGraph) -> String {
    let mut out = String::new();
    for edge in graph.edges() {
        out.push_str(&format!(
            "  [{}] --> {} --> [{}]\n",
            edge.from,
            edge_label(&edge),
            edge.to
        ));
    }

    let unreachable = graph.unreachable().len();
    out.push('\n');
    out.push_str(&format!(
        "  {} nodes, {} links, {} endings",
        graph.node_count(),
        graph.edges().len(),
        graph.endings().len()
    ));
    if unreachable > 0 {
        out.push_str(&format!(" ({unreachable} unreachable)"));
    }
    out.push('\n');
    out
}
