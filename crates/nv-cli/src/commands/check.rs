use std::path::Path;

use colored::Colorize;

pub fn run(path: &Path) -> Result<(), String> {
    let graph = super::load_script(path)?;

    println!("  All checks passed for '{}'.", graph.chapter());
    println!(
        "  {} nodes, {} endings, {} links",
        graph.node_count(),
        graph.endings().len(),
        graph.edges().len()
    );

    let unreachable = graph.unreachable();
    if !unreachable.is_empty() {
        println!();
        for node in &unreachable {
            println!(
                "  {} node \"{}\" is not reachable from \"{}\"",
                "warning".yellow().bold(),
                node.id,
                graph.start_id()
            );
        }
    }

    Ok(())
}
