use std::path::Path;

use nv_core::ScriptGraph;

pub fn run(path: &Path, format: &str, output: Option<&Path>) -> Result<(), String> {
    let graph = super::load_script(path)?;

    let content = match format {
        "json" => export_json(&graph)?,
        "dot" => graph.to_dot(),
        _ => {
            return Err(format!("unsupported format: \"{format}\". Use: json, dot"));
        }
    };

    if let Some(path) = output {
        std::fs::write(path, &content)
            .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
        println!("  Exported to {}", path.display());
    } else {
        print!("{content}");
    }

    Ok(())
}

fn export_json(graph: &ScriptGraph) -> Result<String, String> {
    let mut json = graph
        .to_raw()
        .to_json_pretty()
        .map_err(|e| format!("JSON serialization error: {e}"))?;
    json.push('\n');
    Ok(json)
}
