use std::fs;
use std::path::Path;

pub fn run(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Err(format!("'{}' already exists", path.display()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| format!("cannot create directory: {e}"))?;
    }

    fs::write(path, nv_core::demo::DEMO_SCRIPT)
        .map_err(|e| format!("cannot write {}: {e}", path.display()))?;

    let name = path.display();
    println!("Created script '{name}' from the demo chapter");
    println!();
    println!("Get started:");
    println!("  nv check -s {name}   # Validate the script");
    println!("  nv list -s {name}    # List all nodes");
    println!("  nv play -s {name}    # Play it in the terminal");

    Ok(())
}
