use std::path::Path;

pub fn run(content: &Path, save_dir: &Path, output: Option<&Path>) -> Result<(), String> {
    let manager = super::open_manager(content, save_dir)?;
    let json = manager
        .export_save()
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("no save in {}", save_dir.display()))?;

    if let Some(path) = output {
        std::fs::write(path, &json)
            .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
        println!("  Exported to {}", path.display());
    } else {
        println!("{json}");
    }
    Ok(())
}
