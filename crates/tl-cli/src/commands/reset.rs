use std::path::Path;

pub fn run(content: &Path, save_dir: &Path) -> Result<(), String> {
    let mut manager = super::open_manager(content, save_dir)?;
    manager.reset().map_err(|e| e.to_string())?;
    println!("  Deleted saves in {}", save_dir.display());
    Ok(())
}
