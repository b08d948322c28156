use std::path::Path;

pub fn run(content: &Path, save_dir: &Path) -> Result<(), String> {
    let manager = super::open_manager(content, save_dir)?;
    let inspection = manager.inspect();

    println!("  Save directory: {}", save_dir.display());
    for (label, (key, status)) in [("primary", &inspection.primary), ("backup", &inspection.backup)] {
        println!("  {label:<8} {key}: {status}");
    }
    Ok(())
}
