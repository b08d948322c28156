use std::path::Path;

pub fn run(file: &Path, content: &Path, save_dir: &Path) -> Result<(), String> {
    let json = std::fs::read_to_string(file)
        .map_err(|e| format!("cannot read {}: {e}", file.display()))?;
    let mut manager = super::open_manager(content, save_dir)?;
    let game = manager.import_save(&json).map_err(|e| e.to_string())?;

    println!(
        "  Imported save for {} at {}/{}",
        game.state.player_id, game.state.current_character_id, game.state.current_node_id
    );
    if let Some(from) = &game.report.migrated_from {
        println!("  Migrated from v{from}");
    }
    if let Some(redirect) = &game.report.redirect {
        println!("  Redirected: {redirect}");
    }
    if let Some(recovery) = &game.report.recovery {
        println!("  Recovered: {recovery}");
    }
    Ok(())
}
