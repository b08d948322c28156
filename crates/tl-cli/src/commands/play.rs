use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use tl_core::NarrativeSession;
use tl_save::{LoadOutcome, PersistenceManager, SaveStorage};
use uuid::Uuid;

pub fn run(content: &Path, save_dir: &Path, player: Option<&str>) -> Result<(), String> {
    let mut manager = super::open_manager(content, save_dir)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    play(&mut manager, player, stdin.lock(), &mut stdout.lock())
}

/// Run the play loop until the input ends, the player quits, or a node has no
/// choices. Progress is saved on the way out.
fn play<S: SaveStorage>(
    manager: &mut PersistenceManager<S>,
    player: Option<&str>,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<(), String> {
    let graph = Arc::clone(manager.graph());
    let mut session = match manager.load() {
        LoadOutcome::Loaded(game) => {
            writeln!(out, "  Resuming as {} ({} save)", game.state.player_id, game.slot).map_err(io_error)?;
            if let Some(recovery) = &game.report.recovery {
                writeln!(out, "  Note: {recovery}").map_err(io_error)?;
            }
            NarrativeSession::new(graph, game.state).map_err(|e| e.to_string())?
        }
        LoadOutcome::NoSave => {
            let player_id = player.map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
            writeln!(out, "  New game for {player_id}").map_err(io_error)?;
            NarrativeSession::new_game(graph, player_id)
        }
    };

    let mut lines = input.lines();
    loop {
        let node = session.current_node().map_err(|e| e.to_string())?;
        writeln!(out).map_err(io_error)?;
        for line in &node.content {
            let written = match &line.emotion {
                Some(emotion) => writeln!(out, "  [{emotion}] {}", line.text),
                None => writeln!(out, "  {}", line.text),
            };
            written.map_err(io_error)?;
        }

        let choices: Vec<(String, String)> = session
            .visible_choices()
            .map_err(|e| e.to_string())?
            .into_iter()
            .map(|c| (c.choice_id.clone(), c.text.clone()))
            .collect();
        if choices.is_empty() {
            writeln!(out, "  (the end)").map_err(io_error)?;
            break;
        }
        for (i, (_, text)) in choices.iter().enumerate() {
            writeln!(out, "  {}. {text}", i + 1).map_err(io_error)?;
        }
        write!(out, "> ").map_err(io_error)?;
        out.flush().map_err(io_error)?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(io_error)?;
        match line.trim() {
            "quit" | "q" => break,
            "save" => {
                manager.save(session.state()).map_err(|e| e.to_string())?;
                writeln!(out, "  Saved.").map_err(io_error)?;
            }
            entry => match entry.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => {
                    session.choose(&choices[n - 1].0).map_err(|e| e.to_string())?;
                    if let Err(e) = manager.autosave(session.state()) {
                        tracing::warn!(error = %e, "autosave failed");
                        writeln!(out, "  Autosave failed: {e}").map_err(io_error)?;
                    }
                }
                _ => writeln!(out, "  Enter a choice number, 'save', or 'quit'.").map_err(io_error)?,
            },
        }
    }

    manager.save(session.state()).map_err(|e| e.to_string())?;
    writeln!(out, "  Progress saved.").map_err(io_error)?;
    Ok(())
}

fn io_error(e: io::Error) -> String {
    format!("terminal I/O failed: {e}")
}
