pub mod export;
pub mod import;
pub mod play;
pub mod reset;
pub mod resolve;
pub mod status;

use std::path::Path;
use std::sync::Arc;

use tl_core::GraphStore;
use tl_save::{FileStorage, PersistenceManager, SaveConfig};

/// Read and parse a content file.
fn load_graph(content: &Path) -> Result<Arc<GraphStore>, String> {
    let json = std::fs::read_to_string(content)
        .map_err(|e| format!("cannot read {}: {e}", content.display()))?;
    let graph = GraphStore::from_json(&json)
        .map_err(|e| format!("invalid content {}: {e}", content.display()))?;
    Ok(Arc::new(graph))
}

/// Open a persistence manager over a save directory.
fn open_manager(
    content: &Path,
    save_dir: &Path,
) -> Result<PersistenceManager<FileStorage>, String> {
    let graph = load_graph(content)?;
    let storage = FileStorage::new(save_dir)
        .map_err(|e| format!("cannot open save directory {}: {e}", save_dir.display()))?;
    Ok(PersistenceManager::new(storage, graph, SaveConfig::default()))
}
