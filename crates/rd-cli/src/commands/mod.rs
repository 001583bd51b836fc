pub mod check;
pub mod play;
pub mod show;

use std::path::Path;

use rd_core::Graph;
use rd_narrative::SessionConfig;

/// Read and parse a graph file.
fn load_graph(path: &Path) -> Result<Graph, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Graph::from_json(&json).map_err(|e| format!("invalid graph {}: {e}", path.display()))
}

/// Read a session config file, or use the defaults.
fn load_config(path: Option<&Path>) -> Result<SessionConfig, String> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    SessionConfig::from_json(&json).map_err(|e| format!("invalid config {}: {e}", path.display()))
}
