pub mod check;
pub mod compliance;
pub mod evm;
pub mod knowledge;
pub mod serve;
pub mod status;

use anyhow::Context;
use pmp_core::ProjectState;
use std::path::Path;

/// Read a project record from a JSON file.
pub fn load_project(path: &Path) -> anyhow::Result<ProjectState> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    ProjectState::from_json_str(&data)
        .with_context(|| format!("{} is not a valid JSON project record", path.display()))
}
