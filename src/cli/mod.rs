//! CLI command implementations

pub mod health;
pub mod init;
pub mod link;
pub mod list;
pub mod summary;
pub mod trends;

use anyhow::Result;
use bugdeck::domain::SourceSystem;

/// Resolve an optional `--source` flag. `None` and "all" mean every source;
/// anything not in the known vocabulary is an error, not `Unknown`.
pub(crate) fn parse_source(source: Option<&str>) -> Result<Option<SourceSystem>> {
    match source {
        None | Some("all") => Ok(None),
        Some(name) => match SourceSystem::parse(name) {
            SourceSystem::Unknown => {
                anyhow::bail!("Unknown source: {} (expected slack, zendesk or shortcut)", name)
            }
            parsed => Ok(Some(parsed)),
        },
    }
}
