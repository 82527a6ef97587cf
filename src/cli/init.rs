//! Init command implementation

use std::path::Path;

use anyhow::Result;

use bugdeck::config::Config;

/// Write a default config file at `path`.
pub fn init_command(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let config = Config::default();
    config.save_to_file(path)?;
    println!("Wrote default config to {}", path.display());
    println!("Set [gateway] base_url to your query gateway before fetching.");
    Ok(())
}
