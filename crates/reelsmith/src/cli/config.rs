//! Configuration command handler.

use reelsmith::{PersistenceError, PersistenceErrorKind, PipelineConfig, ReelsmithResult};

/// Print the effective configuration as JSON.
pub fn show_config() -> ReelsmithResult<()> {
    let config = PipelineConfig::load()?;
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| PersistenceError::new(PersistenceErrorKind::Serialize(e.to_string())))?;
    println!("{}", json);
    println!("snapshot directory: {}", config.resolved_snapshot_dir().display());
    Ok(())
}
