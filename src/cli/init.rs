//! Init command implementation

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use beltboard::{Config, JsonFileStore, Scoreboard};

/// Write a default config and an empty scoring document
pub async fn init_command(
    data: Option<&Path>,
    config_path: Option<&Path>,
    force: bool,
) -> Result<()> {
    let config_path = config_path.map_or_else(Config::global_config_path, Path::to_path_buf);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::with_defaults();
    config.save_to_file(&config_path)?;
    println!("Created: {}", config_path.display());

    let data_path: PathBuf = data.map_or_else(JsonFileStore::default_path, Path::to_path_buf);
    if data_path.exists() {
        println!("Keeping existing store: {}", data_path.display());
    } else {
        // Opening a missing document creates it
        Scoreboard::open(&config, Box::new(JsonFileStore::new(&data_path)));
        println!("Created: {}", data_path.display());
    }

    Ok(())
}
