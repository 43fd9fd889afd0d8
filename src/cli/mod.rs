//! CLI command implementations

pub mod archive;
pub mod board;
pub mod init;
pub mod points;
pub mod task;
pub mod user;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use beltboard::{Config, JsonFileStore, Scoreboard};

/// Load the config and open the board on the JSON document
pub fn open_board(data: Option<&Path>, config_path: Option<&Path>) -> (Config, Scoreboard) {
    let config = Config::load_or_default(config_path);
    let path = data.map_or_else(JsonFileStore::default_path, Path::to_path_buf);
    let board = Scoreboard::open(&config, Box::new(JsonFileStore::new(path)));
    (config, board)
}

/// Print any view as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse `key=value` arguments into a map
pub fn parse_pairs(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Expected key=value, got '{}'", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Empty key in '{}'", pair);
        }
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let map = parse_pairs(&["githubId=amy".to_string(), "geo = EMEA".to_string()]).unwrap();
        assert_eq!(map.get("githubId").map(String::as_str), Some("amy"));
        assert_eq!(map.get("geo").map(String::as_str), Some(" EMEA"));

        assert!(parse_pairs(&["novalue".to_string()]).is_err());
        assert!(parse_pairs(&["=x".to_string()]).is_err());
    }
}
