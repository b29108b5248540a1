use crate::config::types::Config;
use crate::error::{Result, RetpatchError};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path).map_err(|source| RetpatchError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| RetpatchError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	config.validate(path)?;

	Ok(config)
}
