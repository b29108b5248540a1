use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MergedConfig};
use crate::error::{Result, RetpatchError};
use std::path::{Path, PathBuf};

/// Name of the per-directory config file.
pub const CONFIG_FILE_NAME: &str = ".retpatch.toml";

/// Environment variable that, if truthy, skips ~/.retpatch.toml lookup.
pub const USER_CONFIG_DISABLE_ENV_VAR: &str = "RETPATCH_NO_USER_CONFIG";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.retpatch.toml`
/// 2. If found and `root = true`, stop walking
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.retpatch.toml (unless disabled)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = discover_project_configs(start_dir)?;

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Walk from `start_dir` towards the filesystem root collecting config files.
pub fn discover_project_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.is_file() {
			let config = parse_config_file(&config_path)?;
			let is_root = config.root;
			tracing::debug!(path = %config_path.display(), root = is_root, "loaded config");

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if is_root {
				break;
			}
		}

		match current_dir.parent() {
			Some(parent) => current_dir = parent.to_path_buf(),
			None => break,
		}
	}

	Ok(configs)
}

/// Load the user's ~/.retpatch.toml if it exists and isn't disabled.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	if is_env_truthy(USER_CONFIG_DISABLE_ENV_VAR) {
		return Ok(None);
	}

	let user_config_path = user_config_path()?;

	// Already picked up by the directory walk (cwd under $HOME without a root config).
	if existing_configs.iter().any(|c| c.path == user_config_path) {
		return Ok(None);
	}

	if user_config_path.is_file() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => is_truthy(&value),
		Err(_) => false,
	}
}

fn is_truthy(value: &str) -> bool {
	let lower = value.to_lowercase();
	!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
}

/// Merge configs over the built-in defaults.
///
/// For each key, the first config in cascade order that sets it wins.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();
	let mut target = None;
	let mut timestamp_expression = None;
	let mut error_code = None;

	for loaded in configs {
		if target.is_none() {
			target = loaded.resolved_target();
		}
		if timestamp_expression.is_none() {
			timestamp_expression = loaded.config.timestamp_expression.clone();
		}
		if error_code.is_none() {
			error_code = loaded.config.error_code.clone();
		}
		merged.sources.push(loaded.path.clone());
	}

	if let Some(target) = target {
		merged.target = target;
	}
	if let Some(expr) = timestamp_expression {
		merged.timestamp_expression = expr;
	}
	if let Some(code) = error_code {
		merged.error_code = code;
	}

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(RetpatchError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
