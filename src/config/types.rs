use crate::error::RetpatchError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Target patched when neither the command line nor a config names one.
pub const DEFAULT_TARGET: &str = "frontend/src/features/admin/services/contentService.ts";

/// Expression inserted as the value of every new `timestamp` field.
pub const DEFAULT_TIMESTAMP_EXPRESSION: &str = "new Date().toISOString()";

/// Code placed in the `error` object of rewritten failure blocks.
pub const DEFAULT_ERROR_CODE: &str = "SERVICE_ERROR";

/// Top-level configuration from a `.retpatch.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
	/// If true, stop the directory cascade here and jump to ~/.retpatch.toml.
	#[serde(default)]
	pub root: bool,

	/// File to patch. Relative paths are resolved against the config file's directory.
	#[serde(default)]
	pub target: Option<PathBuf>,

	/// Source text inserted as the `timestamp` value.
	#[serde(default)]
	pub timestamp_expression: Option<String>,

	/// Code used in `error: { code: '...' }`.
	#[serde(default)]
	pub error_code: Option<String>,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

impl LoadedConfig {
	/// The configured target, resolved against this config's directory.
	pub fn resolved_target(&self) -> Option<PathBuf> {
		let target = self.config.target.as_ref()?;
		if target.is_absolute() {
			return Some(target.clone());
		}
		let base = self.path.parent().unwrap_or(Path::new("."));
		Some(base.join(target))
	}
}

/// Effective settings after merging the cascade over the built-in defaults.
#[derive(Debug, Clone)]
pub struct MergedConfig {
	/// File to patch.
	pub target: PathBuf,

	/// Source text inserted as the `timestamp` value.
	pub timestamp_expression: String,

	/// Code used in rewritten failure blocks.
	pub error_code: String,

	/// Config files that contributed, most specific first.
	pub sources: Vec<PathBuf>,
}

impl Default for MergedConfig {
	fn default() -> Self {
		Self {
			target: PathBuf::from(DEFAULT_TARGET),
			timestamp_expression: DEFAULT_TIMESTAMP_EXPRESSION.to_string(),
			error_code: DEFAULT_ERROR_CODE.to_string(),
			sources: Vec::new(),
		}
	}
}

impl Config {
	/// Validate the values that get spliced into rewritten source text.
	pub fn validate(&self, path: &Path) -> Result<(), RetpatchError> {
		let invalid = |key: &str, reason: &str| RetpatchError::InvalidConfigValue {
			path: path.to_path_buf(),
			key: key.to_string(),
			reason: reason.to_string(),
		};

		if let Some(ref expr) = self.timestamp_expression
			&& expr.trim().is_empty()
		{
			return Err(invalid("timestamp-expression", "must not be empty"));
		}

		if let Some(ref code) = self.error_code {
			if code.is_empty() {
				return Err(invalid("error-code", "must not be empty"));
			}
			if code.contains(['\'', '\\', '\n', '\r']) {
				return Err(invalid(
					"error-code",
					"must not contain quotes, backslashes or line breaks",
				));
			}
		}

		if let Some(ref target) = self.target
			&& target.as_os_str().is_empty()
		{
			return Err(invalid("target", "must not be empty"));
		}

		Ok(())
	}
}
