use std::path::PathBuf;

/// Library-level structured errors for retpatch.
///
/// The CLI binary wraps these with `anyhow` for context chains.
#[derive(Debug, thiserror::Error)]
pub enum RetpatchError {
	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid value for {key} in {path}: {reason}")]
	InvalidConfigValue {
		path: PathBuf,
		key: String,
		reason: String,
	},

	#[error("Invalid regex pattern in rule {rule}: {pattern}")]
	InvalidRegex {
		rule: String,
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Rule {rule} has no capture group {group} to resume at")]
	InvalidResumeGroup { rule: String, group: usize },

	#[error("Failed to read target file: {path}")]
	TargetReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Target file is not valid UTF-8: {path}")]
	TargetNotUtf8 { path: PathBuf },

	#[error("Failed to write target file: {path}")]
	TargetWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to back up {path} to {backup_path}")]
	BackupFailed {
		path: PathBuf,
		backup_path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using RetpatchError.
pub type Result<T> = std::result::Result<T, RetpatchError>;
