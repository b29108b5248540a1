//! Configuration loading and parsing for retpatch.
//!
//! This module handles:
//! - TOML config file parsing and validation
//! - Directory cascade discovery
//! - Merging the cascade over built-in defaults

pub mod cascade;
pub mod parser;
pub mod template;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, discover_configs, load_merged_config, merge_configs, user_config_path,
};
pub use parser::{parse_config_file, parse_config_str};
pub use template::generate_init_template;
pub use types::{
	Config, DEFAULT_ERROR_CODE, DEFAULT_TARGET, DEFAULT_TIMESTAMP_EXPRESSION, LoadedConfig,
	MergedConfig,
};
