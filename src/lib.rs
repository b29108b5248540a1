//! Retpatch - CLI tool for reshaping service return blocks.
//!
//! Rewrites `return { success, data, message }` object literals in a source
//! file so that success returns carry a `timestamp` instead of a `message`,
//! and `error.response` failures carry a structured `error` object.
//!
//! This library provides:
//! - Configuration file parsing and cascade discovery
//! - The built-in rewrite rules
//! - Patching a file in place, with dry-run and backup support
//!
//! # Example
//!
//! ```no_run
//! use retpatch_cli::config::load_merged_config;
//! use retpatch_cli::patch::{PatchOptions, patch_file};
//! use retpatch_cli::rules::builtin_rules;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let config = load_merged_config(&cwd).unwrap();
//! let rules = builtin_rules(&config).unwrap();
//!
//! let report = patch_file(&config.target, &rules, PatchOptions::default()).unwrap();
//! println!("{}", report.confirmation());
//! ```

pub mod config;
pub mod error;
pub mod patch;
pub mod rules;

pub use error::{Result, RetpatchError};
