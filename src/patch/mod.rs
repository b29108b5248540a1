//! Applying rewrite rules to a target file.
//!
//! This module handles:
//! - Running the rules in order over in-memory text
//! - Reading the target as UTF-8 and writing it back in place
//! - Optional `.bak` copies and dry runs

pub mod report;

pub use report::{PatchReport, RuleOutcome};

use crate::error::{Result, RetpatchError};
use crate::rules::RewriteRule;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Options for [`patch_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchOptions {
	/// Compute the result but leave the file alone.
	pub dry_run: bool,

	/// Copy the original to `<file>.bak` before overwriting it.
	pub backup: bool,
}

/// Rewritten text plus per-rule counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedText {
	pub text: String,
	pub outcomes: Vec<RuleOutcome>,
}

/// Apply each rule once, in order, over the whole text.
pub fn patch_text(input: &str, rules: &[RewriteRule]) -> PatchedText {
	let mut text = input.to_string();
	let mut outcomes = Vec::with_capacity(rules.len());

	for rule in rules {
		let (rewritten, replacements) = rule.apply(&text);
		outcomes.push(RuleOutcome {
			rule: rule.name.clone(),
			replacements,
		});
		text = rewritten;
	}

	PatchedText { text, outcomes }
}

/// Read `path`, rewrite it with `rules` and write it back in place.
///
/// Outside a dry run the file is always overwritten, even when no rule
/// matched.
pub fn patch_file(path: &Path, rules: &[RewriteRule], options: PatchOptions) -> Result<PatchReport> {
	let original = read_target(path)?;
	let patched = patch_text(&original, rules);
	let changed = patched.text != original;

	let mut report = PatchReport {
		path: path.to_path_buf(),
		outcomes: patched.outcomes,
		changed,
		written: false,
		dry_run: options.dry_run,
		backup: None,
	};

	if options.dry_run {
		tracing::debug!(path = %path.display(), changed, "dry run, not writing target");
		return Ok(report);
	}

	if options.backup {
		report.backup = Some(backup_file(path)?);
	}

	std::fs::write(path, &patched.text).map_err(|source| RetpatchError::TargetWriteError {
		path: path.to_path_buf(),
		source,
	})?;
	report.written = true;
	tracing::info!(
		path = %path.display(),
		replacements = report.total_replacements(),
		"patched target"
	);

	Ok(report)
}

/// Read the whole target file, insisting on UTF-8.
fn read_target(path: &Path) -> Result<String> {
	let bytes = std::fs::read(path).map_err(|source| RetpatchError::TargetReadError {
		path: path.to_path_buf(),
		source,
	})?;

	String::from_utf8(bytes).map_err(|_| RetpatchError::TargetNotUtf8 {
		path: path.to_path_buf(),
	})
}

/// Path of the backup copy for `path`.
pub fn backup_path(path: &Path) -> PathBuf {
	let mut name: OsString = path.as_os_str().to_owned();
	name.push(".bak");
	PathBuf::from(name)
}

/// Copy `path` to its `.bak` sibling, replacing any earlier backup.
fn backup_file(path: &Path) -> Result<PathBuf> {
	let backup = backup_path(path);
	std::fs::copy(path, &backup).map_err(|source| RetpatchError::BackupFailed {
		path: path.to_path_buf(),
		backup_path: backup.clone(),
		source,
	})?;
	tracing::info!(backup = %backup.display(), "backed up target");
	Ok(backup)
}
