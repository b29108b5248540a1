use std::path::{Path, PathBuf};

/// How many blocks a single rule rewrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
	/// Rule name.
	pub rule: String,

	/// Blocks rewritten by this rule.
	pub replacements: usize,
}

/// What a patch run did to one file.
#[derive(Debug, Clone)]
pub struct PatchReport {
	/// The patched file.
	pub path: PathBuf,

	/// Per-rule counts, in application order.
	pub outcomes: Vec<RuleOutcome>,

	/// Whether the rewritten text differs from the original.
	pub changed: bool,

	/// Whether the file on disk was overwritten.
	pub written: bool,

	/// Whether this was a dry run.
	pub dry_run: bool,

	/// Location of the backup copy, if one was made.
	pub backup: Option<PathBuf>,
}

impl PatchReport {
	/// Total blocks rewritten across all rules.
	pub fn total_replacements(&self) -> usize {
		self.outcomes.iter().map(|o| o.replacements).sum()
	}

	/// The single line printed on stdout when a run finishes.
	pub fn confirmation(&self) -> String {
		let name = display_name(&self.path);
		match (self.dry_run, self.changed) {
			(true, true) => format!("Would fix {name}"),
			(true, false) => format!("Nothing to fix in {name}"),
			(false, _) => format!("Fixed {name}"),
		}
	}
}

fn display_name(path: &Path) -> String {
	path.file_name()
		.map(|n| n.to_string_lossy().to_string())
		.unwrap_or_else(|| path.display().to_string())
}
