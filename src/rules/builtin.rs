//! The two return-block rewrites.
//!
//! Both operate on raw text with `(?ms)` so blocks may span lines. The last
//! capture group of each pattern is the block's closing `};` plus trailing
//! whitespace; it is kept as-is and may lead the next block.

use crate::config::types::MergedConfig;
use crate::error::Result;
use crate::rules::rewriter::{RewriteRule, escape_template};

/// `return { success: true, data: X, message: Y };`
const SUCCESS_PATTERN: &str = r"(?ms)(\s+return\s+\{\s*success:\s*true,\s*data:\s*[^,}]+,)\s*message:\s*[^}]+(\s*\};\s*)";

/// `return { success: false, data: X, message: error.response... };`
const FAILURE_PATTERN: &str = r"(?ms)(\s+return\s+\{\s*success:\s*false,\s*data:\s*[^,}]+,)\s*message:\s*(error\.response.*?)\s*(\s*\};\s*)";

/// Rule A: drop `message` from success returns and add a `timestamp`.
pub fn success_rule(timestamp_expression: &str) -> Result<RewriteRule> {
	let replacement = format!(
		"${{1}} timestamp: {}",
		escape_template(timestamp_expression)
	);
	RewriteRule::new("success", SUCCESS_PATTERN, replacement)?.resume_at_group(2)
}

/// Rule B: move an `error.response` message into an `error` object and add a `timestamp`.
pub fn failure_rule(error_code: &str, timestamp_expression: &str) -> Result<RewriteRule> {
	let replacement = format!(
		"${{1}} error: {{ code: '{}', message: ${{2}} }}, timestamp: {}",
		escape_template(error_code),
		escape_template(timestamp_expression)
	);
	RewriteRule::new("failure", FAILURE_PATTERN, replacement)?.resume_at_group(3)
}

/// Both rules, in application order.
pub fn builtin_rules(config: &MergedConfig) -> Result<Vec<RewriteRule>> {
	Ok(vec![
		success_rule(&config.timestamp_expression)?,
		failure_rule(&config.error_code, &config.timestamp_expression)?,
	])
}
