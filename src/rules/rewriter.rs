use crate::error::{Result, RetpatchError};
use regex::Regex;

/// A named regex substitution applied across a whole text.
#[derive(Debug)]
pub struct RewriteRule {
	/// Short name used in logs and reports.
	pub name: String,

	/// The pattern to match.
	pub pattern: Regex,

	/// The replacement template (`${n}` refers to capture groups).
	pub replacement: String,

	/// Capture group holding a match's trailing context.
	///
	/// When set, that group's text is copied from the input rather than
	/// expanded, and scanning resumes at its start so it can also lead the
	/// next match.
	pub resume_group: Option<usize>,
}

impl RewriteRule {
	/// Compile a rule from a pattern string and replacement template.
	pub fn new(name: &str, pattern: &str, replacement: String) -> Result<Self> {
		let pattern = Regex::new(pattern).map_err(|source| RetpatchError::InvalidRegex {
			rule: name.to_string(),
			pattern: pattern.to_string(),
			source,
		})?;

		Ok(RewriteRule {
			name: name.to_string(),
			pattern,
			replacement,
			resume_group: None,
		})
	}

	/// Resume scanning at the start of capture group `group` after each match.
	pub fn resume_at_group(mut self, group: usize) -> Result<Self> {
		if group == 0 || group >= self.pattern.captures_len() {
			return Err(RetpatchError::InvalidResumeGroup {
				rule: self.name,
				group,
			});
		}
		self.resume_group = Some(group);
		Ok(self)
	}

	/// Apply this rule in one forward scan over `input`.
	///
	/// Output is assembled from the input only, so inserted text is never
	/// matched again. Returns the new text and the number of matches replaced.
	pub fn apply(&self, input: &str) -> (String, usize) {
		let mut output = String::with_capacity(input.len());
		let mut copied = 0;
		let mut pos = 0;
		let mut count = 0;

		while pos <= input.len() {
			let Some(caps) = self.pattern.captures_at(input, pos) else {
				break;
			};
			let Some(whole) = caps.get(0) else {
				break;
			};

			output.push_str(&input[copied..whole.start()]);
			caps.expand(&self.replacement, &mut output);
			count += 1;

			let resume = self
				.resume_group
				.and_then(|group| caps.get(group))
				.map(|m| m.start())
				.filter(|&start| start > whole.start());

			match resume {
				Some(start) => {
					copied = start;
					pos = start;
				}
				None => {
					copied = whole.end();
					pos = if whole.start() == whole.end() {
						next_char_boundary(input, whole.end())
					} else {
						whole.end()
					};
				}
			}
		}

		output.push_str(&input[copied..]);
		tracing::debug!(rule = %self.name, count, "rule applied");
		(output, count)
	}
}

fn next_char_boundary(text: &str, index: usize) -> usize {
	text[index..]
		.chars()
		.next()
		.map_or(index + 1, |c| index + c.len_utf8())
}

/// Escape text so a replacement template inserts it literally.
pub fn escape_template(text: &str) -> String {
	text.replace('$', "$$")
}
