use crate::config::types::{DEFAULT_ERROR_CODE, DEFAULT_TARGET, DEFAULT_TIMESTAMP_EXPRESSION};

/// Generate the `.retpatch.toml` written by `retpatch --init`.
pub fn generate_init_template() -> String {
	format!(
		r#"# retpatch configuration
#
# Settings are looked up from the current directory upwards; the nearest
# file that sets a key wins. `root = true` stops the upward search.
root = true

# File to patch, relative to this file's directory.
target = "{DEFAULT_TARGET}"

# Inserted verbatim as the value of every new `timestamp` field.
timestamp-expression = "{DEFAULT_TIMESTAMP_EXPRESSION}"

# Code used in `error: {{ code: '...', message: ... }}` for failure returns.
error-code = "{DEFAULT_ERROR_CODE}"
"#
	)
}
