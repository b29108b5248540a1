#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::Path;

const SERVICE: &str = r#"export const contentService = {
  async list() {
    try {
      const response = await api.get('/content');
      return { success: true, data: response.data, message: 'Loaded' };
    } catch (error) {
      return { success: false, data: null, message: error.response?.data?.message || 'Failed' };
    }
  },
};
"#;

const PATCHED: &str = r#"export const contentService = {
  async list() {
    try {
      const response = await api.get('/content');
      return { success: true, data: response.data, timestamp: new Date().toISOString()};
    } catch (error) {
      return { success: false, data: null, error: { code: 'SERVICE_ERROR', message: error.response?.data?.message || 'Failed' }, timestamp: new Date().toISOString()};
    }
  },
};
"#;

const DEFAULT_TARGET: &str = "frontend/src/features/admin/services/contentService.ts";

fn retpatch_cmd() -> assert_cmd::Command {
	let mut cmd = assert_cmd::Command::cargo_bin("retpatch").unwrap();
	cmd.env("RETPATCH_NO_USER_CONFIG", "1").env_remove("RUST_LOG");
	cmd
}

fn write_default_target(dir: &Path, content: &str) -> std::path::PathBuf {
	let path = dir.join(DEFAULT_TARGET);
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	fs::write(&path, content).unwrap();
	path
}

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	retpatch_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("reshaping service return blocks"));
}

#[test]
fn test_version_flag() {
	retpatch_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("retpatch"));
}

// ============================================================================
// Patching tests
// ============================================================================

#[test]
fn test_no_args_patches_default_target() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_default_target(temp_dir.path(), SERVICE);

	retpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("Fixed contentService.ts\n");

	assert_eq!(fs::read_to_string(&path).unwrap(), PATCHED);
}

#[test]
fn test_second_run_changes_nothing() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_default_target(temp_dir.path(), SERVICE);

	retpatch_cmd().current_dir(temp_dir.path()).assert().success();
	retpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("Fixed contentService.ts\n");

	assert_eq!(fs::read_to_string(&path).unwrap(), PATCHED);
}

#[test]
fn test_missing_default_target_fails() {
	let temp_dir = tempfile::tempdir().unwrap();

	retpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stdout(predicate::str::is_empty())
		.stderr(predicate::str::contains("Failed to patch"));
}

#[test]
fn test_explicit_path_argument() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = temp_dir.path().join("userService.ts");
	fs::write(&path, SERVICE).unwrap();

	retpatch_cmd()
		.arg("userService.ts")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("Fixed userService.ts\n");

	assert_eq!(fs::read_to_string(&path).unwrap(), PATCHED);
}

#[test]
fn test_dry_run_leaves_file_untouched() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_default_target(temp_dir.path(), SERVICE);

	retpatch_cmd()
		.arg("--dry-run")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("success: 1 block(s)"))
		.stdout(predicate::str::contains("failure: 1 block(s)"))
		.stdout(predicate::str::contains("Would fix contentService.ts"));

	assert_eq!(fs::read_to_string(&path).unwrap(), SERVICE);
}

#[test]
fn test_backup_flag_keeps_original() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_default_target(temp_dir.path(), SERVICE);

	retpatch_cmd()
		.arg("--backup")
		.current_dir(temp_dir.path())
		.assert()
		.success();

	let backup = temp_dir.path().join(format!("{DEFAULT_TARGET}.bak"));
	assert_eq!(fs::read_to_string(&backup).unwrap(), SERVICE);
	assert_eq!(fs::read_to_string(&path).unwrap(), PATCHED);
}

#[test]
fn test_verbose_logs_to_stderr_only() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_default_target(temp_dir.path(), SERVICE);

	retpatch_cmd()
		.arg("--verbose")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("Fixed contentService.ts\n")
		.stderr(predicate::str::contains("rule applied"));
}

#[test]
fn test_unchanged_run_still_prints_confirmation() {
	let temp_dir = tempfile::tempdir().unwrap();
	let path = write_default_target(temp_dir.path(), "export const x = 1;\n");

	retpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("Fixed contentService.ts\n");

	assert_eq!(fs::read_to_string(&path).unwrap(), "export const x = 1;\n");
}

// ============================================================================
// Config-driven patching tests
// ============================================================================

#[test]
fn test_config_overrides_target_and_values() {
	let temp_dir = tempfile::tempdir().unwrap();
	let service_dir = temp_dir.path().join("services");
	fs::create_dir_all(&service_dir).unwrap();
	let path = service_dir.join("orders.ts");
	fs::write(&path, SERVICE).unwrap();

	fs::write(
		temp_dir.path().join(".retpatch.toml"),
		r#"
root = true
target = "services/orders.ts"
timestamp-expression = "Date.now()"
error-code = "ORDER_ERROR"
"#,
	)
	.unwrap();

	retpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("Fixed orders.ts\n");

	let content = fs::read_to_string(&path).unwrap();
	assert!(content.contains("data: response.data, timestamp: Date.now()};"));
	assert!(content.contains("error: { code: 'ORDER_ERROR', message: error.response?.data?.message || 'Failed' }, timestamp: Date.now()};"));
}

#[cfg(unix)]
#[test]
fn test_user_config_changes_bare_run_target() {
	let home_dir = tempfile::tempdir().unwrap();
	let work_dir = tempfile::tempdir().unwrap();
	let path = home_dir.path().join("billing.ts");
	fs::write(&path, SERVICE).unwrap();
	fs::write(
		home_dir.path().join(".retpatch.toml"),
		"target = \"billing.ts\"\n",
	)
	.unwrap();

	retpatch_cmd()
		.env_remove("RETPATCH_NO_USER_CONFIG")
		.env("HOME", home_dir.path())
		.current_dir(work_dir.path())
		.assert()
		.success()
		.stdout("Fixed billing.ts\n");

	assert_eq!(fs::read_to_string(&path).unwrap(), PATCHED);

	// Opting out falls back to the built-in target, which doesn't exist here.
	retpatch_cmd()
		.env("HOME", home_dir.path())
		.current_dir(work_dir.path())
		.assert()
		.failure();
}

#[test]
fn test_invalid_config_fails_patch() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_default_target(temp_dir.path(), SERVICE);
	fs::write(temp_dir.path().join(".retpatch.toml"), "invalid toml [[[").unwrap();

	retpatch_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Failed to load configuration"));
}

// ============================================================================
// --init tests
// ============================================================================

#[test]
fn test_init_creates_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".retpatch.toml");

	retpatch_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Created .retpatch.toml"));

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("root = true"));
	assert!(content.contains("error-code = \"SERVICE_ERROR\""));
}

#[test]
fn test_init_fails_if_exists() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join(".retpatch.toml"), "# existing").unwrap();

	retpatch_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".retpatch.toml");
	fs::write(&config_path, "# existing").unwrap();

	retpatch_cmd()
		.args(["--init", "--force"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("root = true"));
}

// ============================================================================
// config subcommand tests
// ============================================================================

#[test]
fn test_config_validate_valid_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join(".retpatch.toml"),
		"root = true\nerror-code = \"CONTENT_ERROR\"\n",
	)
	.unwrap();

	retpatch_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("valid"));
}

#[test]
fn test_config_validate_invalid_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join(".retpatch.toml"), "invalid toml [[[").unwrap();

	retpatch_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_config_validate_rejects_quoted_error_code() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join(".retpatch.toml"),
		"root = true\nerror-code = \"BAD'CODE\"\n",
	)
	.unwrap();

	retpatch_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("error-code"));
}

#[test]
fn test_config_show_displays_settings() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join(".retpatch.toml"),
		"root = true\ntimestamp-expression = \"Date.now()\"\n",
	)
	.unwrap();

	retpatch_cmd()
		.args(["config", "show"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("timestamp-expression: Date.now()"))
		.stdout(predicate::str::contains("error-code: SERVICE_ERROR"));
}
