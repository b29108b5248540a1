use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use retpatch_cli::config::{
	CONFIG_FILE_NAME, discover_configs, generate_init_template, load_merged_config, merge_configs,
	user_config_path,
};
use retpatch_cli::patch::{PatchOptions, patch_file};
use retpatch_cli::rules::builtin_rules;

#[derive(Parser)]
#[command(name = "retpatch")]
#[command(
	author,
	version,
	about = "CLI tool for reshaping service return blocks with timestamps and structured errors"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// File to patch (defaults to the configured target)
	#[arg(value_name = "PATH")]
	path: Option<PathBuf>,

	/// Report what would change without writing the file
	#[arg(long, conflicts_with = "init")]
	dry_run: bool,

	/// Copy the original file to <PATH>.bak before overwriting it
	#[arg(long, conflicts_with = "init")]
	backup: bool,

	/// Create a template .retpatch.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .retpatch.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Log rule match counts and config discovery to stderr
	#[arg(short, long)]
	verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display discovered config files and the effective settings
	Show,
	/// Check all config files for errors without patching anything
	Validate,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging(verbose: bool) {
	let default_directive = if verbose {
		"retpatch=debug,retpatch_cli=debug"
	} else {
		"warn"
	};
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	// Handle subcommands
	if let Some(command) = cli.command {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(),
				ConfigAction::Validate => handle_config_validate(),
			},
		};
	}

	let options = PatchOptions {
		dry_run: cli.dry_run,
		backup: cli.backup,
	};
	handle_patch(cli.path, options)
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
	} else {
		println!("Configuration files (in cascade order):\n");

		for loaded in &configs {
			println!("# Source: {}", loaded.path.display());
			println!("# root: {}", loaded.config.root);
			if let Some(ref target) = loaded.config.target {
				println!("  target: {}", target.display());
			}
			if let Some(ref expr) = loaded.config.timestamp_expression {
				println!("  timestamp-expression: {}", expr);
			}
			if let Some(ref code) = loaded.config.error_code {
				println!("  error-code: {}", code);
			}
			println!();
		}
	}

	let merged = merge_configs(&configs);
	println!("Effective settings:");
	println!("  target: {}", merged.target.display());
	println!("  timestamp-expression: {}", merged.timestamp_expression);
	println!("  error-code: {}", merged.error_code);

	// Show user config path
	if let Ok(user_path) = user_config_path() {
		println!();
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match discover_configs(&cwd) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!("  {}", loaded.path.display());
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_patch(path: Option<PathBuf>, options: PatchOptions) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let config = load_merged_config(&cwd).context("Failed to load configuration")?;
	let rules = builtin_rules(&config).context("Failed to compile rewrite rules")?;

	let target = path.unwrap_or_else(|| config.target.clone());
	tracing::debug!(path = %target.display(), sources = config.sources.len(), "patching");

	let report = patch_file(&target, &rules, options)
		.with_context(|| format!("Failed to patch {}", target.display()))?;

	if options.dry_run {
		for outcome in &report.outcomes {
			println!("  {}: {} block(s)", outcome.rule, outcome.replacements);
		}
	}
	println!("{}", report.confirmation());
	Ok(ExitCode::SUCCESS)
}
