// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{error, warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};

use captionfit::app_config::{self, Config};
use captionfit::app_controller::{Controller, FixOptions};
use captionfit::validation::ValidatorConfig;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Options shared by every file-processing command
#[derive(Args, Debug)]
struct CommonArgs {
    /// Subtitle file or directory to process
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", env = "CAPTIONFIT_CONFIG")]
    config: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Print the result as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite captions so they meet length, layout and duration limits
    Fix {
        #[command(flatten)]
        common: CommonArgs,

        /// Report what would change without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Do not keep a `.bak` copy of rewritten files
        #[arg(long)]
        no_backup: bool,
    },

    /// Report guideline violations without changing anything
    Check {
        #[command(flatten)]
        common: CommonArgs,

        /// Use the children's reading speed limit (15 CPS)
        #[arg(long)]
        children: bool,
    },

    /// Generate shell completions for captionfit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// captionfit - caption conforming for SRT files
///
/// Splits over-long captions, balances line breaks and extends short
/// captions so every caption meets common broadcast guidelines.
#[derive(Parser, Debug)]
#[command(name = "captionfit")]
#[command(version)]
#[command(about = "Make SRT captions fit length, layout and timing limits")]
#[command(long_about = "captionfit rewrites SRT caption files so that every caption fits in two lines
of at most 42 characters, lasts between 5/6 of a second and 8 seconds, and
keeps a 50 ms gap to the next caption.

EXAMPLES:
    captionfit fix movie.srt                    # Fix a file, keeping movie.srt.bak
    captionfit fix --dry-run --json movie.srt   # Show what would change
    captionfit fix --no-backup /subtitles/      # Fix every .srt below a directory
    captionfit check movie.srt                  # Report violations, exit 1 on errors
    captionfit check --children movie.srt       # Check against 15 CPS
    captionfit completions bash > captionfit.bash

CONFIGURATION:
    Thresholds and weights are read from conf.json by default. Every field is
    optional; missing fields and a missing file fall back to the defaults.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Accept every level here; the effective level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Fix { common, dry_run, no_backup } => run_fix(&common, dry_run, no_backup),
        Commands::Check { common, children } => {
            let has_errors = run_check(&common, children)?;
            if has_errors {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "captionfit", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the configuration file, or the defaults when it does not exist, then apply CLI overrides
fn load_config(options: &CommonArgs) -> Result<Config> {
    let config_path = Path::new(&options.config);
    let mut config = if config_path.exists() {
        Config::load(config_path)
            .with_context(|| format!("Failed to load config file: {}", options.config))?
    } else {
        warn!("Config file not found at '{}', using defaults.", options.config);
        Config::default()
    };

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}

fn run_fix(options: &CommonArgs, dry_run: bool, no_backup: bool) -> Result<()> {
    let mut config = load_config(options)?;
    if no_backup {
        config.create_backup = false;
    }

    let fix_options = FixOptions {
        dry_run,
        backup: config.create_backup,
    };
    let controller = Controller::with_config(config)?;
    let summary = controller.fix_path(&options.path, &fix_options)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if summary.processed > 1 || summary.failed > 0 {
        info!(
            "{} files processed, {} changed, {} failed",
            summary.processed, summary.changed, summary.failed
        );
    }

    if summary.failed > 0 {
        error!("{} files could not be processed", summary.failed);
    }

    Ok(())
}

/// Returns whether any checked file has errors
fn run_check(options: &CommonArgs, children: bool) -> Result<bool> {
    let config = load_config(options)?;
    let validator_config = if children {
        ValidatorConfig::children()
    } else {
        ValidatorConfig::default()
    };

    let controller = Controller::with_config(config)?;
    let reports = controller.check_path(&options.path, validator_config)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            for violation in &report.violations {
                println!(
                    "{}:{} [{:?}] {}: {}{}",
                    report.path,
                    violation.block_index,
                    violation.severity,
                    violation.rule,
                    violation.message,
                    if violation.auto_fixable { " (fixable)" } else { "" }
                );
            }
        }
    }

    Ok(reports.iter().any(|r| r.error_count() > 0))
}
