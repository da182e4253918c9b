use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::conform::metrics::{DictionaryCounter, TextMetrics};
use crate::conform::{ConformStats, Conformer};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::subtitle_processor::SubtitleFile;
use crate::validation::{FileReport, ValidationService, ValidatorConfig};

// @module: Application controller for caption fixing and checking

/// Name of the summary log written into processed folders
const FOLDER_LOG_NAME: &str = "captionfit.log";

/// How fixed files are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixOptions {
    /// Process and report without touching any file
    pub dry_run: bool,
    /// Copy the original to `<file>.bak` before rewriting it
    pub backup: bool,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup: true,
        }
    }
}

/// Outcome of fixing one file
#[derive(Debug, Clone, Serialize)]
pub struct FileFixReport {
    pub path: String,
    pub stats: ConformStats,
    /// Single-character artifact captions dropped while parsing
    pub artifacts_removed: usize,
    /// Whether the file was rewritten
    pub written: bool,
    pub backup_path: Option<String>,
}

impl FileFixReport {
    /// Whether fixing changes the file content
    pub fn has_changes(&self) -> bool {
        self.stats.has_changes() || self.artifacts_removed > 0
    }
}

/// Outcome of fixing a folder
#[derive(Debug, Clone, Default, Serialize)]
pub struct FolderFixSummary {
    pub processed: usize,
    pub changed: usize,
    pub failed: usize,
    pub files: Vec<FileFixReport>,
}

/// Main application controller for caption fixing
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Pipeline built from the configuration
    conformer: Conformer,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().map_err(AppError::from)?;

        let metrics = match &config.syllable_dictionary {
            Some(path) => {
                let dictionary = DictionaryCounter::from_json_file(path).map_err(AppError::from)?;
                info!("Using syllable dictionary {:?} ({} words)", path, dictionary.len());
                TextMetrics::with_counter(&config.conform, Arc::new(dictionary))
            }
            None => TextMetrics::new(&config.conform),
        };
        let conformer = Conformer::with_metrics(config.conform.clone(), metrics);

        Ok(Self { config, conformer })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fix a single file or every `.srt` file below a directory
    pub fn fix_path(&self, path: &Path, options: &FixOptions) -> Result<FolderFixSummary> {
        if path.is_file() {
            let report = self.fix_file(path, options)?;
            Ok(FolderFixSummary {
                processed: 1,
                changed: usize::from(report.has_changes()),
                failed: 0,
                files: vec![report],
            })
        } else if path.is_dir() {
            self.fix_folder(path, options)
        } else {
            Err(AppError::File(format!("Input path does not exist: {:?}", path)).into())
        }
    }

    /// Run the pipeline on one file; the file is rewritten only when something changed
    pub fn fix_file(&self, path: &Path, options: &FixOptions) -> Result<FileFixReport> {
        let start_time = std::time::Instant::now();

        let file = SubtitleFile::read(path)?;
        let outcome = self.conformer.run(&file.blocks);

        let mut report = FileFixReport {
            path: path.display().to_string(),
            stats: outcome.stats,
            artifacts_removed: file.artifacts_removed,
            written: false,
            backup_path: None,
        };

        if !report.has_changes() {
            debug!("No changes needed for {:?}", path);
        } else if options.dry_run {
            info!("Dry run, not writing {:?}", path);
        } else {
            if options.backup {
                let backup = FileManager::create_backup(path)
                    .with_context(|| format!("Failed to back up {:?}", path))?;
                report.backup_path = Some(backup.display().to_string());
            }
            FileManager::write_atomic(path, &SubtitleFile::to_srt_string(&outcome.blocks))?;
            report.written = true;
        }

        let stats = &report.stats;
        info!(
            "{}: {} -> {} captions, {} split, {} rebalanced, {} extended, {} still short ({})",
            path.file_name().map(|f| f.to_string_lossy().to_string()).unwrap_or_default(),
            stats.original_count,
            stats.final_count,
            stats.blocks_split,
            stats.lines_balanced,
            stats.durations_extended,
            stats.still_short,
            Self::format_duration(start_time.elapsed())
        );
        if stats.overlaps > 0 {
            warn!("{:?} has {} overlapping captions left", path, stats.overlaps);
        }

        Ok(report)
    }

    /// Fix every `.srt` file below a directory; failures are logged and counted
    pub fn fix_folder(&self, dir: &Path, options: &FixOptions) -> Result<FolderFixSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(dir) {
            return Err(AppError::File(format!("Input directory does not exist: {:?}", dir)).into());
        }

        let files = FileManager::find_srt_files(dir)?;
        if files.is_empty() {
            return Err(AppError::File(format!("No subtitle files found in directory: {:?}", dir)).into());
        }

        let progress = Self::folder_progress_bar(files.len() as u64);
        let mut summary = FolderFixSummary::default();

        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            progress.set_message(format!("Processing: {}", file_name));

            match progress.suspend(|| self.fix_file(file, options)) {
                Ok(report) => {
                    summary.processed += 1;
                    if report.has_changes() {
                        summary.changed += 1;
                    }
                    summary.files.push(report);
                }
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.failed += 1;
                }
            }

            progress.inc(1);
        }

        progress.finish_with_message("Folder processing complete");

        let summary_message = format!(
            "Folder processing completed: {} processed, {} changed, {} errors",
            summary.processed, summary.changed, summary.failed
        );
        info!("{} in {}", summary_message, Self::format_duration(start_time.elapsed()));

        if !options.dry_run {
            let log_path = dir.join(FOLDER_LOG_NAME);
            if let Err(e) = FileManager::append_to_log_file(&log_path, &summary_message) {
                warn!("Failed to write folder log {:?}: {}", log_path, e);
            }
        }

        Ok(summary)
    }

    /// Validate one file or every `.srt` file below a directory
    pub fn check_path(&self, path: &Path, validator_config: ValidatorConfig) -> Result<Vec<FileReport>> {
        let validator = ValidationService::with_config(validator_config);

        let files: Vec<PathBuf> = if path.is_file() {
            vec![path.to_path_buf()]
        } else if path.is_dir() {
            FileManager::find_srt_files(path)?
        } else {
            return Err(AppError::File(format!("Input path does not exist: {:?}", path)).into());
        };

        let mut reports = Vec::with_capacity(files.len());
        for file in &files {
            match validator.validate_file(file) {
                Ok(report) => {
                    info!("{}", report.summary());
                    reports.push(report);
                }
                Err(e) => error!("Error checking file {:?}: {}", file, e),
            }
        }

        Ok(reports)
    }

    fn folder_progress_bar(len: u64) -> ProgressBar {
        let progress = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style.progress_chars("█▓▒░"));
        progress.set_message("Processing files");
        progress
    }

    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
