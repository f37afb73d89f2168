//! Command-line interface and batch orchestration for sortdrop.
//!
//! This module handles:
//! - Argument parsing (`Cli`) and the immutable `RunOptions` derived from it
//! - Up-front validation of the source and destination directories
//! - Loading the category map and preparing the destination
//! - The per-file classify / resolve / move loop and its progress output

use crate::config::CategoryMap;
use crate::error::{Result, SortError};
use crate::file_category::{OTHERS, classify};
use crate::file_organizer::FileOrganizer;
use crate::output::OutputFormatter;
use clap::Parser;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Sort files into category folders by extension.
#[derive(Parser, Debug)]
#[command(name = "sortdrop", version)]
#[command(about = "Sort files from a source directory into category folders by extension")]
#[command(after_help = "CONFIG FILE FORMAT:\n  \
    One rule per line, e.g.\n    \
    Documents:.pdf,.docx,.txt\n    \
    Images:.jpg,.png\n  \
    Include the leading dot on each extension.")]
pub struct Cli {
    /// Directory whose files will be sorted (not descended into)
    pub source_dir: PathBuf,

    /// Directory that receives one subfolder per category
    pub dest_dir: PathBuf,

    /// Show where each file would go without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Replace existing destination files instead of numbering new ones
    #[arg(long)]
    pub overwrite: bool,

    /// Category rules file; a bare `--config` falls back to the defaults
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    pub config: Option<Option<PathBuf>>,

    /// Diagnostic log level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Settings for one run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub dry_run: bool,
    pub overwrite: bool,
    pub config_path: Option<PathBuf>,
}

impl RunOptions {
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            dry_run: false,
            overwrite: false,
            config_path: None,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn config_path(mut self, config_path: Option<PathBuf>) -> Self {
        self.config_path = config_path;
        self
    }
}

impl From<Cli> for RunOptions {
    fn from(cli: Cli) -> Self {
        Self {
            source_dir: cli.source_dir,
            dest_dir: cli.dest_dir,
            dry_run: cli.dry_run,
            overwrite: cli.overwrite,
            config_path: cli.config.flatten(),
        }
    }
}

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Classified but not yet acted on.
    Pending,
    /// Dry run: the move was reported, nothing was touched.
    DryRunLogged,
    /// The file now lives at `path`; `overwrote` is set if it replaced an
    /// existing file there.
    Moved { path: PathBuf, overwrote: bool },
    /// The move failed with this reason; the batch continued.
    Failed(String),
}

/// One source file as it passes through the batch.
#[derive(Debug, Clone)]
pub struct FileTask {
    /// The file in the source directory.
    pub source_path: PathBuf,
    /// The file name, casing preserved.
    pub file_name: String,
    /// The category it was classified into.
    pub category: String,
    /// `dest_dir/category/file_name`, before collision resolution.
    pub desired_path: PathBuf,
    pub outcome: Outcome,
}

impl FileTask {
    /// Classifies `source_path` and computes its desired destination.
    pub fn classify(source_path: PathBuf, dest_dir: &Path, categories: &CategoryMap) -> Self {
        let file_name = source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let category = classify(&file_name, categories).to_string();
        let mut desired_path = dest_dir.join(&category);
        if let Some(raw_name) = source_path.file_name() {
            desired_path.push(raw_name);
        }

        Self {
            source_path,
            file_name,
            category,
            desired_path,
            outcome: Outcome::Pending,
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Files found in the source directory.
    pub total: usize,
    /// Files handled, whatever the outcome.
    pub processed: usize,
    /// Files moved (non-dry runs).
    pub moved: usize,
    /// Existing destination files replaced under `--overwrite`.
    pub overwritten: usize,
    /// Files reported by a dry run.
    pub dry_run_logged: usize,
    /// Files that could not be moved, with the reason.
    pub failed: Vec<(PathBuf, String)>,
    /// Files per category, failures excluded.
    pub by_category: BTreeMap<String, usize>,
}

impl RunReport {
    fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    fn record(&mut self, task: &FileTask) {
        self.processed += 1;
        match &task.outcome {
            Outcome::Pending => {}
            Outcome::DryRunLogged => {
                self.dry_run_logged += 1;
                *self.by_category.entry(task.category.clone()).or_insert(0) += 1;
            }
            Outcome::Moved { overwrote, .. } => {
                self.moved += 1;
                if *overwrote {
                    self.overwritten += 1;
                }
                *self.by_category.entry(task.category.clone()).or_insert(0) += 1;
            }
            Outcome::Failed(reason) => {
                self.failed.push((task.source_path.clone(), reason.clone()));
            }
        }
    }

    /// Returns true if no file failed.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs a full sort with the given options.
///
/// Fatal problems (missing directories, unreadable config, a destination
/// that cannot be prepared, an unreadable source) are returned as errors
/// before any file is touched. Per-file failures are printed, recorded in the
/// report, and do not stop the batch.
///
/// # Examples
///
/// ```no_run
/// use sortdrop::cli::{RunOptions, run_cli};
///
/// let options = RunOptions::new("/home/me/Downloads", "/home/me/Sorted").dry_run(true);
/// match run_cli(&options) {
///     Ok(report) => println!("{} files would move", report.dry_run_logged),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(options: &RunOptions) -> Result<RunReport> {
    require_dir("Source", &options.source_dir)?;
    require_dir("Destination", &options.dest_dir)?;

    let categories = CategoryMap::load(options.config_path.as_deref())?;

    if !options.dry_run {
        FileOrganizer::prepare_destination(&options.dest_dir, &categories)?;
    }

    let files = list_source_files(&options.source_dir)?;
    let report = organize_directory(files, &categories, options);

    info!(
        total = report.total,
        moved = report.moved,
        overwritten = report.overwritten,
        dry_run = report.dry_run_logged,
        failed = report.failed.len(),
        complete = report.is_complete_success(),
        "run finished"
    );
    OutputFormatter::summary(options.dry_run);

    Ok(report)
}

fn require_dir(role: &'static str, path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(SortError::DirectoryNotFound {
            role,
            path: path.to_path_buf(),
        })
    }
}

/// Lists the files directly inside `source_dir`, sorted by name.
///
/// Symlinks to files count as files. Subdirectories, and links to them, are
/// not descended into. Entries that cannot be read are logged and skipped.
fn list_source_files(source_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(source_dir).map_err(|e| SortError::Io {
        path: source_dir.to_path_buf(),
        source: e,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                warn!(dir = %source_dir.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    Ok(files)
}

/// Classifies and moves (or reports) every file in `files`.
///
/// Prints a progress line after each file regardless of its outcome.
pub fn organize_directory(
    files: Vec<PathBuf>,
    categories: &CategoryMap,
    options: &RunOptions,
) -> RunReport {
    let mut report = RunReport::new(files.len());
    let mut others_ready = categories.get(OTHERS).is_some() && !options.dry_run;

    for source_path in files {
        let mut task = FileTask::classify(source_path, &options.dest_dir, categories);
        debug!(file = %task.file_name, category = %task.category, "classified");

        if options.dry_run {
            OutputFormatter::dry_run_move(&task.file_name, &task.category);
            task.outcome = Outcome::DryRunLogged;
        } else {
            task.outcome = move_task(&task, options, &mut others_ready);
            if let Outcome::Failed(reason) = &task.outcome {
                debug!(file = %task.source_path.display(), %reason, "move failed");
                OutputFormatter::file_error(&task.source_path, reason);
            }
        }

        report.record(&task);
        OutputFormatter::progress(report.processed, report.total);
    }

    report
}

fn move_task(task: &FileTask, options: &RunOptions, others_ready: &mut bool) -> Outcome {
    if task.category == OTHERS && !*others_ready {
        if let Err(e) = FileOrganizer::ensure_category_dir(&options.dest_dir, OTHERS) {
            return Outcome::Failed(e.to_string());
        }
        *others_ready = true;
    }

    match FileOrganizer::move_to_category(
        &options.dest_dir,
        &task.source_path,
        &task.category,
        options.overwrite,
    ) {
        Ok(op) => Outcome::Moved {
            path: op.new_path,
            overwrote: op.overwrote,
        },
        Err(e) => Outcome::Failed(e.to_string()),
    }
}
