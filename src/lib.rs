//! sortdrop - sort a directory's files into category folders by extension
//!
//! This library loads extension-to-folder rules (built in or from a simple
//! text file), classifies each file in a source directory, and moves it into
//! the matching subfolder of a destination directory. Name clashes are solved
//! by numbering (`name (1).ext`) or, on request, by overwriting. A dry run
//! reports the planned moves without touching anything.

pub mod cli;
pub mod config;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;

pub use cli::{Cli, FileTask, Outcome, RunOptions, RunReport, run_cli};
pub use config::{CategoryMap, CategoryRule, ConfigError};
pub use error::SortError;
pub use file_category::{OTHERS, classify, extension_of};
pub use file_organizer::{FileOrganizer, OrganizeError, Resolution};
