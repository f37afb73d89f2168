//! Top-level errors that abort a run before or while it starts.
//!
//! Usage errors are reported by clap before a run begins. Failures moving an
//! individual file are not represented here; they are reported per file and
//! the batch continues.

use crate::config::ConfigError;
use crate::file_organizer::OrganizeError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SortError>;

#[derive(Debug, Error)]
pub enum SortError {
    #[error("{role} directory '{}' does not exist.", path.display())]
    DirectoryNotFound { role: &'static str, path: PathBuf },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Could not prepare destination: {0}")]
    Destination(#[from] OrganizeError),

    #[error("Error reading directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
