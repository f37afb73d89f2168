/// Destination preparation, collision resolution and file moves.
///
/// This module owns every filesystem mutation the sorter performs: creating
/// category directories under the destination root, picking a destination
/// path that does not clobber an existing file, and renaming the source file
/// into place.
///
/// The collision check in [`FileOrganizer::resolve_path`] is check-then-use
/// and is not atomic against concurrent changes to the destination. That is
/// fine for one sequential batch; moving files in parallel would need
/// exclusive-create semantics instead.
use crate::config::CategoryMap;
use crate::file_category::split_os_extension;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while moving a single file.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Could not determine whether a destination path is occupied.
    #[error("Failed to check {}: {source}", path.display())]
    PathProbeFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Failed to delete an existing destination file before overwriting it.
    #[error("Failed to remove existing file {}: {source}", path.display())]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Failed to move a file to its category directory.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The source path has no file name component.
    #[error("{} has no file name component", .0.display())]
    NoFileName(PathBuf),
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// How a desired destination path was turned into a final one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing exists at the desired path.
    Vacant(PathBuf),
    /// A file exists and will be replaced; the caller must remove it first.
    Overwrite(PathBuf),
    /// A file exists and a numbered sibling was chosen instead.
    Renamed(PathBuf),
}

impl Resolution {
    /// The path the file should be moved to.
    pub fn path(&self) -> &Path {
        match self {
            Resolution::Vacant(p) | Resolution::Overwrite(p) | Resolution::Renamed(p) => p,
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            Resolution::Vacant(p) | Resolution::Overwrite(p) | Resolution::Renamed(p) => p,
        }
    }
}

/// Record of one completed move.
#[derive(Debug, Clone)]
pub struct Operation {
    /// The original path of the file before it was moved.
    pub original_path: PathBuf,
    /// Where the file ended up.
    pub new_path: PathBuf,
    /// The category the file was moved to.
    pub category: String,
    /// True if an existing destination file was replaced.
    pub overwrote: bool,
}

/// Moves files into category subdirectories of a destination root.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Creates one subdirectory per category under `dest_dir`.
    ///
    /// Existing directories are left alone, so running this twice is a no-op.
    /// The `Others` fallback directory is not created here; see
    /// [`FileOrganizer::ensure_category_dir`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortdrop::config::CategoryMap;
    /// use sortdrop::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// FileOrganizer::prepare_destination(Path::new("/tmp/sorted"), &CategoryMap::default())
    ///     .expect("could not prepare destination");
    /// ```
    pub fn prepare_destination(dest_dir: &Path, categories: &CategoryMap) -> OrganizeResult<()> {
        for name in categories.names() {
            Self::ensure_category_dir(dest_dir, name)?;
        }
        Ok(())
    }

    /// Creates `dest_dir/category` if it does not exist and returns its path.
    pub fn ensure_category_dir(dest_dir: &Path, category: &str) -> OrganizeResult<PathBuf> {
        let category_path = dest_dir.join(category);
        fs::create_dir_all(&category_path).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: category_path.clone(),
            source: e,
        })?;
        Ok(category_path)
    }

    /// Picks the final destination for a file whose desired path is `desired`.
    ///
    /// If nothing exists there, the path is returned as-is. If something does
    /// and `overwrite` is set, the same path is returned flagged for
    /// replacement. Otherwise ` (N)` is inserted before the extension, with N
    /// counting up from 1 until a free name is found.
    pub fn resolve_path(desired: &Path, overwrite: bool) -> OrganizeResult<Resolution> {
        if !Self::occupied(desired)? {
            return Ok(Resolution::Vacant(desired.to_path_buf()));
        }

        if overwrite {
            return Ok(Resolution::Overwrite(desired.to_path_buf()));
        }

        let file_name = desired
            .file_name()
            .ok_or_else(|| OrganizeError::NoFileName(desired.to_path_buf()))?;
        let (stem, ext) = split_os_extension(file_name);
        let parent = desired.parent().unwrap_or_else(|| Path::new(""));

        let mut count: u64 = 1;
        loop {
            let mut numbered = stem.clone();
            numbered.push(format!(" ({})", count));
            numbered.push(&ext);
            let candidate = parent.join(numbered);
            if !Self::occupied(&candidate)? {
                return Ok(Resolution::Renamed(candidate));
            }
            count += 1;
        }
    }

    fn occupied(path: &Path) -> OrganizeResult<bool> {
        path.try_exists()
            .map_err(|e| OrganizeError::PathProbeFailed {
                path: path.to_path_buf(),
                source: e,
            })
    }

    /// Moves `file_path` into `dest_dir/category`, resolving collisions first.
    ///
    /// The category directory must already exist. With `overwrite`, an
    /// existing destination file is deleted before the rename.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortdrop::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let result = FileOrganizer::move_to_category(
    ///     Path::new("/tmp/sorted"),
    ///     Path::new("/tmp/inbox/image.png"),
    ///     "Images",
    ///     false,
    /// );
    ///
    /// match result {
    ///     Ok(op) => println!("Moved {} to {}", op.original_path.display(), op.new_path.display()),
    ///     Err(e) => eprintln!("Move failed: {}", e),
    /// }
    /// ```
    pub fn move_to_category(
        dest_dir: &Path,
        file_path: &Path,
        category: &str,
        overwrite: bool,
    ) -> OrganizeResult<Operation> {
        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::NoFileName(file_path.to_path_buf()))?;
        let desired = dest_dir.join(category).join(file_name);

        let resolution = Self::resolve_path(&desired, overwrite)?;
        let overwrote = matches!(resolution, Resolution::Overwrite(_));
        match &resolution {
            Resolution::Overwrite(existing) => {
                debug!(path = %existing.display(), "removing existing file before overwrite");
                fs::remove_file(existing).map_err(|e| OrganizeError::RemoveFailed {
                    path: existing.clone(),
                    source: e,
                })?;
            }
            Resolution::Renamed(_) => {
                debug!(
                    desired = %desired.display(),
                    renamed = %resolution.path().display(),
                    "destination occupied, using numbered name"
                );
            }
            Resolution::Vacant(_) => {}
        }

        let destination = resolution.into_path();
        fs::rename(file_path, &destination).map_err(|e| OrganizeError::FileMoveFailure {
            from: file_path.to_path_buf(),
            to: destination.clone(),
            source: e,
        })?;

        Ok(Operation {
            original_path: file_path.to_path_buf(),
            new_path: destination,
            category: category.to_string(),
            overwrote,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::OTHERS;
    use tempfile::TempDir;

    fn touch(path: &Path, content: &str) {
        fs::write(path, content).expect("Failed to write test file");
    }

    fn list_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .expect("Failed to read directory")
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_prepare_destination_creates_every_category() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let map = CategoryMap::default();

        FileOrganizer::prepare_destination(temp_dir.path(), &map).expect("prepare failed");

        for name in map.names() {
            assert!(temp_dir.path().join(name).is_dir(), "{} missing", name);
        }
        assert!(!temp_dir.path().join(OTHERS).exists());
    }

    #[test]
    fn test_prepare_destination_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let map = CategoryMap::default();

        FileOrganizer::prepare_destination(temp_dir.path(), &map).expect("first prepare failed");
        let first = list_names(temp_dir.path());
        FileOrganizer::prepare_destination(temp_dir.path(), &map).expect("second prepare failed");
        let second = list_names(temp_dir.path());

        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_path_vacant() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let desired = temp_dir.path().join("a.txt");

        let resolution = FileOrganizer::resolve_path(&desired, false).unwrap();
        assert_eq!(resolution, Resolution::Vacant(desired));
    }

    #[test]
    fn test_resolve_path_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let desired = temp_dir.path().join("a.txt");
        touch(&desired, "old");

        let resolution = FileOrganizer::resolve_path(&desired, true).unwrap();
        assert_eq!(resolution, Resolution::Overwrite(desired.clone()));
        // Resolving never deletes anything on its own.
        assert!(desired.exists());
    }

    #[test]
    fn test_resolve_path_skips_taken_suffixes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        touch(&temp_dir.path().join("a.txt"), "1");
        touch(&temp_dir.path().join("a (1).txt"), "2");

        let resolution = FileOrganizer::resolve_path(&temp_dir.path().join("a.txt"), false).unwrap();
        assert_eq!(
            resolution,
            Resolution::Renamed(temp_dir.path().join("a (2).txt"))
        );
    }

    #[test]
    fn test_resolve_path_without_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        touch(&temp_dir.path().join("note"), "1");

        let resolution = FileOrganizer::resolve_path(&temp_dir.path().join("note"), false).unwrap();
        assert_eq!(resolution.path(), temp_dir.path().join("note (1)"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_path_keeps_non_utf8_name_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let desired = temp_dir.path().join(OsStr::from_bytes(b"caf\xE9.txt"));
        touch(&desired, "taken");

        let resolution = FileOrganizer::resolve_path(&desired, false).unwrap();
        let file_name = resolution.path().file_name().unwrap();
        assert_eq!(file_name.as_bytes(), b"caf\xE9 (1).txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_move_to_category_collision_with_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let name = OsStr::from_bytes(b"caf\xE9.txt");
        let dest = temp_dir.path().join("dest");
        let category_dir = FileOrganizer::ensure_category_dir(&dest, "Documents").unwrap();
        touch(&category_dir.join(name), "old");

        let file_path = temp_dir.path().join(name);
        touch(&file_path, "new");

        let op = FileOrganizer::move_to_category(&dest, &file_path, "Documents", false).unwrap();

        assert_eq!(
            op.new_path,
            category_dir.join(OsStr::from_bytes(b"caf\xE9 (1).txt"))
        );
        assert_eq!(fs::read_to_string(&op.new_path).unwrap(), "new");
    }

    #[test]
    fn test_move_to_category_moves_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let src = temp_dir.path().join("src");
        let dest = temp_dir.path().join("dest");
        fs::create_dir(&src).unwrap();
        FileOrganizer::ensure_category_dir(&dest, "Documents").unwrap();

        let file_path = src.join("test.txt");
        touch(&file_path, "test content");

        let op = FileOrganizer::move_to_category(&dest, &file_path, "Documents", false)
            .expect("Failed to move file");

        assert!(!file_path.exists());
        assert_eq!(op.new_path, dest.join("Documents").join("test.txt"));
        assert!(op.new_path.exists());
        assert!(!op.overwrote);
    }

    #[test]
    fn test_move_to_category_overwrite_replaces_content() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest = temp_dir.path().join("dest");
        let category_dir = FileOrganizer::ensure_category_dir(&dest, "Documents").unwrap();
        touch(&category_dir.join("a.txt"), "old");

        let file_path = temp_dir.path().join("a.txt");
        touch(&file_path, "new");

        let op = FileOrganizer::move_to_category(&dest, &file_path, "Documents", true).unwrap();

        assert!(op.overwrote);
        assert_eq!(fs::read_to_string(category_dir.join("a.txt")).unwrap(), "new");
        assert!(!category_dir.join("a (1).txt").exists());
    }

    #[test]
    fn test_move_to_category_missing_source_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest = temp_dir.path().join("dest");
        FileOrganizer::ensure_category_dir(&dest, "Documents").unwrap();

        let result = FileOrganizer::move_to_category(
            &dest,
            &temp_dir.path().join("vanished.txt"),
            "Documents",
            false,
        );
        assert!(matches!(result, Err(OrganizeError::FileMoveFailure { .. })));
    }
}
