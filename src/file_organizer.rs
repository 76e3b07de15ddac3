/// Moving files into their category directories.
///
/// This module defines the [`FileProcessor`] seam used by the sorter and its
/// default implementation, [`MoveProcessor`], which normalizes the file name,
/// moves the file under `root/<category>/`, records it in the run's ledger and
/// unpacks archives.
use crate::archive::{ArchiveError, ArchiveUnpacker};
use crate::file_category::{Category, extension_of};
use crate::ledger::CategoryLedger;
use crate::name_normalizer::normalize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while sorting a folder.
#[derive(Debug)]
pub enum OrganizeError {
    /// The root directory path is invalid or doesn't exist.
    InvalidBasePath { path: PathBuf, source: io::Error },
    /// Failed to create a category directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// Failed to enumerate a directory during traversal.
    ReadDirFailed { path: PathBuf, source: io::Error },
    /// Failed to remove an empty directory.
    PruneFailed { path: PathBuf, source: io::Error },
    /// Failed to write a manifest file.
    ManifestWriteFailed { path: PathBuf, source: io::Error },
    /// Failed to unpack an archive after moving it.
    Archive(ArchiveError),
    /// An exclude pattern could not be compiled.
    InvalidPattern { pattern: String, reason: String },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            Self::PruneFailed { path, source } => {
                write!(
                    f,
                    "Failed to remove empty directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::ManifestWriteFailed { path, source } => {
                write!(f, "Failed to write manifest {}: {}", path.display(), source)
            }
            Self::Archive(e) => write!(f, "{}", e),
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid exclude pattern '{}': {}", pattern, reason)
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidBasePath { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::ReadDirFailed { source, .. }
            | Self::PruneFailed { source, .. }
            | Self::ManifestWriteFailed { source, .. } => Some(source),
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
            Self::Archive(e) => Some(e),
            Self::InvalidPattern { .. } => None,
        }
    }
}

impl From<ArchiveError> for OrganizeError {
    fn from(e: ArchiveError) -> Self {
        Self::Archive(e)
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Records one file that was sorted.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    /// The path of the file before sorting.
    pub original_path: PathBuf,
    /// The path of the file after sorting.
    pub new_path: PathBuf,
    /// The category the file was sorted into.
    pub category: Category,
    /// Where the archive was unpacked, for files in the `archives` category.
    pub unpacked_to: Option<PathBuf>,
}

/// Strategy for handling one classified file.
///
/// The sorter calls [`FileProcessor::process_file`] once per regular file
/// found under the root.
pub trait FileProcessor {
    /// Handles `file_path`, which was classified as `category`, under `root`.
    ///
    /// Implementations record what they did in `ledger`.
    fn process_file(
        &self,
        file_path: &Path,
        category: Category,
        root: &Path,
        ledger: &mut CategoryLedger,
    ) -> OrganizeResult<ProcessedFile>;
}

/// Default processor: normalize, move, record, unpack.
#[derive(Debug, Clone, Default)]
pub struct MoveProcessor {
    unpacker: ArchiveUnpacker,
}

impl MoveProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `root/<category>` if it is missing and returns its path.
    pub fn ensure_category_dir(root: &Path, category: Category) -> OrganizeResult<PathBuf> {
        let category_path = root.join(category.dir_name());
        if !category_path.is_dir() {
            fs::create_dir(&category_path).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: category_path.clone(),
                source: e,
            })?;
        }
        Ok(category_path)
    }

    /// Moves `source` to `destination`.
    ///
    /// Uses a rename; when the two paths are on different filesystems the
    /// file is copied and the original removed.
    ///
    /// # Arguments
    ///
    /// * `source` - The file to move
    /// * `destination` - The full destination path, including the file name
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` on success, or `FileMoveFailure` naming both paths.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::MoveProcessor;
    /// use std::path::Path;
    ///
    /// MoveProcessor::move_file(
    ///     Path::new("/home/user/Downloads/song.mp3"),
    ///     Path::new("/home/user/Downloads/audio/song.mp3"),
    /// )?;
    /// # Ok::<(), dirsort::OrganizeError>(())
    /// ```
    pub fn move_file(source: &Path, destination: &Path) -> OrganizeResult<()> {
        let move_error = |e: io::Error| OrganizeError::FileMoveFailure {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source_error: e,
        };

        match fs::rename(source, destination) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                fs::copy(source, destination).map_err(move_error)?;
                fs::remove_file(source).map_err(move_error)
            }
            Err(e) => Err(move_error(e)),
        }
    }
}

impl FileProcessor for MoveProcessor {
    fn process_file(
        &self,
        file_path: &Path,
        category: Category,
        root: &Path,
        ledger: &mut CategoryLedger,
    ) -> OrganizeResult<ProcessedFile> {
        let category_path = Self::ensure_category_dir(root, category)?;

        let normalized = normalize(file_path);
        if normalized.is_empty() {
            return Err(OrganizeError::FileMoveFailure {
                source: file_path.to_path_buf(),
                destination: category_path,
                source_error: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            });
        }
        let new_path = category_path.join(&normalized);

        Self::move_file(file_path, &new_path)?;
        ledger.record(category, &normalized, &extension_of(&new_path));

        let unpacked_to = if category == Category::Archives {
            Some(self.unpacker.unpack(&new_path, &category_path)?)
        } else {
            None
        };

        Ok(ProcessedFile {
            original_path: file_path.to_path_buf(),
            new_path,
            category,
            unpacked_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_process_file_creates_directory_and_moves() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let file_path = root.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let mut ledger = CategoryLedger::new();
        let processed = MoveProcessor::new()
            .process_file(&file_path, Category::Docs, root, &mut ledger)
            .expect("Failed to process file");

        assert!(root.join("docs").is_dir());
        assert!(!file_path.exists());
        assert_eq!(processed.new_path, root.join("docs").join("test.txt"));
        assert!(processed.new_path.exists());
        assert!(processed.unpacked_to.is_none());
        assert_eq!(ledger.get(Category::Docs).names, ["test.txt"]);
        assert_eq!(ledger.get(Category::Docs).extensions, [".txt"]);
    }

    #[test]
    fn test_process_file_normalizes_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let file_path = root.join("Пісня 1.MP3");
        fs::write(&file_path, "audio").expect("Failed to write test file");

        let mut ledger = CategoryLedger::new();
        let processed = MoveProcessor::new()
            .process_file(&file_path, Category::Audio, root, &mut ledger)
            .expect("Failed to process file");

        assert_eq!(processed.new_path, root.join("audio").join("Pisnya_1.MP3"));
        assert_eq!(ledger.get(Category::Audio).names, ["Pisnya_1.MP3"]);
        assert_eq!(ledger.get(Category::Audio).extensions, [".MP3"]);
    }

    #[test]
    fn test_process_file_uses_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("images")).expect("Failed to create category directory");
        fs::write(root.join("images").join("keep.png"), "old").expect("write keep");
        let file_path = root.join("test.png");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let mut ledger = CategoryLedger::new();
        MoveProcessor::new()
            .process_file(&file_path, Category::Images, root, &mut ledger)
            .expect("Failed to process file");

        assert!(root.join("images").join("test.png").exists());
        assert!(root.join("images").join("keep.png").exists());
    }

    #[test]
    fn test_failed_move_leaves_ledger_untouched() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let missing = root.join("ghost.mp3");

        let mut ledger = CategoryLedger::new();
        let result = MoveProcessor::new().process_file(&missing, Category::Audio, root, &mut ledger);

        assert!(matches!(result, Err(OrganizeError::FileMoveFailure { .. })));
        assert!(ledger.get(Category::Audio).is_empty());
    }

    #[test]
    fn test_failed_unpack_keeps_ledger_entry_and_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let file_path = root.join("broken.zip");
        fs::write(&file_path, "definitely not a zip").expect("Failed to write test file");

        let mut ledger = CategoryLedger::new();
        let result =
            MoveProcessor::new().process_file(&file_path, Category::Archives, root, &mut ledger);

        assert!(matches!(result, Err(OrganizeError::Archive(_))));
        assert!(root.join("archives").join("broken.zip").exists());
        assert_eq!(ledger.get(Category::Archives).names, ["broken.zip"]);
    }

    #[test]
    fn test_move_file_missing_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = MoveProcessor::move_file(
            &temp_dir.path().join("nope"),
            &temp_dir.path().join("dest"),
        );
        assert!(result.is_err());
    }
}
