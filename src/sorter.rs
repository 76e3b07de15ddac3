//! Recursive folder traversal and dispatch.
//!
//! The sorter takes a snapshot of every regular file under the root before
//! touching anything, then classifies each entry and hands it to a
//! [`FileProcessor`]. Files created while sorting (unpacked archive
//! contents, for instance) are not visited in the same run.

use crate::file_category::{Category, FileMapper};
use crate::file_organizer::{FileProcessor, OrganizeError, OrganizeResult, ProcessedFile};
use crate::ledger::CategoryLedger;
use glob::Pattern;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Progress notifications emitted while sorting.
#[derive(Debug)]
pub enum SortEvent<'a> {
    /// The snapshot is complete and holds this many files.
    Discovered(usize),
    /// A file was sorted.
    Processed(&'a ProcessedFile),
    /// A file could not be sorted (only emitted when continuing on errors).
    Failed(&'a Path, &'a OrganizeError),
}

/// Outcome of a traversal.
#[derive(Debug, Default)]
pub struct SortSummary {
    pub processed: Vec<ProcessedFile>,
    pub failures: Vec<(PathBuf, String)>,
}

impl SortSummary {
    /// Number of archives that were unpacked.
    pub fn archives_unpacked(&self) -> usize {
        self.processed
            .iter()
            .filter(|p| p.unpacked_to.is_some())
            .count()
    }
}

/// Glob patterns for files the sorter should leave alone.
///
/// A file is excluded when a pattern matches its file name or its path
/// relative to the root.
#[derive(Debug, Clone, Default)]
pub struct SortFilter {
    exclude: Vec<Pattern>,
}

impl SortFilter {
    /// Compiles the given exclude patterns.
    pub fn new<I, S>(patterns: I) -> OrganizeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exclude = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p).map_err(|e| OrganizeError::InvalidPattern {
                    pattern: p.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { exclude })
    }

    /// Returns true if the file at `relative_path` should be sorted.
    pub fn should_include(&self, relative_path: &Path) -> bool {
        let file_name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        !self
            .exclude
            .iter()
            .any(|p| p.matches(&file_name) || p.matches_path(relative_path))
    }
}

/// Walks a root folder and dispatches every file to a [`FileProcessor`].
pub struct FolderSorter<P: FileProcessor> {
    processor: P,
    mapper: FileMapper,
    filter: SortFilter,
    keep_going: bool,
}

impl<P: FileProcessor> FolderSorter<P> {
    /// Creates a sorter using the standard extension table and no excludes.
    pub fn new(processor: P) -> Self {
        Self {
            processor,
            mapper: FileMapper::default(),
            filter: SortFilter::default(),
            keep_going: false,
        }
    }

    /// Replaces the extension table.
    pub fn with_mapper(mut self, mapper: FileMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Sets the exclude filter.
    pub fn with_filter(mut self, filter: SortFilter) -> Self {
        self.filter = filter;
        self
    }

    /// When true, a failing file is recorded and skipped instead of
    /// aborting the run.
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Sorts every file under `root`, recording results in `ledger`.
    ///
    /// Files are snapshotted before anything moves, so files created during
    /// the run (moved files, unpacked contents) are not visited again.
    ///
    /// # Arguments
    ///
    /// * `root` - The folder to sort; category folders are created directly below it
    /// * `ledger` - Receives the normalized names and extensions of sorted files
    ///
    /// # Returns
    ///
    /// Returns a `SortSummary` of processed and (with `keep_going`) failed
    /// files, or an `OrganizeError` if `root` is not a directory or a file fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::{CategoryLedger, FolderSorter, MoveProcessor};
    /// use std::path::Path;
    ///
    /// let mut ledger = CategoryLedger::new();
    /// let summary = FolderSorter::new(MoveProcessor::new())
    ///     .sort_folder(Path::new("/home/user/Downloads"), &mut ledger)?;
    /// println!("Sorted {} files", summary.processed.len());
    /// # Ok::<(), dirsort::OrganizeError>(())
    /// ```
    pub fn sort_folder(
        &self,
        root: &Path,
        ledger: &mut CategoryLedger,
    ) -> OrganizeResult<SortSummary> {
        self.sort_folder_with(root, ledger, |_| {})
    }

    /// Like [`FolderSorter::sort_folder`], reporting progress to `on_event`.
    pub fn sort_folder_with<F>(
        &self,
        root: &Path,
        ledger: &mut CategoryLedger,
        mut on_event: F,
    ) -> OrganizeResult<SortSummary>
    where
        F: FnMut(SortEvent<'_>),
    {
        if !root.is_dir() {
            return Err(OrganizeError::InvalidBasePath {
                path: root.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "not an existing directory"),
            });
        }

        let files = self.collect_files(root)?;
        on_event(SortEvent::Discovered(files.len()));

        let mut summary = SortSummary::default();
        for file in files {
            // Gone since the snapshot was taken
            if file.symlink_metadata().is_err() {
                continue;
            }

            let category = self.mapper.categorize_path(&file);
            match self.processor.process_file(&file, category, root, ledger) {
                Ok(processed) => {
                    on_event(SortEvent::Processed(&processed));
                    summary.processed.push(processed);
                }
                Err(e) if self.keep_going => {
                    on_event(SortEvent::Failed(&file, &e));
                    summary.failures.push((file, e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    /// Snapshots every regular file under `root` that should be sorted.
    ///
    /// Symlinks and special files are skipped, as are the manifest files a
    /// previous run left in the category folders.
    pub fn collect_files(&self, root: &Path) -> OrganizeResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).min_depth(1).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                OrganizeError::ReadDirFailed {
                    path,
                    source: e
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("filesystem loop detected")),
                }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if is_manifest(relative) || !self.filter.should_include(relative) {
                continue;
            }
            files.push(entry.into_path());
        }
        Ok(files)
    }
}

/// Returns true for `<cat>/<cat>.txt` and `<cat>/<cat>_ext.txt`.
fn is_manifest(relative: &Path) -> bool {
    let mut components = relative.components();
    let (Some(dir), Some(file), None) = (components.next(), components.next(), components.next())
    else {
        return false;
    };
    let Some(category) = Category::from_dir_name(&dir.as_os_str().to_string_lossy()) else {
        return false;
    };
    let file = file.as_os_str().to_string_lossy();
    file == category.names_manifest() || file == category.extensions_manifest()
}
