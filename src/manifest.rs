//! Per-category manifest files.
//!
//! Each category folder receives `<category>.txt`, listing the names of the
//! files sorted into it, and `<category>_ext.txt`, listing their extensions.
//! Entries are newline-separated in first-seen order.

use crate::file_organizer::{OrganizeError, OrganizeResult};
use crate::ledger::CategoryLedger;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the ledger's manifests under `root`.
///
/// Existing manifests are overwritten. Categories whose folder does not
/// exist are skipped.
///
/// # Arguments
///
/// * `ledger` - The names and extensions recorded during the run
/// * `root` - The sorted folder holding the category folders
///
/// # Returns
///
/// Returns the paths of the files written, or `ManifestWriteFailed` for the
/// first file that could not be written.
///
/// # Examples
///
/// ```no_run
/// use dirsort::CategoryLedger;
/// use dirsort::manifest::write_manifests;
/// use std::path::Path;
///
/// let ledger = CategoryLedger::new();
/// let written = write_manifests(&ledger, Path::new("/home/user/Downloads"))?;
/// assert!(written.is_empty());
/// # Ok::<(), dirsort::OrganizeError>(())
/// ```
pub fn write_manifests(ledger: &CategoryLedger, root: &Path) -> OrganizeResult<Vec<PathBuf>> {
    let mut written = Vec::new();

    for record in ledger.iter() {
        let category_dir = root.join(record.category.dir_name());
        if !category_dir.is_dir() {
            continue;
        }

        let outputs = [
            (record.category.names_manifest(), &record.names),
            (record.category.extensions_manifest(), &record.extensions),
        ];
        for (file_name, lines) in outputs {
            let path = category_dir.join(file_name);
            fs::write(&path, lines.join("\n")).map_err(|e| OrganizeError::ManifestWriteFailed {
                path: path.clone(),
                source: e,
            })?;
            written.push(path);
        }
    }

    Ok(written)
}
