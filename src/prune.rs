//! Removal of directories left empty after sorting.

use crate::file_organizer::{OrganizeError, OrganizeResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Removes every empty directory below `root`, deepest first.
///
/// Passes repeat until one removes nothing, so a parent that only held
/// empty directories goes too. `root` itself is never removed, and
/// symlinked directories are neither followed nor removed. Returns the
/// removed directories in removal order.
pub fn prune_empty_dirs(root: &Path) -> OrganizeResult<Vec<PathBuf>> {
    let mut removed = Vec::new();
    loop {
        let pass = prune_pass(root)?;
        if pass.is_empty() {
            return Ok(removed);
        }
        removed.extend(pass);
    }
}

fn prune_pass(root: &Path) -> OrganizeResult<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
    {
        let entry = entry.map_err(|e| OrganizeError::ReadDirFailed {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop detected")),
        })?;

        if !entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let is_empty = fs::read_dir(path)
            .map_err(|e| OrganizeError::ReadDirFailed {
                path: path.to_path_buf(),
                source: e,
            })?
            .next()
            .is_none();

        if is_empty {
            fs::remove_dir(path).map_err(|e| OrganizeError::PruneFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
            removed.push(entry.into_path());
        }
    }
    Ok(removed)
}
