//! dirsort - sort a folder by file type
//!
//! This library classifies files by extension, renames them to a
//! transliterated filesystem-safe form, moves them into per-category
//! subdirectories, unpacks archives, prunes empty directories and writes
//! per-category manifests of what it saw.

pub mod archive;
pub mod cli;
pub mod file_category;
pub mod file_organizer;
pub mod ledger;
pub mod manifest;
pub mod name_normalizer;
pub mod output;
pub mod prune;
pub mod report;
pub mod sorter;

pub use archive::{ArchiveError, ArchiveUnpacker};
pub use file_category::{Category, FileMapper};
pub use file_organizer::{FileProcessor, MoveProcessor, OrganizeError, OrganizeResult};
pub use ledger::CategoryLedger;
pub use name_normalizer::normalize_name;
pub use report::SortReport;
pub use sorter::{FolderSorter, SortFilter};

pub use cli::{Cli, SortStatus, run_cli, sort_directory};
