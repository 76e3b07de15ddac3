//! Command-line interface module for dirsort.
//!
//! This module handles:
//! - Argument parsing
//! - Reading and validating the root path
//! - Orchestrating sort, prune and manifest writing
//! - Progress and summary output

use crate::file_organizer::{MoveProcessor, OrganizeResult};
use crate::manifest::write_manifests;
use crate::output::OutputFormatter;
use crate::prune::prune_empty_dirs;
use crate::report::{Failure, SortReport};
use crate::sorter::{FolderSorter, SortEvent, SortFilter};
use clap::Parser;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Prompt shown when no path is given on the command line.
pub const PROMPT: &str = "Enter path to folder you want to sort: ";

/// Sort a folder into audio, video, images, archives, docs and other.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "dirsort", version, about)]
pub struct Cli {
    /// Folder to sort (prompted for when omitted)
    pub path: Option<PathBuf>,

    /// Skip files whose name or relative path matches this glob (repeatable)
    #[arg(short, long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Record failing files and continue instead of aborting
    #[arg(long)]
    pub keep_going: bool,

    /// Print a JSON report instead of the summary table
    #[arg(long)]
    pub json: bool,

    /// Print only the final status
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,
}

/// Final status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStatus {
    NoPathEntered,
    PathDoesNotExist,
    FolderSorted,
}

impl fmt::Display for SortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            SortStatus::NoPathEntered => "No path entered",
            SortStatus::PathDoesNotExist => "Path does not exist",
            SortStatus::FolderSorted => "Folder sorted",
        };
        f.write_str(message)
    }
}

/// Options for one sort run.
#[derive(Debug, Clone, Default)]
pub struct SortOptions {
    pub exclude: Vec<String>,
    pub keep_going: bool,
    /// Suppress progress and the summary table.
    pub quiet: bool,
}

impl From<&Cli> for SortOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            exclude: cli.exclude.clone(),
            keep_going: cli.keep_going,
            quiet: cli.quiet || cli.json,
        }
    }
}

/// Reads the root path from one line of `input`, printing the prompt to `prompt_out`.
///
/// Returns `None` if reading fails, the input is exhausted, or the line is blank.
pub fn read_root_path<R: BufRead, W: Write>(input: &mut R, prompt_out: &mut W) -> Option<PathBuf> {
    let _ = write!(prompt_out, "{}", PROMPT);
    let _ = prompt_out.flush();

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(PathBuf::from(trimmed))
            }
        }
    }
}

/// Sorts `root`, prunes empty folders and writes manifests.
///
/// Aborts on the first error unless `options.keep_going` is set, in which
/// case failing files are listed in the report.
///
/// # Arguments
///
/// * `root` - The folder to sort in place
/// * `options` - Exclude patterns, keep-going and quiet settings
///
/// # Returns
///
/// Returns the `SortReport` for the run, or the first `OrganizeError` hit
/// when not keeping going.
///
/// # Examples
///
/// ```no_run
/// use dirsort::cli::{SortOptions, sort_directory};
/// use std::path::Path;
///
/// let report = sort_directory(Path::new("/home/user/Downloads"), &SortOptions::default())?;
/// println!("{} files moved", report.files_moved);
/// # Ok::<(), dirsort::OrganizeError>(())
/// ```
pub fn sort_directory(root: &Path, options: &SortOptions) -> OrganizeResult<SortReport> {
    let mut report = SortReport::begin(root.to_path_buf());
    let filter = SortFilter::new(&options.exclude)?;
    let sorter = FolderSorter::new(MoveProcessor::new())
        .with_filter(filter)
        .keep_going(options.keep_going);

    if !options.quiet {
        OutputFormatter::info(&format!("Sorting contents of: {}", root.display()));
    }

    let mut progress = None;
    let summary = sorter.sort_folder_with(root, &mut report.ledger, |event| {
        if options.quiet {
            return;
        }
        match event {
            SortEvent::Discovered(total) => {
                progress = Some(OutputFormatter::create_progress_bar(total as u64));
            }
            SortEvent::Processed(file) => {
                if let Some(pb) = &progress {
                    pb.set_message(format!("{}/", file.category.dir_name()));
                    pb.inc(1);
                }
            }
            // Failures are reported once, after the run
            SortEvent::Failed(..) => {
                if let Some(pb) = &progress {
                    pb.inc(1);
                }
            }
        }
    });
    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }
    let summary = summary?;

    report.files_moved = summary.processed.len();
    report.archives_unpacked = summary.archives_unpacked();
    report.failures = summary
        .failures
        .into_iter()
        .map(|(path, reason)| Failure { path, reason })
        .collect();

    report.folders_pruned = prune_empty_dirs(root)?.len();
    report.manifests_written = write_manifests(&report.ledger, root)?.len();
    report.finish();

    Ok(report)
}

/// Runs the whole program against `input` for the interactive prompt.
///
/// Returns the final status together with the report when a sort ran.
pub fn sort_main<R: BufRead>(
    cli: &Cli,
    input: &mut R,
) -> OrganizeResult<(SortStatus, Option<SortReport>)> {
    let given = cli
        .path
        .as_ref()
        .filter(|path| !path.to_string_lossy().trim().is_empty());
    let root = match given {
        Some(path) => path.clone(),
        None if cli.path.is_some() => return Ok((SortStatus::NoPathEntered, None)),
        None => match read_root_path(input, &mut std::io::stdout()) {
            Some(path) => path,
            None => return Ok((SortStatus::NoPathEntered, None)),
        },
    };

    if !root.exists() {
        return Ok((SortStatus::PathDoesNotExist, None));
    }

    let report = sort_directory(&root, &SortOptions::from(cli))?;
    Ok((SortStatus::FolderSorted, Some(report)))
}

/// Runs the CLI and returns the process exit code.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use dirsort::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["dirsort", "/path/to/downloads"]);
/// std::process::exit(run_cli(&cli));
/// ```
pub fn run_cli(cli: &Cli) -> i32 {
    let stdin = std::io::stdin();
    let result = sort_main(cli, &mut stdin.lock());

    match result {
        Ok((status, Some(report))) => {
            if cli.json {
                match report.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => OutputFormatter::error(&format!("Could not serialize report: {}", e)),
                }
            } else if !cli.quiet {
                OutputFormatter::summary_table(&report.ledger);
                if report.archives_unpacked > 0 {
                    OutputFormatter::plain(&format!(
                        "Archives unpacked: {}",
                        report.archives_unpacked
                    ));
                }
                if report.folders_pruned > 0 {
                    OutputFormatter::plain(&format!(
                        "Empty folders removed: {}",
                        report.folders_pruned
                    ));
                }
            }

            if report.is_complete_success() {
                if !cli.json {
                    OutputFormatter::success(&status.to_string());
                }
                0
            } else {
                for failure in &report.failures {
                    OutputFormatter::error(&format!(
                        "{}: {}",
                        failure.path.display(),
                        failure.reason
                    ));
                }
                if !cli.json {
                    OutputFormatter::warning(&format!(
                        "{} ({} files could not be sorted)",
                        status,
                        report.failures.len()
                    ));
                }
                2
            }
        }
        Ok((status, None)) => {
            OutputFormatter::plain(&status.to_string());
            0
        }
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_status_messages() {
        assert_eq!(SortStatus::NoPathEntered.to_string(), "No path entered");
        assert_eq!(SortStatus::PathDoesNotExist.to_string(), "Path does not exist");
        assert_eq!(SortStatus::FolderSorted.to_string(), "Folder sorted");
    }

    #[test]
    fn test_read_root_path_prints_prompt() {
        let mut input = Cursor::new("/tmp/some folder\n");
        let mut prompt = Vec::new();

        let path = read_root_path(&mut input, &mut prompt);

        assert_eq!(path, Some(PathBuf::from("/tmp/some folder")));
        assert_eq!(String::from_utf8(prompt).expect("utf8"), PROMPT);
    }

    #[test]
    fn test_read_root_path_blank_or_eof() {
        assert_eq!(read_root_path(&mut Cursor::new(""), &mut Vec::new()), None);
        assert_eq!(read_root_path(&mut Cursor::new("   \n"), &mut Vec::new()), None);
    }

    #[test]
    fn test_sort_main_no_path_entered() {
        let cli = Cli::default();
        let (status, report) = sort_main(&cli, &mut Cursor::new("")).expect("sort_main");
        assert_eq!(status, SortStatus::NoPathEntered);
        assert!(report.is_none());
    }

    #[test]
    fn test_sort_main_nonexistent_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("missing");
        let cli = Cli {
            path: Some(missing.clone()),
            ..Default::default()
        };

        let (status, _) = sort_main(&cli, &mut Cursor::new("")).expect("sort_main");

        assert_eq!(status, SortStatus::PathDoesNotExist);
        assert!(!missing.exists());
        assert_eq!(fs::read_dir(temp_dir.path()).expect("read").count(), 0);
    }

    #[test]
    fn test_sort_main_reads_path_from_input() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("pic.png"), "x").expect("write");
        let cli = Cli {
            quiet: true,
            ..Default::default()
        };
        let mut input = Cursor::new(format!("{}\n", temp_dir.path().display()));

        let (status, report) = sort_main(&cli, &mut input).expect("sort_main");

        assert_eq!(status, SortStatus::FolderSorted);
        assert_eq!(report.expect("report").files_moved, 1);
        assert!(temp_dir.path().join("images").join("pic.png").exists());
    }

    #[test]
    fn test_sort_main_blank_argument_is_no_path() {
        for blank in ["", "   "] {
            let cli = Cli {
                path: Some(PathBuf::from(blank)),
                ..Default::default()
            };
            let (status, report) = sort_main(&cli, &mut Cursor::new("")).expect("sort_main");
            assert_eq!(status, SortStatus::NoPathEntered);
            assert!(report.is_none());
        }
    }

    #[test]
    fn test_sort_directory_keep_going_with_progress() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("broken.zip"), "not a zip").expect("write");
        fs::write(temp_dir.path().join("pic.png"), "x").expect("write");
        let options = SortOptions {
            keep_going: true,
            ..Default::default()
        };

        let report = sort_directory(temp_dir.path(), &options).expect("sort_directory");

        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("broken.zip"));
        assert_eq!(report.files_moved, 1);
        assert!(!report.is_complete_success());
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "dirsort",
            "/data",
            "--exclude",
            "*.part",
            "-e",
            "keep/**",
            "--keep-going",
            "--json",
        ]);
        assert_eq!(cli.path, Some(PathBuf::from("/data")));
        assert_eq!(cli.exclude, ["*.part", "keep/**"]);
        assert!(cli.keep_going);
        assert!(cli.json);

        let options = SortOptions::from(&cli);
        assert!(options.quiet, "json output implies quiet progress");
    }

    #[test]
    fn test_cli_quiet_conflicts_with_json() {
        let result = Cli::try_parse_from(["dirsort", "/data", "--json", "--quiet"]);
        assert!(result.is_err());
    }
}
