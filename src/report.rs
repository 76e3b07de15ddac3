//! Machine-readable summary of a sort run.

use crate::ledger::CategoryLedger;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// A file that could not be sorted, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything a sort run did, serializable to JSON.
#[derive(Debug, Clone, Serialize)]
pub struct SortReport {
    pub root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub files_moved: usize,
    pub archives_unpacked: usize,
    pub folders_pruned: usize,
    pub manifests_written: usize,
    pub failures: Vec<Failure>,
    pub ledger: CategoryLedger,
}

impl SortReport {
    /// Starts a report for `root` stamped with the current time.
    pub fn begin(root: PathBuf) -> Self {
        let now = Utc::now();
        Self {
            root,
            started_at: now,
            finished_at: now,
            files_moved: 0,
            archives_unpacked: 0,
            folders_pruned: 0,
            manifests_written: 0,
            failures: Vec::new(),
            ledger: CategoryLedger::new(),
        }
    }

    /// Stamps the finish time.
    pub fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    /// Returns true if no file failed.
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::Category;

    #[test]
    fn test_report_json_shape() {
        let mut report = SortReport::begin(PathBuf::from("/tmp/downloads"));
        report.files_moved = 1;
        report.ledger.record(Category::Audio, "song.mp3", ".mp3");
        report.finish();

        let json: serde_json::Value =
            serde_json::from_str(&report.to_json().expect("to json")).expect("parse");

        assert_eq!(json["root"], "/tmp/downloads");
        assert_eq!(json["files_moved"], 1);
        assert_eq!(json["ledger"][0]["category"], "audio");
        assert_eq!(json["ledger"][0]["names"][0], "song.mp3");
        assert!(json["started_at"].is_string());
        assert!(report.finished_at >= report.started_at);
        assert!(report.is_complete_success());
    }
}
