//! Per-run record of the file names and extensions seen in each category.

use crate::file_category::Category;
use serde::Serialize;

/// Names and extensions recorded for one category, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRecord {
    pub category: Category,
    pub names: Vec<String>,
    pub extensions: Vec<String>,
}

impl CategoryRecord {
    fn new(category: Category) -> Self {
        Self {
            category,
            names: Vec::new(),
            extensions: Vec::new(),
        }
    }

    /// Returns true if nothing has been recorded for this category.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.extensions.is_empty()
    }
}

/// The ledger of one sort run.
///
/// Holds one [`CategoryRecord`] per category. Inserts are idempotent, so a
/// name or extension appears at most once per category no matter how many
/// files share it.
///
/// ```
/// use dirsort::file_category::Category;
/// use dirsort::ledger::CategoryLedger;
///
/// let mut ledger = CategoryLedger::new();
/// ledger.record(Category::Audio, "a.mp3", ".mp3");
/// ledger.record(Category::Audio, "b.mp3", ".mp3");
///
/// let audio = ledger.get(Category::Audio);
/// assert_eq!(audio.names, ["a.mp3", "b.mp3"]);
/// assert_eq!(audio.extensions, [".mp3"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryLedger {
    records: Vec<CategoryRecord>,
}

impl CategoryLedger {
    /// Creates an empty ledger with a record for every category.
    pub fn new() -> Self {
        Self {
            records: Category::ALL.into_iter().map(CategoryRecord::new).collect(),
        }
    }

    fn index(category: Category) -> usize {
        Category::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or(Category::ALL.len() - 1)
    }

    /// Records a file's final name and extension under `category`.
    pub fn record(&mut self, category: Category, name: &str, extension: &str) {
        let record = &mut self.records[Self::index(category)];
        if !record.names.iter().any(|n| n == name) {
            record.names.push(name.to_string());
        }
        if !record.extensions.iter().any(|e| e == extension) {
            record.extensions.push(extension.to_string());
        }
    }

    /// Returns the record for `category`.
    pub fn get(&self, category: Category) -> &CategoryRecord {
        &self.records[Self::index(category)]
    }

    /// Iterates over every category's record in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryRecord> {
        self.records.iter()
    }

    /// Total number of distinct names across all categories.
    pub fn total_names(&self) -> usize {
        self.records.iter().map(|r| r.names.len()).sum()
    }
}

impl Default for CategoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = CategoryLedger::new();
        assert_eq!(ledger.iter().count(), Category::ALL.len());
        assert!(ledger.iter().all(CategoryRecord::is_empty));
        assert_eq!(ledger.total_names(), 0);
    }

    #[test]
    fn test_record_is_idempotent() {
        let mut ledger = CategoryLedger::new();
        ledger.record(Category::Docs, "a.txt", ".txt");
        ledger.record(Category::Docs, "a.txt", ".txt");

        let docs = ledger.get(Category::Docs);
        assert_eq!(docs.names, ["a.txt"]);
        assert_eq!(docs.extensions, [".txt"]);
    }

    #[test]
    fn test_record_preserves_first_occurrence_order() {
        let mut ledger = CategoryLedger::new();
        ledger.record(Category::Docs, "b.pdf", ".pdf");
        ledger.record(Category::Docs, "a.txt", ".txt");
        ledger.record(Category::Docs, "c.pdf", ".pdf");

        let docs = ledger.get(Category::Docs);
        assert_eq!(docs.names, ["b.pdf", "a.txt", "c.pdf"]);
        assert_eq!(docs.extensions, [".pdf", ".txt"]);
    }

    #[test]
    fn test_categories_are_independent() {
        let mut ledger = CategoryLedger::new();
        ledger.record(Category::Audio, "x.mp3", ".mp3");
        ledger.record(Category::Other, "x.mp3", ".mp3");

        assert_eq!(ledger.get(Category::Audio).names.len(), 1);
        assert_eq!(ledger.get(Category::Other).names.len(), 1);
        assert!(ledger.get(Category::Video).is_empty());
        assert_eq!(ledger.total_names(), 2);
    }

    #[test]
    fn test_serializes_as_list_of_records() {
        let mut ledger = CategoryLedger::new();
        ledger.record(Category::Images, "pic.png", ".png");

        let json = serde_json::to_value(&ledger).expect("serialize ledger");
        let images = &json[2];
        assert_eq!(images["category"], "images");
        assert_eq!(images["names"][0], "pic.png");
        assert_eq!(images["extensions"][0], ".png");
    }
}
