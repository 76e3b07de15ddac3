/// File categorization by extension.
///
/// This module maps file extensions to the fixed set of sort categories
/// (e.g., "audio", "images", "docs"). Lookups are case-insensitive and only
/// consider the final suffix of a file name.
///
/// # Examples
///
/// ```
/// use dirsort::file_category::{Category, FileMapper};
///
/// let mapper = FileMapper::default();
/// assert_eq!(mapper.categorize(".mp3"), Category::Audio);
/// assert_eq!(mapper.categorize(".PNG"), Category::Images);
/// assert_eq!(mapper.categorize(".xyz"), Category::Other);
/// ```
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Represents a sort category.
///
/// Each category owns one subdirectory directly under the sorted root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Audio files (MP3, WAV, FLAC, WMA)
    Audio,
    /// Video files (MKV, AVI, MOV, MP4)
    Video,
    /// Image files (JPEG, PNG, JPG, SVG)
    Images,
    /// Archive files (ZIP, GZ, TAR)
    Archives,
    /// Document files (DOC, DOCX, TXT, PDF, XLSX, PPTX)
    Docs,
    /// Anything not matched by the extension table
    Other,
}

impl Category {
    /// Every category, in manifest order.
    pub const ALL: [Category; 6] = [
        Category::Audio,
        Category::Video,
        Category::Images,
        Category::Archives,
        Category::Docs,
        Category::Other,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "images");
    /// assert_eq!(Category::Audio.dir_name(), "audio");
    /// assert_eq!(Category::Other.dir_name(), "other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Audio => "audio",
            Category::Video => "video",
            Category::Images => "images",
            Category::Archives => "archives",
            Category::Docs => "docs",
            Category::Other => "other",
        }
    }

    /// Looks up a category by its directory name.
    pub fn from_dir_name(name: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.dir_name() == name)
    }

    /// File name of the manifest listing this category's file names.
    pub fn names_manifest(&self) -> String {
        format!("{}.txt", self.dir_name())
    }

    /// File name of the manifest listing this category's extensions.
    pub fn extensions_manifest(&self) -> String {
        format!("{}_ext.txt", self.dir_name())
    }
}

/// Returns the final suffix of a file name, including its leading dot.
///
/// Names without a suffix (including dotfiles such as `.bashrc`) yield an
/// empty string. Case is preserved.
///
/// ```
/// use dirsort::file_category::extension_of;
/// use std::path::Path;
///
/// assert_eq!(extension_of(Path::new("backup.tar.GZ")), ".GZ");
/// assert_eq!(extension_of(Path::new(".bashrc")), "");
/// ```
pub fn extension_of(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy()),
        _ => String::new(),
    }
}

/// Maps file extensions to categories.
///
/// Keys are lowercase extensions with their leading dot. The table can be
/// extended with [`FileMapper::add_extension_mapping`].
#[derive(Debug, Clone)]
pub struct FileMapper {
    extension_map: HashMap<String, Category>,
}

impl FileMapper {
    /// Creates a new `FileMapper` with the standard table.
    pub fn new() -> Self {
        let mut mapper = Self {
            extension_map: HashMap::new(),
        };
        mapper.populate_standard_mappings();
        mapper
    }

    fn populate_standard_mappings(&mut self) {
        for ext in [".mp3", ".wav", ".flac", ".wma"] {
            self.add_extension_mapping(ext, Category::Audio);
        }
        for ext in [".mkv", ".avi", ".mov", ".mp4"] {
            self.add_extension_mapping(ext, Category::Video);
        }
        for ext in [".jpeg", ".png", ".jpg", ".svg"] {
            self.add_extension_mapping(ext, Category::Images);
        }
        for ext in [".zip", ".gz", ".tar", ".tgz"] {
            self.add_extension_mapping(ext, Category::Archives);
        }
        for ext in [".doc", ".docx", ".txt", ".pdf", ".xlsx", ".pptx"] {
            self.add_extension_mapping(ext, Category::Docs);
        }
    }

    /// Adds an extension to category mapping.
    ///
    /// A missing leading dot is added, so `"ogg"` and `".ogg"` are equivalent.
    pub fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        let ext = ext.to_lowercase();
        let key = if ext.starts_with('.') {
            ext
        } else {
            format!(".{}", ext)
        };
        self.extension_map.insert(key, category);
    }

    /// Maps an extension (with leading dot, any case) to a category.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::file_category::{Category, FileMapper};
    ///
    /// let mapper = FileMapper::default();
    /// assert_eq!(mapper.categorize(".pdf"), Category::Docs);
    /// assert_eq!(mapper.categorize(""), Category::Other);
    /// ```
    pub fn categorize(&self, ext: &str) -> Category {
        self.extension_map
            .get(&ext.to_lowercase())
            .copied()
            .unwrap_or(Category::Other)
    }

    /// Categorizes a file by the final suffix of its name.
    pub fn categorize_path(&self, path: &Path) -> Category {
        self.categorize(&extension_of(path))
    }
}

impl Default for FileMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Audio.dir_name(), "audio");
        assert_eq!(Category::Video.dir_name(), "video");
        assert_eq!(Category::Images.dir_name(), "images");
        assert_eq!(Category::Archives.dir_name(), "archives");
        assert_eq!(Category::Docs.dir_name(), "docs");
        assert_eq!(Category::Other.dir_name(), "other");
    }

    #[test]
    fn test_from_dir_name_round_trips_every_category() {
        for category in Category::ALL {
            assert_eq!(Category::from_dir_name(category.dir_name()), Some(category));
        }
        assert_eq!(Category::from_dir_name("documents"), None);
    }

    #[test]
    fn test_manifest_names() {
        assert_eq!(Category::Docs.names_manifest(), "docs.txt");
        assert_eq!(Category::Docs.extensions_manifest(), "docs_ext.txt");
    }

    #[test]
    fn test_categorize_standard_table() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.categorize(".flac"), Category::Audio);
        assert_eq!(mapper.categorize(".mov"), Category::Video);
        assert_eq!(mapper.categorize(".svg"), Category::Images);
        assert_eq!(mapper.categorize(".tar"), Category::Archives);
        assert_eq!(mapper.categorize(".pptx"), Category::Docs);
    }

    #[test]
    fn test_categorize_case_insensitive() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.categorize(".MP3"), Category::Audio);
        assert_eq!(mapper.categorize(".mp3"), Category::Audio);
        assert_eq!(mapper.categorize(".Zip"), Category::Archives);
    }

    #[test]
    fn test_categorize_defaults_to_other() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.categorize(".xyz"), Category::Other);
        assert_eq!(mapper.categorize(""), Category::Other);
        // Exact match only; a dotless key never matches
        assert_eq!(mapper.categorize("mp3"), Category::Other);
    }

    #[test]
    fn test_categorize_path_uses_final_suffix() {
        let mapper = FileMapper::default();
        assert_eq!(
            mapper.categorize_path(Path::new("backup.tar.gz")),
            Category::Archives
        );
        assert_eq!(
            mapper.categorize_path(Path::new("notes.txt.bak")),
            Category::Other
        );
        assert_eq!(mapper.categorize_path(Path::new("README")), Category::Other);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("song.MP3")), ".MP3");
        assert_eq!(extension_of(Path::new("archive.tar.gz")), ".gz");
        assert_eq!(extension_of(Path::new("Makefile")), "");
        assert_eq!(extension_of(Path::new(".gitignore")), "");
    }

    #[test]
    fn test_custom_mapping() {
        let mut mapper = FileMapper::default();
        mapper.add_extension_mapping("OGG", Category::Audio);
        mapper.add_extension_mapping(".webm", Category::Video);

        assert_eq!(mapper.categorize(".ogg"), Category::Audio);
        assert_eq!(mapper.categorize(".WEBM"), Category::Video);
    }
}
