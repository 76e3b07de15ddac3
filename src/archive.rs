//! Archive extraction for files sorted into the `archives` category.
//!
//! The archive format is detected from the file's magic bytes (via `infer`),
//! falling back to the file extension when the content is not recognized.
//! Supported formats are zip, tar, gzip-compressed tar and plain gzip.

use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Number of leading bytes read for format detection.
const SNIFF_LEN: u64 = 8192;

/// Errors that can occur while unpacking an archive.
#[derive(Debug)]
pub enum ArchiveError {
    /// The archive could not be opened or read, or the target folder could not be written.
    Io { path: PathBuf, source: io::Error },
    /// The zip container is malformed.
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },
    /// The archive contents are damaged (truncated stream, bad tar header, ...).
    Corrupt { path: PathBuf, reason: String },
    /// Neither the content nor the extension identify a supported format.
    UnsupportedFormat { path: PathBuf },
}

impl std::fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "I/O error on archive {}: {}", path.display(), source)
            }
            Self::Zip { path, source } => {
                write!(f, "Invalid zip archive {}: {}", path.display(), source)
            }
            Self::Corrupt { path, reason } => {
                write!(f, "Corrupt archive {}: {}", path.display(), reason)
            }
            Self::UnsupportedFormat { path } => {
                write!(f, "Unsupported archive format: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Zip { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Archive container formats the unpacker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
    /// A single gzip-compressed file.
    Gz,
}

/// Returns the folder name an archive is unpacked into: its file name with
/// the final suffix removed.
///
/// Only the exact suffix is stripped, so `data.zip` becomes `data` and
/// `backup.tar.gz` becomes `backup.tar`.
///
/// ```
/// use dirsort::archive::extraction_dir_name;
/// use std::path::Path;
///
/// assert_eq!(extraction_dir_name(Path::new("pizza.zip")), "pizza");
/// assert_eq!(extraction_dir_name(Path::new("backup.tar.gz")), "backup.tar");
/// ```
pub fn extraction_dir_name(archive: &Path) -> String {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = crate::file_category::extension_of(archive);
    match name.strip_suffix(suffix.as_str()) {
        Some(stem) if !suffix.is_empty() && !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}

/// Unpacks archives next to themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveUnpacker;

impl ArchiveUnpacker {
    pub fn new() -> Self {
        Self
    }

    /// Extracts `archive` into `directory/<archive name minus suffix>`.
    ///
    /// The target folder is created if needed. The archive itself is left in
    /// place whether or not extraction succeeds. Entries whose names would
    /// land outside the target folder are not written.
    ///
    /// # Arguments
    ///
    /// * `archive` - The archive file to extract
    /// * `directory` - The folder the extraction folder is created in
    ///
    /// # Returns
    ///
    /// Returns the extraction folder, or an `ArchiveError` if the format is not
    /// recognized or the contents cannot be read or written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::archive::ArchiveUnpacker;
    /// use std::path::Path;
    ///
    /// let dir = Path::new("/home/user/Downloads/archives");
    /// let target = ArchiveUnpacker::new().unpack(&dir.join("photos.zip"), dir)?;
    /// assert_eq!(target, dir.join("photos"));
    /// # Ok::<(), dirsort::archive::ArchiveError>(())
    /// ```
    pub fn unpack(&self, archive: &Path, directory: &Path) -> ArchiveResult<PathBuf> {
        let format = Self::detect_format(archive)?;
        let target = directory.join(extraction_dir_name(archive));

        fs::create_dir_all(&target).map_err(|e| ArchiveError::Io {
            path: target.clone(),
            source: e,
        })?;

        match format {
            ArchiveFormat::Zip => Self::unpack_zip(archive, &target)?,
            ArchiveFormat::Tar => {
                let file = Self::open(archive)?;
                Self::unpack_tar(archive, BufReader::new(file), &target)?;
            }
            ArchiveFormat::TarGz => {
                let file = Self::open(archive)?;
                Self::unpack_tar(archive, GzDecoder::new(BufReader::new(file)), &target)?;
            }
            ArchiveFormat::Gz => Self::unpack_gz(archive, &target)?,
        }

        Ok(target)
    }

    /// Determines the container format of `archive`.
    ///
    /// Content wins over the extension; the extension is only consulted
    /// when the leading bytes match no known signature.
    pub fn detect_format(archive: &Path) -> ArchiveResult<ArchiveFormat> {
        let mut head = Vec::new();
        Self::open(archive)?
            .take(SNIFF_LEN)
            .read_to_end(&mut head)
            .map_err(|e| ArchiveError::Io {
                path: archive.to_path_buf(),
                source: e,
            })?;

        if infer::archive::is_zip(&head) {
            return Ok(ArchiveFormat::Zip);
        }
        if infer::archive::is_gz(&head) {
            return if Self::gz_wraps_tar(archive)? {
                Ok(ArchiveFormat::TarGz)
            } else {
                Ok(ArchiveFormat::Gz)
            };
        }
        if infer::archive::is_tar(&head) {
            return Ok(ArchiveFormat::Tar);
        }

        // Unrecognized content: empty or headerless files
        let ext = crate::file_category::extension_of(archive).to_lowercase();
        match ext.as_str() {
            ".tar" if head.is_empty() => Err(ArchiveError::Corrupt {
                path: archive.to_path_buf(),
                reason: "empty file".to_string(),
            }),
            ".tar" => Ok(ArchiveFormat::Tar),
            ".zip" | ".gz" | ".tgz" => Err(ArchiveError::Corrupt {
                path: archive.to_path_buf(),
                reason: "missing archive signature".to_string(),
            }),
            _ => Err(ArchiveError::UnsupportedFormat {
                path: archive.to_path_buf(),
            }),
        }
    }

    fn open(archive: &Path) -> ArchiveResult<File> {
        File::open(archive).map_err(|e| ArchiveError::Io {
            path: archive.to_path_buf(),
            source: e,
        })
    }

    /// Peeks into a gzip stream to see whether it holds a tar archive.
    fn gz_wraps_tar(archive: &Path) -> ArchiveResult<bool> {
        let mut decoder = GzDecoder::new(BufReader::new(Self::open(archive)?));
        let mut head = Vec::new();
        (&mut decoder)
            .take(512)
            .read_to_end(&mut head)
            .map_err(|e| ArchiveError::Corrupt {
                path: archive.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(infer::archive::is_tar(&head))
    }

    fn unpack_zip(archive: &Path, target: &Path) -> ArchiveResult<()> {
        let file = Self::open(archive)?;
        let mut zip = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| ArchiveError::Zip {
            path: archive.to_path_buf(),
            source: e,
        })?;

        for index in 0..zip.len() {
            let mut entry = zip.by_index(index).map_err(|e| ArchiveError::Zip {
                path: archive.to_path_buf(),
                source: e,
            })?;
            // Entries whose names would escape `target` are skipped
            let Some(relative) = entry.enclosed_name() else {
                continue;
            };
            let output_path = target.join(relative);
            let io_error = |e: io::Error| ArchiveError::Io {
                path: output_path.clone(),
                source: e,
            };

            if entry.is_dir() {
                fs::create_dir_all(&output_path).map_err(io_error)?;
                continue;
            }
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent).map_err(io_error)?;
            }
            let mut output = File::create(&output_path).map_err(io_error)?;
            io::copy(&mut entry, &mut output).map_err(|e| ArchiveError::Corrupt {
                path: archive.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Entries with `..` components are skipped by `tar` itself.
    fn unpack_tar<R: Read>(archive: &Path, reader: R, target: &Path) -> ArchiveResult<()> {
        let mut tar = tar::Archive::new(reader);
        tar.unpack(target).map_err(|e| ArchiveError::Corrupt {
            path: archive.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Decompresses a single gzip stream into `target/<archive name minus .gz>`.
    fn unpack_gz(archive: &Path, target: &Path) -> ArchiveResult<()> {
        let output_path = target.join(extraction_dir_name(archive));
        let mut decoder = GzDecoder::new(BufReader::new(Self::open(archive)?));
        let mut output = File::create(&output_path).map_err(|e| ArchiveError::Io {
            path: output_path.clone(),
            source: e,
        })?;

        if let Err(e) = io::copy(&mut decoder, &mut output) {
            drop(output);
            let _ = fs::remove_file(&output_path);
            return Err(ArchiveError::Corrupt {
                path: archive.to_path_buf(),
                reason: e.to_string(),
            });
        }
        Ok(())
    }
}
