//! Deterministic zip creation from a directory tree.
//!
//! [`build_zip`] packs every file under a source root. Symlinks are packed
//! under their own path with the content of whatever they point to, even
//! when the target lies outside the root. Directories themselves get no
//! entries.
//!
//! Output depends only on the set of paths and their content: entries are
//! sorted, and timestamps, permissions and compression are fixed.

use crate::selector::relative_key;
use charmpack_core::{PackError, PackResult};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Deflate level used for every entry.
const COMPRESSION_LEVEL: i64 = 6;

/// Permissions recorded for every entry.
const ENTRY_PERMISSIONS: u32 = 0o644;

/// A file to write into the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// `/`-separated path within the archive.
    pub relative_path: String,
    /// Where to read the content from; may be a symlink.
    pub source: PathBuf,
}

/// List the entries for `source_root`, sorted by archive path.
pub fn collect_entries(source_root: &Path) -> PackResult<Vec<ArchiveEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(source_root).follow_links(true) {
        let entry = entry?;
        // With links followed, a symlink to a file reports as a file.
        if !entry.file_type().is_file() {
            continue;
        }
        debug_assert!(entry.path().starts_with(source_root));
        let Ok(rel_path) = entry.path().strip_prefix(source_root) else {
            continue;
        };
        entries.push(ArchiveEntry {
            relative_path: relative_key(rel_path),
            source: entry.into_path(),
        });
    }

    entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(entries)
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL))
        .last_modified_time(DateTime::default())
        .unix_permissions(ENTRY_PERMISSIONS)
}

/// Path of the archive `<name>.<extension>` inside `dir`.
///
/// The name must be a single plain path component, so the archive always
/// lands directly in `dir`.
pub fn archive_path(dir: &Path, name: &str, extension: &str) -> PackResult<PathBuf> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    if !plain {
        return Err(PackError::InvalidArchiveName(name.to_string()));
    }
    Ok(dir.join(format!("{name}.{extension}")))
}

/// Pack everything under `source_root` into a zip at `destination`.
///
/// The archive is written next to `destination` under a temporary name and
/// only renamed into place once complete, so a failure never leaves a
/// partial file behind.
pub fn build_zip(destination: &Path, source_root: &Path) -> PackResult<PathBuf> {
    let entries = collect_entries(source_root)?;

    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let staging = NamedTempFile::new_in(parent)?;

    let mut zip = ZipWriter::new(staging);
    let options = entry_options();
    for entry in &entries {
        zip.start_file(entry.relative_path.as_str(), options)?;
        let mut source = File::open(&entry.source)?;
        io::copy(&mut source, &mut zip)?;
    }
    let staging = zip.finish()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staging
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(ENTRY_PERMISSIONS))?;
    }

    staging.persist(destination).map_err(|e| e.error)?;

    debug!(
        "Wrote {} entries from {} to {}",
        entries.len(),
        source_root.display(),
        destination.display()
    );
    Ok(destination.to_path_buf())
}
