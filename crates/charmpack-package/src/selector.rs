//! File selection for the archive.
//!
//! A [`FileSpec`] names the files that must be present and the extra entries
//! the user asked for. [`select`] resolves it against a project tree into the
//! set of project-relative paths to pack.
//!
//! Extra entries are either literal paths, which must exist, or glob
//! patterns, which may match nothing. Which one an entry is depends only on
//! its text (see [`classify`]); the filesystem is consulted afterwards.

use charmpack_core::{PackError, PackResult};
use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Project-relative, `/`-separated paths selected for packing.
pub type ResolvedFileSet = BTreeSet<String>;

/// Characters that make an entry a glob pattern.
const GLOB_METACHARACTERS: [char; 3] = ['*', '?', '['];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// How an extra entry is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// A plain path that must exist.
    Literal,
    /// A wildcard pattern; zero matches is fine.
    Glob,
}

/// Classify an entry by its text alone.
pub fn classify(pattern: &str) -> PatternKind {
    if pattern.contains(GLOB_METACHARACTERS) {
        PatternKind::Glob
    } else {
        PatternKind::Literal
    }
}

/// The files to select: mandatory paths plus extra literals and globs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSpec {
    mandatory: Vec<String>,
    extra: Vec<String>,
}

impl FileSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add paths that must exist in the project root.
    #[must_use]
    pub fn mandatory<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.mandatory
            .extend(files.into_iter().map(|f| f.as_ref().to_string()));
        self
    }

    /// Add extra entries, literal or glob, in declaration order.
    #[must_use]
    pub fn extra<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra
            .extend(patterns.into_iter().map(|p| p.as_ref().to_string()));
        self
    }
}

/// A validated extra entry.
enum Selection {
    Literal(String),
    Glob(Pattern),
}

/// Resolve `spec` against the tree rooted at `root`.
///
/// Fails on the first mandatory file or literal entry that does not exist.
/// Directories named by a literal, or matched by a glob ending in a bare `*`
/// or `**`, contribute every file beneath them.
pub fn select(root: &Path, spec: &FileSpec) -> PackResult<ResolvedFileSet> {
    let selections = spec
        .extra
        .iter()
        .map(|p| parse_selection(p))
        .collect::<PackResult<Vec<_>>>()?;

    let mut resolved = ResolvedFileSet::new();

    for entry in &spec.mandatory {
        let relative = normalize(entry)?;
        let path = root.join(&relative);
        if !path.exists() {
            return Err(PackError::MissingMandatoryFile(path));
        }
        add_path(root, &relative, &mut resolved)?;
    }

    let mut tree: Option<Vec<TreeEntry>> = None;

    for selection in &selections {
        match selection {
            Selection::Literal(relative) => {
                let path = root.join(relative);
                if !path.exists() {
                    return Err(PackError::StagingFailure(path));
                }
                add_path(root, relative, &mut resolved)?;
            }
            Selection::Glob(pattern) => {
                let tree = tree.get_or_insert_with(|| scan_tree(root));
                let before = resolved.len();
                add_glob_matches(pattern, tree, &mut resolved);
                if resolved.len() == before {
                    debug!("Pattern '{}' matched no new files", pattern.as_str());
                }
            }
        }
    }

    debug!("Selected {} files from {}", resolved.len(), root.display());
    Ok(resolved)
}

fn parse_selection(raw: &str) -> PackResult<Selection> {
    let normalized = normalize(raw)?;
    match classify(&normalized) {
        PatternKind::Literal => Ok(Selection::Literal(normalized)),
        PatternKind::Glob => Pattern::new(&normalized)
            .map(Selection::Glob)
            .map_err(|e| invalid_pattern(raw, e.msg)),
    }
}

/// Turn a user entry into a clean `/`-separated relative path.
///
/// Empty and `.` segments are dropped. Absolute entries and `..` segments
/// are rejected since they could select files outside the project.
pub(crate) fn normalize(raw: &str) -> PackResult<String> {
    if raw.starts_with('/') {
        return Err(invalid_pattern(raw, "must be relative to the project"));
    }

    let mut segments = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(invalid_pattern(
                    raw,
                    "must not refer to a parent directory",
                ));
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(invalid_pattern(raw, "must name a file"));
    }
    Ok(segments.join("/"))
}

fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> PackError {
    PackError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.into(),
    }
}

/// Convert a path relative to some root into an archive-style key.
pub(crate) fn relative_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Add an existing file, or every file below an existing directory.
fn add_path(root: &Path, relative: &str, resolved: &mut ResolvedFileSet) -> PackResult<()> {
    let path = root.join(relative);
    if !path.is_dir() {
        resolved.insert(relative.to_string());
        return Ok(());
    }

    for entry in WalkDir::new(&path).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(rel_path) = entry.path().strip_prefix(root) {
            resolved.insert(relative_key(rel_path));
        }
    }
    Ok(())
}

/// A path found under the project root.
struct TreeEntry {
    key: String,
    is_dir: bool,
}

/// List every file and directory under `root`, following symlinks.
///
/// Unreadable entries are skipped: a dangling link elsewhere in the project
/// must not break a wildcard that never refers to it.
fn scan_tree(root: &Path) -> Vec<TreeEntry> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry while matching patterns: {e}");
                None
            }
        })
        .filter_map(|entry| {
            let key = relative_key(entry.path().strip_prefix(root).ok()?);
            Some(TreeEntry {
                key,
                is_dir: entry.file_type().is_dir(),
            })
        })
        .collect()
}

/// Whether directories matched by `pattern` bring along everything below them.
///
/// Only a bare `*` or `**` final segment does; any other final segment is a
/// filter on file names and must hold for every selected file.
fn expands_directories(pattern: &Pattern) -> bool {
    matches!(pattern.as_str().rsplit('/').next(), Some("*" | "**"))
}

fn add_glob_matches(pattern: &Pattern, tree: &[TreeEntry], resolved: &mut ResolvedFileSet) {
    let expand = expands_directories(pattern);
    let mut matched_dirs: Vec<String> = Vec::new();

    for entry in tree {
        if !pattern.matches_with(&entry.key, MATCH_OPTIONS) {
            continue;
        }
        if entry.is_dir {
            if expand {
                matched_dirs.push(format!("{}/", entry.key));
            }
        } else {
            resolved.insert(entry.key.clone());
        }
    }

    if matched_dirs.is_empty() {
        return;
    }
    for entry in tree.iter().filter(|e| !e.is_dir) {
        if matched_dirs.iter().any(|dir| entry.key.starts_with(dir)) {
            resolved.insert(entry.key.clone());
        }
    }
}

/// Copy the selected files from `root` into `destination`, keeping their
/// relative layout. Symlinks are copied as the content they point to.
pub fn stage(root: &Path, files: &ResolvedFileSet, destination: &Path) -> PackResult<Vec<PathBuf>> {
    let mut staged = Vec::with_capacity(files.len());
    for relative in files {
        let source = root.join(relative);
        let target = destination.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(&source, &target).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PackError::StagingFailure(source.clone())
            } else {
                PackError::Io(e)
            }
        })?;
        staged.push(target);
    }
    Ok(staged)
}
