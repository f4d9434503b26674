//! Bounded ancestor search for named files.
//!
//! Responsibilities:
//! - Derive the three candidate directories of an origin file.
//! - Resolve a target file name against them, detecting ambiguity.
//!
//! Does NOT handle:
//! - Recursive or wildcard search. Exactly three levels are inspected.
//! - Reading the resolved file (see `loader`).
//!
//! Invariants:
//! - Candidates are ordered nearest to the origin first.
//! - The target is a bare file name, so only direct children are ever inspected.
//! - With a `DirLevel`, only that directory is consulted and the file must exist there.
//! - Without a `DirLevel`, a file present at more than one level is an error.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::constants::SEARCH_DEPTH;
use crate::error::{Result, SecretsError};

/// Selects one of the three candidate directories directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirLevel {
    /// The directory containing the origin file.
    Own = 1,
    /// The parent of the origin's directory.
    Parent = 2,
    /// The grandparent of the origin's directory.
    Grandparent = 3,
}

impl DirLevel {
    pub const ALL: [DirLevel; SEARCH_DEPTH] =
        [DirLevel::Own, DirLevel::Parent, DirLevel::Grandparent];

    /// Zero-based index into the candidate directory list.
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for DirLevel {
    type Error = SecretsError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(DirLevel::Own),
            2 => Ok(DirLevel::Parent),
            3 => Ok(DirLevel::Grandparent),
            other => Err(SecretsError::InvalidArgument(format!(
                "dir level must be 1, 2 or 3 (got {other})"
            ))),
        }
    }
}

impl fmt::Display for DirLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Returns the directory of `source`, its parent and its grandparent.
///
/// Once the filesystem root (or the start of a relative path) is reached the
/// remaining levels repeat the last directory.
pub fn candidate_dirs(source: &Path) -> [PathBuf; SEARCH_DEPTH] {
    let own = parent_or_self(source);
    let parent = parent_or_self(&own);
    let grandparent = parent_or_self(&parent);
    [own, parent, grandparent]
}

fn parent_or_self(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) => parent.to_path_buf(),
        None => path.to_path_buf(),
    }
}

/// Resolves `target` relative to the directory tree around `source`.
///
/// # Errors
///
/// - `InvalidArgument` if `source` or `target` is empty, or `target` is not a bare
///   file name (it has a directory part, `..`, or is absolute).
/// - `NotFound` if the file is not a direct child of the selected directory
///   (or of any candidate when no level is given).
/// - `AmbiguousFile` if no level is given and the file exists at more than one level.
pub fn locate(
    target: &str,
    source: impl AsRef<Path>,
    dir_level: Option<DirLevel>,
) -> Result<PathBuf> {
    let source = source.as_ref();
    if source.as_os_str().is_empty() || source.to_string_lossy().trim().is_empty() {
        return Err(SecretsError::InvalidArgument(
            "Source file name is not specified".to_string(),
        ));
    }
    if target.trim().is_empty() {
        return Err(SecretsError::InvalidArgument(
            "Target file name is not specified".to_string(),
        ));
    }
    ensure_bare_file_name(target)?;

    let dirs = candidate_dirs(source);

    if let Some(level) = dir_level {
        let candidate = dirs[level.index()].join(target);
        if candidate.exists() {
            tracing::debug!(file = target, level = %level, path = %candidate.display(), "Located file");
            return Ok(candidate);
        }
        return Err(SecretsError::NotFound(format!(
            "File {target} (dir level {level}, {})",
            dirs[level.index()].display()
        )));
    }

    let mut hits: Vec<PathBuf> = Vec::with_capacity(SEARCH_DEPTH);
    for dir in &dirs {
        let candidate = dir.join(target);
        if candidate.exists() && !hits.contains(&candidate) {
            hits.push(candidate);
        }
    }

    match hits.len() {
        0 => Err(SecretsError::NotFound(format!("File {target}"))),
        1 => {
            let path = hits.remove(0);
            tracing::debug!(file = target, path = %path.display(), "Located file");
            Ok(path)
        }
        _ => Err(SecretsError::AmbiguousFile {
            file: target.to_string(),
            candidates: hits,
        }),
    }
}

fn ensure_bare_file_name(target: &str) -> Result<()> {
    let mut components = Path::new(target).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(SecretsError::InvalidArgument(format!(
            "Target must be a file name without directories (got {target})"
        ))),
    }
}
