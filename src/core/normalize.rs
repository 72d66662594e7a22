use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::outcome::FailureKind;
use crate::platform::traits::PathNormalizer;

/// Canonical separator
pub const SEPARATOR: char = '/';

/// Alternate separator rewritten to [`SEPARATOR`]
pub const ALT_SEPARATOR: char = '\\';

/// Characters that may not appear in a file or directory name
pub const DEFAULT_EXCLUDED_TOKENS: &[&str] = &["*", "?", "\"", "<", ">", "|"];

const DRIVE_MARKER: char = ':';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("path is invalid: no usable segments")]
    Invalid,
}

impl PathError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PathError::Empty => FailureKind::EmptyPath,
            PathError::Invalid => FailureKind::InvalidPath,
        }
    }
}

/// A path that uses `/` as its only separator, has no empty segments and
/// ends with a single trailing `/`.
///
/// Values are only produced by the functions in this module, and normalizing
/// one again returns it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_absolute(&self) -> bool {
        self.0.starts_with(SEPARATOR)
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|segment| !segment.is_empty())
    }

    /// Last segment
    pub fn file_name(&self) -> &str {
        self.segments().last().unwrap_or_default()
    }

    /// Path with the last segment stripped.
    /// `None` when nothing but the bare root (or nothing at all) would remain.
    pub fn parent(&self) -> Option<NormalizedPath> {
        let trimmed = self.0.trim_end_matches(SEPARATOR);
        match trimmed.rfind(SEPARATOR) {
            Some(0) | None => None,
            Some(index) => Some(NormalizedPath(format!("{}{}", &trimmed[..index], SEPARATOR))),
        }
    }

    /// Form handed to the host filesystem: no trailing separator, since POSIX
    /// rejects `file.txt/` for a regular file.
    pub fn host_path(&self) -> PathBuf {
        PathBuf::from(self.0.trim_end_matches(SEPARATOR))
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Rewrite `\` to `/` and collapse repeated separators.
pub fn normalize_separators(path: &str) -> Result<NormalizedPath, PathError> {
    if is_blank(path) {
        return Err(PathError::Empty);
    }

    let unified = path.replace(ALT_SEPARATOR, &SEPARATOR.to_string());
    collapse_separators(&unified, SEPARATOR)
}

/// Split on `separator`, drop blank segments and rejoin each survivor followed
/// by exactly one `/`. A leading separator (absolute path) is kept.
pub fn collapse_separators(path: &str, separator: char) -> Result<NormalizedPath, PathError> {
    if is_blank(path) {
        return Err(PathError::Empty);
    }

    let mut collapsed = String::with_capacity(path.len() + 1);
    if path.starts_with(separator) {
        collapsed.push(SEPARATOR);
    }

    let mut kept = 0usize;
    for segment in path.split(separator).filter(|segment| !is_blank(segment)) {
        collapsed.push_str(segment);
        collapsed.push(SEPARATOR);
        kept += 1;
    }

    if kept == 0 {
        return Err(PathError::Invalid);
    }

    Ok(NormalizedPath(collapsed))
}

/// Full normalization pipeline:
/// 1. strip `\`-escaped excluded tokens, then any bare excluded token left over
/// 2. [`normalize_separators`]
/// 3. tidy each segment: a `:` only survives as a drive marker (`C:`) in the
///    first segment, dots may not precede a separator, and segments left blank
///    are dropped
///
/// The pipeline is repeated until its output stops changing, so removing a
/// token (or a colon) can never leave a new excluded token behind.
pub fn normalize_path<S: AsRef<str>>(
    path: &str,
    excluded: &[S],
) -> Result<NormalizedPath, PathError> {
    if is_blank(path) {
        return Err(PathError::Empty);
    }

    let tokens: Vec<&str> = excluded
        .iter()
        .map(|token| token.as_ref())
        // Separators are structural, never excluded
        .filter(|token| !token.is_empty() && !token.contains([SEPARATOR, ALT_SEPARATOR]))
        .collect();

    let mut current = normalize_once(path, &tokens)?;
    loop {
        // Every pass that changes a normalized path makes it strictly shorter
        let next = normalize_once(current.as_str(), &tokens)?;
        if next == current {
            return Ok(current);
        }
        current = next;
    }
}

fn normalize_once(path: &str, tokens: &[&str]) -> Result<NormalizedPath, PathError> {
    let absolute = path.starts_with([SEPARATOR, ALT_SEPARATOR]);

    let mut cleaned = path.to_string();
    for token in tokens {
        cleaned = cleaned.replace(&format!("{}{}", ALT_SEPARATOR, token), "");
    }
    for token in tokens {
        cleaned = cleaned.replace(token, "");
    }

    // A removed leading token must not turn a relative path into an absolute one
    if !absolute {
        cleaned = cleaned.trim_start_matches([SEPARATOR, ALT_SEPARATOR]).to_string();
    }

    if is_blank(&cleaned) {
        return Err(PathError::Invalid);
    }

    let separated = normalize_separators(&cleaned)?;
    tidy_segments(&separated)
}

fn tidy_segments(path: &NormalizedPath) -> Result<NormalizedPath, PathError> {
    let mut tidied = String::with_capacity(path.as_str().len());
    if path.is_absolute() {
        tidied.push(SEPARATOR);
    }

    let mut kept = 0usize;
    for (index, segment) in path.segments().enumerate() {
        let segment = if index == 0 && is_drive_marker(segment) {
            segment.to_string()
        } else {
            segment.replace(DRIVE_MARKER, "")
        };
        let segment = segment.trim_end_matches('.');
        if is_blank(segment) {
            continue;
        }
        tidied.push_str(segment);
        tidied.push(SEPARATOR);
        kept += 1;
    }

    if kept == 0 {
        return Err(PathError::Invalid);
    }

    Ok(NormalizedPath(tidied))
}

fn is_drive_marker(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some(DRIVE_MARKER), None) if letter.is_ascii_alphabetic()
    )
}

/// [`PathNormalizer`] running [`normalize_path`] with a fixed excluded-token list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorNormalizer {
    excluded: Vec<String>,
}

impl SeparatorNormalizer {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }
}

impl Default for SeparatorNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_TOKENS.iter().copied())
    }
}

impl PathNormalizer for SeparatorNormalizer {
    fn normalize(&self, path: &str) -> Result<NormalizedPath, PathError> {
        normalize_path(path, self.excluded.as_slice())
    }
}
