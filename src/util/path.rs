//! Path text representation
//!
//! A path is its segment names joined by `/`. One trailing `/` is
//! ignored. Segments are otherwise taken verbatim.

use crate::HopTreeError;

/// Segment separator
pub const SEPARATOR: char = '/';

/// Split path text into segment names.
///
/// Fails with [`HopTreeError::EmptyPath`] when nothing remains after
/// dropping the trailing separator.
pub fn parse_path(text: &str) -> Result<Vec<String>, HopTreeError> {
    let trimmed = text.strip_suffix(SEPARATOR).unwrap_or(text);
    if trimmed.is_empty() {
        return Err(HopTreeError::EmptyPath);
    }
    Ok(trimmed.split(SEPARATOR).map(str::to_string).collect())
}

/// Join segment names back into path text
pub fn stringify_path<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}

/// A requested path, either as text or as already-split names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRequest {
    /// `/`-joined text
    Text(String),
    /// Pre-split segment names
    Names(Vec<String>),
}

impl PathRequest {
    /// Resolve to segment names; an empty result is an error
    pub fn into_names(self) -> Result<Vec<String>, HopTreeError> {
        match self {
            PathRequest::Text(text) => parse_path(&text),
            PathRequest::Names(names) if names.is_empty() => Err(HopTreeError::EmptyPath),
            PathRequest::Names(names) => Ok(names),
        }
    }
}

impl From<&str> for PathRequest {
    fn from(text: &str) -> Self {
        PathRequest::Text(text.to_string())
    }
}

impl From<String> for PathRequest {
    fn from(text: String) -> Self {
        PathRequest::Text(text)
    }
}

impl From<Vec<String>> for PathRequest {
    fn from(names: Vec<String>) -> Self {
        PathRequest::Names(names)
    }
}

impl From<&[&str]> for PathRequest {
    fn from(names: &[&str]) -> Self {
        PathRequest::Names(names.iter().map(|s| s.to_string()).collect())
    }
}
