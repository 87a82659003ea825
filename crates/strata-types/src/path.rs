use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PathError;

/// Separator between segments of a request path.
pub const SEPARATOR: char = '/';

/// Segment that refers to the parent directory.
pub const PARENT_SEGMENT: &str = "..";

/// A request-relative path, split into segments.
///
/// Parsing treats every path as relative to the store's root: a leading
/// separator means "the root", not "the filesystem root". Empty segments
/// (`a//b`, trailing `/`) and current-directory segments (`.`) carry no
/// meaning and are dropped.
///
/// Parent segments (`..`) are *kept*. Whether `a/../b` stays inside a root
/// depends on what `a` is on the backing medium (a symlink, a directory, or
/// nothing), so only the store that owns the medium can decide.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestPath {
    segments: Vec<String>,
}

impl RequestPath {
    /// The empty path, naming the root itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a raw request path.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_types::RequestPath;
    ///
    /// let path = RequestPath::parse("/a/./b//index.html").unwrap();
    /// assert_eq!(path.to_key(), "a/b/index.html");
    /// assert!(RequestPath::parse("").unwrap().is_root());
    /// assert!(RequestPath::parse("a\0b").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let mut segments = Vec::new();
        for segment in raw.split(SEPARATOR) {
            if segment.is_empty() || segment == "." {
                continue;
            }
            validate_segment(segment)?;
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// Iterate over the segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if this path names the root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns `true` if any segment is a parent reference (`..`).
    pub fn has_parent_segment(&self) -> bool {
        self.segments().any(|s| s == PARENT_SEGMENT)
    }

    /// The final segment, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Return a new path with `name` appended as a single segment.
    ///
    /// `name` must be one plain segment: no separators, not `.` or `..`.
    pub fn child(&self, name: &str) -> Result<Self, PathError> {
        if name.is_empty() || name == "." || name == PARENT_SEGMENT || name.contains(SEPARATOR) {
            return Err(PathError::InvalidSegment {
                segment: name.to_string(),
                reason: "must be a single plain segment".into(),
            });
        }
        validate_segment(name)?;
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    /// The `/`-joined form without a leading separator (`""` for the root).
    ///
    /// This is the key format used by in-memory resource namespaces.
    pub fn to_key(&self) -> String {
        self.segments.join("/")
    }
}

fn validate_segment(segment: &str) -> Result<(), PathError> {
    if segment.contains('\0') {
        return Err(PathError::InvalidSegment {
            segment: segment.escape_default().to_string(),
            reason: "contains a NUL byte".into(),
        });
    }
    Ok(())
}

impl fmt::Debug for RequestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestPath({self})")
    }
}

impl fmt::Display for RequestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.to_key())
    }
}

impl FromStr for RequestPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RequestPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RequestPath> for String {
    fn from(path: RequestPath) -> Self {
        path.to_string()
    }
}
