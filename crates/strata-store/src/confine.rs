//! Confinement of request paths to a filesystem root.
//!
//! A request is joined onto the root segment by segment, canonicalized, and
//! only then compared with the root. Comparing the canonical form means `..`
//! segments and symlinks are judged by where they actually lead, not by how
//! the request was spelled.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use strata_types::RequestPath;
use tracing::{debug, trace};

/// Why a request could not be resolved to a file.
#[derive(Debug)]
pub(crate) enum ResolveError {
    /// The canonical path lies outside the root.
    OutsideRoot,
    /// Nothing readable exists at the path.
    Missing,
    /// The filesystem refused access.
    Io(io::Error),
}

/// Resolve `request` to a regular file inside `root`.
///
/// `root` must already be canonical. A directory is served by the file named
/// `default_file` inside it, which is confined again in its own right.
pub(crate) fn resolve(
    root: &Path,
    default_file: &str,
    request: &RequestPath,
) -> Result<PathBuf, ResolveError> {
    let mut joined = root.to_path_buf();
    for segment in request.segments() {
        if !is_relative_component(segment) {
            trace!(segment, "segment is not a plain path component");
            return Err(ResolveError::Missing);
        }
        joined.push(segment);
    }

    let target = confine(root, &joined)?;
    let metadata = fs::metadata(&target).map_err(lookup_error)?;
    if metadata.is_file() {
        return Ok(target);
    }
    if !metadata.is_dir() {
        return Err(ResolveError::Missing);
    }

    // Single fallback level: the default document must be a file itself.
    debug!(dir = %target.display(), default_file, "directory requested; trying default document");
    let index = confine(root, &target.join(default_file))?;
    let metadata = fs::metadata(&index).map_err(lookup_error)?;
    if metadata.is_file() {
        Ok(index)
    } else {
        Err(ResolveError::Missing)
    }
}

/// Canonicalize `path` and require it to be `root` or below it.
fn confine(root: &Path, path: &Path) -> Result<PathBuf, ResolveError> {
    let canonical = path
        .canonicalize()
        .map_err(|err| unresolved(root, path, err))?;
    // Component-wise: `/srv/site2` does not start with `/srv/site`.
    if canonical.starts_with(root) {
        Ok(canonical)
    } else {
        Err(ResolveError::OutsideRoot)
    }
}

/// A single segment must be a plain name or `..` on this platform.
///
/// Drive prefixes and embedded separators would let `PathBuf::push`
/// replace the root instead of extending it.
fn is_relative_component(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_) | Component::ParentDir), None)
    )
}

/// Classify a path that could not be canonicalized.
///
/// An access failure is only reported as such when the nearest ancestor
/// that does resolve lies inside `root`. Anywhere else the request is
/// outside the root, and must fail the same way a missing file does.
fn unresolved(root: &Path, path: &Path, err: io::Error) -> ResolveError {
    match lookup_error(err) {
        ResolveError::Io(err) => {
            let inside = path
                .ancestors()
                .skip(1)
                .find_map(|ancestor| ancestor.canonicalize().ok())
                .is_some_and(|ancestor| ancestor.starts_with(root));
            if inside {
                ResolveError::Io(err)
            } else {
                ResolveError::OutsideRoot
            }
        }
        other => other,
    }
}

/// Permission failures are reported as such. Every other lookup failure
/// (absent entry, a file used as a directory, symlink loops) means the path
/// names nothing.
fn lookup_error(err: io::Error) -> ResolveError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => ResolveError::Io(err),
        _ => ResolveError::Missing,
    }
}
