//! Path parsing for the virtual tree
//!
//! Paths are absolute, `/`-separated, case-sensitive. A trailing slash is
//! tolerated (directories are often written that way); consecutive slashes
//! are not.

use super::FsError;

/// Split an absolute path into its segments. The root path `/` yields no
/// segments.
pub fn segments(path: &str) -> Result<Vec<&str>, FsError> {
    if !path.starts_with('/') {
        return Err(FsError::InvalidPath(format!(
            "path must be absolute: {path}"
        )));
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for segment in trimmed[1..].split('/') {
        validate_name(segment)?;
        out.push(segment);
    }
    Ok(out)
}

/// Check that `name` is usable as an entry name.
pub fn validate_name(name: &str) -> Result<(), FsError> {
    if name.is_empty() {
        return Err(FsError::InvalidPath(
            "empty path segment (consecutive '/'?)".to_string(),
        ));
    }
    if name.contains('/') {
        return Err(FsError::InvalidPath(format!(
            "entry name may not contain '/': {name}"
        )));
    }
    if name == "." || name == ".." {
        return Err(FsError::InvalidPath(format!(
            "relative path segments are not supported: {name}"
        )));
    }
    Ok(())
}

/// Render segments back into an absolute path, for error context.
pub fn join(segments: &[&str]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}
