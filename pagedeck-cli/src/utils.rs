//! Input path collection.

use std::path::PathBuf;

use pagedeck::error::{PagedeckError, Result};

/// Expand glob patterns into filesystem paths, preserving pattern order.
///
/// Plain paths pass through unchanged (a path with no glob metacharacters
/// matches itself). A pattern that matches nothing contributes nothing;
/// the caller decides whether an overall empty result is an error.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();

        let paths = glob::glob(pattern).map_err(|err| PagedeckError::Other {
            message: format!("invalid pattern '{pattern}': {err}"),
        })?;

        for entry in paths {
            let path = entry.map_err(|err| PagedeckError::Other {
                message: err.to_string(),
            })?;
            resolved.push(path);
        }
    }

    Ok(resolved)
}
