//! Host path normalization

use crate::StoreError;

/// Normalize a host path into a map key
///
/// - Converts `\` separators to `/`
/// - Removes `./` prefixes and trailing `/`
/// - Rejects empty paths, absolute paths and `..` components
///
/// Case is preserved; keys are case-sensitive.
pub fn normalize_key(raw: &str) -> Result<String, StoreError> {
    let invalid = |reason| StoreError::InvalidPath {
        path: raw.to_string(),
        reason,
    };

    let unified = raw.replace('\\', "/");

    if unified.starts_with('/') || has_drive_prefix(&unified) {
        return Err(invalid("absolute paths are not allowed"));
    }

    let mut parts = Vec::new();
    for component in unified.split('/') {
        match component {
            "" | "." => continue,
            ".." => return Err(invalid("parent components are not allowed")),
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return Err(invalid("path is empty"));
    }

    Ok(parts.join("/"))
}

/// `C:/...` style prefix
fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
