use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum file size for security (100 MB)
/// Lockfiles of very large monorepos stay well below this.
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Reads a regular file as UTF-8 after symlink, type and size checks
///
/// # Arguments
/// * `path` - The file to read
/// * `file_description` - Description used in error messages (e.g. "package-lock.json")
///
/// # Errors
/// Returns an error if the path is a symlink, not a regular file, larger than
/// [`MAX_FILE_SIZE`], or cannot be read
pub fn read_regular_file(path: &Path, file_description: &str) -> Result<String> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {} metadata: {}", file_description, e))?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    validate_file_size(metadata.len(), path, MAX_FILE_SIZE)?;

    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file_description, e))
}

/// Validates file size is within acceptable limits
///
/// # Errors
/// Returns an error if the file size exceeds the maximum
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}

/// Validates a package name before it is placed in a request URL
///
/// Scoped names (`@scope/name`) are allowed exactly one `/` after the scope;
/// the caller URL-encodes it.
///
/// # Errors
/// Returns an error for path traversal, backslashes, or URL-unsafe characters
pub fn validate_url_component(component: &str, component_type: &str) -> Result<()> {
    if component.is_empty() {
        anyhow::bail!("Security: {} must not be empty", component_type);
    }

    if component.contains("..") || component.contains('\\') {
        anyhow::bail!(
            "Security: {} contains path traversal characters which are not allowed",
            component_type
        );
    }

    let slash_count = component.matches('/').count();
    if slash_count > 1 || (slash_count == 1 && !component.starts_with('@')) {
        anyhow::bail!(
            "Security: {} contains path separators which are not allowed",
            component_type
        );
    }

    if component.contains('#') || component.contains('?') || component.contains(' ') {
        anyhow::bail!(
            "Security: {} contains URL-unsafe characters",
            component_type
        );
    }

    Ok(())
}
