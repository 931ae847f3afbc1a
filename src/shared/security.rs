use crate::shared::error::ConanMcpError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of a graph or config file read from disk (64 MB).
/// `conan graph info` output for very large projects stays well below this.
pub const MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Validates that a path is not a symbolic link
///
/// # Security
/// Uses `symlink_metadata()` so the link itself is inspected, not its target.
///
/// # Errors
/// Returns an error if the path is a symbolic link or if metadata cannot be read
pub fn validate_not_symlink(path: &Path, operation: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read metadata for {} operation on {}: {}",
            operation,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        return Err(ConanMcpError::SecurityError {
            path: path.to_path_buf(),
            reason: format!("{} operations on symbolic links are not allowed", operation),
            hint: "Pass the path of the real file instead of a link to it".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Validates file size is within acceptable limits
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        return Err(ConanMcpError::SecurityError {
            path: path.to_path_buf(),
            reason: format!(
                "file is too large ({} bytes, maximum {} bytes)",
                file_size, max_size
            ),
            hint: "Check that the correct file was passed".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Reads a regular, non-symlinked file of bounded size into a string.
///
/// # Arguments
/// * `path` - File to read
/// * `file_description` - Used in error messages (e.g. "graph file")
pub fn read_regular_file(path: &Path, file_description: &str) -> Result<String> {
    validate_not_symlink(path, "read")?;

    let metadata = fs::metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {} metadata: {}", file_description, e))?;

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    validate_file_size(metadata.len(), path, MAX_FILE_SIZE)?;

    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file_description, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_validate_not_symlink_regular_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("graph.json");
        fs::write(&file_path, "{}").unwrap();

        assert!(validate_not_symlink(&file_path, "read").is_ok());
    }

    #[test]
    fn test_validate_not_symlink_nonexistent() {
        let path = PathBuf::from("/nonexistent/graph.json");
        assert!(validate_not_symlink(&path, "read").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_not_symlink_rejects_link() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("graph.json");
        fs::write(&target, "{}").unwrap();
        let link = temp_dir.path().join("link.json");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = validate_not_symlink(&link, "read").unwrap_err();
        assert!(err.to_string().contains("Security violation"));
    }

    #[test]
    fn test_validate_file_size_exceeds_limit() {
        let path = PathBuf::from("/test/graph.json");
        let result = validate_file_size(MAX_FILE_SIZE + 1, &path, MAX_FILE_SIZE);
        assert!(result.unwrap_err().to_string().contains("too large"));
    }

    #[test]
    fn test_read_regular_file_success() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("graph.json");
        fs::write(&file_path, "{\"graph\": {}}").unwrap();

        let content = read_regular_file(&file_path, "graph file").unwrap();
        assert_eq!(content, "{\"graph\": {}}");
    }

    #[test]
    fn test_read_regular_file_is_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_regular_file(temp_dir.path(), "graph file");
        assert!(result.unwrap_err().to_string().contains("not a regular file"));
    }
}
