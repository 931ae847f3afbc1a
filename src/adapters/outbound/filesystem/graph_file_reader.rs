use crate::ports::outbound::GraphReader;
use crate::shared::error::ConanMcpError;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use std::path::Path;

/// FileSystemGraphReader adapter for reading graph documents from disk
///
/// Symbolic links, non-regular files and oversized files are rejected.
#[derive(Debug, Default)]
pub struct FileSystemGraphReader;

impl FileSystemGraphReader {
    pub fn new() -> Self {
        Self
    }
}

impl GraphReader for FileSystemGraphReader {
    fn read_graph(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(ConanMcpError::GraphFileReadError {
                path: path.to_path_buf(),
                details: "File does not exist".to_string(),
            }
            .into());
        }

        read_regular_file(path, "graph file").map_err(|e| {
            ConanMcpError::GraphFileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }
}
