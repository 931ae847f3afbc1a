use crate::shared::Result;
use std::path::Path;

/// GraphReader port for loading a saved dependency graph document
///
/// This port abstracts where the `conan graph info --format=json` output
/// of the offline audit comes from.
pub trait GraphReader {
    /// Reads the raw graph document
    ///
    /// # Errors
    /// Returns an error if the document does not exist or cannot be read
    fn read_graph(&self, path: &Path) -> Result<String>;
}
