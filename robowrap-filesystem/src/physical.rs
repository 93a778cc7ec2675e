use std::fs;

use camino::Utf8Path;

use super::Filesystem;

/// Access to a real file system
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFilesystem;

impl DiskFilesystem {
    /// Constructs access to the real file system
    pub fn new() -> Self {
        DiskFilesystem
    }
}

impl Filesystem for DiskFilesystem {
    fn exists(&self, path: impl AsRef<Utf8Path>) -> bool {
        fs::metadata(path.as_ref()).is_ok()
    }

    fn is_directory(&self, path: impl AsRef<Utf8Path>) -> bool {
        fs::metadata(path.as_ref())
            .map(|m| m.file_type().is_dir())
            .unwrap_or(false)
    }

    fn is_file(&self, path: impl AsRef<Utf8Path>) -> bool {
        fs::metadata(path.as_ref())
            .map(|m| m.file_type().is_file())
            .unwrap_or(false)
    }
}
