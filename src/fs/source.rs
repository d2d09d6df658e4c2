use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::entry::DirEntry;

/// Filesystem access used by the navigation engine.
///
/// `read_dir` blocks and must only be called from a worker context.
pub trait FileSystem: Send + Sync {
    /// Enumerate and stat the entries of `path` (without a `..` entry).
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    fn home_dir(&self) -> Option<PathBuf>;

    fn dir_exists(&self, path: &Path) -> bool;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    /// Entries that vanish or cannot be stat'ed mid-listing are skipped.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            match DirEntry::from_path(&entry.path()) {
                Ok(e) => entries.push(e),
                Err(_) => continue,
            }
        }
        Ok(entries)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
