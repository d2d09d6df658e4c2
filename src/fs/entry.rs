use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::Result;

/// Name of the synthetic parent-directory entry.
pub const PARENT_NAME: &str = "..";

/// Symlink details for an entry that is a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkInfo {
    pub target: PathBuf,
    /// The link target does not exist.
    pub broken: bool,
}

/// A single directory entry as seen by a pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    /// True for directories and for symlinks whose target is a directory.
    pub is_dir: bool,
    pub symlink: Option<SymlinkInfo>,
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
}

impl DirEntry {
    /// Stat `path` without following a final symlink, then resolve the link
    /// target separately so broken links still produce an entry.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = fs::symlink_metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        let (is_dir, symlink) = if metadata.file_type().is_symlink() {
            let target = fs::read_link(path).unwrap_or_default();
            match fs::metadata(path) {
                Ok(resolved) => (
                    resolved.is_dir(),
                    Some(SymlinkInfo {
                        target,
                        broken: false,
                    }),
                ),
                Err(_) => (
                    false,
                    Some(SymlinkInfo {
                        target,
                        broken: true,
                    }),
                ),
            }
        } else {
            (metadata.is_dir(), None)
        };

        let (mode, uid, gid) = ownership(&metadata);

        Ok(Self {
            name,
            is_dir,
            symlink,
            size: metadata.len(),
            modified: metadata.modified().ok(),
            mode,
            uid,
            gid,
        })
    }

    /// The synthetic `..` entry.
    pub fn parent() -> Self {
        Self {
            name: PARENT_NAME.to_string(),
            is_dir: true,
            symlink: None,
            size: 0,
            modified: None,
            mode: 0,
            uid: 0,
            gid: 0,
        }
    }

    pub fn is_parent(&self) -> bool {
        self.name == PARENT_NAME
    }

    pub fn is_hidden(&self) -> bool {
        !self.is_parent() && self.name.starts_with('.')
    }

    pub fn is_symlink(&self) -> bool {
        self.symlink.is_some()
    }

    pub fn is_broken_link(&self) -> bool {
        self.symlink.as_ref().is_some_and(|s| s.broken)
    }
}

#[cfg(unix)]
fn ownership(metadata: &fs::Metadata) -> (u32, u32, u32) {
    use std::os::unix::fs::MetadataExt;
    (metadata.mode(), metadata.uid(), metadata.gid())
}

#[cfg(not(unix))]
fn ownership(_metadata: &fs::Metadata) -> (u32, u32, u32) {
    (0, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn entry_from_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        let entry = DirEntry::from_path(&dir.path().join("notes.txt")).unwrap();
        assert_eq!(entry.name, "notes.txt");
        assert!(!entry.is_dir);
        assert!(!entry.is_symlink());
        assert_eq!(entry.size, 5);
        assert!(entry.modified.is_some());
    }

    #[test]
    fn entry_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let entry = DirEntry::from_path(&dir.path().join("sub")).unwrap();
        assert!(entry.is_dir);
    }

    #[test]
    fn hidden_detection_skips_parent() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join(".secret")).unwrap();
        let entry = DirEntry::from_path(&dir.path().join(".secret")).unwrap();
        assert!(entry.is_hidden());
        assert!(!DirEntry::parent().is_hidden());
        assert!(DirEntry::parent().is_parent());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_directory_counts_as_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();
        let entry = DirEntry::from_path(&dir.path().join("link")).unwrap();
        assert!(entry.is_dir);
        assert!(entry.is_symlink());
        assert!(!entry.is_broken_link());
    }

    #[cfg(unix)]
    #[test]
    fn broken_symlink_is_flagged() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling"))
            .unwrap();
        let entry = DirEntry::from_path(&dir.path().join("dangling")).unwrap();
        assert!(!entry.is_dir);
        assert!(entry.is_broken_link());
        assert_eq!(
            entry.symlink.as_ref().map(|s| s.target.clone()),
            Some(dir.path().join("missing"))
        );
    }
}
