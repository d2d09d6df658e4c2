use std::path::{Path, PathBuf};

/// Maximum number of paths kept per pane.
pub const MAX_HISTORY: usize = 100;

/// Browser-style back/forward history of visited directories.
///
/// Stepping back or forward only moves the pointer; the path list changes
/// solely through [`NavigationHistory::push`].
#[derive(Debug, Clone, Default)]
pub struct NavigationHistory {
    paths: Vec<PathBuf>,
    /// `None` while empty.
    current: Option<usize>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly entered directory.
    ///
    /// Anything after the current position is discarded first. Re-adding the
    /// current path is a no-op.
    pub fn push(&mut self, path: &Path) {
        if self.current_path() == Some(path) {
            return;
        }
        if let Some(idx) = self.current {
            self.paths.truncate(idx + 1);
        }
        self.paths.push(path.to_path_buf());
        if self.paths.len() > MAX_HISTORY {
            self.paths.remove(0);
        }
        self.current = Some(self.paths.len() - 1);
    }

    pub fn back(&mut self) -> Option<PathBuf> {
        let idx = self.current.filter(|&i| i > 0)?;
        self.current = Some(idx - 1);
        Some(self.paths[idx - 1].clone())
    }

    pub fn forward(&mut self) -> Option<PathBuf> {
        let idx = self.current.filter(|&i| i + 1 < self.paths.len())?;
        self.current = Some(idx + 1);
        Some(self.paths[idx + 1].clone())
    }

    pub fn can_go_back(&self) -> bool {
        self.current.is_some_and(|i| i > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.current.is_some_and(|i| i + 1 < self.paths.len())
    }

    /// Move the pointer by `steps` without touching the path list, clamped to
    /// the valid range. Used to undo pointer moves of failed history steps.
    pub fn shift(&mut self, steps: isize) {
        if let Some(idx) = self.current {
            let last = self.paths.len() as isize - 1;
            self.current = Some((idx as isize + steps).clamp(0, last) as usize);
        }
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current.map(|i| self.paths[i].as_path())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    #[allow(dead_code)]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
