//! Schedules directory reads for panes and reconciles their completions.
//!
//! Every read runs to completion on the blocking pool and posts an
//! [`Event::DirLoaded`] tagged with the pane id and requested path. A pane
//! that has since moved on simply reports the completion as stale; there is
//! no other cancellation.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::error::{AppError, NavError, Result};
use crate::event::{DirLoad, Event};
use crate::fs::source::FileSystem;
use crate::nav::pane::{Completion, Pane, PaneOptions};
use crate::nav::request::{NavRequest, PaneId};

/// Owns the panes and routes navigation intents and completions to them.
pub struct Navigator {
    panes: Vec<Pane>,
    fs: Arc<dyn FileSystem>,
    tx: mpsc::UnboundedSender<Event>,
}

impl Navigator {
    pub fn new(fs: Arc<dyn FileSystem>, tx: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            panes: Vec::new(),
            fs,
            tx,
        }
    }

    /// Open a pane with a synchronous first load.
    ///
    /// A missing start directory falls back to its nearest existing ancestor,
    /// then home, then root.
    pub fn open_pane(&mut self, path: &Path, options: PaneOptions) -> Result<PaneId> {
        let id = PaneId(self.panes.len());
        let start = reachable_dir(self.fs.as_ref(), path)?;
        if start != path {
            info!(requested = %path.display(), using = %start.display(), "start directory unavailable");
        }
        let pane = Pane::open(id, &start, self.fs.as_ref(), options)?;
        self.panes.push(pane);
        Ok(id)
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.iter().find(|p| p.id() == id)
    }

    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.panes.iter_mut().find(|p| p.id() == id)
    }

    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    /// Hand `request` to the pane and schedule the read it implies.
    #[allow(dead_code)]
    pub fn begin_navigation(&mut self, id: PaneId, request: NavRequest) -> bool {
        self.dispatch(id, |pane| Some(pane.begin(request)))
    }

    pub fn enter(&mut self, id: PaneId) -> bool {
        self.dispatch(id, Pane::enter_selected)
    }

    pub fn go_parent(&mut self, id: PaneId) -> bool {
        self.dispatch(id, Pane::go_parent)
    }

    pub fn go_back(&mut self, id: PaneId) -> bool {
        self.dispatch(id, Pane::go_back)
    }

    pub fn go_forward(&mut self, id: PaneId) -> bool {
        self.dispatch(id, Pane::go_forward)
    }

    pub fn toggle_previous(&mut self, id: PaneId) -> bool {
        self.dispatch(id, Pane::toggle_previous)
    }

    pub fn go_home(&mut self, id: PaneId) -> std::result::Result<bool, NavError> {
        let home = self
            .fs
            .home_dir()
            .ok_or_else(|| NavError::not_found(Path::new("~")))?;
        self.go_to(id, &home)
    }

    /// Navigate to a user-typed path: `~` expands to home and relative paths
    /// resolve against the pane's current directory.
    pub fn change_dir(&mut self, id: PaneId, input: &str) -> std::result::Result<bool, NavError> {
        let Some(base) = self.pane(id).map(|p| p.path().to_path_buf()) else {
            return Ok(false);
        };
        let target = resolve_input(&base, input, self.fs.home_dir().as_deref());
        self.go_to(id, &target)
    }

    fn go_to(&mut self, id: PaneId, target: &Path) -> std::result::Result<bool, NavError> {
        if !self.fs.dir_exists(target) {
            return Err(NavError::not_found(target));
        }
        Ok(self.dispatch(id, |pane| Some(pane.change_dir(target))))
    }

    /// Navigate `target` to the directory shown in `source`.
    pub fn sync(&mut self, target: PaneId, source: PaneId) -> bool {
        let Some(path) = self.pane(source).map(|p| p.path().to_path_buf()) else {
            return false;
        };
        self.dispatch(target, |pane| Some(pane.change_dir(&path)))
    }

    /// Re-read the pane's directory, or walk up to the nearest directory
    /// that still exists if it has been removed.
    pub fn refresh(&mut self, id: PaneId) -> Result<bool> {
        let Some(current) = self.pane(id).map(|p| p.path().to_path_buf()) else {
            return Ok(false);
        };
        let reachable = reachable_dir(self.fs.as_ref(), &current)?;
        Ok(self.dispatch(id, |pane| {
            if reachable == current {
                Some(pane.refresh())
            } else {
                info!(from = %current.display(), to = %reachable.display(), "directory vanished");
                Some(pane.change_dir(&reachable))
            }
        }))
    }

    /// Flip hidden-file visibility and re-read. The flag is only kept when
    /// the re-read could be scheduled.
    pub fn toggle_hidden(&mut self, id: PaneId) -> Result<bool> {
        match self.pane_mut(id) {
            Some(pane) => pane.toggle_hidden(),
            None => return Ok(false),
        }
        let result = self.refresh(id);
        if result.is_err() {
            if let Some(pane) = self.pane_mut(id) {
                pane.toggle_hidden();
            }
        }
        result
    }

    /// Reconcile a completed read. Returns the error to surface, if any.
    pub fn handle_loaded(&mut self, load: DirLoad) -> Option<NavError> {
        let DirLoad { pane, path, result } = load;
        let Some(target) = self.pane_mut(pane) else {
            trace!(%pane, path = %path.display(), "completion for unknown pane dropped");
            return None;
        };
        match target.complete(&path, result) {
            Completion::Loaded => {
                debug!(%pane, path = %path.display(), "directory loaded");
                None
            }
            Completion::Stale => {
                trace!(%pane, path = %path.display(), "stale completion dropped");
                None
            }
            Completion::Failed(err) => {
                warn!(%pane, error = %err, "navigation failed");
                Some(err)
            }
        }
    }

    fn dispatch(&mut self, id: PaneId, f: impl FnOnce(&mut Pane) -> Option<PathBuf>) -> bool {
        let Some(target) = self.pane_mut(id).and_then(f) else {
            return false;
        };
        self.schedule(id, target);
        true
    }

    fn schedule(&self, pane: PaneId, path: PathBuf) {
        debug!(%pane, path = %path.display(), "scheduling directory read");
        let fs = Arc::clone(&self.fs);
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = fs.read_dir(&path);
            // The receiver is gone only during shutdown.
            let _ = tx.send(Event::DirLoaded(DirLoad { pane, path, result }));
        });
    }
}

/// Nearest existing directory: `path` itself or an ancestor, then home, then root.
pub fn reachable_dir(fs: &dyn FileSystem, path: &Path) -> Result<PathBuf> {
    if let Some(found) = path.ancestors().find(|p| fs.dir_exists(p)) {
        return Ok(found.to_path_buf());
    }
    if let Some(home) = fs.home_dir().filter(|h| fs.dir_exists(h)) {
        return Ok(home);
    }
    let root = Path::new("/");
    if fs.dir_exists(root) {
        return Ok(root.to_path_buf());
    }
    Err(AppError::NoReachableDirectory(path.to_path_buf()))
}

/// Expand `~`, resolve relative input against `base`, and fold `.`/`..`.
pub fn resolve_input(base: &Path, input: &str, home: Option<&Path>) -> PathBuf {
    let input = input.trim();
    let raw = match (input.strip_prefix('~'), home) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            home.join(rest.trim_start_matches('/'))
        }
        _ => base.join(input),
    };
    normalize(&raw)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
