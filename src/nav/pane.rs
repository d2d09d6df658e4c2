use std::collections::BTreeSet;
use std::io;
use std::mem;
use std::path::{Path, PathBuf};

use crate::error::{NavError, Result};
use crate::fs::entry::DirEntry;
use crate::fs::source::FileSystem;
use crate::nav::filter::{filter_entries, FilterMode, Matcher};
use crate::nav::history::NavigationHistory;
use crate::nav::request::{NavKind, NavRequest, PaneId};
use crate::nav::sort::{sort_entries, SortConfig};

/// An outstanding directory read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub target: PathBuf,
    pub kind: NavKind,
    pub cursor_hint: Option<String>,
    /// Directory on screen before this chain of navigations began.
    pub origin: PathBuf,
    /// `previous_path` before this chain of navigations began.
    pub origin_previous: PathBuf,
    /// Net history pointer movement to undo if the read fails.
    pub history_offset: isize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading(PendingLoad),
}

/// Result of reconciling a completed read with the pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Loaded,
    /// A newer navigation superseded this read; nothing changed.
    Stale,
    /// The read failed and the pane rolled back to its origin.
    Failed(NavError),
}

/// Initial display options for a pane.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaneOptions {
    pub show_hidden: bool,
    pub sort: SortConfig,
}

/// One side of the dual-pane view.
#[derive(Debug)]
pub struct Pane {
    id: PaneId,
    path: PathBuf,
    previous_path: PathBuf,
    /// Directory `all_entries` was read from. Lags `path` while loading.
    listed_path: PathBuf,
    /// Sorted listing of `path`, hidden entries already removed.
    all_entries: Vec<DirEntry>,
    /// Filtered view; `None` means the view is `all_entries`.
    filtered: Option<Vec<DirEntry>>,
    cursor: usize,
    scroll_offset: usize,
    marks: BTreeSet<String>,
    filter_pattern: String,
    filter_mode: FilterMode,
    matcher: Option<Matcher>,
    sort: SortConfig,
    show_hidden: bool,
    history: NavigationHistory,
    load: LoadState,
}

impl Pane {
    /// Open a pane on `path`, reading it synchronously.
    pub fn open(id: PaneId, path: &Path, fs: &dyn FileSystem, options: PaneOptions) -> Result<Self> {
        let raw = fs.read_dir(path)?;
        let mut pane = Self {
            id,
            path: path.to_path_buf(),
            previous_path: path.to_path_buf(),
            listed_path: path.to_path_buf(),
            all_entries: Vec::new(),
            filtered: None,
            cursor: 0,
            scroll_offset: 0,
            marks: BTreeSet::new(),
            filter_pattern: String::new(),
            filter_mode: FilterMode::None,
            matcher: None,
            sort: options.sort,
            show_hidden: options.show_hidden,
            history: NavigationHistory::new(),
            load: LoadState::Idle,
        };
        pane.all_entries = pane.prepare(raw);
        pane.history.push(path);
        Ok(pane)
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[allow(dead_code)]
    pub fn previous_path(&self) -> &Path {
        &self.previous_path
    }

    /// The displayed entries.
    pub fn entries(&self) -> &[DirEntry] {
        self.filtered.as_deref().unwrap_or(&self.all_entries)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn selected_entry(&self) -> Option<&DirEntry> {
        self.entries().get(self.cursor)
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        self.selected_entry().map(|e| self.entry_path(e))
    }

    pub fn filter_pattern(&self) -> &str {
        &self.filter_pattern
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn sort(&self) -> SortConfig {
        self.sort
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading(_))
    }

    pub fn pending_target(&self) -> Option<&Path> {
        match &self.load {
            LoadState::Loading(p) => Some(&p.target),
            LoadState::Idle => None,
        }
    }

    pub fn is_marked(&self, name: &str) -> bool {
        self.marks.contains(name)
    }

    /// Marked entry names in name order.
    pub fn marked_names(&self) -> Vec<&str> {
        self.marks.iter().map(String::as_str).collect()
    }

    /// Marks are names in the listed directory, not the pending one.
    #[allow(dead_code)]
    pub fn marked_paths(&self) -> Vec<PathBuf> {
        self.marks.iter().map(|n| self.listed_path.join(n)).collect()
    }

    fn entry_path(&self, entry: &DirEntry) -> PathBuf {
        if entry.is_parent() {
            self.listed_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.listed_path.clone())
        } else {
            self.listed_path.join(&entry.name)
        }
    }

    // ── Navigation intents ───────────────────────────────────────────────────
    //
    // Each returns the path to read, or `None` when the intent is a no-op.

    /// Record a navigation and optimistically show its target.
    ///
    /// A request issued while another read is outstanding replaces it; the
    /// earlier read's completion is discarded as stale.
    pub fn begin(&mut self, request: NavRequest) -> PathBuf {
        let NavRequest {
            target,
            kind,
            cursor_hint,
        } = request;

        let pending = match mem::take(&mut self.load) {
            LoadState::Idle => {
                let origin = self.path.clone();
                let origin_previous = self.previous_path.clone();
                if kind == NavKind::Normal {
                    self.previous_path = self.path.clone();
                }
                PendingLoad {
                    target: target.clone(),
                    kind,
                    cursor_hint,
                    origin,
                    origin_previous,
                    history_offset: kind.history_step(),
                }
            }
            LoadState::Loading(prev) if kind == NavKind::Refresh => PendingLoad {
                target: target.clone(),
                ..prev
            },
            LoadState::Loading(prev) => PendingLoad {
                target: target.clone(),
                kind,
                cursor_hint,
                history_offset: prev.history_offset + kind.history_step(),
                ..prev
            },
        };

        self.path = target.clone();
        self.load = LoadState::Loading(pending);
        target
    }

    /// Enter the selected directory.
    ///
    /// The target is resolved against the listed directory, so entering again
    /// before a read lands re-targets the same directory. Symlinked
    /// directories keep the link's own path so going to the parent returns to
    /// the logical location. Files and broken links are no-ops.
    pub fn enter_selected(&mut self) -> Option<PathBuf> {
        let entry = self.selected_entry()?;
        let request = if entry.is_parent() {
            parent_request(&self.listed_path)?
        } else if entry.is_dir && !entry.is_broken_link() {
            NavRequest::new(self.listed_path.join(&entry.name), NavKind::Normal)
        } else {
            return None;
        };
        Some(self.begin(request))
    }

    /// Go to the parent of the shown path, landing the cursor on the
    /// directory just left.
    pub fn go_parent(&mut self) -> Option<PathBuf> {
        let request = parent_request(&self.path)?;
        Some(self.begin(request))
    }

    pub fn go_back(&mut self) -> Option<PathBuf> {
        let target = self.history.back()?;
        Some(self.begin(NavRequest::new(target, NavKind::HistoryBack)))
    }

    pub fn go_forward(&mut self) -> Option<PathBuf> {
        let target = self.history.forward()?;
        Some(self.begin(NavRequest::new(target, NavKind::HistoryForward)))
    }

    /// Swap the current and previous directories. Independent of history.
    pub fn toggle_previous(&mut self) -> Option<PathBuf> {
        if self.previous_path == self.path {
            return None;
        }
        let target = self.previous_path.clone();
        Some(self.begin(NavRequest::new(target, NavKind::Normal)))
    }

    /// Navigate to an already validated directory.
    pub fn change_dir(&mut self, target: &Path) -> PathBuf {
        self.begin(NavRequest::new(target, NavKind::Normal))
    }

    /// Re-read the current (or pending) directory.
    pub fn refresh(&mut self) -> PathBuf {
        let target = self.path.clone();
        self.begin(NavRequest::new(target, NavKind::Refresh))
    }

    /// Flip hidden-file visibility; the caller must re-read via [`Pane::refresh`].
    pub fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
    }

    // ── Reconciliation ───────────────────────────────────────────────────────

    /// Apply the result of reading `path`.
    pub fn complete(&mut self, path: &Path, result: io::Result<Vec<DirEntry>>) -> Completion {
        if self.pending_target() != Some(path) {
            return Completion::Stale;
        }
        let LoadState::Loading(pending) = mem::take(&mut self.load) else {
            return Completion::Stale;
        };

        match result {
            Ok(raw) => {
                self.apply_listing(raw, pending);
                Completion::Loaded
            }
            Err(err) => {
                self.path = pending.origin;
                self.previous_path = pending.origin_previous;
                self.history.shift(-pending.history_offset);
                Completion::Failed(NavError::from_io(path, &err))
            }
        }
    }

    fn apply_listing(&mut self, raw: Vec<DirEntry>, pending: PendingLoad) {
        self.listed_path = pending.target.clone();
        let entries = self.prepare(raw);

        if pending.kind == NavKind::Refresh {
            let selected = pending
                .cursor_hint
                .or_else(|| self.selected_entry().map(|e| e.name.clone()));
            let old_cursor = self.cursor;
            self.marks
                .retain(|name| entries.iter().any(|e| &e.name == name));
            self.all_entries = entries;
            self.filtered = self
                .matcher
                .as_ref()
                .map(|m| filter_entries(&self.all_entries, m));
            self.cursor = old_cursor;
            match selected {
                Some(name) => self.select_name_or_clamp(&name),
                None => self.clamp_cursor(),
            }
            return;
        }

        self.all_entries = entries;
        self.reset_filter();
        self.marks.clear();
        self.cursor = pending
            .cursor_hint
            .and_then(|name| self.position_of(&name))
            .unwrap_or(0);
        self.scroll_offset = 0;

        if pending.kind == NavKind::Normal {
            self.history.push(&self.path);
        }
    }

    /// Hide dot-files, add `..` and sort.
    fn prepare(&self, raw: Vec<DirEntry>) -> Vec<DirEntry> {
        let mut entries: Vec<DirEntry> = raw
            .into_iter()
            .filter(|e| !e.is_parent() && (self.show_hidden || !e.is_hidden()))
            .collect();
        if self.listed_path.parent().is_some() {
            entries.push(DirEntry::parent());
        }
        sort_entries(entries, self.sort)
    }

    // ── Filter ───────────────────────────────────────────────────────────────

    /// Filter the view by `pattern`. An empty pattern clears the filter.
    ///
    /// A regex that fails to compile is returned as an error and the previous
    /// filter stays in effect.
    pub fn set_filter(&mut self, pattern: &str, mode: FilterMode) -> Result<()> {
        if pattern.is_empty() || mode == FilterMode::None {
            self.clear_filter();
            return Ok(());
        }
        let matcher = Matcher::build(pattern, mode)?;
        self.filtered = matcher.as_ref().map(|m| filter_entries(&self.all_entries, m));
        self.matcher = matcher;
        self.filter_pattern = pattern.to_string();
        self.filter_mode = mode;
        self.clamp_cursor();
        Ok(())
    }

    /// Drop the filter, restoring the full listing and keeping the selection.
    pub fn clear_filter(&mut self) {
        let selected = self.selected_entry().map(|e| e.name.clone());
        self.reset_filter();
        match selected {
            Some(name) => self.select_name_or_clamp(&name),
            None => self.clamp_cursor(),
        }
    }

    fn reset_filter(&mut self) {
        self.filtered = None;
        self.matcher = None;
        self.filter_pattern.clear();
        self.filter_mode = FilterMode::None;
    }

    // ── Sort ─────────────────────────────────────────────────────────────────

    pub fn set_sort(&mut self, sort: SortConfig) {
        let selected = self.selected_entry().map(|e| e.name.clone());
        self.sort = sort;
        self.all_entries = sort_entries(mem::take(&mut self.all_entries), sort);
        if let Some(m) = &self.matcher {
            self.filtered = Some(filter_entries(&self.all_entries, m));
        }
        if let Some(name) = selected {
            self.select_name_or_clamp(&name);
        }
    }

    pub fn cycle_sort_field(&mut self) {
        let mut sort = self.sort;
        sort.field = sort.field.next();
        self.set_sort(sort);
    }

    pub fn toggle_sort_order(&mut self) {
        let mut sort = self.sort;
        sort.order = sort.order.toggled();
        self.set_sort(sort);
    }

    // ── Marks ────────────────────────────────────────────────────────────────

    /// Toggle the mark on the selected entry. `..` can never be marked.
    pub fn toggle_mark(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        if entry.is_parent() {
            return;
        }
        let name = entry.name.clone();
        if !self.marks.remove(&name) {
            self.marks.insert(name);
        }
    }

    pub fn mark_all(&mut self) {
        let names: Vec<String> = self
            .entries()
            .iter()
            .filter(|e| !e.is_parent())
            .map(|e| e.name.clone())
            .collect();
        self.marks.extend(names);
    }

    pub fn clear_marks(&mut self) {
        self.marks.clear();
    }

    // ── Cursor ───────────────────────────────────────────────────────────────

    pub fn move_down(&mut self) {
        let len = self.entries().len();
        if len > 0 && self.cursor < len - 1 {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn page_down(&mut self, page: usize) {
        let len = self.entries().len();
        if len > 0 {
            self.cursor = (self.cursor + page.max(1)).min(len - 1);
        }
    }

    pub fn page_up(&mut self, page: usize) {
        self.cursor = self.cursor.saturating_sub(page.max(1));
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    pub fn select_last(&mut self) {
        self.cursor = self.entries().len().saturating_sub(1);
    }

    /// Select the entry called `name`. Returns false if it is not displayed.
    pub fn select_name(&mut self, name: &str) -> bool {
        match self.position_of(name) {
            Some(idx) => {
                self.cursor = idx;
                true
            }
            None => false,
        }
    }

    /// Update the scroll offset to ensure the cursor is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + visible_height {
            self.scroll_offset = self.cursor - visible_height + 1;
        }
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.entries().iter().position(|e| e.name == name)
    }

    fn select_name_or_clamp(&mut self, name: &str) {
        if !self.select_name(name) {
            self.clamp_cursor();
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.entries().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
        if self.scroll_offset > self.cursor {
            self.scroll_offset = self.cursor;
        }
    }
}

/// Request for the parent of `dir`, hinting the cursor at `dir` itself.
fn parent_request(dir: &Path) -> Option<NavRequest> {
    let parent = dir.parent()?;
    let request = NavRequest::new(parent, NavKind::Normal);
    Some(match dir.file_name() {
        Some(name) => request.with_cursor_hint(name.to_string_lossy()),
        None => request,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavErrorKind;
    use crate::fs::source::mock::{dir, file, MockFs};
    use crate::nav::sort::{SortField, SortOrder};

    fn fixture() -> MockFs {
        MockFs::new()
            .with_home("/home/me")
            .dir("/", vec![dir("a"), dir("home")])
            .dir("/a", vec![dir("subdir"), dir("other"), file("x.txt", 3)])
            .dir(
                "/a/subdir",
                vec![file("README.md", 1), file("readme.txt", 2), file(".env", 1)],
            )
            .dir("/a/other", vec![file("o.txt", 1)])
            .dir("/home/me", vec![file("notes", 1)])
    }

    fn open(fs: &MockFs, path: &str) -> Pane {
        Pane::open(PaneId::LEFT, Path::new(path), fs, PaneOptions::default()).unwrap()
    }

    /// Drive a read to completion through `fs`, as the orchestrator would.
    fn finish(pane: &mut Pane, fs: &MockFs, target: &Path) -> Completion {
        let result = fs.read_dir(target);
        pane.complete(target, result)
    }

    fn names(pane: &Pane) -> Vec<&str> {
        pane.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn open_loads_sorted_listing_with_parent() {
        let fs = fixture();
        let pane = open(&fs, "/a");
        assert_eq!(names(&pane), vec!["..", "other", "subdir", "x.txt"]);
        assert_eq!(pane.cursor(), 0);
        assert!(!pane.is_loading());
        assert_eq!(pane.history().paths(), &[PathBuf::from("/a")]);
    }

    #[test]
    fn root_has_no_parent_entry() {
        let fs = fixture();
        let pane = open(&fs, "/");
        assert_eq!(names(&pane), vec!["a", "home"]);
    }

    #[test]
    fn open_missing_directory_fails() {
        let fs = fixture();
        assert!(Pane::open(PaneId::LEFT, Path::new("/nope"), &fs, PaneOptions::default()).is_err());
    }

    #[test]
    fn hidden_entries_follow_option() {
        let fs = fixture();
        let pane = open(&fs, "/a/subdir");
        assert!(!names(&pane).contains(&".env"));

        let options = PaneOptions {
            show_hidden: true,
            ..Default::default()
        };
        let pane = Pane::open(PaneId::LEFT, Path::new("/a/subdir"), &fs, options).unwrap();
        assert!(names(&pane).contains(&".env"));
    }

    #[test]
    fn begin_is_optimistic_and_enters_loading() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        pane.select_name("subdir");
        let target = pane.enter_selected().unwrap();
        assert_eq!(target, PathBuf::from("/a/subdir"));
        assert_eq!(pane.path(), Path::new("/a/subdir"));
        assert_eq!(pane.previous_path(), Path::new("/a"));
        assert_eq!(pane.pending_target(), Some(Path::new("/a/subdir")));
        // Old listing stays until the read lands.
        assert_eq!(names(&pane), vec!["..", "other", "subdir", "x.txt"]);

        assert_eq!(finish(&mut pane, &fs, &target), Completion::Loaded);
        assert!(!pane.is_loading());
        assert_eq!(names(&pane), vec!["..", "README.md", "readme.txt"]);
        assert_eq!(pane.history().current_path(), Some(Path::new("/a/subdir")));
    }

    #[test]
    fn stale_completion_is_discarded() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        let p1 = pane.change_dir(Path::new("/a/subdir"));
        let p2 = pane.change_dir(Path::new("/a/other"));

        assert_eq!(finish(&mut pane, &fs, &p2), Completion::Loaded);
        assert_eq!(finish(&mut pane, &fs, &p1), Completion::Stale);

        assert_eq!(pane.path(), Path::new("/a/other"));
        assert_eq!(names(&pane), vec!["..", "o.txt"]);
        assert_eq!(
            pane.history().paths(),
            &[PathBuf::from("/a"), PathBuf::from("/a/other")]
        );
    }

    #[test]
    fn entry_paths_follow_listed_directory_while_loading() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        pane.select_name("x.txt");
        pane.toggle_mark();
        pane.select_name("subdir");

        let first = pane.enter_selected().unwrap();
        assert_eq!(pane.path(), Path::new("/a/subdir"));
        assert_eq!(pane.selected_path(), Some(PathBuf::from("/a/subdir")));
        assert_eq!(pane.marked_paths(), vec![PathBuf::from("/a/x.txt")]);

        // A second Enter before the read lands re-targets the same directory.
        let second = pane.enter_selected().unwrap();
        assert_eq!(second, PathBuf::from("/a/subdir"));
        assert_eq!(finish(&mut pane, &fs, &first), Completion::Loaded);
        assert_eq!(finish(&mut pane, &fs, &second), Completion::Stale);

        assert_eq!(pane.path(), Path::new("/a/subdir"));
        assert_eq!(names(&pane), vec!["..", "README.md", "readme.txt"]);
        assert_eq!(
            pane.history().paths(),
            &[PathBuf::from("/a"), PathBuf::from("/a/subdir")]
        );
    }

    #[test]
    fn parent_entry_while_loading_uses_listed_directory() {
        let fs = fixture();
        let mut pane = open(&fs, "/a/subdir");
        pane.change_dir(Path::new("/a/other"));
        pane.select_first();
        assert_eq!(pane.selected_path(), Some(PathBuf::from("/a")));
        let target = pane.enter_selected().unwrap();
        assert_eq!(target, PathBuf::from("/a"));
        finish(&mut pane, &fs, &target);
        assert_eq!(pane.selected_entry().unwrap().name, "subdir");
    }

    #[test]
    fn stale_completion_before_newer_one_is_discarded() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        let p1 = pane.change_dir(Path::new("/a/subdir"));
        let p2 = pane.change_dir(Path::new("/a/other"));

        assert_eq!(finish(&mut pane, &fs, &p1), Completion::Stale);
        assert!(pane.is_loading());
        assert_eq!(finish(&mut pane, &fs, &p2), Completion::Loaded);
        assert_eq!(pane.path(), Path::new("/a/other"));
    }

    #[test]
    fn completion_while_idle_is_stale() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        let result = fs.read_dir(Path::new("/a/other"));
        assert_eq!(pane.complete(Path::new("/a/other"), result), Completion::Stale);
        assert_eq!(pane.path(), Path::new("/a"));
    }

    #[test]
    fn parent_restores_cursor_on_child() {
        let fs = fixture();
        let mut pane = open(&fs, "/a/subdir");
        let target = pane.go_parent().unwrap();
        assert_eq!(target, PathBuf::from("/a"));
        finish(&mut pane, &fs, &target);
        assert_eq!(pane.path(), Path::new("/a"));
        assert_eq!(pane.selected_entry().unwrap().name, "subdir");
    }

    #[test]
    fn entering_parent_entry_goes_up() {
        let fs = fixture();
        let mut pane = open(&fs, "/a/subdir");
        pane.select_first();
        let target = pane.enter_selected().unwrap();
        finish(&mut pane, &fs, &target);
        assert_eq!(pane.path(), Path::new("/a"));
        assert_eq!(pane.selected_entry().unwrap().name, "subdir");
    }

    #[test]
    fn go_parent_at_root_is_noop() {
        let fs = fixture();
        let mut pane = open(&fs, "/");
        assert!(pane.go_parent().is_none());
        assert!(!pane.is_loading());
    }

    #[test]
    fn entering_a_file_is_noop() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        pane.select_name("x.txt");
        assert!(pane.enter_selected().is_none());
        assert!(!pane.is_loading());
    }

    #[test]
    fn symlinked_directory_keeps_logical_path() {
        let mut link = dir("shortcut");
        link.symlink = Some(crate::fs::entry::SymlinkInfo {
            target: PathBuf::from("/a/subdir"),
            broken: false,
        });
        let fs = fixture();
        fs.set_dir("/home/me", vec![link]);
        fs.set_dir("/home/me/shortcut", vec![file("README.md", 1)]);

        let mut pane = open(&fs, "/home/me");
        pane.select_name("shortcut");
        let target = pane.enter_selected().unwrap();
        assert_eq!(target, PathBuf::from("/home/me/shortcut"));
        finish(&mut pane, &fs, &target);

        let up = pane.go_parent().unwrap();
        assert_eq!(up, PathBuf::from("/home/me"));
    }

    #[test]
    fn broken_symlink_is_noop() {
        let mut link = file("dangling", 0);
        link.symlink = Some(crate::fs::entry::SymlinkInfo {
            target: PathBuf::from("/missing"),
            broken: true,
        });
        let fs = fixture();
        fs.set_dir("/home/me", vec![link]);
        let mut pane = open(&fs, "/home/me");
        pane.select_name("dangling");
        assert!(pane.enter_selected().is_none());
    }

    #[test]
    fn failed_navigation_rolls_back() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        let target = pane.change_dir(Path::new("/a/subdir"));
        fs.remove("/a/subdir");

        match finish(&mut pane, &fs, &target) {
            Completion::Failed(err) => assert_eq!(err.kind(), NavErrorKind::NotFound),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(pane.path(), Path::new("/a"));
        assert_eq!(pane.previous_path(), Path::new("/a"));
        assert!(!pane.is_loading());
        assert_eq!(names(&pane), vec!["..", "other", "subdir", "x.txt"]);
        assert_eq!(pane.history().paths(), &[PathBuf::from("/a")]);
    }

    #[test]
    fn failed_navigation_restores_previous_path() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        let t = pane.change_dir(Path::new("/a/other"));
        finish(&mut pane, &fs, &t);
        assert_eq!(pane.previous_path(), Path::new("/a"));

        fs.set_error("/a/subdir", io::ErrorKind::PermissionDenied);
        let t = pane.change_dir(Path::new("/a/subdir"));
        match finish(&mut pane, &fs, &t) {
            Completion::Failed(err) => assert_eq!(err.kind(), NavErrorKind::PermissionDenied),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(pane.path(), Path::new("/a/other"));
        assert_eq!(pane.previous_path(), Path::new("/a"));
    }

    #[test]
    fn failed_history_back_restores_pointer() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        let t = pane.change_dir(Path::new("/a/subdir"));
        finish(&mut pane, &fs, &t);
        assert!(!pane.history().can_go_forward());

        fs.remove("/a");
        let t = pane.go_back().unwrap();
        assert_eq!(t, PathBuf::from("/a"));
        assert!(pane.history().can_go_forward());
        assert!(matches!(finish(&mut pane, &fs, &t), Completion::Failed(_)));

        assert_eq!(pane.path(), Path::new("/a/subdir"));
        assert_eq!(pane.history().current_path(), Some(Path::new("/a/subdir")));
        assert!(!pane.history().can_go_forward());
        assert!(pane.history().can_go_back());
    }

    #[test]
    fn failed_history_forward_restores_pointer() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        let t = pane.change_dir(Path::new("/a/subdir"));
        finish(&mut pane, &fs, &t);
        let t = pane.go_back().unwrap();
        finish(&mut pane, &fs, &t);
        assert!(pane.history().can_go_forward());

        fs.remove("/a/subdir");
        let t = pane.go_forward().unwrap();
        assert!(matches!(finish(&mut pane, &fs, &t), Completion::Failed(_)));
        assert_eq!(pane.path(), Path::new("/a"));
        assert!(pane.history().can_go_forward());
    }

    #[test]
    fn failed_back_step_restores_forward_availability() {
        let fs = fixture();
        let mut pane = open(&fs, "/");
        for p in ["/a", "/a/subdir"] {
            let t = pane.change_dir(Path::new(p));
            finish(&mut pane, &fs, &t);
        }
        let t = pane.go_back().unwrap();
        assert_eq!(finish(&mut pane, &fs, &t), Completion::Loaded);
        assert_eq!(pane.path(), Path::new("/a"));

        fs.remove("/");
        let t = pane.go_back().unwrap();
        assert_eq!(t, PathBuf::from("/"));
        assert!(matches!(finish(&mut pane, &fs, &t), Completion::Failed(_)));

        assert_eq!(pane.path(), Path::new("/a"));
        assert_eq!(pane.history().current_index(), Some(1));
        assert!(pane.history().can_go_forward());
        assert!(pane.history().can_go_back());
    }

    #[test]
    fn superseded_history_steps_are_all_undone_on_failure() {
        let fs = fixture();
        let mut pane = open(&fs, "/");
        for p in ["/a", "/a/subdir", "/a/other"] {
            let t = pane.change_dir(Path::new(p));
            finish(&mut pane, &fs, &t);
        }
        fs.remove("/a");
        pane.go_back().unwrap();
        let t = pane.go_back().unwrap();
        assert_eq!(t, PathBuf::from("/a"));
        assert!(matches!(finish(&mut pane, &fs, &t), Completion::Failed(_)));
        assert_eq!(pane.path(), Path::new("/a/other"));
        assert_eq!(pane.history().current_path(), Some(Path::new("/a/other")));
    }

    #[test]
    fn history_navigation_does_not_touch_previous_or_history() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        let t = pane.change_dir(Path::new("/a/subdir"));
        finish(&mut pane, &fs, &t);
        let t = pane.change_dir(Path::new("/a/other"));
        finish(&mut pane, &fs, &t);
        assert_eq!(pane.previous_path(), Path::new("/a/subdir"));

        let t = pane.go_back().unwrap();
        finish(&mut pane, &fs, &t);
        assert_eq!(pane.path(), Path::new("/a/subdir"));
        assert_eq!(pane.previous_path(), Path::new("/a/subdir"));
        assert_eq!(pane.history().len(), 3);
        assert_eq!(pane.history().current_index(), Some(1));
    }

    #[test]
    fn toggle_previous_swaps_paths() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        assert!(pane.toggle_previous().is_none());

        let t = pane.change_dir(Path::new("/a/other"));
        finish(&mut pane, &fs, &t);
        let t = pane.toggle_previous().unwrap();
        assert_eq!(t, PathBuf::from("/a"));
        finish(&mut pane, &fs, &t);
        assert_eq!(pane.path(), Path::new("/a"));
        assert_eq!(pane.previous_path(), Path::new("/a/other"));

        let t = pane.toggle_previous().unwrap();
        assert_eq!(t, PathBuf::from("/a/other"));
    }

    #[test]
    fn refresh_preserves_cursor_and_surviving_marks() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        pane.select_name("other");
        pane.toggle_mark();
        pane.select_name("x.txt");
        pane.toggle_mark();
        pane.select_name("subdir");

        fs.set_dir("/a", vec![dir("new"), dir("subdir"), file("x.txt", 3)]);
        let t = pane.refresh();
        assert_eq!(finish(&mut pane, &fs, &t), Completion::Loaded);

        assert_eq!(names(&pane), vec!["..", "new", "subdir", "x.txt"]);
        assert_eq!(pane.selected_entry().unwrap().name, "subdir");
        assert_eq!(pane.marked_names(), vec!["x.txt"]);
        assert_eq!(pane.history().len(), 1);
    }

    #[test]
    fn refresh_keeps_active_filter() {
        let fs = fixture();
        let mut pane = open(&fs, "/a/subdir");
        pane.set_filter("readme", FilterMode::Incremental).unwrap();
        let t = pane.refresh();
        finish(&mut pane, &fs, &t);
        assert_eq!(pane.filter_pattern(), "readme");
        assert_eq!(names(&pane), vec!["..", "README.md", "readme.txt"]);
    }

    #[test]
    fn refresh_clamps_cursor_when_selection_vanishes() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        pane.select_last();
        fs.set_dir("/a", vec![dir("subdir")]);
        let t = pane.refresh();
        finish(&mut pane, &fs, &t);
        assert_eq!(pane.cursor(), 1);
    }

    #[test]
    fn navigation_clears_filter_and_marks() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        pane.select_name("x.txt");
        pane.toggle_mark();
        pane.set_filter("sub", FilterMode::Incremental).unwrap();
        pane.select_name("subdir");
        let t = pane.enter_selected().unwrap();
        finish(&mut pane, &fs, &t);
        assert_eq!(pane.filter_mode(), FilterMode::None);
        assert!(pane.filter_pattern().is_empty());
        assert!(pane.marked_names().is_empty());
        assert_eq!(pane.cursor(), 0);
    }

    #[test]
    fn filter_round_trip_restores_listing() {
        let fs = fixture();
        let mut pane = open(&fs, "/a/subdir");
        let before: Vec<DirEntry> = pane.entries().to_vec();
        pane.set_filter("README", FilterMode::Incremental).unwrap();
        assert_eq!(names(&pane), vec!["..", "README.md"]);
        pane.clear_filter();
        assert_eq!(pane.entries(), before.as_slice());
    }

    #[test]
    fn incremental_filter_reapplies_against_full_listing() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        pane.set_filter("x", FilterMode::Incremental).unwrap();
        assert_eq!(names(&pane), vec!["..", "x.txt"]);
        pane.set_filter("", FilterMode::Incremental).unwrap();
        pane.set_filter("o", FilterMode::Incremental).unwrap();
        assert_eq!(names(&pane), vec!["..", "other"]);
    }

    #[test]
    fn filter_clamps_cursor() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        pane.select_last();
        pane.set_filter("other", FilterMode::Incremental).unwrap();
        assert_eq!(pane.cursor(), 1);
        assert_eq!(pane.selected_entry().unwrap().name, "other");
    }

    #[test]
    fn invalid_regex_keeps_previous_filter() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        pane.set_filter("sub", FilterMode::Incremental).unwrap();
        assert!(pane.set_filter("(", FilterMode::Regex).is_err());
        assert_eq!(pane.filter_pattern(), "sub");
        assert_eq!(pane.filter_mode(), FilterMode::Incremental);
        assert_eq!(names(&pane), vec!["..", "subdir"]);
        assert_eq!(pane.path(), Path::new("/a"));
    }

    #[test]
    fn regex_filter_applies() {
        let fs = fixture();
        let mut pane = open(&fs, "/a/subdir");
        pane.set_filter(r"\.md$", FilterMode::Regex).unwrap();
        assert_eq!(names(&pane), vec!["..", "README.md"]);
        assert_eq!(pane.filter_mode(), FilterMode::Regex);
    }

    #[test]
    fn sort_change_keeps_selection_and_filter() {
        let fs = fixture();
        let mut pane = open(&fs, "/a/subdir");
        pane.select_name("readme.txt");
        pane.set_sort(SortConfig::new(SortField::Size, SortOrder::Desc));
        assert_eq!(names(&pane), vec!["..", "readme.txt", "README.md"]);
        assert_eq!(pane.selected_entry().unwrap().name, "readme.txt");

        pane.set_filter("read", FilterMode::Incremental).unwrap();
        pane.toggle_sort_order();
        assert_eq!(names(&pane), vec!["..", "README.md", "readme.txt"]);
        pane.cycle_sort_field();
        assert_eq!(pane.sort().field, SortField::Date);
    }

    #[test]
    fn parent_entry_cannot_be_marked() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        pane.select_first();
        pane.toggle_mark();
        assert!(pane.marked_names().is_empty());

        pane.mark_all();
        assert_eq!(pane.marked_names(), vec!["other", "subdir", "x.txt"]);
        assert_eq!(
            pane.marked_paths(),
            vec![
                PathBuf::from("/a/other"),
                PathBuf::from("/a/subdir"),
                PathBuf::from("/a/x.txt")
            ]
        );
        pane.clear_marks();
        assert!(pane.marked_names().is_empty());
    }

    #[test]
    fn toggle_mark_twice_unmarks() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        pane.select_name("x.txt");
        pane.toggle_mark();
        assert!(pane.is_marked("x.txt"));
        pane.toggle_mark();
        assert!(!pane.is_marked("x.txt"));
    }

    #[test]
    fn cursor_movement_is_bounded() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        pane.move_up();
        assert_eq!(pane.cursor(), 0);
        pane.page_down(10);
        assert_eq!(pane.cursor(), 3);
        pane.move_down();
        assert_eq!(pane.cursor(), 3);
        pane.page_up(2);
        assert_eq!(pane.cursor(), 1);
        pane.select_last();
        assert_eq!(pane.cursor(), 3);
        pane.select_first();
        assert_eq!(pane.cursor(), 0);
    }

    #[test]
    fn empty_view_keeps_cursor_at_zero() {
        let fs = fixture();
        let mut pane = open(&fs, "/");
        pane.set_filter("zzz", FilterMode::Incremental).unwrap();
        assert!(pane.entries().is_empty());
        assert_eq!(pane.cursor(), 0);
        pane.move_down();
        pane.select_last();
        assert_eq!(pane.cursor(), 0);
        assert!(pane.selected_entry().is_none());
        pane.toggle_mark();
        assert!(pane.enter_selected().is_none());
    }

    #[test]
    fn update_scroll_follows_cursor() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        pane.select_last();
        pane.update_scroll(2);
        assert_eq!(pane.scroll_offset(), 2);
        pane.select_first();
        pane.update_scroll(2);
        assert_eq!(pane.scroll_offset(), 0);
    }

    #[test]
    fn selected_path_of_parent_entry_is_parent_dir() {
        let fs = fixture();
        let mut pane = open(&fs, "/a/subdir");
        pane.select_first();
        assert_eq!(pane.selected_path(), Some(PathBuf::from("/a")));
        pane.select_name("README.md");
        assert_eq!(pane.selected_path(), Some(PathBuf::from("/a/subdir/README.md")));
    }

    #[test]
    fn refresh_while_loading_keeps_pending_kind() {
        let fs = fixture();
        let mut pane = open(&fs, "/a");
        let t = pane.change_dir(Path::new("/a/other"));
        let again = pane.refresh();
        assert_eq!(t, again);
        finish(&mut pane, &fs, &again);
        assert_eq!(pane.history().current_path(), Some(Path::new("/a/other")));
    }
}
