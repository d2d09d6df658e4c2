use std::fmt;
use std::path::PathBuf;

/// Identity of a pane, carried on every directory-read completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(pub usize);

impl PaneId {
    pub const LEFT: PaneId = PaneId(0);
    pub const RIGHT: PaneId = PaneId(1);
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PaneId::LEFT => f.write_str("left"),
            PaneId::RIGHT => f.write_str("right"),
            PaneId(n) => write!(f, "pane{n}"),
        }
    }
}

/// How a navigation reconciles with history once its read completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKind {
    /// A newly entered directory: recorded in history on success.
    Normal,
    /// History pointer already stepped back; undone on failure.
    HistoryBack,
    /// History pointer already stepped forward; undone on failure.
    HistoryForward,
    /// Re-read of the current directory keeping cursor, marks and filter.
    Refresh,
}

impl NavKind {
    /// Signed history pointer movement this kind performed.
    pub fn history_step(&self) -> isize {
        match self {
            NavKind::HistoryBack => -1,
            NavKind::HistoryForward => 1,
            NavKind::Normal | NavKind::Refresh => 0,
        }
    }
}

/// A single navigation intent, consumed once by the pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRequest {
    pub target: PathBuf,
    pub kind: NavKind,
    /// Entry name to select once the target has loaded.
    pub cursor_hint: Option<String>,
}

impl NavRequest {
    pub fn new(target: impl Into<PathBuf>, kind: NavKind) -> Self {
        Self {
            target: target.into(),
            kind,
            cursor_hint: None,
        }
    }

    pub fn with_cursor_hint(mut self, name: impl Into<String>) -> Self {
        self.cursor_hint = Some(name.into());
        self
    }
}
