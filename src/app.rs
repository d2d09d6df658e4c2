use std::time::Instant;

use tracing::debug;

use crate::event::DirLoad;
use crate::nav::filter::FilterMode;
use crate::nav::orchestrator::Navigator;
use crate::nav::pane::Pane;
use crate::nav::request::PaneId;

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

/// What keystrokes currently edit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a filter pattern in the given mode.
    Filter(FilterMode),
    /// Typing a directory to jump to.
    GotoPath,
}

/// State for the single-line input prompt.
#[derive(Debug, Default)]
pub struct InputState {
    pub input: String,
    pub cursor_position: usize,
    /// Filter in effect when the prompt opened, restored on cancel.
    saved_filter: Option<(String, FilterMode)>,
}

/// Main application state.
pub struct App {
    pub navigator: Navigator,
    pub active: PaneId,
    pub mode: InputMode,
    pub input_state: InputState,
    pub status_message: Option<(String, Instant)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(navigator: Navigator, active: PaneId) -> Self {
        Self {
            navigator,
            active,
            mode: InputMode::Normal,
            input_state: InputState::default(),
            status_message: None,
            should_quit: false,
        }
    }

    /// The focused pane. The navigator always holds it.
    pub fn active_pane(&self) -> Option<&Pane> {
        self.navigator.pane(self.active)
    }

    fn active_pane_mut(&mut self) -> Option<&mut Pane> {
        self.navigator.pane_mut(self.active)
    }

    /// The pane that is not focused.
    pub fn other_pane_id(&self) -> PaneId {
        self.navigator
            .panes()
            .iter()
            .map(Pane::id)
            .find(|&id| id != self.active)
            .unwrap_or(self.active)
    }

    pub fn switch_pane(&mut self) {
        self.active = self.other_pane_id();
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message once it has been displayed long enough.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
            }
        }
    }

    /// Deliver a directory-read completion.
    pub fn handle_dir_loaded(&mut self, load: DirLoad) {
        if let Some(err) = self.navigator.handle_loaded(load) {
            self.set_status_message(err.to_string());
        }
    }

    // ── Navigation intents ───────────────────────────────────────────────────

    pub fn enter(&mut self) {
        self.navigator.enter(self.active);
    }

    pub fn go_parent(&mut self) {
        self.navigator.go_parent(self.active);
    }

    pub fn go_back(&mut self) {
        if !self.navigator.go_back(self.active) {
            self.set_status_message("No earlier directory in history".into());
        }
    }

    pub fn go_forward(&mut self) {
        if !self.navigator.go_forward(self.active) {
            self.set_status_message("No later directory in history".into());
        }
    }

    pub fn toggle_previous(&mut self) {
        self.navigator.toggle_previous(self.active);
    }

    pub fn go_home(&mut self) {
        if let Err(err) = self.navigator.go_home(self.active) {
            self.set_status_message(err.to_string());
        }
    }

    pub fn refresh(&mut self) {
        if let Err(err) = self.navigator.refresh(self.active) {
            self.set_status_message(err.to_string());
        }
    }

    pub fn toggle_hidden(&mut self) {
        if let Err(err) = self.navigator.toggle_hidden(self.active) {
            self.set_status_message(err.to_string());
        }
    }

    /// Point the other pane at this pane's directory.
    pub fn sync_other_pane(&mut self) {
        let other = self.other_pane_id();
        if other != self.active {
            self.navigator.sync(other, self.active);
        }
    }

    pub fn cycle_sort(&mut self) {
        if let Some(pane) = self.active_pane_mut() {
            pane.cycle_sort_field();
        }
    }

    pub fn toggle_sort_order(&mut self) {
        if let Some(pane) = self.active_pane_mut() {
            pane.toggle_sort_order();
        }
    }

    // ── Selection ────────────────────────────────────────────────────────────

    pub fn with_active(&mut self, f: impl FnOnce(&mut Pane)) {
        if let Some(pane) = self.active_pane_mut() {
            f(pane);
        }
    }

    /// Toggle the mark on the selected entry and advance the cursor.
    pub fn toggle_mark(&mut self) {
        self.with_active(|pane| {
            pane.toggle_mark();
            pane.move_down();
        });
    }

    // ── Input prompt ─────────────────────────────────────────────────────────

    pub fn start_filter(&mut self, mode: FilterMode) {
        let saved = self
            .active_pane()
            .map(|p| (p.filter_pattern().to_string(), p.filter_mode()));
        self.open_prompt(InputMode::Filter(mode), String::new());
        self.input_state.saved_filter = saved;
    }

    pub fn start_goto(&mut self) {
        self.open_prompt(InputMode::GotoPath, String::new());
    }

    fn open_prompt(&mut self, mode: InputMode, prefill: String) {
        self.input_state = InputState {
            cursor_position: prefill.len(),
            input: prefill,
            saved_filter: None,
        };
        self.mode = mode;
    }

    fn close_prompt(&mut self) {
        self.mode = InputMode::Normal;
        self.input_state = InputState::default();
    }

    /// Insert a character at the prompt cursor.
    pub fn input_char(&mut self, c: char) {
        self.input_state
            .input
            .insert(self.input_state.cursor_position, c);
        self.input_state.cursor_position += c.len_utf8();
        self.on_input_changed();
    }

    /// Delete the character before the cursor (backspace).
    pub fn input_backspace(&mut self) {
        let pos = self.input_state.cursor_position;
        let Some(prev) = self.input_state.input[..pos].chars().next_back() else {
            return;
        };
        self.input_state.cursor_position -= prev.len_utf8();
        self.input_state
            .input
            .remove(self.input_state.cursor_position);
        self.on_input_changed();
    }

    /// Incremental filters follow every keystroke; regex waits for confirm.
    fn on_input_changed(&mut self) {
        if self.mode != InputMode::Filter(FilterMode::Incremental) {
            return;
        }
        let pattern = self.input_state.input.clone();
        self.with_active(|pane| {
            // Substring matchers never fail to build.
            let _ = pane.set_filter(&pattern, FilterMode::Incremental);
        });
    }

    pub fn confirm_input(&mut self) {
        let input = self.input_state.input.clone();
        match self.mode {
            InputMode::Normal => {}
            InputMode::Filter(mode) => {
                let result = match self.active_pane_mut() {
                    Some(pane) => pane.set_filter(&input, mode),
                    None => Ok(()),
                };
                if let Err(err) = result {
                    debug!(pattern = %input, error = %err, "filter rejected");
                    self.set_status_message(err.to_string());
                }
            }
            InputMode::GotoPath => {
                if !input.trim().is_empty() {
                    if let Err(err) = self.navigator.change_dir(self.active, &input) {
                        self.set_status_message(err.to_string());
                    }
                }
            }
        }
        self.close_prompt();
    }

    /// Leave the prompt, putting back the filter that was active before it opened.
    pub fn cancel_input(&mut self) {
        if let Some((pattern, mode)) = self.input_state.saved_filter.take() {
            self.with_active(|pane| {
                let _ = pane.set_filter(&pattern, mode);
            });
        }
        self.close_prompt();
    }

    pub fn clear_filter(&mut self) {
        self.with_active(Pane::clear_filter);
    }
}
