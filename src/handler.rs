use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, InputMode};
use crate::nav::filter::FilterMode;

/// Rows moved by PageUp/PageDown.
const PAGE: usize = 10;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Filter(_) | InputMode::GotoPath => handle_prompt_key(app, key),
    }
}

/// Handle a mouse event: the wheel moves the focused pane's cursor.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.mode != InputMode::Normal {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => app.with_active(|p| p.move_down()),
        MouseEventKind::ScrollUp => app.with_active(|p| p.move_up()),
        _ => {}
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if ctrl => app.quit(),
        KeyCode::Char('r') if ctrl => app.refresh(),
        KeyCode::Tab => app.switch_pane(),

        KeyCode::Left if alt => app.go_back(),
        KeyCode::Right if alt => app.go_forward(),
        KeyCode::Char('[') => app.go_back(),
        KeyCode::Char(']') => app.go_forward(),

        KeyCode::Char('j') | KeyCode::Down => app.with_active(|p| p.move_down()),
        KeyCode::Char('k') | KeyCode::Up => app.with_active(|p| p.move_up()),
        KeyCode::PageDown => app.with_active(|p| p.page_down(PAGE)),
        KeyCode::PageUp => app.with_active(|p| p.page_up(PAGE)),
        KeyCode::Char('g') | KeyCode::Home => app.with_active(|p| p.select_first()),
        KeyCode::Char('G') | KeyCode::End => app.with_active(|p| p.select_last()),

        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.enter(),
        KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => app.go_parent(),
        KeyCode::Char('~') => app.go_home(),
        KeyCode::Char('-') => app.toggle_previous(),
        KeyCode::Char('c') => app.start_goto(),
        KeyCode::Char('=') => app.sync_other_pane(),

        KeyCode::Char('.') => app.toggle_hidden(),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('S') => app.toggle_sort_order(),

        KeyCode::Char(' ') | KeyCode::Insert => app.toggle_mark(),
        KeyCode::Char('a') => app.with_active(|p| p.mark_all()),
        KeyCode::Char('u') => app.with_active(|p| p.clear_marks()),

        KeyCode::Char('/') => app.start_filter(FilterMode::Incremental),
        KeyCode::Char('?') => app.start_filter(FilterMode::Regex),
        KeyCode::Esc => app.clear_filter(),
        _ => {}
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Enter => app.confirm_input(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.input_char(c),
        _ => {}
    }
}
