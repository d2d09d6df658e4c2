use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::fs::entry::DirEntry;
use crate::nav::filter::FilterMode;
use crate::nav::pane::Pane;

/// Renders one pane: a bordered listing with the path as title.
pub struct PaneWidget<'a> {
    pane: &'a Pane,
    focused: bool,
}

impl<'a> PaneWidget<'a> {
    pub fn new(pane: &'a Pane, focused: bool) -> Self {
        Self { pane, focused }
    }

    fn title(&self) -> String {
        let mut title = format!(" {} ", self.pane.path().display());
        if self.pane.is_loading() {
            title.push_str("[loading] ");
        }
        title
    }

    fn footer(&self) -> String {
        let sort = self.pane.sort();
        let mut footer = format!(" {}{} ", sort.field.label(), sort.order.arrow());
        let history = self.pane.history();
        if let Some(idx) = history.current_index() {
            let back = if history.can_go_back() { '<' } else { ' ' };
            let forward = if history.can_go_forward() { '>' } else { ' ' };
            footer.push_str(&format!("{back}{}/{}{forward} ", idx + 1, history.len()));
        }
        if self.pane.show_hidden() {
            footer.push_str("hidden ");
        }
        if self.pane.filter_mode() != FilterMode::None {
            footer.push_str(&format!(
                "{}: {} ",
                self.pane.filter_mode().label(),
                self.pane.filter_pattern()
            ));
        }
        let marks = self.pane.marked_names().len();
        if marks > 0 {
            footer.push_str(&format!("{marks} marked "));
        }
        footer
    }

    fn row(&self, entry: &DirEntry, selected: bool, width: usize) -> Line<'static> {
        let marked = self.pane.is_marked(&entry.name);
        let mut name = String::with_capacity(entry.name.len() + 2);
        name.push(if marked { '*' } else { ' ' });
        name.push_str(&entry.name);
        if entry.is_symlink() {
            name.push('@');
        } else if entry.is_dir && !entry.is_parent() {
            name.push('/');
        }

        let size = if entry.is_dir {
            String::new()
        } else {
            human_size(entry.size)
        };
        let gap = width.saturating_sub(name.chars().count() + size.len());
        let text = format!("{name}{}{size}", " ".repeat(gap));

        let mut style = Style::default();
        if entry.is_broken_link() {
            style = style.fg(Color::Red);
        } else if entry.is_dir {
            style = style.fg(Color::Blue).add_modifier(Modifier::BOLD);
        }
        if marked {
            style = style.fg(Color::Yellow);
        }
        if selected && self.focused {
            style = style.add_modifier(Modifier::REVERSED);
        } else if selected {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        Line::from(Span::styled(text, style))
    }
}

impl<'a> Widget for PaneWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(self.title())
            .title_bottom(self.footer());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let width = inner.width as usize;
        let rows = self
            .pane
            .entries()
            .iter()
            .enumerate()
            .skip(self.pane.scroll_offset())
            .take(inner.height as usize);
        for (row, (idx, entry)) in rows.enumerate() {
            let line = self.row(entry, idx == self.pane.cursor(), width);
            buf.set_line(inner.x, inner.y + row as u16, &line, inner.width);
        }
    }
}

/// Format a byte count with a binary unit suffix.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes}{}", UNITS[0])
    } else {
        format!("{value:.1}{}", UNITS[unit])
    }
}
