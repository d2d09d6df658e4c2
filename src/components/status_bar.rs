use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

const KEY_HINTS: &str = " /:filter ?:regex c:cd ~:home -:prev [/]:hist q:quit ";

/// Status bar widget: an input prompt, a transient message, or the
/// selection summary with key hints.
pub struct StatusBarWidget<'a> {
    info: &'a str,
    status_message: Option<&'a str>,
    prompt: Option<(&'a str, &'a str)>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(info: &'a str) -> Self {
        Self {
            info,
            status_message: None,
            prompt: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str) -> Self {
        self.status_message = Some(msg);
        self
    }

    pub fn prompt(mut self, label: &'a str, input: &'a str) -> Self {
        self.prompt = Some((label, input));
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;

        let line = if let Some((label, input)) = self.prompt {
            Line::from(vec![
                Span::styled(
                    format!("{label}: "),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(input.to_string()),
                Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
            ])
        } else if let Some(msg) = self.status_message {
            let display: String = msg.chars().take(width).collect();
            Line::from(Span::styled(
                format!("{display:<width$}"),
                Style::default().fg(Color::White).bg(Color::Red),
            ))
        } else {
            let hints_len = KEY_HINTS.chars().count();
            let budget = width.saturating_sub(hints_len);
            let info: String = self.info.chars().take(budget).collect();
            let pad = budget.saturating_sub(info.chars().count());
            Line::from(vec![
                Span::raw(info),
                Span::raw(" ".repeat(pad)),
                Span::styled(
                    KEY_HINTS,
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
                ),
            ])
        };
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
