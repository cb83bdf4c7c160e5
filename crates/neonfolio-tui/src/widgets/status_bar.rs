use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let page = &app.page;

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            format!(
                " {:>6}ms | y={:.0} | {} | timers: {} | reveals: {}",
                page.now().as_millis(),
                page.viewport().scroll_y,
                page.direction().as_str(),
                page.pending_timers(),
                page.pending_reveals()
            )
        };

        let help_hint = " q:quit j/k:scroll g/G:top/bottom 1-9:nav t:tooltip ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let fg = if app.status_message.is_some() {
            theme.warning
        } else {
            theme.fg0
        };

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(fg).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey1).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
