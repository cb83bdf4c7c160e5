use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

use super::truncate_to_width;

/// Most recent page mutations, newest at the bottom
pub struct MutationLogWidget;

impl MutationLogWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let block = Block::default()
            .title(format!(" Mutations ({}) ", app.log.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_glow))
            .style(Style::default().bg(theme.bg0));

        let rows = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(2) as usize;
        let skip = app.log.len().saturating_sub(rows);

        let lines: Vec<Line> = app
            .log
            .iter()
            .skip(skip)
            .map(|entry| {
                let stamp = format!("{:>7}ms ", entry.at.as_millis());
                let color = if entry.text.contains(" +") {
                    theme.visible
                } else if entry.text.contains(" -") {
                    theme.warning
                } else {
                    theme.fg0
                };
                let text = truncate_to_width(&entry.text, inner_width.saturating_sub(stamp.len()));
                Line::from(vec![
                    Span::styled(stamp, Style::default().fg(theme.grey0)),
                    Span::styled(text, Style::default().fg(color)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
