use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::app::App;

use super::truncate_to_width;

/// Floating hero shapes and the transform parallax last wrote to them
pub struct ShapesWidget;

impl ShapesWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let block = Block::default()
            .title(" Parallax ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_glow))
            .style(Style::default().bg(theme.bg0));

        let inner_width = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = app
            .shapes()
            .into_iter()
            .map(|shape| {
                let (text, color) = match &shape.transform {
                    Some(transform) => (format!("{} {}", shape.label, transform), theme.accent_neon),
                    None => (format!("{} -", shape.label), theme.grey1),
                };
                ListItem::new(truncate_to_width(&text, inner_width)).style(Style::default().fg(color))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}
