use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

use super::truncate_to_width;

pub struct PageViewWidget;

impl PageViewWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let viewport = app.page.viewport();

        // The navbar's scrolled style shows up as a brighter border
        let (border_style, navbar_hint) = match app.navbar_scrolled() {
            Some(true) => (
                Style::default()
                    .fg(theme.primary_neon)
                    .add_modifier(Modifier::BOLD),
                " navbar: scrolled",
            ),
            _ => (Style::default().fg(theme.border_glow), ""),
        };

        let title = format!(
            " Page {}x{} @ {:.0}px{} ",
            viewport.width, viewport.height, viewport.scroll_y, navbar_hint
        );

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg0));

        let inner_width = area.width.saturating_sub(2) as usize;
        let mut lines: Vec<Line> = Vec::new();

        if !app.page.is_loaded() {
            lines.push(Line::from(Span::styled(
                "Waiting for DOMContentLoaded...",
                Style::default().fg(theme.grey1),
            )));
        }

        for section in app.sections() {
            let (marker, label_style) = if section.in_view {
                (
                    "▶ ",
                    Style::default()
                        .fg(theme.primary_neon)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default().fg(theme.fg0))
            };

            let extent = format!(
                " {:.0}-{:.0}",
                section.top,
                section.top + section.height
            );
            let label_width = inner_width.saturating_sub(marker.width() + extent.width());

            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.secondary_neon)),
                Span::styled(truncate_to_width(&section.label, label_width), label_style),
                Span::styled(extent, Style::default().fg(theme.grey0)),
            ]));

            if section.targets.is_empty() {
                continue;
            }

            let shown = section.targets.iter().filter(|t| t.visible).count();
            let mut glyphs = vec![Span::raw("    ")];
            for target in &section.targets {
                let (glyph, color) = if target.visible {
                    ("●", theme.visible)
                } else {
                    ("○", theme.hidden)
                };
                glyphs.push(Span::styled(glyph, Style::default().fg(color)));
            }
            glyphs.push(Span::styled(
                format!(" {}/{}", shown, section.targets.len()),
                Style::default().fg(theme.grey1),
            ));
            lines.push(Line::from(glyphs));
        }

        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, area);
    }
}
