use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::Gauge,
    Frame,
};

use crate::app::App;

/// The fixed scroll progress bar at the top of the page
pub struct ProgressWidget;

impl ProgressWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let percent = app.progress().clamp(0.0, 100.0);

        let gauge = Gauge::default()
            .gauge_style(
                Style::default()
                    .fg(theme.primary_neon)
                    .bg(theme.bg1)
                    .add_modifier(Modifier::BOLD),
            )
            .ratio(percent / 100.0)
            .label(format!("{:.1}%", percent));

        frame.render_widget(gauge, area);
    }
}
