use std::io::{self, Stdout};
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::info;

use neonfolio_core::{fixture, AppConfig, Page};
use neonfolio_tui::{
    event::{AppEvent, EventHandler},
    input::{apply_action, handle_key_event, handle_mouse_event},
    widgets::{MutationLogWidget, PageViewWidget, ProgressWidget, ShapesWidget, StatusBarWidget},
    App, Theme,
};

type Backend = CrosstermBackend<Stdout>;

pub fn run(config: AppConfig) -> Result<()> {
    let event_handler = EventHandler::with_animation_fps(
        config.ui.tick_rate_ms,
        config.scroll.animation_fps,
    );

    let page = Page::new(
        fixture::portfolio_document()?,
        fixture::portfolio_viewport(),
        config,
    )?;
    let mut app = App::new(page, Theme::default())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Neonfolio"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("Preview started");
    let result = event_loop(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Preview closed at {}ms", app.page.now().as_millis());
    result
}

fn event_loop(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    // Page time follows the wall clock from the first frame
    let start = Instant::now();
    app.load();

    loop {
        app.advance_to(start.elapsed());

        terminal.draw(|frame| {
            let size = frame.area();

            // Main layout: progress bar, content, status bar
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(1),
                ])
                .split(size);

            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(3, 5), Constraint::Ratio(2, 5)])
                .split(main_layout[1]);

            let side = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(7), Constraint::Min(3)])
                .split(columns[1]);

            // Pointer coordinates map onto the page pane
            app.page_area = columns[0];

            ProgressWidget::render(frame, main_layout[0], app);
            PageViewWidget::render(frame, columns[0], app);
            ShapesWidget::render(frame, side[0], app);
            MutationLogWidget::render(frame, side[1], app);
            StatusBarWidget::render(frame, main_layout[2], app);
        })?;

        // Poll at the frame rate while an animation or a near deadline is pending
        let event = if app.needs_fast_update() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };

        if let Some(event) = event {
            // Input lands on the page at the current wall-clock time
            app.advance_to(start.elapsed());
            match event {
                AppEvent::Key(key) => {
                    app.clear_status();
                    apply_action(app, handle_key_event(key));
                }
                AppEvent::Mouse(mouse) => apply_action(app, handle_mouse_event(mouse)),
                AppEvent::Resize(_, _) | AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
