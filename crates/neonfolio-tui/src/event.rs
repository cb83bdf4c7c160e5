use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
    /// Poll timeout while the page has animation frames pending
    animation_rate: Duration,
}

impl EventHandler {
    /// Handler that polls faster while animating
    pub fn with_animation_fps(tick_rate_ms: u64, fps: u32) -> Self {
        let frame_ms = if fps == 0 { 16 } else { (1000 / fps as u64).max(1) };
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms.max(1)),
            animation_rate: Duration::from_millis(frame_ms),
        }
    }

    /// Poll for the next event at the normal tick rate
    pub fn next(&self) -> Result<Option<AppEvent>> {
        self.poll(self.tick_rate)
    }

    /// Poll for the next event at the animation frame rate
    pub fn next_animation(&self) -> Result<Option<AppEvent>> {
        self.poll(self.animation_rate)
    }

    fn poll(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Moved
                    | MouseEventKind::Down(_)
                    | MouseEventKind::ScrollDown
                    | MouseEventKind::ScrollUp => Ok(Some(AppEvent::Mouse(mouse))),
                    _ => Ok(None),
                },
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Pointer moved, clicked or wheeled
    Mouse(MouseEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}
