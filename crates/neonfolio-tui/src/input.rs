use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use neonfolio_core::event::KeyPress;

use crate::app::{App, LINE_STEP};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    ScrollBy(f64),
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    JumpToTop,
    JumpToBottom,
    /// Click the n-th navbar anchor (1-based)
    ClickNav(usize),
    InsertTooltip,
    /// Any other key goes to the page as a `KeyDown`
    PageKey(KeyPress),
    Pointer { column: u16, row: u16 },
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Scrolling
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, KeyModifiers::NONE) => {
            Action::ScrollBy(LINE_STEP)
        }
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, KeyModifiers::NONE) => {
            Action::ScrollBy(-LINE_STEP)
        }
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::ScrollHalfPageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ScrollHalfPageUp,

        // Jump to top/bottom
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::JumpToTop,
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::JumpToBottom,

        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::ClickNav(c as usize - '0' as usize)
        }
        (KeyCode::Char('t'), KeyModifiers::NONE) => Action::InsertTooltip,

        _ => page_key(key).map(Action::PageKey).unwrap_or(Action::None),
    }
}

/// Translate a terminal key into the page's key model
fn page_key(key: KeyEvent) -> Option<KeyPress> {
    let name = match key.code {
        KeyCode::F(n) => format!("F{}", n),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        _ => return None,
    };
    Some(KeyPress {
        key: name,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
        alt: key.modifiers.contains(KeyModifiers::ALT),
    })
}

/// Handle a mouse event and return the corresponding action
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Moved => Action::Pointer {
            column: mouse.column,
            row: mouse.row,
        },
        MouseEventKind::ScrollDown => Action::ScrollBy(LINE_STEP),
        MouseEventKind::ScrollUp => Action::ScrollBy(-LINE_STEP),
        _ => Action::None,
    }
}

/// Apply an action to the app
pub fn apply_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.should_quit = true,
        Action::ScrollBy(delta) => app.scroll_by(delta),
        Action::ScrollHalfPageDown => app.scroll_half_page_down(),
        Action::ScrollHalfPageUp => app.scroll_half_page_up(),
        Action::JumpToTop => app.jump_to_top(),
        Action::JumpToBottom => app.jump_to_bottom(),
        Action::ClickNav(n) => app.click_nav(n),
        Action::InsertTooltip => app.insert_tooltip(),
        Action::PageKey(key) => {
            app.key_down(key);
        }
        Action::Pointer { column, row } => app.pointer_at(column, row),
        Action::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('j'), KeyModifiers::NONE)),
            Action::ScrollBy(LINE_STEP)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            Action::ScrollHalfPageDown
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Action::JumpToBottom
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('3'), KeyModifiers::NONE)),
            Action::ClickNav(3)
        );
        assert_eq!(handle_key_event(key(KeyCode::Esc, KeyModifiers::NONE)), Action::Quit);
    }

    #[test]
    fn test_other_keys_reach_the_page() {
        let action = handle_key_event(key(KeyCode::F(12), KeyModifiers::NONE));
        assert_eq!(action, Action::PageKey(KeyPress::new("F12")));

        let action = handle_key_event(key(KeyCode::Char('I'), KeyModifiers::CONTROL | KeyModifiers::SHIFT));
        assert_eq!(action, Action::PageKey(KeyPress::new("I").ctrl().shift()));
        assert_eq!(handle_key_event(key(KeyCode::Left, KeyModifiers::NONE)), Action::None);
    }

    #[test]
    fn test_mouse_mapping() {
        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 3,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(handle_mouse_event(moved), Action::Pointer { column: 3, row: 7 });
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollUp,
            ..moved
        };
        assert_eq!(handle_mouse_event(wheel), Action::ScrollBy(-LINE_STEP));
    }
}
