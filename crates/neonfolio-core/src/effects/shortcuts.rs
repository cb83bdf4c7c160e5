use crate::event::KeyPress;

/// Browser shortcuts that would open help, devtools or view-source overlays:
/// F1, F12, Ctrl+U and Ctrl+Shift+I
pub fn is_blocked_shortcut(key: &KeyPress) -> bool {
    match key.key.as_str() {
        "F1" | "F12" => true,
        "u" | "U" => key.ctrl,
        "i" | "I" => key.ctrl && key.shift,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_shortcuts() {
        assert!(is_blocked_shortcut(&KeyPress::new("F1")));
        assert!(is_blocked_shortcut(&KeyPress::new("F12")));
        assert!(is_blocked_shortcut(&KeyPress::new("u").ctrl()));
        assert!(is_blocked_shortcut(&KeyPress::new("U").ctrl()));
        assert!(is_blocked_shortcut(&KeyPress::new("I").ctrl().shift()));
        assert!(is_blocked_shortcut(&KeyPress::new("i").ctrl().shift()));
    }

    #[test]
    fn test_allowed_keys() {
        assert!(!is_blocked_shortcut(&KeyPress::new("u")));
        assert!(!is_blocked_shortcut(&KeyPress::new("i").ctrl()));
        assert!(!is_blocked_shortcut(&KeyPress::new("F5")));
        assert!(!is_blocked_shortcut(&KeyPress::new("c").ctrl()));
    }
}
