use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// How a keystroke is treated while typing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyClass {
    Delete,
    Char(char),
    Other,
}

pub fn classify(key: &KeyEvent) -> KeyClass {
    match key.code {
        KeyCode::Backspace | KeyCode::Delete => KeyClass::Delete,
        KeyCode::Char(ch) if !has_command_modifier(key.modifiers) => KeyClass::Char(ch),
        _ => KeyClass::Other,
    }
}

/// Shift is part of the printable payload; everything else turns the key
/// into a shortcut.
fn has_command_modifier(modifiers: KeyModifiers) -> bool {
    modifiers.intersects(
        KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER | KeyModifiers::META,
    )
}

pub fn matches_expected(typed: char, expected: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        return typed == expected;
    }
    typed.to_lowercase().eq(expected.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_printable_chars() {
        assert_eq!(
            classify(&key(KeyCode::Char('a'), KeyModifiers::NONE)),
            KeyClass::Char('a')
        );
        assert_eq!(
            classify(&key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            KeyClass::Char('A')
        );
    }

    #[test]
    fn test_modified_chars_are_other() {
        assert_eq!(
            classify(&key(KeyCode::Char('a'), KeyModifiers::CONTROL)),
            KeyClass::Other
        );
        assert_eq!(
            classify(&key(KeyCode::Char('x'), KeyModifiers::ALT)),
            KeyClass::Other
        );
    }

    #[test]
    fn test_delete_keys() {
        assert_eq!(
            classify(&key(KeyCode::Backspace, KeyModifiers::NONE)),
            KeyClass::Delete
        );
        assert_eq!(
            classify(&key(KeyCode::Delete, KeyModifiers::NONE)),
            KeyClass::Delete
        );
    }

    #[test]
    fn test_navigation_and_control_keys() {
        for code in [
            KeyCode::Enter,
            KeyCode::Esc,
            KeyCode::Tab,
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Left,
            KeyCode::Right,
        ] {
            assert_eq!(classify(&key(code, KeyModifiers::NONE)), KeyClass::Other);
        }
    }

    #[test]
    fn test_case_rules() {
        assert!(matches_expected('a', 'a', true));
        assert!(!matches_expected('A', 'a', true));
        assert!(matches_expected('A', 'a', false));
        assert!(!matches_expected('b', 'a', false));
    }
}
