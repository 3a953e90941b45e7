use std::ops::Deref;

use crossterm::event::{KeyCode, KeyEvent as CrosstermKeyEvent, KeyModifiers};

/// Crossterm key event wrapped so key hints can be compared and displayed
/// without reaching into crossterm types everywhere.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyEvent(pub CrosstermKeyEvent);

impl KeyEvent {
    /// Lowercase label of the key itself, without modifiers. Keys that have
    /// no sensible hint label collapse to an empty string.
    fn code_label(&self) -> String {
        match self.0.code {
            KeyCode::Char(' ') => "space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::F(n) => format!("f({n})"),
            KeyCode::Backspace => "backspace".into(),
            KeyCode::Enter => "enter".into(),
            KeyCode::Left => "left".into(),
            KeyCode::Right => "right".into(),
            KeyCode::Up => "up".into(),
            KeyCode::Down => "down".into(),
            KeyCode::Home => "home".into(),
            KeyCode::End => "end".into(),
            KeyCode::PageUp => "pageup".into(),
            KeyCode::PageDown => "pagedown".into(),
            KeyCode::Tab => "tab".into(),
            KeyCode::BackTab => "backtab".into(),
            KeyCode::Delete => "delete".into(),
            KeyCode::Insert => "insert".into(),
            KeyCode::Esc => "esc".into(),
            _ => String::new(),
        }
    }
}

impl std::fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (modifier, label) in [
            (KeyModifiers::CONTROL, "ctrl-"),
            (KeyModifiers::SHIFT, "shift-"),
            (KeyModifiers::ALT, "alt-"),
        ] {
            if self.0.modifiers.intersects(modifier) {
                f.write_str(label)?;
            }
        }
        f.write_str(&self.code_label())
    }
}

impl From<CrosstermKeyEvent> for KeyEvent {
    fn from(key_event: CrosstermKeyEvent) -> Self {
        Self(key_event)
    }
}
impl From<KeyCode> for KeyEvent {
    fn from(key_code: KeyCode) -> Self {
        Self(CrosstermKeyEvent::new(key_code, KeyModifiers::NONE))
    }
}
impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        Self(CrosstermKeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }
}
impl From<KeyEvent> for CrosstermKeyEvent {
    fn from(val: KeyEvent) -> Self {
        val.0
    }
}
impl Deref for KeyEvent {
    type Target = CrosstermKeyEvent;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_key_labels() {
        assert_eq!(KeyEvent::from(KeyCode::Enter).to_string(), "enter");
        assert_eq!(KeyEvent::from(KeyCode::Esc).to_string(), "esc");
        assert_eq!(KeyEvent::from('q').to_string(), "q");
        assert_eq!(KeyEvent::from(' ').to_string(), "space");
    }

    #[test]
    fn test_modifier_prefixes() {
        let key = KeyEvent(CrosstermKeyEvent::new(
            KeyCode::Char('s'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        ));
        assert_eq!(key.to_string(), "ctrl-shift-s");
    }
}

#[cfg(test)]
pub mod test_utils {
    use crate::tui::Event;

    use super::*;

    pub fn get_key_evt(key: KeyCode) -> Event {
        Event::Key(CrosstermKeyEvent::new(key, KeyModifiers::NONE))
    }
    pub fn get_char_evt(key: char) -> Event {
        Event::Key(CrosstermKeyEvent::new(
            KeyCode::Char(key),
            KeyModifiers::NONE,
        ))
    }
}
