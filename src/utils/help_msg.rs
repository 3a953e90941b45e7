use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};

use super::key_events::KeyEvent;

#[derive(Debug, Clone)]
enum HelpKey {
    Key(KeyEvent),
    Plain(String),
}

/// One key hint: which key, and what it does.
#[derive(Debug, Clone)]
pub(crate) struct HelpEntry {
    key: HelpKey,
    desc: String,
}

impl HelpEntry {
    pub(crate) fn new<T: Into<String>, K: Into<KeyEvent>>(event: K, desc: T) -> Self {
        Self {
            key: HelpKey::Key(event.into()),
            desc: desc.into(),
        }
    }

    /// For hints that name a key combination ("j/k") rather than one key.
    pub(crate) fn new_plain<T: Into<String>>(event: T, desc: T) -> Self {
        Self {
            key: HelpKey::Plain(event.into()),
            desc: desc.into(),
        }
    }

    pub(crate) fn key(&self) -> String {
        match &self.key {
            HelpKey::Key(key) => key.to_string(),
            HelpKey::Plain(key) => key.clone(),
        }
    }

    pub(crate) fn desc(&self) -> &str {
        &self.desc
    }
}

impl std::fmt::Display for HelpEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.desc(), self.key())
    }
}

/// A joined row of key hints, rendered at the bottom of a page.
#[derive(Default, Clone, Debug)]
pub(crate) struct HelpMsg {
    entries: Vec<HelpEntry>,
}

impl From<Vec<HelpEntry>> for HelpMsg {
    fn from(entries: Vec<HelpEntry>) -> Self {
        Self { entries }
    }
}

impl HelpMsg {
    pub(crate) fn push(&mut self, entry: HelpEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn extend(&mut self, other: &HelpMsg) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub(crate) fn render(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let paragraph = Paragraph::new(self.to_string()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .padding(Padding::horizontal(1)),
        );
        frame.render_widget(paragraph, area);
    }
}

impl std::fmt::Display for HelpMsg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for entry in &self.entries {
            if !first {
                f.write_str(" | ")?;
            }
            write!(f, "{entry}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_help_entry_key() {
        let entry = HelpEntry::new('f', "Leave feedback");
        assert_eq!(entry.key(), "f");
        assert_eq!(entry.desc(), "Leave feedback");
        assert_eq!(entry.to_string(), "Leave feedback: f");
    }

    #[test]
    fn test_help_entry_plain() {
        let entry = HelpEntry::new_plain("j/k", "Switch focus");
        assert_eq!(entry.key(), "j/k");
        assert_eq!(entry.to_string(), "Switch focus: j/k");
    }

    #[test]
    fn test_help_msg_joins_entries() {
        let mut msg: HelpMsg = vec![HelpEntry::new('q', "quit")].into();
        msg.push(HelpEntry::new_plain("j/k", "switch focus"));
        assert_eq!(msg.to_string(), "quit: q | switch focus: j/k");
    }
}
