use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Paragraph,
};

/// Inline status area under the form.
///
/// Owns the loading / error / success line the way the page wants to talk
/// about it: callers flip the state through the named methods and render
/// whatever is current. At most one message is shown at a time.
#[derive(Clone, Debug, Default)]
pub(crate) struct StatusLine {
    state: StatusState,
}

#[derive(Clone, Debug, Default, PartialEq)]
enum StatusState {
    #[default]
    Empty,
    Loading(String),
    Error(String),
    Success(String),
}

impl StatusLine {
    pub fn render_error<T: Into<String>>(&mut self, message: T) {
        self.state = StatusState::Error(message.into());
    }

    /// Clears a displayed error, leaving other states alone.
    pub fn clear_error(&mut self) {
        if matches!(self.state, StatusState::Error(_)) {
            self.state = StatusState::Empty;
        }
    }

    pub fn display_loading<T: Into<String>>(&mut self, message: T) {
        self.state = StatusState::Loading(message.into());
    }

    /// Clears the loading indicator, leaving other states alone.
    pub fn clear_loading(&mut self) {
        if matches!(self.state, StatusState::Loading(_)) {
            self.state = StatusState::Empty;
        }
    }

    pub fn render_success<T: Into<String>>(&mut self, message: T) {
        self.state = StatusState::Success(message.into());
    }

    pub fn clear(&mut self) {
        self.state = StatusState::Empty;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.state {
            StatusState::Empty => return,
            StatusState::Loading(message) => Span::styled(
                message.clone(),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            ),
            StatusState::Error(message) => {
                Span::styled(message.clone(), Style::default().fg(Color::Red))
            }
            StatusState::Success(message) => Span::styled(
                format!("✓ {}", message),
                Style::default().fg(Color::Green),
            ),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
impl StatusLine {
    pub fn is_empty(&self) -> bool {
        self.state == StatusState::Empty
    }
    pub fn is_loading(&self) -> bool {
        matches!(self.state, StatusState::Loading(_))
    }
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            StatusState::Error(message) => Some(message),
            _ => None,
        }
    }
    pub fn success_message(&self) -> Option<&str> {
        match &self.state {
            StatusState::Success(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clear_error_only_touches_errors() {
        let mut status = StatusLine::default();
        status.display_loading("- Sending feedback");
        status.clear_error();
        assert!(status.is_loading());

        status.render_error("boom");
        status.clear_error();
        assert!(status.is_empty());
    }

    #[test]
    fn test_clear_loading_only_touches_loading() {
        let mut status = StatusLine::default();
        status.render_success("done");
        status.clear_loading();
        assert_eq!(status.success_message(), Some("done"));

        status.display_loading("- Sending feedback");
        status.clear_loading();
        assert!(status.is_empty());
    }

    #[test]
    fn test_last_writer_wins() {
        let mut status = StatusLine::default();
        status.render_error("first");
        status.render_success("second");
        assert!(status.error_message().is_none());
        assert_eq!(status.success_message(), Some("second"));
    }
}
