use color_eyre::Result;
use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{
    actions::{Action, CompAction},
    tui::Event,
    utils::help_msg::{HelpEntry, HelpMsg},
    utils::key_events::KeyEvent,
};

/// A single-line input component.
///
/// Focus it by sending the action from [`InputComp::get_switch_mode_action`];
/// read submitted values back out of the action stream with
/// [`InputComp::parse_submit_action`].
#[derive(Clone, Debug)]
pub(crate) struct InputComp {
    id: u64,
    input: Input,
    mode: InputMode,

    title: String,
    /// Hint text rendered dimmed while the field is empty.
    placeholder: Option<String>,
    /// Hard cap on the value length, in characters.
    max_len: Option<usize>,

    auto_submit: bool,
    keymap: InputKeymap,
}

#[derive(Default, Clone, Debug)]
pub(crate) enum InputMode {
    #[default]
    Idle,
    Focused,
}

/// Keys that drive the focus lifecycle of an [`InputComp`].
#[derive(Clone, Debug)]
pub(crate) struct InputKeymap {
    enter_keys: Vec<KeyEvent>,
    submit_keys: Vec<KeyEvent>,
    cancel_keys: Vec<KeyEvent>,
}

impl Default for InputKeymap {
    fn default() -> Self {
        Self {
            enter_keys: vec![KeyCode::Enter.into()],
            submit_keys: vec![KeyCode::Enter.into()],
            cancel_keys: vec![KeyCode::Esc.into()],
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum InputAction {
    SwitchMode(InputMode),
    Key(KeyEvent),
    Paste(String),
    /// Discard the edit and leave input mode.
    Cancel,
    /// Leave input mode, keeping the value.
    Blur,
    SubmitBlur(String),
    /// Clear the stored value without touching focus.
    Reset,

    /// the event owner should pay attention to
    Submit(String),
}

impl InputComp {
    pub fn new<T: Into<String>, K: Into<String>>(
        id: u64,
        from: Option<T>,
        title: K,
        keymap: InputKeymap,
    ) -> Self {
        Self {
            id,
            input: from.map(|v| Input::from(v.into())).unwrap_or_default(),
            mode: InputMode::default(),
            title: title.into(),
            placeholder: None,
            max_len: None,
            auto_submit: false,
            keymap,
        }
    }

    pub fn get_switch_mode_action(&self, mode: InputMode) -> Action {
        self.get_action(InputAction::SwitchMode(mode))
    }

    pub fn get_reset_action(&self) -> Action {
        self.get_action(InputAction::Reset)
    }

    pub fn parse_submit_action(&self, action: &Action) -> Option<String> {
        match self.unwrap_action(action) {
            Some(InputAction::Submit(s)) => Some(s),
            _ => None,
        }
    }

    fn get_action(&self, action: InputAction) -> Action {
        Action::Comp((CompAction::Input(action), self.id))
    }

    fn unwrap_action(&self, action: &Action) -> Option<InputAction> {
        let Action::Comp((CompAction::Input(action), id)) = action else {
            return None;
        };
        (*id == self.id).then(|| action.clone())
    }

    pub fn set_auto_submit(self, b: bool) -> Self {
        Self {
            auto_submit: b,
            ..self
        }
    }

    pub fn placeholder<T: Into<String>>(self, placeholder: T) -> Self {
        Self {
            placeholder: Some(placeholder.into()),
            ..self
        }
    }

    pub fn max_len(self, max_len: usize) -> Self {
        Self {
            max_len: Some(max_len),
            ..self
        }
    }

    /// Re-imposes `max_len` after an edit. Keystrokes past the cap are
    /// swallowed rather than truncating already-typed text.
    fn clamp_to_max_len(&mut self) {
        let Some(max_len) = self.max_len else { return };
        if self.input.value().chars().count() > max_len {
            let clamped: String = self.input.value().chars().take(max_len).collect();
            self.input = Input::new(clamped);
        }
    }

    fn send_auto_submit(&self, app: &crate::app::RootState) {
        if self.auto_submit {
            app.send_action(self.get_action(InputAction::Submit(self.input.value().to_string())));
        }
    }

    pub fn get_help_msg(&self, inputing: bool) -> HelpMsg {
        let mut msg = HelpMsg::default();
        if !matches!(self.mode, InputMode::Focused) {
            return msg;
        }
        if !inputing {
            msg.push(HelpEntry::new(
                self.keymap.enter_keys[0].clone(),
                "Start input",
            ));
        } else if self.auto_submit {
            msg.push(HelpEntry::new(
                self.keymap.submit_keys[0].clone(),
                "quit input",
            ));
        } else {
            msg.push(HelpEntry::new(
                self.keymap.cancel_keys[0].clone(),
                "quit input",
            ));
            msg.push(HelpEntry::new(
                self.keymap.submit_keys[0].clone(),
                "submit input",
            ));
        }
        msg
    }
}

impl super::Component for InputComp {
    fn get_id(&self) -> u64 {
        self.id
    }

    fn handle_events(&self, event: &Event, app: &crate::app::RootState) -> Result<()> {
        if !matches!(self.mode, InputMode::Focused) {
            return Ok(());
        }

        if !app.input_mode() {
            if let Event::Key(key) = event {
                if self.keymap.enter_keys.contains(&(*key).into()) {
                    app.send_action(Action::SwitchInputMode(true));
                }
            }
            return Ok(());
        }

        match event {
            Event::Key(key) => {
                let key: KeyEvent = (*key).into();
                let action = if self.keymap.submit_keys.contains(&key) {
                    InputAction::SubmitBlur(self.input.value().to_string())
                } else if self.keymap.cancel_keys.contains(&key) {
                    InputAction::Cancel
                } else {
                    InputAction::Key(key)
                };
                app.send_action(self.get_action(action));
            }
            Event::Paste(s) => app.send_action(self.get_action(InputAction::Paste(s.clone()))),
            _ => (),
        }
        Ok(())
    }

    fn update(&mut self, action: &Action, app: &crate::app::RootState) -> Result<()> {
        let Some(action) = self.unwrap_action(action) else {
            return Ok(());
        };

        match action {
            InputAction::SwitchMode(input_mode) => self.mode = input_mode,
            InputAction::Key(key_event) => {
                self.input
                    .handle_event(&crossterm::event::Event::Key(key_event.into()));
                self.clamp_to_max_len();
                self.send_auto_submit(app);
            }
            InputAction::Paste(string) => {
                string.chars().for_each(|c| {
                    self.input.handle(tui_input::InputRequest::InsertChar(c));
                });
                self.clamp_to_max_len();
                self.send_auto_submit(app);
            }
            InputAction::SubmitBlur(string) => {
                app.send_action(self.get_action(InputAction::Submit(string)));
                app.send_action(self.get_action(InputAction::Blur));
            }
            InputAction::Cancel => {
                self.input.reset();
                // auto-submit owners mirror the value; tell them it is gone
                self.send_auto_submit(app);
                app.send_action(self.get_action(InputAction::Blur));
            }
            InputAction::Blur => app.send_action(Action::SwitchInputMode(false)),
            InputAction::Reset => self.input.reset(),
            InputAction::Submit(_) => (),
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame, area: &ratatui::prelude::Rect, app: &crate::app::RootState) {
        let width = area.width.max(3) - 3;
        let scroll = self.input.visual_scroll(width as usize);
        let style = match self.mode {
            InputMode::Focused => {
                if app.input_mode() {
                    Color::Yellow.into()
                } else {
                    Color::Cyan.into()
                }
            }
            InputMode::Idle => Style::default(),
        };

        let content = if self.input.value().is_empty() {
            match &self.placeholder {
                Some(placeholder) => Span::styled(
                    placeholder.clone(),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ),
                None => Span::raw(""),
            }
        } else {
            Span::raw(self.input.value())
        };

        let input_widget = Paragraph::new(content)
            .style(style)
            .scroll((0, scroll as u16))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(self.title.as_str()),
            );
        frame.render_widget(input_widget, *area);

        if matches!(self.mode, InputMode::Focused) && app.input_mode() {
            // Ratatui hides the cursor unless it's explicitly set. Position the cursor past the
            // end of the input text and one line down from the border to the input line
            let x = self.input.visual_cursor().max(scroll) - scroll + 1;
            frame.set_cursor_position((area.x + x as u16, area.y + 1))
        }
    }
}

#[cfg(test)]
impl InputComp {
    pub fn get_value(&self) -> &str {
        self.input.value()
    }
}
