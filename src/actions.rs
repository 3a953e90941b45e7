use color_eyre::eyre::Context;

use crate::{component::input::InputAction, page::feedback::FeedbackAction};

#[derive(Clone, Debug)]
pub enum Action {
    Tick,
    NavigateTo(NaviTarget),
    SwitchInputMode(bool),

    Feedback(FeedbackAction),

    Comp((CompAction, u64)),

    Quit,
    Render,
    None,
}

#[derive(Clone, Debug)]
pub enum NaviTarget {
    Home,
    Feedback,
}

#[derive(Clone, Debug)]
pub enum CompAction {
    Input(InputAction),
}

#[derive(Clone, Debug)]
pub struct ActionSender(pub tokio::sync::mpsc::UnboundedSender<Action>);

impl ActionSender {
    pub fn send<T: Into<Action>>(&self, action: T) {
        self.0.send(action.into()).with_context(||"Action Receiver is dropped or closed, which should not happen if app is still running.").unwrap();
    }
}

impl From<tokio::sync::mpsc::UnboundedSender<Action>> for ActionSender {
    fn from(value: tokio::sync::mpsc::UnboundedSender<Action>) -> Self {
        ActionSender(value)
    }
}
