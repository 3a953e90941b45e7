//! Page module handles different UI pages and their behaviors.
//!
//! A page owns its widgets and local state. Events reach the current page
//! through [`Page::handle_events`], which may only emit actions; state
//! changes happen in [`Page::update`] once those actions come back around.

use color_eyre::eyre::Result;
use ratatui::Frame;

use crate::{actions::Action, app::RootState, tui::Event};

pub(crate) mod feedback;
pub(crate) mod home;

pub trait Page {
    fn render(&self, frame: &mut Frame, app: &RootState);

    /// Handle an event, emitting actions through `app`. Must not mutate.
    fn handle_events(&self, app: &RootState, event: Event) -> Result<()>;

    /// Apply an action to the page's state.
    fn update(&mut self, app: &RootState, action: Action);

    fn get_name(&self) -> String;

    fn init(&mut self, app: &RootState) {
        let _ = app;
    }
}
