pub(crate) mod input;
pub(crate) mod status;

use color_eyre::eyre::Result;
use ratatui::{Frame, layout::Rect};

use crate::{actions::Action, app::RootState, tui::Event};

/// A reusable widget that participates in the action loop.
///
/// Components are addressed by id: their actions travel as
/// [`Action::Comp`]`((_, id))` so several instances can coexist on a page.
pub(crate) trait Component {
    #[allow(dead_code)]
    fn get_id(&self) -> u64;

    fn handle_events(&self, event: &Event, app: &RootState) -> Result<()>;

    fn update(&mut self, action: &Action, app: &RootState) -> Result<()>;

    fn draw(&self, frame: &mut Frame, area: &Rect, app: &RootState);
}
