use crate::{
    actions::{Action, NaviTarget},
    app::RootState,
};

use super::Page;
use color_eyre::eyre::Result;
use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};

#[derive(Default, Clone, Debug)]
pub struct Home {}

impl Page for Home {
    fn render(&self, frame: &mut Frame, _app: &RootState) {
        let area = frame.area();
        frame.render_widget(
            Paragraph::new(
                "Welcome to Feedback Flow\n\nPress 'f' to leave feedback\nPress 'q' to quit",
            )
            .block(
                Block::default()
                    .title("Feedback Flow")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center),
            area,
        );
    }

    fn handle_events(&self, app: &RootState, event: crate::tui::Event) -> Result<()> {
        if let crate::tui::Event::Key(key) = event {
            if key.code == KeyCode::Char('f') {
                app.send_action(Action::NavigateTo(NaviTarget::Feedback));
            }
        }
        Ok(())
    }

    fn update(&mut self, _app: &RootState, _action: Action) {}

    fn get_name(&self) -> String {
        "Home".to_string()
    }
}
