use crate::config::Config;
use crate::{
    actions::{Action, ActionSender, NaviTarget},
    page::{self, Page},
    tui,
};
use color_eyre::eyre::Result;
use crossterm::event::KeyCode::Char;

pub struct RootState {
    should_quit: bool,
    action_tx: tokio::sync::mpsc::UnboundedSender<Action>,
    action_rx: tokio::sync::mpsc::UnboundedReceiver<Action>,
    input_mode: bool,

    pub config: Config,
}

impl RootState {
    pub fn new(config: Config) -> Self {
        let (action_tx, action_rx) = tokio::sync::mpsc::unbounded_channel();
        Self {
            should_quit: false,
            action_tx,
            action_rx,
            input_mode: false,
            config,
        }
    }

    pub fn send_action<T: Into<Action>>(&self, action: T) {
        ActionSender::from(self.action_tx.clone()).send(action);
    }

    /// Sender handle for background tasks that outlive the current borrow.
    pub fn clone_sender(&self) -> ActionSender {
        self.action_tx.clone().into()
    }

    pub fn input_mode(&self) -> bool {
        self.input_mode
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn try_recv(&mut self) -> std::result::Result<Action, tokio::sync::mpsc::error::TryRecvError> {
        self.action_rx.try_recv()
    }

    /// Apply an application-wide action. Page-specific actions are not
    /// handled here; [`App::perform_action`] routes those to the page.
    pub fn update(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::SwitchInputMode(mode) => {
                self.input_mode = *mode;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
impl RootState {
    pub(crate) async fn recv(&mut self) -> Option<Action> {
        self.action_rx.recv().await
    }

    /// Feed one event through a page, then drain and apply every action it
    /// produced. Mirrors one iteration of the real event loop.
    pub(crate) fn handle_event_and_update(&mut self, page: &mut dyn Page, event: tui::Event) {
        page.handle_events(self, event).unwrap();
        while let Ok(action) = self.try_recv() {
            self.update(&action).unwrap();
            page.update(self, action);
        }
    }
}

pub struct App {
    pub page: Box<dyn Page>,
    pub state: RootState,
    pub tui: tui::TuiEnum,
}

impl App {
    pub fn new(state: RootState, tui: tui::TuiEnum) -> Self {
        Self {
            page: Box::new(page::home::Home::default()),
            state,
            tui,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;

        loop {
            let e = self.tui.next().await?;

            self.handle_event(e)?;

            while let Ok(action) = self.state.try_recv() {
                self.perform_action(action);
            }

            // application exit
            if self.state.should_quit() {
                break;
            }
        }

        self.tui.exit()?;
        Ok(())
    }

    /// Turn a [`tui::Event`] into actions.
    ///
    /// Application-wide keys (quitting) are handled here; everything else is
    /// delegated to the current page, which checks the input mode itself.
    fn handle_event(&mut self, event: tui::Event) -> Result<()> {
        match event {
            tui::Event::Tick => self.state.send_action(Action::Tick),
            tui::Event::Render => self.state.send_action(Action::Render),
            tui::Event::Resize(_, _) => self.state.send_action(Action::Render),
            tui::Event::Error => self.state.send_action(Action::Quit),

            tui::Event::Init | tui::Event::FocusGained | tui::Event::FocusLost => {}

            tui::Event::Key(key) if !self.state.input_mode() && key.code == Char('q') => {
                self.state.send_action(Action::Quit)
            }
            event => self.page.handle_events(&self.state, event)?,
        }
        Ok(())
    }

    /// Perform an action. This is the only place where application state
    /// changes are applied.
    fn perform_action(&mut self, action: Action) {
        match action {
            Action::Render => {
                self.tui
                    .draw(|f| {
                        self.page.render(f, &self.state);
                    })
                    .unwrap();
            }
            Action::NavigateTo(target) => {
                self.page = match target {
                    NaviTarget::Home => Box::new(page::home::Home::default()),
                    NaviTarget::Feedback => {
                        Box::new(page::feedback::Feedback::new(&self.state))
                    }
                };
                self.page.init(&self.state);
            }
            Action::Quit | Action::SwitchInputMode(_) => {
                self.state.update(&action).unwrap();
            }
            Action::None => {}
            _ => {
                self.page.update(&self.state, action);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{ClapSource, Cli};
    use crate::tui::{Event, TestTui};

    fn get_test_app(extra_args: &[&str]) -> App {
        let mut args = vec!["test-app"];
        args.extend_from_slice(extra_args);
        let cli = Cli::parse_from(args);
        let config = Config::new(Some(ClapSource::new(&cli))).unwrap();
        App::new(RootState::new(config), TestTui::new().into())
    }

    fn drain(app: &mut App) {
        while let Ok(action) = app.state.try_recv() {
            app.perform_action(action);
        }
    }

    #[test]
    fn quit_key_sets_should_quit() {
        let mut app = get_test_app(&[]);
        app.handle_event(Event::from('q')).unwrap();
        drain(&mut app);
        assert!(app.state.should_quit());
    }

    #[test]
    fn quit_key_is_inert_in_input_mode() {
        let mut app = get_test_app(&[]);
        app.state.update(&Action::SwitchInputMode(true)).unwrap();
        app.handle_event(Event::from('q')).unwrap();
        drain(&mut app);
        assert!(!app.state.should_quit());
    }

    #[test]
    fn navigation_swaps_pages() {
        let mut app = get_test_app(&[]);
        assert_eq!(app.page.get_name(), "Home");

        app.handle_event(Event::from('f')).unwrap();
        drain(&mut app);
        assert_eq!(app.page.get_name(), "Feedback");
    }
}
