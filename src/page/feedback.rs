use std::time::Duration;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tracing::warn;

use crate::{
    actions::{Action, NaviTarget},
    app::RootState,
    component::{
        Component,
        input::{InputComp, InputMode},
        status::StatusLine,
    },
    config::EnvironmentType,
    libs::submitter::{FeedbackRecord, FeedbackSubmitter, MockSubmitter, RealSubmitter},
    utils::escape::escape_html,
    utils::help_msg::{HelpEntry, HelpMsg},
};

use super::Page;

pub(crate) const MSG_EMPTY_DRAFT: &str = "Please type in a comment or suggestion.";
pub(crate) const MSG_LOCAL_WORKBENCH: &str =
    "Feedback can't be saved when running in local workbench.";
pub(crate) const MSG_SENDING: &str = "- Sending feedback";
pub(crate) const MSG_THANKS: &str = "Thank you for the feedback!";
pub(crate) const MSG_TRANSPORT: &str =
    "Failed to send feedback. Check your network connection and try again.";

/// Longest comment the list store accepts in its Title column.
const MAX_COMMENT_LEN: usize = 255;

#[derive(Clone, Debug)]
pub enum FeedbackAction {
    MoveFocus(Focus),
    Submit,
    SubmitFinished(SubmitOutcome),
}

impl Into<Action> for FeedbackAction {
    fn into(self) -> Action {
        Action::Feedback(self)
    }
}

#[derive(Clone, Debug)]
pub enum SubmitOutcome {
    Created,
    Rejected { status: u16, status_text: String },
    TransportFailed(String),
}

#[derive(Clone, Default, Debug)]
pub enum Focus {
    #[default]
    Input,
    Send,
}

impl Focus {
    fn next(&self) -> Self {
        match self {
            Focus::Input => Focus::Send,
            Focus::Send => Focus::Input,
        }
    }

    fn prev(&self) -> Self {
        // two stops, so going back is going forward
        self.next()
    }
}

/// The feedback form: a hint-texted comment field, a Send button and a
/// status line, posting `{Title, URL}` to the configured site's feedback
/// list.
#[derive(Debug)]
pub struct Feedback {
    /// Current comment, already HTML-escaped. Mirrors the visible input on
    /// every keystroke.
    draft: String,
    in_flight: bool,
    current_focus: Focus,

    input: InputComp,
    status: StatusLine,

    environment: EnvironmentType,
    submitter: FeedbackSubmitter,
    page_url: String,
}

impl Feedback {
    pub fn new(app: &RootState) -> Self {
        let config = &app.config;

        let submitter: FeedbackSubmitter = if config.submit.use_mock_server {
            MockSubmitter::default()
                .set_sim_delay(Duration::from_millis(300))
                .into()
        } else {
            RealSubmitter::default()
                .site_root(config.submit.site_root.clone().unwrap_or_default())
                .into()
        };

        Self {
            draft: String::new(),
            in_flight: false,
            current_focus: Focus::default(),
            input: InputComp::new(
                rand::random::<u64>(),
                None::<String>,
                "✉ Feedback",
                Default::default(),
            )
            .set_auto_submit(true)
            .placeholder(escape_html(&config.widget.hint_text))
            .max_len(MAX_COMMENT_LEN),
            status: StatusLine::default(),
            environment: config.submit.environment(),
            submitter,
            page_url: config.submit.record_url(),
        }
    }

    /// The only cross-field invariant of the form: Send is available exactly
    /// while there is a comment to send (and no request on the wire).
    fn send_enabled(&self) -> bool {
        !self.draft.is_empty() && !self.in_flight
    }

    fn handle_submit(&mut self, app: &RootState) {
        // a pending request wins over a second press
        if self.in_flight {
            return;
        }

        self.status.clear_error();
        self.status.clear();

        if self.draft.is_empty() {
            self.status.render_error(MSG_EMPTY_DRAFT);
            app.send_action(Action::Render);
            return;
        }

        if self.environment == EnvironmentType::Local {
            self.status.render_error(MSG_LOCAL_WORKBENCH);
            app.send_action(Action::Render);
            return;
        }

        self.status.display_loading(MSG_SENDING);
        self.in_flight = true;
        self.spawn_submit(app);
        app.send_action(Action::Render);
    }

    fn spawn_submit(&self, app: &RootState) {
        let tx = app.clone_sender();
        let submitter = self.submitter.clone();
        let record = FeedbackRecord {
            title: self.draft.clone(),
            url: self.page_url.clone(),
        };

        tokio::task::spawn_blocking(move || {
            let outcome = match submitter.submit(&record) {
                Ok(response) if response.created() => SubmitOutcome::Created,
                Ok(response) => SubmitOutcome::Rejected {
                    status: response.status,
                    status_text: response.status_text,
                },
                Err(report) => SubmitOutcome::TransportFailed(format!("{report:#}")),
            };
            tx.send(FeedbackAction::SubmitFinished(outcome));
            tx.send(Action::Render);
        });
    }

    fn handle_submit_finished(&mut self, app: &RootState, outcome: SubmitOutcome) {
        self.in_flight = false;
        self.status.clear_loading();

        match outcome {
            SubmitOutcome::Created => {
                self.status.render_success(MSG_THANKS);
                // drop the sent comment entirely so Send disarms again
                self.draft.clear();
                app.send_action(self.input.get_reset_action());
            }
            SubmitOutcome::Rejected {
                status,
                status_text,
            } => {
                self.status.render_error(format!(
                    "Failed to save feedback. Error code: {} ({})",
                    status_text, status
                ));
            }
            SubmitOutcome::TransportFailed(detail) => {
                warn!("Feedback submission failed in transport: {detail}");
                self.status.render_error(MSG_TRANSPORT);
            }
        }
        app.send_action(Action::Render);
    }

    fn get_help_msg(&self, app: &RootState) -> HelpMsg {
        let mut help = HelpMsg::default();
        if !app.input_mode() {
            help.push(HelpEntry::new_plain("j/k", "switch focus"));
            if matches!(self.current_focus, Focus::Send) {
                help.push(HelpEntry::new(KeyCode::Enter, "send feedback"));
            }
            help.push(HelpEntry::new(KeyCode::Esc, "back"));
            help.push(HelpEntry::new('q', "quit"));
        }
        help.extend(&self.input.get_help_msg(app.input_mode()));
        help
    }
}

impl Page for Feedback {
    fn render(&self, frame: &mut ratatui::Frame, app: &RootState) {
        let area = &Layout::default()
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Fill(1),
                Constraint::Length(3),
            ])
            .margin(1)
            .split(frame.area());

        self.input.draw(frame, &area[0], app);

        let button_area = Layout::horizontal([Constraint::Length(12)]).split(area[1])[0];
        let button_style = if !self.send_enabled() {
            Style::default().fg(Color::DarkGray)
        } else if matches!(self.current_focus, Focus::Send) {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        frame.render_widget(
            Paragraph::new("Send")
                .centered()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded),
                )
                .style(button_style),
            button_area,
        );

        self.status.render(frame, area[2]);

        self.get_help_msg(app).render(frame, area[4]);
    }

    fn handle_events(&self, app: &RootState, event: crate::tui::Event) -> color_eyre::Result<()> {
        if let crate::tui::Event::Key(key) = &event {
            if !app.input_mode() {
                match (key.modifiers, key.code) {
                    (_, KeyCode::Char('j')) | (_, KeyCode::Tab) => {
                        app.send_action(FeedbackAction::MoveFocus(self.current_focus.next()))
                    }
                    (_, KeyCode::Char('k')) => {
                        app.send_action(FeedbackAction::MoveFocus(self.current_focus.prev()))
                    }
                    (_, KeyCode::Enter) if matches!(self.current_focus, Focus::Send) => {
                        app.send_action(FeedbackAction::Submit)
                    }
                    (_, KeyCode::Esc) => app.send_action(Action::NavigateTo(NaviTarget::Home)),
                    _ => (),
                }
            }
        };
        self.input.handle_events(&event, app)?;
        Ok(())
    }

    fn update(&mut self, app: &RootState, action: Action) {
        if let Action::Feedback(action) = &action {
            match action {
                FeedbackAction::MoveFocus(focus) => {
                    self.current_focus = focus.clone();
                    app.send_action(self.input.get_switch_mode_action(
                        if matches!(self.current_focus, Focus::Input) {
                            InputMode::Focused
                        } else {
                            InputMode::Idle
                        },
                    ));
                }
                FeedbackAction::Submit => self.handle_submit(app),
                FeedbackAction::SubmitFinished(outcome) => {
                    self.handle_submit_finished(app, outcome.clone())
                }
            }
        }

        if let Some(text) = self.input.parse_submit_action(&action) {
            self.draft = escape_html(&text);
        }

        self.input.update(&action, app).unwrap();
    }

    fn get_name(&self) -> String {
        "Feedback".to_string()
    }

    fn init(&mut self, app: &RootState) {
        app.send_action(self.input.get_switch_mode_action(InputMode::Focused));
    }
}

#[cfg(test)]
mod test {
    use clap::Parser;
    use ratatui::{Terminal, backend::TestBackend};

    use crate::{
        cli::{ClapSource, Cli},
        config::Config,
        utils::key_events::test_utils::{get_char_evt, get_key_evt},
    };

    use super::*;

    fn get_test_objs(extra_args: &[&str]) -> (RootState, Feedback) {
        let mut args = vec!["test-feedback"];
        args.extend_from_slice(extra_args);
        let cli = Cli::parse_from(args);
        let config = Config::new(Some(ClapSource::new(&cli))).unwrap();
        let mut app = RootState::new(config);
        let mut page = Feedback::new(&app);
        page.init(&app);
        while let Ok(action) = app.try_recv() {
            app.update(&action).unwrap();
            page.update(&app, action);
        }
        (app, page)
    }

    /// Connected-environment page with an inspectable mock on the wire.
    fn get_connected_objs(mock: &MockSubmitter) -> (RootState, Feedback) {
        let (app, mut page) = get_test_objs(&[
            "--use-mock-server",
            "--page-url",
            "https://example.com/site/pages/news",
        ]);
        page.submitter = mock.clone().into();
        (app, page)
    }

    fn type_text(app: &mut RootState, page: &mut Feedback, text: &str) {
        app.handle_event_and_update(page, get_key_evt(KeyCode::Enter));
        for c in text.chars() {
            app.handle_event_and_update(page, get_char_evt(c));
        }
        app.handle_event_and_update(page, get_key_evt(KeyCode::Enter));
    }

    fn press_send(app: &mut RootState, page: &mut Feedback) {
        assert!(matches!(page.current_focus, Focus::Input));
        app.handle_event_and_update(page, get_key_evt(KeyCode::Char('j')));
        app.handle_event_and_update(page, get_key_evt(KeyCode::Enter));
    }

    /// Pump actions until the background submission reports back, then
    /// apply whatever the completion handler queued up.
    async fn drive_submit_to_completion(app: &mut RootState, page: &mut Feedback) {
        loop {
            let action = tokio::time::timeout(std::time::Duration::from_secs(5), app.recv())
                .await
                .expect("submission never completed")
                .expect("action channel closed");
            let finished = matches!(
                action,
                Action::Feedback(FeedbackAction::SubmitFinished(_))
            );
            app.update(&action).unwrap();
            page.update(app, action);
            if finished {
                break;
            }
        }
        while let Ok(action) = app.try_recv() {
            app.update(&action).unwrap();
            page.update(app, action);
        }
    }

    #[test]
    fn draft_tracks_escaped_input_and_gates_send() {
        let (mut app, mut page) = get_test_objs(&[]);
        assert!(!page.send_enabled());

        type_text(&mut app, &mut page, "a<b>&\"c");
        assert_eq!(page.draft, "a&lt;b&gt;&amp;&quot;c");
        assert!(page.send_enabled());

        // wiping the input disarms Send again
        app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Enter));
        for _ in 0.."a<b>&\"c".chars().count() {
            app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Backspace));
        }
        assert_eq!(page.draft, "");
        assert!(!page.send_enabled());
    }

    #[test]
    fn cancelled_input_disarms_send() {
        let (mut app, mut page) = get_test_objs(&[]);

        app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Enter));
        app.handle_event_and_update(&mut page, get_char_evt('x'));
        assert!(page.send_enabled());

        app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Esc));
        assert_eq!(page.input.get_value(), "");
        assert_eq!(page.draft, "");
        assert!(!page.send_enabled());
    }

    #[test]
    fn empty_submit_is_rejected_without_network() {
        let mock = MockSubmitter::default();
        let (mut app, mut page) = get_connected_objs(&mock);

        press_send(&mut app, &mut page);

        assert_eq!(page.status.error_message(), Some(MSG_EMPTY_DRAFT));
        assert!(mock.sent().is_empty());
    }

    #[test]
    fn local_workbench_submit_is_rejected_without_network() {
        let mock = MockSubmitter::default();
        // no site root configured -> local workbench
        let (mut app, mut page) = get_test_objs(&[]);
        page.submitter = mock.clone().into();

        type_text(&mut app, &mut page, "Great app");
        press_send(&mut app, &mut page);

        assert_eq!(page.status.error_message(), Some(MSG_LOCAL_WORKBENCH));
        assert!(mock.sent().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn submit_posts_one_record_and_resets_on_created() {
        let mock = MockSubmitter::default();
        let (mut app, mut page) = get_connected_objs(&mock);

        type_text(&mut app, &mut page, "Great app");
        press_send(&mut app, &mut page);
        assert!(page.status.is_loading());

        drive_submit_to_completion(&mut app, &mut page).await;

        assert_eq!(
            mock.sent(),
            vec![FeedbackRecord {
                title: "Great app".into(),
                url: "https://example.com/site/pages/news".into(),
            }]
        );
        assert!(!page.status.is_loading());
        assert_eq!(page.status.success_message(), Some(MSG_THANKS));
        assert_eq!(page.input.get_value(), "");
        assert_eq!(page.draft, "");
        assert!(!page.send_enabled());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rejected_submit_shows_status_code_and_keeps_draft() {
        let mock = MockSubmitter::default().respond_with(500);
        let (mut app, mut page) = get_connected_objs(&mock);

        type_text(&mut app, &mut page, "Great app");
        press_send(&mut app, &mut page);
        drive_submit_to_completion(&mut app, &mut page).await;

        assert_eq!(
            page.status.error_message(),
            Some("Failed to save feedback. Error code: Internal Server Error (500)")
        );
        // the comment survives for a manual retry
        assert_eq!(page.draft, "Great app");
        assert!(page.send_enabled());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn transport_failure_clears_loading_and_surfaces() {
        let mock = MockSubmitter::default().fail_transport();
        let (mut app, mut page) = get_connected_objs(&mock);

        type_text(&mut app, &mut page, "Great app");
        press_send(&mut app, &mut page);
        drive_submit_to_completion(&mut app, &mut page).await;

        assert!(!page.status.is_loading());
        assert_eq!(page.status.error_message(), Some(MSG_TRANSPORT));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn second_submit_while_in_flight_is_ignored() {
        let mock = MockSubmitter::default().set_sim_delay(std::time::Duration::from_millis(200));
        let (mut app, mut page) = get_connected_objs(&mock);

        type_text(&mut app, &mut page, "Great app");
        press_send(&mut app, &mut page);
        assert!(page.in_flight);
        assert!(!page.send_enabled());

        // focus is already on Send; press it again while the first request
        // is still on the wire
        app.handle_event_and_update(&mut page, get_key_evt(KeyCode::Enter));
        assert!(page.status.is_loading());

        drive_submit_to_completion(&mut app, &mut page).await;

        assert_eq!(mock.sent().len(), 1);
        assert!(!page.in_flight);
    }

    #[test]
    fn fresh_page_starts_pristine() {
        // local workbench keeps this test off the network
        let (mut app, mut page) = get_test_objs(&[]);

        type_text(&mut app, &mut page, "Great app");
        press_send(&mut app, &mut page);
        assert!(page.send_enabled());
        assert!(page.status.error_message().is_some());

        // a rebuilt page forgets draft, status and button state
        let page = Feedback::new(&app);
        assert_eq!(page.draft, "");
        assert!(!page.send_enabled());
        assert!(page.status.is_empty());
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn render_shows_hint_button_and_errors() {
        let (mut app, mut page) = get_test_objs(&["--hint-text", "Tell us something"]);
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();

        terminal.draw(|f| page.render(f, &app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Tell us something"));
        assert!(text.contains("Send"));
        assert!(text.contains("switch focus"));

        press_send(&mut app, &mut page);
        terminal.draw(|f| page.render(f, &app)).unwrap();
        assert!(buffer_text(&terminal).contains(MSG_EMPTY_DRAFT));
    }
}
