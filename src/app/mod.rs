use color_eyre::{Result, eyre::eyre};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{DefaultTerminal, Frame};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::client::ReportClient;
use crate::config::Config;
use crate::ui::{self, ReportFormView, ReportOutputView};

pub mod form_data;
pub mod state;

pub use form_data::{FormField, FormItem, ReportForm};
pub use state::SubmissionState;

const PAGE_SCROLL: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormAction {
    Submit,
    Quit,
}

#[derive(Debug)]
pub struct App {
    running: bool,
    pub(crate) form: ReportForm,
    pub(crate) submission: SubmissionState,
    client: ReportClient,
    pending: Option<JoinHandle<Result<String>>>,
    report_scroll: u16,
    tick: usize,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self::with_client(ReportClient::new(&config.api_url))
    }

    pub fn with_client(client: ReportClient) -> Self {
        Self {
            running: true,
            form: ReportForm::new(),
            submission: SubmissionState::Idle,
            client,
            pending: None,
            report_scroll: 0,
            tick: 0,
        }
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        info!(endpoint = %self.client.endpoint(), "report form ready");

        while self.running {
            self.poll_submission().await;
            terminal.draw(|frame| self.render(frame))?;
            self.tick = self.tick.wrapping_add(1);

            match self.handle_form_events()? {
                Some(FormAction::Submit) => {
                    self.submit();
                }
                Some(FormAction::Quit) => {
                    self.running = false;
                }
                None => {}
            }
        }

        if let Some(handle) = self.pending.take() {
            info!("discarding in-flight report request");
            handle.abort();
        }

        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.submission.is_loading()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading() && self.form.can_submit()
    }

    /// Starts one report request. Returns `false` without side effects when
    /// submission is unavailable.
    pub fn submit(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }

        let payload = self.form.to_payload();
        info!(
            company = %payload.company_name,
            industry = %payload.industry,
            domains = payload.company_domains.len(),
            gemini_key = payload.gemini_api_key.is_some(),
            openai_key = payload.openai_api_key.is_some(),
            "submitting report request"
        );

        self.submission = SubmissionState::Loading;
        self.report_scroll = 0;

        let client = self.client.clone();
        self.pending = Some(tokio::spawn(async move {
            client.generate_report(&payload).await
        }));
        true
    }

    async fn poll_submission(&mut self) {
        if self
            .pending
            .as_ref()
            .is_some_and(|handle| handle.is_finished())
        {
            self.await_submission().await;
        }
    }

    async fn await_submission(&mut self) {
        if let Some(handle) = self.pending.take() {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(eyre!("Report request did not complete: {}", e)),
            };
            self.settle(outcome);
        }
    }

    fn settle(&mut self, outcome: Result<String>) {
        self.submission = match outcome {
            Ok(report) => {
                info!(bytes = report.len(), "report received");
                SubmissionState::Success(report)
            }
            Err(e) => {
                warn!(error = %e, "report request failed");
                SubmissionState::Failed(e.to_string())
            }
        };
    }

    fn handle_form_events(&mut self) -> Result<Option<FormAction>> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }

        Ok(None)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<FormAction> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(FormAction::Quit);
        }

        if self.form.editing && ReportForm::is_input_item(self.form.current_item()) {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => {
                    self.form.editing = false;
                }
                KeyCode::Backspace => {
                    if let Some(value) = self.form.get_current_value_mut() {
                        value.pop();
                    }
                }
                KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.form.editing = false;
                    return Some(FormAction::Submit);
                }
                KeyCode::Char(c) => {
                    if !key.modifiers.contains(KeyModifiers::CONTROL) {
                        if let Some(value) = self.form.get_current_value_mut() {
                            value.push(c);
                        }
                    }
                }
                _ => {}
            }
            return None;
        }

        self.form.editing = false;

        match key.code {
            KeyCode::Up | KeyCode::BackTab => self.form.focus_prev(),
            KeyCode::Down | KeyCode::Tab => self.form.focus_next(),
            KeyCode::Enter => match self.form.current_item() {
                FormItem::Domain(_) | FormItem::Field(_) => {
                    self.form.editing = true;
                }
                FormItem::AddDomain => {
                    self.form.add_domain();
                    self.form.focus_domain(self.form.domains().len() - 1);
                    self.form.editing = true;
                }
                FormItem::Submit => return Some(FormAction::Submit),
            },
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(FormAction::Submit);
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.remove_focused_domain();
            }
            KeyCode::Delete => self.remove_focused_domain(),
            KeyCode::PageDown => {
                self.report_scroll = self
                    .report_scroll
                    .saturating_add(PAGE_SCROLL)
                    .min(self.max_report_scroll());
            }
            KeyCode::PageUp => {
                self.report_scroll = self.report_scroll.saturating_sub(PAGE_SCROLL);
            }
            KeyCode::Esc | KeyCode::Char('q') => return Some(FormAction::Quit),
            _ => {}
        }

        None
    }

    /// Last scroll offset that still shows a line of the result.
    fn max_report_scroll(&self) -> u16 {
        let lines = self
            .submission
            .result_text()
            .map_or(0, |text| text.lines().count());
        u16::try_from(lines.saturating_sub(1)).unwrap_or(u16::MAX)
    }

    fn remove_focused_domain(&mut self) {
        if let FormItem::Domain(index) = self.form.current_item() {
            self.form.remove_domain(index);
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let [form_area, output_area] = ui::split_screen(frame);

        let form_view = ReportFormView {
            form: &self.form,
            can_submit: self.can_submit(),
        };
        ui::render_report_form(frame, form_area, &form_view);

        let output_view = ReportOutputView {
            submission: &self.submission,
            tick: self.tick,
            scroll: self.report_scroll,
        };
        ui::render_report_output(frame, output_area, &output_view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn filled_app(uri: &str) -> App {
        let mut app = App::with_client(ReportClient::new(uri));
        app.form.set_domain(0, "a.com");
        app.form.set_field(FormField::CompanyName, "Acme");
        app.form.set_field(FormField::Industry, "Energy");
        app
    }

    async fn mock_report(status: u16, body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate_report"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_successful_submission_shows_report() {
        let server = mock_report(200, json!({"report": "Report text"})).await;
        let mut app = filled_app(&server.uri());

        assert!(app.submit());
        assert!(app.is_loading());
        assert!(!app.can_submit());

        app.await_submission().await;
        assert!(!app.is_loading());
        assert_eq!(app.submission.result_text(), Some("Report text"));
    }

    #[tokio::test]
    async fn test_server_error_is_shown_verbatim() {
        let server = mock_report(400, json!({"error": "Bad API key"})).await;
        let mut app = filled_app(&server.uri());

        assert!(app.submit());
        app.await_submission().await;
        assert_eq!(
            app.submission,
            SubmissionState::Failed("Bad API key".to_string())
        );
    }

    #[tokio::test]
    async fn test_error_without_message_shows_generic_text() {
        let server = mock_report(500, json!({})).await;
        let mut app = filled_app(&server.uri());

        app.submit();
        app.await_submission().await;
        let text = app.submission.result_text().unwrap();
        assert!(!text.is_empty());
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn test_resubmit_clears_previous_result() {
        let server = mock_report(500, json!({"error": "first"})).await;
        let mut app = filled_app(&server.uri());

        app.submit();
        app.await_submission().await;
        assert_eq!(app.submission.result_text(), Some("first"));

        server.reset().await;
        Mock::given(method("POST"))
            .and(path("/generate_report"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"report": "second"})))
            .mount(&server)
            .await;

        assert!(app.submit());
        assert_eq!(app.submission.result_text(), None);
        app.await_submission().await;
        assert_eq!(app.submission.result_text(), Some("second"));
    }

    #[tokio::test]
    async fn test_submit_unavailable_without_required_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut app = filled_app(&server.uri());
        app.form.set_domain(0, "   ");

        assert!(!app.can_submit());
        assert!(!app.submit());
        assert_eq!(app.submission, SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_second_submit_while_loading_is_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate_report"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"report": "only once"}))
                    .set_delay(std::time::Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;
        let mut app = filled_app(&server.uri());

        assert!(app.submit());
        assert!(!app.submit());
        assert_eq!(app.handle_key(ctrl('s')), Some(FormAction::Submit));
        assert!(!app.submit());
        assert!(app.is_loading());

        app.await_submission().await;
        assert_eq!(app.submission.result_text(), Some("only once"));
    }

    #[tokio::test]
    async fn test_event_loop_polling_settles_request() {
        let server = mock_report(200, json!({"report": "Report text"})).await;
        let mut app = filled_app(&server.uri());

        assert!(app.submit());
        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while app.is_loading() {
                app.poll_submission().await;
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        assert!(app.pending.is_none());
        assert_eq!(app.submission.result_text(), Some("Report text"));
    }

    #[test]
    fn test_new_app_starts_with_empty_api_keys() {
        let config = Config::try_parse_from(["threat-report", "--api-url", "http://localhost:1"])
            .unwrap();
        let app = App::new(&config);

        assert_eq!(app.form.gemini_api_key(), None);
        assert_eq!(app.form.openai_api_key(), None);
        assert_eq!(app.form.to_payload().openai_api_key, None);
    }

    #[test]
    fn test_page_down_stops_at_last_report_line() {
        let mut app = App::with_client(ReportClient::new("http://localhost:1"));
        app.handle_key(press(KeyCode::PageDown));
        assert_eq!(app.report_scroll, 0);

        app.submission = SubmissionState::Success("line\n".repeat(15));
        app.handle_key(press(KeyCode::PageDown));
        assert_eq!(app.report_scroll, 10);
        app.handle_key(press(KeyCode::PageDown));
        app.handle_key(press(KeyCode::PageDown));
        assert_eq!(app.report_scroll, 14);

        app.handle_key(press(KeyCode::PageUp));
        assert_eq!(app.report_scroll, 4);
    }

    #[test]
    fn test_typing_into_domain_and_adding_another() {
        let mut app = App::with_client(ReportClient::new("http://localhost:1"));

        app.handle_key(press(KeyCode::Enter));
        type_text(&mut app, "acme.com");
        app.handle_key(press(KeyCode::Backspace));
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.form.domains()[0], "acme.co");

        app.handle_key(press(KeyCode::Down));
        assert_eq!(app.form.current_item(), FormItem::AddDomain);
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.form.domains().len(), 2);
        assert_eq!(app.form.current_item(), FormItem::Domain(1));
        assert!(app.form.editing);

        type_text(&mut app, "acme.io");
        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.form.domains()[1], "acme.io");

        app.handle_key(ctrl('d'));
        assert_eq!(app.form.domains(), &["acme.co".to_string()]);

        app.handle_key(press(KeyCode::Delete));
        assert_eq!(app.form.domains().len(), 1);
    }

    #[test]
    fn test_q_while_editing_is_text_not_quit() {
        let mut app = App::with_client(ReportClient::new("http://localhost:1"));
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.handle_key(press(KeyCode::Char('q'))), None);
        assert_eq!(app.form.domains()[0], "q");

        app.handle_key(press(KeyCode::Enter));
        assert_eq!(
            app.handle_key(press(KeyCode::Char('q'))),
            Some(FormAction::Quit)
        );
    }

    #[test]
    fn test_ctrl_s_requests_submit() {
        let mut app = App::with_client(ReportClient::new("http://localhost:1"));
        assert_eq!(app.handle_key(ctrl('s')), Some(FormAction::Submit));
        assert!(!app.submit());
    }
}
