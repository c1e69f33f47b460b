//! Terminal application: screen stack, alerts and background submissions.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use formcraft::{
    FormComposer, FormSubmitter, Navigation, Notification, NotificationLevel, SaveError,
    SavedForm, SubmitError,
};
use ratatui::{
    Frame, Terminal,
    layout::{Constraint, Direction, Layout, Rect},
    prelude::CrosstermBackend,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use thiserror::Error;
use tracing::{debug, info};

use crate::composer_view::{ComposerAction, ComposerView};
use crate::preview_view::{PreviewAction, PreviewView};

/// How long the event loop waits for input before checking on submissions.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Error type for the terminal application.
#[derive(Debug, Error)]
pub enum RatatuiAppError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal setup/restore error.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub text: Color,
    pub highlight: Color,
    pub error: Color,
    pub success: Color,
    pub border: Color,
    pub selected_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Blue,
            text: Color::White,
            highlight: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
            border: Color::Gray,
            selected_bg: Color::DarkGray,
        }
    }
}

/// Outcome of a background submission, tagged with the preview it belongs to.
struct Completed {
    generation: u64,
    outcome: Result<serde_json::Value, SubmitError>,
}

/// The two-screen form builder: a composer with an optional preview on top.
pub struct ComposerApp {
    title: String,
    theme: Theme,
    composer: FormComposer,
    composer_view: ComposerView,
    preview: Option<PreviewView>,
    alert: Option<Notification>,
    submitter: Arc<dyn FormSubmitter + Send + Sync>,
    generation: u64,
    completed_tx: Sender<Completed>,
    completed_rx: Receiver<Completed>,
    quit: bool,
}

impl ComposerApp {
    /// Create an app with an empty form that saves through `submitter`.
    pub fn new(submitter: Arc<dyn FormSubmitter + Send + Sync>) -> Self {
        let (completed_tx, completed_rx) = mpsc::channel();
        Self {
            title: "Form Builder".to_string(),
            theme: Theme::default(),
            composer: FormComposer::new(),
            composer_view: ComposerView::default(),
            preview: None,
            alert: None,
            submitter,
            generation: 0,
            completed_tx,
            completed_rx,
            quit: false,
        }
    }

    /// Set the title shown at the top of the screen.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set a custom color theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// The composer state.
    pub fn composer(&self) -> &FormComposer {
        &self.composer
    }

    /// The alert currently shown, if any.
    pub fn alert(&self) -> Option<&Notification> {
        self.alert.as_ref()
    }

    /// Whether the preview screen is on top.
    pub fn is_previewing(&self) -> bool {
        self.preview.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Run the event loop until the user quits.
    pub fn run(mut self) -> Result<FormComposer, RatatuiAppError> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        result.map(|()| self.composer)
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<(), RatatuiAppError> {
        while !self.quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.poll_submissions();

            if event::poll(POLL_INTERVAL)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    /// Route a key press to the alert, the preview, or the composer.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.alert.take().is_some() {
            if let Some(preview) = self.preview.as_mut() {
                preview.previewer.acknowledge_failure();
            }
            return;
        }

        if let Some(preview) = self.preview.as_mut() {
            match preview.handle_key(key) {
                PreviewAction::None => {}
                PreviewAction::Save => self.start_save(),
                PreviewAction::Back => {
                    debug!("leaving preview");
                    self.preview = None;
                }
            }
            return;
        }

        match self.composer_view.handle_key(&mut self.composer, key) {
            ComposerAction::None => {}
            ComposerAction::Preview => {
                self.generation += 1;
                self.preview = Some(PreviewView::new(
                    self.composer.request_preview(),
                    self.generation,
                ));
            }
            ComposerAction::Quit => self.quit = true,
        }
    }

    /// Validate the previewed snapshot and hand it to a worker thread.
    fn start_save(&mut self) {
        let Some(preview) = self.preview.as_mut() else {
            return;
        };

        let submission = match preview.previewer.begin_save() {
            Ok(submission) => submission,
            Err(err) => {
                self.alert = Some(Notification::from_error(&err));
                return;
            }
        };

        let submitter = Arc::clone(&self.submitter);
        let completed_tx = self.completed_tx.clone();
        let generation = preview.generation;
        thread::spawn(move || {
            let outcome = submission.send(submitter.as_ref());
            if completed_tx
                .send(Completed {
                    generation,
                    outcome,
                })
                .is_err()
            {
                debug!("app closed before submission finished");
            }
        });
    }

    /// Apply every finished submission without blocking.
    pub fn poll_submissions(&mut self) {
        while let Ok(completed) = self.completed_rx.try_recv() {
            self.apply_completed(completed);
        }
    }

    fn apply_completed(&mut self, completed: Completed) {
        let Some(preview) = self
            .preview
            .as_mut()
            .filter(|p| p.generation == completed.generation)
        else {
            // The preview is gone but the request still reached the endpoint; report it
            // without navigating.
            info!(
                generation = completed.generation,
                ok = completed.outcome.is_ok(),
                "result for a closed preview"
            );
            let result = completed
                .outcome
                .map(|response| SavedForm { response })
                .map_err(SaveError::from);
            self.alert = Some(Notification::from_result(&result));
            return;
        };

        let result = preview.previewer.finish_save(completed.outcome);
        self.alert = Some(Notification::from_result(&result));
        if Navigation::after(&result) == Navigation::Back {
            self.preview = None;
        }
    }

    /// Draw the whole screen.
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(8),    // Active screen
            ])
            .split(area);

        let subtitle = if self.preview.is_some() {
            "Preview"
        } else {
            "Editor"
        };
        let title = Paragraph::new(format!("{} · {subtitle}", self.title))
            .style(
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(self.theme.border)),
            );
        frame.render_widget(title, chunks[0]);

        match self.preview.as_mut() {
            Some(preview) => preview.draw(frame, chunks[1], &self.theme),
            None => self
                .composer_view
                .draw(frame, chunks[1], &self.composer, &self.theme),
        }

        if let Some(alert) = &self.alert {
            draw_alert(frame, area, alert, &self.theme);
        }
    }
}

fn draw_alert(frame: &mut Frame, area: Rect, alert: &Notification, theme: &Theme) {
    let color = match alert.level {
        NotificationLevel::Success => theme.success,
        NotificationLevel::Error => theme.error,
    };
    let popup = centered(area, 50, 7);
    frame.render_widget(Clear, popup);

    let body = Paragraph::new(format!("{}\n\n(press any key)", alert.message))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(theme.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", alert.title))
                .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
        );
    frame.render_widget(body, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, RatatuiAppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)
        .map_err(|err| RatatuiAppError::Terminal(err.to_string()))?;
    Ok(terminal)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<(), RatatuiAppError> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use formcraft::{PreviewState, TestSubmitter};
    use ratatui::backend::TestBackend;
    use serde_json::json;

    fn press(app: &mut ComposerApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    /// Close an alert the way a user would: any key.
    fn dismiss(app: &mut ComposerApp) {
        press(app, KeyCode::Enter);
    }

    fn type_str(app: &mut ComposerApp, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Block until every outstanding submission has been applied.
    fn settle(app: &mut ComposerApp) {
        while app
            .preview
            .as_ref()
            .is_some_and(|p| p.previewer.in_flight() > 0)
        {
            let completed = app
                .completed_rx
                .recv_timeout(Duration::from_secs(5))
                .expect("submission did not finish");
            app.apply_completed(completed);
        }
    }

    fn compose_valid_form(app: &mut ComposerApp) {
        press(app, KeyCode::F(6));
        type_str(app, "https://example.com/header.png");
        press(app, KeyCode::Enter);
        press(app, KeyCode::F(4));
        type_str(app, "Toppings?");
        app.handle_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL));
        type_str(app, "Cheese");
    }

    fn render(app: &mut ComposerApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn validation_error_alerts_without_submitting() {
        let submitter = Arc::new(TestSubmitter::new());
        let mut app = ComposerApp::new(submitter.clone());

        press(&mut app, KeyCode::F(5));
        assert!(app.is_previewing());
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.alert().unwrap().title, "Validation Error");
        assert_eq!(submitter.call_count(), 0);

        dismiss(&mut app);
        assert!(app.alert().is_none());
        assert!(app.is_previewing());
    }

    #[test]
    fn successful_save_alerts_and_returns_to_editor() {
        let submitter = Arc::new(TestSubmitter::new().with_success(json!({ "id": 1 })));
        let mut app = ComposerApp::new(submitter.clone());
        compose_valid_form(&mut app);

        press(&mut app, KeyCode::F(5));
        press(&mut app, KeyCode::Enter);
        settle(&mut app);

        assert_eq!(app.alert(), Some(&Notification::saved()));
        assert!(!app.is_previewing());
        assert_eq!(app.composer().len(), 1);

        let body = &submitter.submissions()[0];
        assert_eq!(body["headerImage"], "https://example.com/header.png");
        assert_eq!(body["questions"][0]["type"], "CheckBox");
        assert_eq!(body["questions"][0]["text"], "Toppings?");
        assert_eq!(body["questions"][0]["options"], json!(["Cheese"]));
    }

    #[test]
    fn rejection_keeps_preview_for_retry() {
        let submitter = Arc::new(
            TestSubmitter::new()
                .with_rejection(400, Some("bad image url"))
                .with_success(json!({ "id": 7 })),
        );
        let mut app = ComposerApp::new(submitter.clone());
        compose_valid_form(&mut app);

        press(&mut app, KeyCode::F(5));
        press(&mut app, KeyCode::Enter);
        settle(&mut app);

        assert_eq!(app.alert().unwrap().message, "bad image url");
        assert!(app.is_previewing());
        assert_eq!(
            app.preview.as_ref().unwrap().previewer.state(),
            PreviewState::Failed
        );

        dismiss(&mut app);
        assert_eq!(
            app.preview.as_ref().unwrap().previewer.state(),
            PreviewState::Idle
        );

        press(&mut app, KeyCode::Enter);
        settle(&mut app);

        assert_eq!(app.alert(), Some(&Notification::saved()));
        let bodies = submitter.submissions();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0], bodies[1]);
    }

    #[test]
    fn closed_preview_still_reports_outcome() {
        let submitter = Arc::new(TestSubmitter::new().with_success(json!({ "id": 1 })));
        let mut app = ComposerApp::new(submitter.clone());
        compose_valid_form(&mut app);

        press(&mut app, KeyCode::F(5));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        assert!(!app.is_previewing());

        let completed = app
            .completed_rx
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        app.apply_completed(completed);

        assert_eq!(submitter.call_count(), 1);
        assert_eq!(app.alert(), Some(&Notification::saved()));
        assert!(!app.is_previewing());
    }

    #[test]
    fn closed_preview_reports_rejection() {
        let submitter = Arc::new(TestSubmitter::new().with_rejection(400, Some("bad image url")));
        let mut app = ComposerApp::new(submitter);
        compose_valid_form(&mut app);

        press(&mut app, KeyCode::F(5));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);

        let completed = app
            .completed_rx
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        app.apply_completed(completed);

        let alert = app.alert().unwrap();
        assert_eq!(alert.title, "Error");
        assert_eq!(alert.message, "bad image url");
        assert!(!app.is_previewing());
    }

    #[test]
    fn zero_width_terminal_with_open_prompt_renders() {
        let mut app = ComposerApp::new(Arc::new(TestSubmitter::new()));
        press(&mut app, KeyCode::F(6));
        type_str(&mut app, "/tmp/header.png");

        let mut terminal = Terminal::new(TestBackend::new(0, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(1, 1)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
    }

    #[test]
    fn escape_on_editor_quits() {
        let mut app = ComposerApp::new(Arc::new(TestSubmitter::new()));
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }

    #[test]
    fn editor_renders_questions() {
        let mut app = ComposerApp::new(Arc::new(TestSubmitter::new())).with_title("Survey");
        compose_valid_form(&mut app);
        press(&mut app, KeyCode::F(3));

        let screen = render(&mut app);

        assert!(screen.contains("Survey · Editor"));
        assert!(screen.contains("Change Header Image"));
        assert!(screen.contains("[CheckBox] Toppings?"));
        assert!(screen.contains("Cheese"));
        assert!(screen.contains("[Grid] Enter question text"));
        assert!(screen.contains("(Grid question should act as a radio group)"));
    }

    #[test]
    fn preview_renders_snapshot_and_alert() {
        let mut app = ComposerApp::new(Arc::new(TestSubmitter::new()));
        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::F(5));

        let screen = render(&mut app);
        assert!(screen.contains("Preview"));
        assert!(screen.contains("No question text provided"));
        assert!(screen.contains("(no header image)"));

        press(&mut app, KeyCode::Enter);
        let screen = render(&mut app);
        assert!(screen.contains("Validation Error"));
        assert!(screen.contains("Please ensure all required fields are filled."));
    }
}
