//! The preview screen: read-only rendering of a snapshot plus the save button.

use crossterm::event::{KeyCode, KeyEvent};
use formcraft::{FormPreviewer, PreviewState, QuestionType};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PreviewAction {
    None,
    Save,
    Back,
}

#[derive(Debug)]
pub(crate) struct PreviewView {
    pub previewer: FormPreviewer,
    /// Distinguishes this preview from earlier ones so late results can be dropped.
    pub generation: u64,
    scroll: u16,
}

impl PreviewView {
    pub fn new(previewer: FormPreviewer, generation: u64) -> Self {
        Self {
            previewer,
            generation,
            scroll: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PreviewAction {
        match key.code {
            KeyCode::Esc => PreviewAction::Back,
            KeyCode::Enter | KeyCode::F(5) => PreviewAction::Save,
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                PreviewAction::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                PreviewAction::None
            }
            _ => PreviewAction::None,
        }
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header image
                Constraint::Min(5),    // Questions
                Constraint::Length(3), // Save button
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let snapshot = self.previewer.snapshot();

        let header_text = match &snapshot.header_image {
            Some(uri) => uri.to_string(),
            None => "(no header image)".to_string(),
        };
        let header = Paragraph::new(header_text)
            .style(Style::default().fg(theme.secondary))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border))
                    .title(" Header Image "),
            );
        frame.render_widget(header, chunks[0]);

        let mut lines = Vec::new();
        for (number, question) in snapshot.questions.iter().enumerate() {
            if number > 0 {
                lines.push(Line::raw(""));
            }
            if let Some(image) = question.image() {
                lines.push(Line::styled(
                    format!("[image] {image}"),
                    Style::default().fg(theme.secondary),
                ));
            }
            let text = if question.text().is_empty() {
                "No question text provided"
            } else {
                question.text()
            };
            lines.push(Line::styled(
                format!("{}. {text}", number + 1),
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            ));
            let marker = match question.kind() {
                QuestionType::Text => continue,
                QuestionType::Grid => "( )",
                QuestionType::CheckBox => "[ ]",
            };
            for option in question.options() {
                lines.push(Line::styled(
                    format!("   {marker} {option}"),
                    Style::default().fg(theme.text),
                ));
            }
        }
        if lines.is_empty() {
            lines.push(Line::styled(
                "This form has no questions.",
                Style::default().fg(theme.border),
            ));
        }

        let max_scroll = (lines.len() as u16).saturating_sub(1);
        self.scroll = self.scroll.min(max_scroll);
        let questions = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border))
                    .title(format!(" Preview ({} questions) ", snapshot.len())),
            );
        frame.render_widget(questions, chunks[1]);

        let (label, color) = match self.previewer.state() {
            PreviewState::Idle => ("[ Save Form ]".to_string(), theme.primary),
            PreviewState::Submitting => (
                format!("Saving... ({} in flight)", self.previewer.in_flight()),
                theme.highlight,
            ),
            PreviewState::Saved => ("Saved".to_string(), theme.success),
            PreviewState::Failed => ("[ Save Form ]  (last attempt failed)".to_string(), theme.error),
        };
        let button = Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        frame.render_widget(button, chunks[2]);

        let help = Paragraph::new("Enter: Save  ↑/↓: Scroll  Esc: Back to editor")
            .style(Style::default().fg(theme.border));
        frame.render_widget(help, chunks[3]);
    }
}
