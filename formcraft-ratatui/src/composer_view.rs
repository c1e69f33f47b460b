//! The composer screen: header image, question list and the image prompt.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use formcraft::{FormComposer, Question, QuestionId, QuestionType, QuestionUpdate};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tracing::warn;

use crate::{FilePathPicker, Theme};

/// A focusable line of the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Row {
    Header,
    Question(QuestionId),
    Option(QuestionId, usize),
}

/// What an image prompt will attach its result to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImageTarget {
    Header,
    Question(QuestionId),
}

#[derive(Debug, Clone)]
pub(crate) struct ImagePrompt {
    pub target: ImageTarget,
    pub input: String,
}

/// What the app should do after a composer key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComposerAction {
    None,
    Preview,
    Quit,
}

#[derive(Debug, Default)]
pub(crate) struct ComposerView {
    focus: usize,
    prompt: Option<ImagePrompt>,
    scroll: u16,
}

impl ComposerView {
    /// All focusable rows in display order.
    ///
    /// Option rows exist only for question types that carry options.
    pub fn rows(composer: &FormComposer) -> Vec<Row> {
        let mut rows = vec![Row::Header];
        for question in composer.questions() {
            rows.push(Row::Question(question.id()));
            if question.kind().has_options() {
                rows.extend((0..question.options().len()).map(|i| Row::Option(question.id(), i)));
            }
        }
        rows
    }

    pub fn focused_row(&self, composer: &FormComposer) -> Row {
        let rows = Self::rows(composer);
        rows.get(self.focus.min(rows.len() - 1))
            .copied()
            .unwrap_or(Row::Header)
    }

    pub fn prompt(&self) -> Option<&ImagePrompt> {
        self.prompt.as_ref()
    }

    fn focus_on(&mut self, composer: &FormComposer, row: Row) {
        if let Some(idx) = Self::rows(composer).iter().position(|r| *r == row) {
            self.focus = idx;
        }
    }

    fn move_focus(&mut self, composer: &FormComposer, delta: isize) {
        let last = Self::rows(composer).len() - 1;
        self.focus = self.focus.min(last).saturating_add_signed(delta).min(last);
    }

    fn focused_question(&self, composer: &FormComposer) -> Option<QuestionId> {
        match self.focused_row(composer) {
            Row::Header => None,
            Row::Question(id) | Row::Option(id, _) => Some(id),
        }
    }

    pub fn handle_key(&mut self, composer: &mut FormComposer, key: KeyEvent) -> ComposerAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return ComposerAction::Quit;
        }

        if self.prompt.is_some() {
            self.handle_prompt_key(composer, key);
            return ComposerAction::None;
        }

        match key.code {
            KeyCode::Esc => return ComposerAction::Quit,
            KeyCode::Tab | KeyCode::Down => self.move_focus(composer, 1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(composer, -1),
            KeyCode::F(2) => self.add_question(composer, QuestionType::Text),
            KeyCode::F(3) => self.add_question(composer, QuestionType::Grid),
            KeyCode::F(4) => self.add_question(composer, QuestionType::CheckBox),
            KeyCode::F(5) => return ComposerAction::Preview,
            KeyCode::F(6) => self.open_prompt(composer),
            KeyCode::Char('o') if ctrl => self.add_option(composer),
            KeyCode::Backspace => self.edit_focused(composer, |text| {
                text.pop();
            }),
            KeyCode::Char(c) if !has_command_modifier(key) => {
                self.edit_focused(composer, |text| text.push(c))
            }
            _ => {}
        }
        ComposerAction::None
    }

    fn handle_prompt_key(&mut self, composer: &mut FormComposer, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    let picker = FilePathPicker::new(prompt.input);
                    match prompt.target {
                        ImageTarget::Header => composer.pick_header_image(&picker),
                        ImageTarget::Question(id) => composer.pick_question_image(id, &picker),
                    };
                }
            }
            KeyCode::Backspace => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.input.pop();
                }
            }
            KeyCode::Char(c) if !has_command_modifier(key) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.input.push(c);
                }
            }
            _ => {}
        }
    }

    fn add_question(&mut self, composer: &mut FormComposer, kind: QuestionType) {
        let id = composer.add_question(kind);
        self.focus_on(composer, Row::Question(id));
    }

    fn add_option(&mut self, composer: &mut FormComposer) {
        let Some(id) = self.focused_question(composer) else {
            return;
        };
        // Text questions never show options, so the action is not offered for them.
        if !composer
            .question(id)
            .is_some_and(|q| q.kind().has_options())
        {
            return;
        }
        if let Some(index) = composer.add_option(id) {
            self.focus_on(composer, Row::Option(id, index));
        }
    }

    fn open_prompt(&mut self, composer: &FormComposer) {
        let target = match self.focused_question(composer) {
            Some(id) => ImageTarget::Question(id),
            None => ImageTarget::Header,
        };
        self.prompt = Some(ImagePrompt {
            target,
            input: String::new(),
        });
    }

    fn edit_focused(&mut self, composer: &mut FormComposer, edit: impl FnOnce(&mut String)) {
        match self.focused_row(composer) {
            Row::Header => {}
            Row::Question(id) => {
                if let Some(question) = composer.question(id) {
                    let mut text = question.text().to_string();
                    edit(&mut text);
                    composer.update_question(id, QuestionUpdate::Text(text));
                }
            }
            Row::Option(id, index) => {
                let Some(mut value) = composer
                    .question(id)
                    .and_then(|q| q.options().get(index))
                    .cloned()
                else {
                    return;
                };
                edit(&mut value);
                if let Err(err) = composer.update_option(id, index, value) {
                    warn!(error = %err, "option edit dropped");
                }
            }
        }
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, composer: &FormComposer, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // Form content
                Constraint::Length(3), // Image prompt
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let focused = self.focused_row(composer);
        let (lines, focused_line) = composer_lines(composer, focused, theme);

        let viewport = chunks[0].height.saturating_sub(2);
        let focused_line = focused_line as u16;
        if focused_line < self.scroll {
            self.scroll = focused_line;
        } else if viewport > 0 && focused_line >= self.scroll.saturating_add(viewport) {
            self.scroll = focused_line + 1 - viewport;
        }

        let content = Paragraph::new(lines).scroll((self.scroll, 0)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(format!(" Questions ({}) ", composer.len())),
        );
        frame.render_widget(content, chunks[0]);

        let prompt = match &self.prompt {
            Some(prompt) => {
                let label = match prompt.target {
                    ImageTarget::Header => " Header image path ".to_string(),
                    ImageTarget::Question(id) => format!(" Image path for question {id} "),
                };
                Paragraph::new(prompt.input.as_str())
                    .style(Style::default().fg(theme.text))
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(theme.primary))
                            .title(label),
                    )
            }
            None => Paragraph::new("F6 on the header or a question to add an image")
                .style(Style::default().fg(theme.border))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(theme.border)),
                ),
        };
        frame.render_widget(prompt, chunks[1]);
        if let Some(prompt) = &self.prompt {
            let typed = u16::try_from(prompt.input.chars().count()).unwrap_or(u16::MAX);
            let x = chunks[1].x.saturating_add(1).saturating_add(typed);
            if x < chunks[1].right().saturating_sub(1) {
                frame.set_cursor_position((x, chunks[1].y.saturating_add(1)));
            }
        }

        let help_text = if self.prompt.is_some() {
            "Enter: Use image  Esc: Cancel"
        } else {
            "F2: Text  F3: Grid  F4: CheckBox  Ctrl+O: Add option  F6: Image  F5: Preview  Esc: Quit"
        };
        let help = Paragraph::new(help_text).style(Style::default().fg(theme.border));
        frame.render_widget(help, chunks[2]);
    }
}

/// Ctrl and Alt chords are commands, never text.
fn has_command_modifier(key: KeyEvent) -> bool {
    key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

/// Render the form as lines and report which line holds the focused row.
fn composer_lines<'a>(
    composer: &'a FormComposer,
    focused: Row,
    theme: &Theme,
) -> (Vec<Line<'a>>, usize) {
    let mut lines = Vec::new();
    let mut focused_line = 0;

    let row_style = |row: Row| {
        if row == focused {
            Style::default()
                .fg(theme.text)
                .bg(theme.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        }
    };
    let marker = |row: Row| if row == focused { "▶ " } else { "  " };

    let header = match composer.header_image() {
        Some(uri) => format!("Change Header Image  ({uri})"),
        None => "Add Header Image".to_string(),
    };
    lines.push(Line::from(vec![
        Span::raw(marker(Row::Header)),
        Span::styled(header, row_style(Row::Header).fg(theme.primary)),
    ]));

    if composer.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "  No questions yet. Add one with F2, F3 or F4.",
            Style::default().fg(theme.border),
        ));
    }

    for (number, question) in composer.questions().iter().enumerate() {
        lines.push(Line::raw(""));
        let row = Row::Question(question.id());
        if row == focused {
            focused_line = lines.len();
        }
        lines.push(question_line(number + 1, question, marker(row), row_style(row), theme));

        if let Some(image) = question.image() {
            lines.push(Line::styled(
                format!("      image: {image}"),
                Style::default().fg(theme.secondary),
            ));
        }

        if question.kind().has_options() {
            for (index, option) in question.options().iter().enumerate() {
                let row = Row::Option(question.id(), index);
                if row == focused {
                    focused_line = lines.len();
                }
                let value = if option.is_empty() {
                    Span::styled(format!("Option {}", index + 1), Style::default().fg(theme.border))
                } else {
                    Span::styled(option.as_str(), row_style(row))
                };
                lines.push(Line::from(vec![
                    Span::raw(format!("    {}", marker(row))),
                    Span::styled(format!("{}. ", index + 1), row_style(row)),
                    value,
                ]));
            }
        }

        if question.kind() == QuestionType::Grid {
            lines.push(Line::styled(
                "      (Grid question should act as a radio group)",
                Style::default()
                    .fg(theme.border)
                    .add_modifier(Modifier::ITALIC),
            ));
        }
    }

    (lines, focused_line)
}

fn question_line<'a>(
    number: usize,
    question: &'a Question,
    marker: &'static str,
    style: Style,
    theme: &Theme,
) -> Line<'a> {
    let text = if question.text().is_empty() {
        Span::styled("Enter question text", style.fg(theme.border))
    } else {
        Span::styled(question.text(), style)
    };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(
            format!("{number}. [{}] ", question.kind()),
            style.fg(theme.highlight),
        ),
        text,
    ])
}
