use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ComposeError, ImageUri};

/// Unique identifier of a question within one composition session.
///
/// Assigned from the creation timestamp (milliseconds since the Unix epoch) by the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(u64);

impl QuestionId {
    /// Create an id from its raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The type of a question. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// Free-text answer.
    Text,

    /// Pick exactly one option (radio group).
    Grid,

    /// Pick any number of options.
    CheckBox,
}

impl QuestionType {
    /// All question types, in the order a composer offers them.
    pub const ALL: [QuestionType; 3] = [Self::Text, Self::Grid, Self::CheckBox];

    /// Whether questions of this type carry answer options.
    pub fn has_options(self) -> bool {
        matches!(self, Self::Grid | Self::CheckBox)
    }

    /// The wire name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Grid => "Grid",
            Self::CheckBox => "CheckBox",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single survey item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,

    #[serde(rename = "type")]
    kind: QuestionType,

    text: String,

    /// Answer options. Storage is type-agnostic; front-ends only show them for
    /// `Grid` and `CheckBox` questions.
    options: Vec<String>,

    image: Option<ImageUri>,
}

/// A partial update to one field of a question.
///
/// `id` and `type` are immutable and therefore have no variant here.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionUpdate {
    /// Replace the prompt text.
    Text(String),

    /// Replace the whole option list.
    Options(Vec<String>),

    /// Set or clear the attached image.
    Image(Option<ImageUri>),
}

impl Question {
    /// Create an empty question: no text, no options, no image.
    pub fn new(id: QuestionId, kind: QuestionType) -> Self {
        Self {
            id,
            kind,
            text: String::new(),
            options: Vec::new(),
            image: None,
        }
    }

    /// Set the prompt text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the option list.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Set the attached image.
    pub fn with_image(mut self, image: impl Into<ImageUri>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn id(&self) -> QuestionId {
        self.id
    }

    /// Get the question type.
    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    /// Get the prompt text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the answer options.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Get the attached image, if any.
    pub fn image(&self) -> Option<&ImageUri> {
        self.image.as_ref()
    }

    /// Replace the field named by `update`, leaving all other fields untouched.
    pub fn apply(&mut self, update: QuestionUpdate) {
        match update {
            QuestionUpdate::Text(text) => self.text = text,
            QuestionUpdate::Options(options) => self.options = options,
            QuestionUpdate::Image(image) => self.image = image,
        }
    }

    /// Append an empty option and return its index.
    pub fn push_option(&mut self) -> usize {
        self.options.push(String::new());
        self.options.len() - 1
    }

    /// Replace the option at `index`.
    ///
    /// Out-of-range indices are rejected and nothing is written.
    pub fn set_option(&mut self, index: usize, value: impl Into<String>) -> Result<(), ComposeError> {
        let len = self.options.len();
        match self.options.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(ComposeError::OptionOutOfRange {
                id: self.id,
                index,
                len,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_wire_field_names() {
        let question = Question::new(QuestionId::new(1700000000000), QuestionType::CheckBox)
            .with_text("Pick fruit")
            .with_options(["Apple", "Pear"]);

        assert_eq!(
            serde_json::to_value(&question).unwrap(),
            json!({
                "id": 1700000000000u64,
                "type": "CheckBox",
                "text": "Pick fruit",
                "options": ["Apple", "Pear"],
                "image": null,
            })
        );
    }

    #[test]
    fn only_grid_and_checkbox_have_options() {
        assert!(!QuestionType::Text.has_options());
        assert!(QuestionType::Grid.has_options());
        assert!(QuestionType::CheckBox.has_options());
    }

    #[test]
    fn apply_touches_only_the_named_field() {
        let mut question = Question::new(QuestionId::new(7), QuestionType::Grid)
            .with_text("Size?")
            .with_options(["S", "M"]);

        question.apply(QuestionUpdate::Image(Some(ImageUri::new("file:///x.png"))));

        assert_eq!(question.text(), "Size?");
        assert_eq!(question.options(), ["S", "M"]);
        assert_eq!(question.image().map(ImageUri::as_str), Some("file:///x.png"));
        assert_eq!(question.kind(), QuestionType::Grid);
    }

    #[test]
    fn set_option_rejects_out_of_range() {
        let mut question = Question::new(QuestionId::new(3), QuestionType::Grid);
        question.push_option();

        let err = question.set_option(1, "late").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Option index 1 is out of range for question 3 (1 options)"
        );
        assert_eq!(question.options(), [""]);
    }
}
