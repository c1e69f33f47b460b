use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{ImageUri, Question, QuestionId, ValidationError};

/// The aggregate of a header image and an ordered list of questions.
///
/// Insertion order of `questions` is both the display and the submission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    /// All questions, in insertion order.
    pub questions: Vec<Question>,

    /// Optional image shown above the questions.
    pub header_image: Option<ImageUri>,
}

impl Form {
    /// Create a form with the given questions and no header image.
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            header_image: None,
        }
    }

    /// Create an empty form.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the header image.
    pub fn with_header_image(mut self, image: impl Into<ImageUri>) -> Self {
        self.header_image = Some(image.into());
        self
    }

    /// Find a question by id.
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Find a question by id for mutation.
    pub fn question_mut(&mut self, id: QuestionId) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| q.id() == id)
    }

    /// Check if the form has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Check the submission preconditions: at least one question and a header image.
    ///
    /// The contents of individual questions are not checked; an empty prompt is valid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.questions.is_empty() {
            return Err(ValidationError::NoQuestions);
        }
        if self.header_image.is_none() {
            return Err(ValidationError::MissingHeaderImage);
        }
        Ok(())
    }
}

/// An immutable copy of a [`Form`] handed from the composer to the previewer.
///
/// Cloning a snapshot is cheap; it shares the underlying form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormSnapshot(Arc<Form>);

impl FormSnapshot {
    pub fn new(form: Arc<Form>) -> Self {
        Self(form)
    }

    /// Get the snapshotted form.
    pub fn form(&self) -> &Form {
        &self.0
    }

    /// Serialize to the JSON body sent to the remote endpoint.
    pub fn to_json(&self) -> serde_json::Value {
        // Form contains only strings, integers and sequences; serialization cannot fail.
        serde_json::to_value(self.form()).unwrap_or(serde_json::Value::Null)
    }
}

impl Deref for FormSnapshot {
    type Target = Form;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Form> for FormSnapshot {
    fn from(form: Form) -> Self {
        Self(Arc::new(form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuestionType;
    use serde_json::json;

    #[test]
    fn serializes_header_image_in_camel_case() {
        let form = Form::new(vec![Question::new(QuestionId::new(1), QuestionType::Text)]);
        assert_eq!(
            serde_json::to_value(&form).unwrap(),
            json!({
                "questions": [
                    { "id": 1, "type": "Text", "text": "", "options": [], "image": null }
                ],
                "headerImage": null,
            })
        );
    }

    #[test]
    fn validation_requires_questions_and_header() {
        assert_eq!(Form::empty().validate(), Err(ValidationError::NoQuestions));

        let with_header_only = Form::empty().with_header_image("file:///h.png");
        assert_eq!(with_header_only.validate(), Err(ValidationError::NoQuestions));

        let without_header = Form::new(vec![Question::new(QuestionId::new(1), QuestionType::Grid)]);
        assert_eq!(
            without_header.validate(),
            Err(ValidationError::MissingHeaderImage)
        );

        let complete = without_header.with_header_image("file:///h.png");
        assert_eq!(complete.validate(), Ok(()));
    }

    #[test]
    fn snapshot_json_matches_form() {
        let form = Form::new(vec![
            Question::new(QuestionId::new(5), QuestionType::Grid).with_options(["a"]),
        ])
        .with_header_image("file:///h.png");
        let snapshot = FormSnapshot::from(form.clone());

        assert_eq!(snapshot.to_json(), serde_json::to_value(&form).unwrap());
        assert_eq!(snapshot.len(), 1);
    }
}
