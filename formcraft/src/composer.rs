//! The composer screen's state: an owned, copy-on-write form.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use formcraft_types::{
    ComposeError, Form, FormSnapshot, ImagePicker, ImageUri, Question, QuestionId, QuestionType,
    QuestionUpdate,
};
use tracing::{debug, warn};

use crate::FormPreviewer;

/// Owns the form while it is being composed.
///
/// The form sits behind an `Arc`. Snapshots share it, and the next mutation after a
/// snapshot copies it (`Arc::make_mut`), so a previewer never observes later edits.
#[derive(Debug, Clone, Default)]
pub struct FormComposer {
    form: Arc<Form>,
    last_id: Option<u64>,
}

impl FormComposer {
    /// Create a composer with an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue composing an existing form.
    ///
    /// New ids are allocated above the largest id already present.
    pub fn from_form(form: Form) -> Self {
        let last_id = form.questions.iter().map(|q| q.id().get()).max();
        Self {
            form: Arc::new(form),
            last_id,
        }
    }

    /// Get the form being composed.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Get the questions in display order.
    pub fn questions(&self) -> &[Question] {
        &self.form.questions
    }

    /// Find a question by id.
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.form.question(id)
    }

    /// Get the header image, if one was picked.
    pub fn header_image(&self) -> Option<&ImageUri> {
        self.form.header_image.as_ref()
    }

    pub fn len(&self) -> usize {
        self.form.len()
    }

    pub fn is_empty(&self) -> bool {
        self.form.is_empty()
    }

    /// Append a new empty question of the given type and return its id.
    pub fn add_question(&mut self, kind: QuestionType) -> QuestionId {
        let id = self.next_id();
        Arc::make_mut(&mut self.form)
            .questions
            .push(Question::new(id, kind));
        debug!(%id, %kind, "added question");
        id
    }

    /// Replace one field of the question with the given id.
    ///
    /// Returns `false` (and changes nothing) if no such question exists.
    pub fn update_question(&mut self, id: QuestionId, update: QuestionUpdate) -> bool {
        if self.form.question(id).is_none() {
            debug!(%id, "update for unknown question ignored");
            return false;
        }
        if let Some(question) = Arc::make_mut(&mut self.form).question_mut(id) {
            question.apply(update);
        }
        true
    }

    /// Append an empty option to the question and return its index.
    ///
    /// Works for every question type; front-ends only offer it for `Grid` and `CheckBox`.
    pub fn add_option(&mut self, id: QuestionId) -> Option<usize> {
        self.form.question(id)?;
        let index = Arc::make_mut(&mut self.form)
            .question_mut(id)
            .map(Question::push_option);
        debug!(%id, ?index, "added option");
        index
    }

    /// Replace `options[index]` of the question.
    ///
    /// Returns `Ok(false)` if no such question exists and an error if `index` is out of
    /// range. Nothing is written in either case.
    pub fn update_option(
        &mut self,
        id: QuestionId,
        index: usize,
        value: impl Into<String>,
    ) -> Result<bool, ComposeError> {
        let Some(question) = self.form.question(id) else {
            debug!(%id, index, "option update for unknown question ignored");
            return Ok(false);
        };
        if index >= question.options().len() {
            return Err(ComposeError::OptionOutOfRange {
                id,
                index,
                len: question.options().len(),
            });
        }
        match Arc::make_mut(&mut self.form).question_mut(id) {
            Some(question) => question.set_option(index, value).map(|()| true),
            None => Ok(false),
        }
    }

    /// Set or clear the header image directly.
    pub fn set_header_image(&mut self, image: Option<ImageUri>) {
        Arc::make_mut(&mut self.form).header_image = image;
    }

    /// Ask the picker for a header image.
    ///
    /// Returns `true` if an image was set. Cancellation and picker failures leave the
    /// form unchanged and are not reported to the caller.
    pub fn pick_header_image(&mut self, picker: &dyn ImagePicker) -> bool {
        match pick(picker) {
            Some(uri) => {
                debug!(%uri, "header image picked");
                self.set_header_image(Some(uri));
                true
            }
            None => false,
        }
    }

    /// Ask the picker for an image to attach to a question.
    ///
    /// Returns `true` if an image was set. Unknown ids, cancellation and picker failures
    /// leave the form unchanged.
    pub fn pick_question_image(&mut self, id: QuestionId, picker: &dyn ImagePicker) -> bool {
        match pick(picker) {
            Some(uri) => {
                debug!(%id, %uri, "question image picked");
                self.update_question(id, QuestionUpdate::Image(Some(uri)))
            }
            None => false,
        }
    }

    /// Take an immutable snapshot of the form. No validation happens here.
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot::new(Arc::clone(&self.form))
    }

    /// Hand the current form over to a previewer.
    pub fn request_preview(&self) -> FormPreviewer {
        debug!(questions = self.len(), "opening preview");
        FormPreviewer::new(self.snapshot())
    }

    fn next_id(&mut self) -> QuestionId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let raw = match self.last_id {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last_id = Some(raw);
        QuestionId::new(raw)
    }
}

fn pick(picker: &dyn ImagePicker) -> Option<ImageUri> {
    match picker.pick_image() {
        Ok(Some(uri)) => Some(uri),
        Ok(None) => {
            debug!("image picker cancelled");
            None
        }
        Err(err) => {
            warn!(error = %err, "image picker failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing() {
        let mut composer = FormComposer::new();
        let ids: Vec<_> = (0..50)
            .map(|_| composer.add_question(QuestionType::Text))
            .collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn from_form_allocates_above_existing_ids() {
        let far_future = QuestionId::new(u64::MAX / 2);
        let form = Form::new(vec![Question::new(far_future, QuestionType::Grid)]);
        let mut composer = FormComposer::from_form(form);

        let id = composer.add_question(QuestionType::Text);
        assert_eq!(id.get(), far_future.get() + 1);
    }

    #[test]
    fn snapshot_is_shared_until_next_edit() {
        let mut composer = FormComposer::new();
        composer.add_question(QuestionType::Text);

        let snapshot = composer.snapshot();
        assert!(std::ptr::eq(snapshot.form(), composer.form()));

        composer.add_question(QuestionType::Grid);
        assert!(!std::ptr::eq(snapshot.form(), composer.form()));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(composer.len(), 2);
    }
}
