//! # formcraft
//!
//! Compose simple surveys and submit them to a remote endpoint. Front-end agnostic.
//!
//! A session has two screens:
//! - the [`FormComposer`] owns the form being built (questions, options, images)
//! - the [`FormPreviewer`] receives a read-only [`FormSnapshot`] and saves it through a
//!   [`FormSubmitter`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formcraft::{FormComposer, Notification, QuestionType, QuestionUpdate};
//!
//! let mut composer = FormComposer::new();
//! let id = composer.add_question(QuestionType::Grid);
//! composer.update_question(id, QuestionUpdate::Text("Favourite size?".into()));
//! let first = composer.add_option(id).unwrap();
//! composer.update_option(id, first, "Large")?;
//! composer.pick_header_image(&picker);
//!
//! let mut previewer = composer.request_preview();
//! let result = previewer.save(&submitter);
//! println!("{}", Notification::from_result(&result));
//! ```
//!
//! ## Front-ends
//!
//! - `formcraft-ratatui` - terminal UI with both screens
//!
//! ## Endpoints
//!
//! - `formcraft-http` - `POST <base>/api/forms` via reqwest

// Re-export all types from formcraft-types
pub use formcraft_types::*;

mod composer;
pub use composer::FormComposer;

mod previewer;
pub use previewer::{FormPreviewer, PreviewState, SavedForm, Submission};

mod notification;
pub use notification::{Navigation, Notification, NotificationLevel};

// Scripted collaborators for testing without a user or a network
mod test_backend;
pub use test_backend::{TestPicker, TestSubmitter};
