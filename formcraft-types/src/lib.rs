//! Core types for the formcraft crates.
//!
//! This crate provides the foundational types for composing forms:
//! - `Form` and `FormSnapshot` - The composed form and its read-only hand-off copy
//! - `Question`, `QuestionType` and `QuestionUpdate` - Individual survey items
//! - `SaveError`, `SubmitError`, `ComposeError`, `PickError` - The error taxonomy
//! - `ImagePicker` and `FormSubmitter` traits - For plugging in pickers and endpoints

mod image_uri;
pub use image_uri::ImageUri;

mod question;
pub use question::{Question, QuestionId, QuestionType, QuestionUpdate};

mod form;
pub use form::{Form, FormSnapshot};

mod error;
pub use error::{ComposeError, PickError, SaveError, SubmitError, ValidationError};

mod traits;
pub use traits::{FormSubmitter, ImagePicker};
