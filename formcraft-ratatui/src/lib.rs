//! # formcraft-ratatui
//!
//! Ratatui front-end for formcraft.
//!
//! The app has two screens. The editor lets the user add Text, Grid and CheckBox
//! questions, edit their text and options, and attach images. The preview shows a
//! read-only snapshot of the form and saves it through any
//! [`FormSubmitter`](formcraft::FormSubmitter). Submissions run on a worker thread,
//! so the UI stays responsive while a request is in flight.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use formcraft_http::HttpSubmitter;
//! use formcraft_ratatui::ComposerApp;
//!
//! fn main() -> anyhow::Result<()> {
//!     let submitter = HttpSubmitter::new("https://forms.example.com")?;
//!     let composer = ComposerApp::new(Arc::new(submitter)).run()?;
//!     println!("{} questions", composer.len());
//!     Ok(())
//! }
//! ```

mod app;
mod cli;
mod composer_view;
mod picker;
mod preview_view;

pub use app::{ComposerApp, RatatuiAppError, Theme};
pub use cli::Cli;
pub use picker::FilePathPicker;
