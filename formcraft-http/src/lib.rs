//! # formcraft-http
//!
//! HTTP endpoint for formcraft.
//!
//! [`HttpSubmitter`] implements [`FormSubmitter`](formcraft::FormSubmitter) by issuing a
//! single `POST <base>/api/forms` with the snapshot as a JSON body. There is no retry
//! and, unless configured, no timeout.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formcraft::FormComposer;
//! use formcraft_http::HttpSubmitter;
//!
//! let submitter = HttpSubmitter::new("https://forms.example.com")?;
//! let result = composer.request_preview().save(&submitter);
//! ```

mod submitter;

pub use submitter::{
    DEFAULT_BASE_URL, FORMS_PATH, HttpSubmitter, HttpSubmitterConfig, HttpSubmitterError,
};
