//! Scripted collaborators for testing composers and previewers without user
//! interaction or a network.
//!
//! # Example
//!
//! ```rust,ignore
//! use formcraft::{FormComposer, QuestionType, TestPicker, TestSubmitter};
//!
//! let mut composer = FormComposer::new();
//! composer.add_question(QuestionType::Text);
//! composer.pick_header_image(&TestPicker::new().with_image("file:///header.png"));
//!
//! let submitter = TestSubmitter::new().with_rejection(400, Some("bad image url"));
//! let result = composer.request_preview().save(&submitter);
//!
//! assert_eq!(result.unwrap_err().to_string(), "bad image url");
//! assert_eq!(submitter.call_count(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use formcraft_types::{FormSnapshot, FormSubmitter, ImagePicker, ImageUri, PickError, SubmitError};

#[derive(Debug, Clone)]
enum ScriptedPick {
    Image(ImageUri),
    Cancel,
    Fail(String),
}

/// An image picker that replays pre-configured results in order.
///
/// Once the script is exhausted every pick is treated as a cancellation.
#[derive(Debug, Default)]
pub struct TestPicker {
    script: Mutex<VecDeque<ScriptedPick>>,
}

impl TestPicker {
    /// Create a picker with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful pick.
    pub fn with_image(self, uri: impl Into<ImageUri>) -> Self {
        self.push(ScriptedPick::Image(uri.into()))
    }

    /// Queue a cancellation.
    pub fn with_cancel(self) -> Self {
        self.push(ScriptedPick::Cancel)
    }

    /// Queue a picker failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(ScriptedPick::Fail(message.into()))
    }

    fn push(self, pick: ScriptedPick) -> Self {
        lock(&self.script).push_back(pick);
        self
    }
}

impl ImagePicker for TestPicker {
    fn pick_image(&self) -> Result<Option<ImageUri>, PickError> {
        match lock(&self.script).pop_front() {
            Some(ScriptedPick::Image(uri)) => Ok(Some(uri)),
            Some(ScriptedPick::Cancel) | None => Ok(None),
            Some(ScriptedPick::Fail(message)) => Err(PickError::backend(anyhow::anyhow!(message))),
        }
    }
}

#[derive(Debug, Clone)]
enum ScriptedResponse {
    Success(serde_json::Value),
    Rejection {
        status: u16,
        message: Option<String>,
    },
    TransportFailure(String),
}

/// A submitter that records every body it receives and replays pre-configured
/// responses in order.
///
/// Once the script is exhausted every submission succeeds with `{}`.
#[derive(Debug, Default)]
pub struct TestSubmitter {
    script: Mutex<VecDeque<ScriptedResponse>>,
    submissions: Mutex<Vec<serde_json::Value>>,
}

impl TestSubmitter {
    /// Create a submitter with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 2xx response with the given JSON body.
    pub fn with_success(self, body: serde_json::Value) -> Self {
        self.push(ScriptedResponse::Success(body))
    }

    /// Queue a non-2xx response.
    pub fn with_rejection(self, status: u16, message: Option<&str>) -> Self {
        self.push(ScriptedResponse::Rejection {
            status,
            message: message.map(str::to_string),
        })
    }

    /// Queue a transport failure (no response at all).
    pub fn with_transport_failure(self, message: impl Into<String>) -> Self {
        self.push(ScriptedResponse::TransportFailure(message.into()))
    }

    /// The JSON bodies received so far, in order.
    pub fn submissions(&self) -> Vec<serde_json::Value> {
        lock(&self.submissions).clone()
    }

    /// Number of submissions received so far.
    pub fn call_count(&self) -> usize {
        lock(&self.submissions).len()
    }

    fn push(self, response: ScriptedResponse) -> Self {
        lock(&self.script).push_back(response);
        self
    }
}

impl FormSubmitter for TestSubmitter {
    fn submit(&self, snapshot: &FormSnapshot) -> Result<serde_json::Value, SubmitError> {
        lock(&self.submissions).push(snapshot.to_json());

        match lock(&self.script).pop_front() {
            Some(ScriptedResponse::Success(body)) => Ok(body),
            None => Ok(serde_json::json!({})),
            Some(ScriptedResponse::Rejection { status, message }) => {
                Err(SubmitError::Rejected { status, message })
            }
            Some(ScriptedResponse::TransportFailure(message)) => {
                Err(SubmitError::transport(anyhow::anyhow!(message)))
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
