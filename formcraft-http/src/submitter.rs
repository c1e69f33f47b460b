//! Blocking reqwest implementation of the `FormSubmitter` trait.

use std::time::Duration;

use formcraft::{FormSnapshot, FormSubmitter, SubmitError};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Base URL of the hosted forms service.
pub const DEFAULT_BASE_URL: &str = "https://backendassignment-2.onrender.com";

/// Path of the forms resource, relative to the base URL.
pub const FORMS_PATH: &str = "api/forms";

/// Error type for building an [`HttpSubmitter`].
#[derive(Debug, Error)]
pub enum HttpSubmitterError {
    /// The base URL could not be parsed.
    #[error("Invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// The base URL cannot carry a path (e.g. `mailto:`).
    #[error("Endpoint '{0}' cannot be used as a base URL")]
    NotABase(String),

    /// The HTTP client could not be built (TLS backend failure etc.).
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration for an [`HttpSubmitter`].
#[derive(Debug, Clone)]
pub struct HttpSubmitterConfig {
    /// Base URL; the forms path is appended to it.
    pub base_url: String,

    /// Overall request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpSubmitterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent: concat!("formcraft/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpSubmitterConfig {
    /// Default configuration pointed at another base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set a request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Error body returned by the forms service on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: serde_json::Value,
}

impl ErrorBody {
    /// The message to show, if it is set to anything truthy.
    ///
    /// Strings are shown verbatim; other non-empty values are shown as JSON.
    fn into_message(self) -> Option<String> {
        match self.message {
            serde_json::Value::String(message) => Some(message),
            serde_json::Value::Null | serde_json::Value::Bool(false) => None,
            serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => None,
            other => Some(other.to_string()),
        }
    }
}

/// Submits forms to `<base>/api/forms`.
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: Client,
    endpoint: Url,
}

impl HttpSubmitter {
    /// Create a submitter for the given base URL with default settings.
    pub fn new(base_url: &str) -> Result<Self, HttpSubmitterError> {
        Self::with_config(HttpSubmitterConfig::with_base_url(base_url))
    }

    /// Create a submitter from a full configuration.
    pub fn with_config(config: HttpSubmitterConfig) -> Result<Self, HttpSubmitterError> {
        let endpoint = forms_endpoint(&config.base_url)?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            // The blocking client defaults to 30s; `None` disables the timeout.
            .timeout(config.timeout)
            .build()?;

        debug!(%endpoint, timeout = ?config.timeout, "http submitter ready");
        Ok(Self { client, endpoint })
    }

    /// The full URL forms are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl FormSubmitter for HttpSubmitter {
    fn submit(&self, snapshot: &FormSnapshot) -> Result<serde_json::Value, SubmitError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(snapshot.form())
            .send()
            .map_err(|err| {
                warn!(endpoint = %self.endpoint, error = %err, "request failed");
                SubmitError::transport(err)
            })?;

        let status = response.status();
        if status.is_success() {
            let body = response
                .json::<serde_json::Value>()
                .map_err(SubmitError::transport)?;
            info!(%status, %body, "form accepted");
            return Ok(body);
        }

        let message = response
            .json::<ErrorBody>()
            .ok()
            .and_then(ErrorBody::into_message);
        warn!(%status, message = message.as_deref().unwrap_or(""), "form rejected");

        Err(SubmitError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

fn forms_endpoint(base_url: &str) -> Result<Url, HttpSubmitterError> {
    let invalid = |reason: String| HttpSubmitterError::InvalidEndpoint {
        url: base_url.to_string(),
        reason,
    };

    let mut url = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(HttpSubmitterError::NotABase(base_url.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.join(FORMS_PATH).map_err(|err| invalid(err.to_string()))
}
