//! User-facing alerts for save outcomes.

use std::fmt;

use formcraft_types::SaveError;

use crate::SavedForm;

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// An alert shown to the user after a save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    fn new(level: NotificationLevel, title: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.into(),
        }
    }

    /// The alert for a successful save.
    pub fn saved() -> Self {
        Self::new(
            NotificationLevel::Success,
            "Success",
            "Form saved successfully.",
        )
    }

    /// The alert for a failed save.
    pub fn from_error(err: &SaveError) -> Self {
        match err {
            SaveError::Validation(_) => Self::new(
                NotificationLevel::Error,
                "Validation Error",
                "Please ensure all required fields are filled.",
            ),
            SaveError::RemoteRejection { message, .. } => {
                Self::new(NotificationLevel::Error, "Error", message.as_str())
            }
            SaveError::TransportFailure(_) => Self::new(
                NotificationLevel::Error,
                "Error",
                "An error occurred while saving the form.",
            ),
        }
    }

    /// The alert for any save outcome.
    pub fn from_result(result: &Result<SavedForm, SaveError>) -> Self {
        match result {
            Ok(_) => Self::saved(),
            Err(err) => Self::from_error(err),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NotificationLevel::Success
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// What the previewer screen does after a save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Remain on the previewer so the user can retry.
    Stay,

    /// Pop back to the composer.
    Back,
}

impl Navigation {
    /// Only a successful save leaves the previewer.
    pub fn after(result: &Result<SavedForm, SaveError>) -> Self {
        match result {
            Ok(_) => Self::Back,
            Err(_) => Self::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_types::ValidationError;

    #[test]
    fn validation_alert_text() {
        let alert = Notification::from_error(&ValidationError::MissingHeaderImage.into());
        assert_eq!(
            alert.to_string(),
            "Validation Error: Please ensure all required fields are filled."
        );
        assert!(!alert.is_success());
    }

    #[test]
    fn transport_alert_is_generic() {
        let err = SaveError::transport(anyhow::anyhow!("dns lookup failed for example.invalid"));
        assert_eq!(
            Notification::from_error(&err).message,
            "An error occurred while saving the form."
        );
    }

    #[test]
    fn only_success_navigates_back() {
        let saved: Result<SavedForm, SaveError> = Ok(SavedForm {
            response: serde_json::Value::Null,
        });
        let failed: Result<SavedForm, SaveError> = Err(ValidationError::NoQuestions.into());

        assert_eq!(Navigation::after(&saved), Navigation::Back);
        assert_eq!(Navigation::after(&failed), Navigation::Stay);
        assert!(Notification::from_result(&saved).is_success());
    }
}
