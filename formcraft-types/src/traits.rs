use crate::{FormSnapshot, ImageUri, PickError, SubmitError};

/// Trait for image selection capabilities (OS picker, file prompt, ...).
///
/// The picker decides how to ask the user; the composer only sees the result.
pub trait ImagePicker {
    /// Ask the user for an image.
    ///
    /// # Returns
    /// * `Ok(Some(uri))` when an image was picked
    /// * `Ok(None)` when the user cancelled
    /// * `Err` when the picker itself failed
    fn pick_image(&self) -> Result<Option<ImageUri>, PickError>;
}

/// Trait for endpoints that persist a composed form.
///
/// Implementations send the snapshot exactly once per call: no retry, no
/// de-duplication. A second call is a second, independent submission.
pub trait FormSubmitter {
    /// Submit the snapshot.
    ///
    /// # Returns
    /// * `Ok(body)` with the parsed JSON body of a 2xx response
    /// * `Err(SubmitError::Rejected)` for a non-2xx response
    /// * `Err(SubmitError::Transport)` when no usable response arrived
    fn submit(&self, snapshot: &FormSnapshot) -> Result<serde_json::Value, SubmitError>;
}

impl<T: ImagePicker + ?Sized> ImagePicker for &T {
    fn pick_image(&self) -> Result<Option<ImageUri>, PickError> {
        (**self).pick_image()
    }
}

impl<T: FormSubmitter + ?Sized> FormSubmitter for std::sync::Arc<T> {
    fn submit(&self, snapshot: &FormSnapshot) -> Result<serde_json::Value, SubmitError> {
        (**self).submit(snapshot)
    }
}
