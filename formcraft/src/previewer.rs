//! The previewer screen's state machine: `Idle → Submitting → {Saved | Failed}`.

use formcraft_types::{FormSnapshot, FormSubmitter, SaveError, SubmitError};
use tracing::{info, warn};

/// Where a previewer is in its save cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewState {
    /// Nothing outstanding; the user may press save.
    #[default]
    Idle,

    /// At least one submission is outstanding.
    Submitting,

    /// A submission succeeded. Terminal for this previewer.
    Saved,

    /// The last submission failed. The next save attempt starts from `Idle` again.
    Failed,
}

/// The endpoint accepted the form.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedForm {
    /// Parsed JSON body of the 2xx response.
    pub response: serde_json::Value,
}

/// A validated snapshot on its way to the endpoint.
///
/// Produced by [`FormPreviewer::begin_save`] so the network call can run off the UI
/// thread; the outcome goes back through [`FormPreviewer::finish_save`].
#[derive(Debug, Clone)]
pub struct Submission {
    snapshot: FormSnapshot,
    attempt: usize,
}

impl Submission {
    /// The snapshot being submitted.
    pub fn snapshot(&self) -> &FormSnapshot {
        &self.snapshot
    }

    /// 1-based attempt number within this previewer.
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    /// Send the snapshot through the submitter.
    pub fn send(&self, submitter: &dyn FormSubmitter) -> Result<serde_json::Value, SubmitError> {
        info!(
            attempt = self.attempt,
            questions = self.snapshot.len(),
            "submitting form"
        );
        submitter.submit(&self.snapshot)
    }
}

/// Read-only view of a composed form, with the save action.
#[derive(Debug, Clone)]
pub struct FormPreviewer {
    snapshot: FormSnapshot,
    state: PreviewState,
    in_flight: usize,
    attempts: usize,
}

impl FormPreviewer {
    /// Create a previewer for the given snapshot.
    pub fn new(snapshot: FormSnapshot) -> Self {
        Self {
            snapshot,
            state: PreviewState::Idle,
            in_flight: 0,
            attempts: 0,
        }
    }

    /// Get the snapshot being previewed.
    pub fn snapshot(&self) -> &FormSnapshot {
        &self.snapshot
    }

    /// Get the current state.
    pub fn state(&self) -> PreviewState {
        self.state
    }

    /// Number of submissions started but not yet finished.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Number of submissions started so far (validation failures excluded).
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Validate and save the snapshot, blocking until the submitter returns.
    pub fn save(&mut self, submitter: &dyn FormSubmitter) -> Result<SavedForm, SaveError> {
        let submission = self.begin_save()?;
        let outcome = submission.send(submitter);
        self.finish_save(outcome)
    }

    /// Validate the snapshot and start a submission.
    ///
    /// Fails with [`SaveError::Validation`] when there are no questions or no header
    /// image; in that case nothing is sent and the state is left at `Idle`. Overlapping
    /// calls are allowed and each yields an independent submission.
    pub fn begin_save(&mut self) -> Result<Submission, SaveError> {
        if self.state == PreviewState::Failed {
            self.state = PreviewState::Idle;
        }

        if let Err(err) = self.snapshot.validate() {
            warn!(error = %err, "form failed validation");
            return Err(err.into());
        }

        self.attempts += 1;
        self.in_flight += 1;
        if self.state != PreviewState::Saved {
            self.state = PreviewState::Submitting;
        }

        Ok(Submission {
            snapshot: self.snapshot.clone(),
            attempt: self.attempts,
        })
    }

    /// Apply the outcome of a submission started with [`begin_save`](Self::begin_save).
    pub fn finish_save(
        &mut self,
        outcome: Result<serde_json::Value, SubmitError>,
    ) -> Result<SavedForm, SaveError> {
        self.in_flight = self.in_flight.saturating_sub(1);

        match outcome {
            Ok(response) => {
                info!(%response, "form saved");
                self.state = PreviewState::Saved;
                Ok(SavedForm { response })
            }
            Err(err) => {
                let err = SaveError::from(err);
                warn!(error = %err, "failed to save form");
                if self.state != PreviewState::Saved {
                    self.state = if self.in_flight > 0 {
                        PreviewState::Submitting
                    } else {
                        PreviewState::Failed
                    };
                }
                Err(err)
            }
        }
    }

    /// Return from `Failed` to `Idle` once the user has seen the failure.
    pub fn acknowledge_failure(&mut self) {
        if self.state == PreviewState::Failed {
            self.state = PreviewState::Idle;
        }
    }
}
