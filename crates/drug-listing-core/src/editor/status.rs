//! Presentation-facing state flags and messages.

use super::{ListingError, ListingResult, SaveReport};

/// What the view shows around the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorStatus {
    /// Set while a load or save is in flight
    pub loading: bool,
    /// Load failures
    pub error_message: Option<String>,
    /// Save outcome and validation feedback
    pub additional_message: Option<String>,
}

impl EditorStatus {
    pub fn begin(&mut self) {
        self.loading = true;
    }

    /// Record the outcome of a load. Clears `loading`.
    pub fn finish_load<T>(&mut self, result: &ListingResult<T>) {
        self.loading = false;
        match result {
            Ok(_) => self.error_message = None,
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    /// Record the outcome of a save. Clears `loading`.
    pub fn finish_save(&mut self, result: &ListingResult<SaveReport>) {
        self.loading = false;
        match result {
            Ok(report) => {
                self.additional_message = Some(report.message().to_string());
                self.error_message = report.reload_error.as_ref().map(ListingError::to_string);
            }
            Err(e) => self.additional_message = Some(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{Operation, FIX_ERRORS_MESSAGE, SAVED_MESSAGE};
    use crate::service::ServiceError;

    fn load_failure() -> ListingError {
        ListingError::Transport {
            operation: Operation::Load,
            authentication: false,
            source: ServiceError::Failed {
                status: None,
                body: "down".into(),
            },
        }
    }

    #[test]
    fn test_load_failure_sets_error_message() {
        let mut status = EditorStatus::default();
        status.begin();
        status.finish_load::<()>(&Err(load_failure()));

        assert!(!status.loading);
        assert_eq!(
            status.error_message.as_deref(),
            Some(Operation::Load.failure_message())
        );
    }

    #[test]
    fn test_validation_failure_sets_additional_message() {
        let mut status = EditorStatus::default();
        status.begin();
        status.finish_save(&Err(ListingError::Validation { rows: vec![0] }));

        assert!(!status.loading);
        assert_eq!(status.additional_message.as_deref(), Some(FIX_ERRORS_MESSAGE));
        assert_eq!(status.error_message, None);
    }

    #[test]
    fn test_saved_with_failed_reload() {
        let mut status = EditorStatus::default();
        status.begin();
        status.finish_save(&Ok(SaveReport {
            submitted: 1,
            reload_error: Some(load_failure()),
        }));

        assert!(!status.loading);
        assert_eq!(status.additional_message.as_deref(), Some(SAVED_MESSAGE));
        assert_eq!(
            status.error_message.as_deref(),
            Some(Operation::Load.failure_message())
        );
    }
}
