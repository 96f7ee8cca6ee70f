//! Collaborators consumed by the listing editor.
//!
//! The editor never talks to a transport directly. It calls a
//! [`DrugListingService`] for data and a [`SessionManager`] to classify
//! failures and end the session.

mod local;

pub use local::*;

use thiserror::Error;

use crate::db::DbError;

/// Failure body a backend returns when the session is no longer valid.
pub const AUTHENTICATION_ERROR: &str = "AUTHENTICATION_ERROR";

/// Body returned when the user lacks the edit permission.
pub const NO_RIGHTS: &str = "You don't have the necessary rights to do that";

/// Errors from a data service call.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Request failed ({status:?}): {body}")]
    Failed { status: Option<u16>, body: String },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl ServiceError {
    /// Response body attached to the failure, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            ServiceError::Failed { body, .. } => Some(body),
            ServiceError::AccessDenied(body) => Some(body),
            _ => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Backend holding the drug listings.
pub trait DrugListingService {
    /// Fetch every listing as a raw JSON record.
    fn get_listings(&self) -> ServiceResult<Vec<serde_json::Value>>;

    /// Submit a JSON array of changed listings.
    fn save_listings(&self, payload: &str) -> ServiceResult<()>;
}

/// Session owner, asked to end the session on authentication failures.
pub trait SessionManager {
    /// Whether a failure means the session is invalid.
    fn is_auth_error(&self, error: &ServiceError) -> bool {
        error.body() == Some(AUTHENTICATION_ERROR)
    }

    fn logout(&self);
}

impl<T: DrugListingService + ?Sized> DrugListingService for &T {
    fn get_listings(&self) -> ServiceResult<Vec<serde_json::Value>> {
        (**self).get_listings()
    }

    fn save_listings(&self, payload: &str) -> ServiceResult<()> {
        (**self).save_listings(payload)
    }
}

impl<T: SessionManager + ?Sized> SessionManager for &T {
    fn is_auth_error(&self, error: &ServiceError) -> bool {
        (**self).is_auth_error(error)
    }

    fn logout(&self) {
        (**self).logout()
    }
}
