//! Listing editor: load, edit, validate and save drug listings.
//!
//! Pipeline: Data Service → Parse → Working List (+ blank row) → Edit/Validate
//! → Dirty Set → Data Service

mod listing;
mod status;
mod validator;

pub use listing::*;
pub use status::*;
pub use validator::*;

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::{EditorConfig, NormalizeOrder};
use crate::models::DrugListing;
use crate::service::{DrugListingService, ServiceError, SessionManager};

/// The operation a transport failure interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Save,
}

impl Operation {
    /// User-facing message shown when this operation fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Load => "Error - Loading Drug List\nPlease contact your DSM developer",
            Operation::Save => "Error - Saving Drug listings\nPlease contact your DSM developer",
        }
    }
}

pub const FIX_ERRORS_MESSAGE: &str = "Please fix errors first!";
pub const SAVED_MESSAGE: &str = "Data saved";

/// Editor errors. `Display` is the message shown to the user.
#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Please fix errors first!")]
    Validation { rows: Vec<usize> },

    #[error("{}", .operation.failure_message())]
    Transport {
        operation: Operation,
        authentication: bool,
        #[source]
        source: ServiceError,
    },

    #[error("Row {index} out of range for listing of {len} rows")]
    RowOutOfRange { index: usize, len: usize },
}

impl ListingError {
    /// Whether the failure ended the session.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            ListingError::Transport {
                authentication: true,
                ..
            }
        )
    }
}

pub type ListingResult<T> = Result<T, ListingError>;

/// Result of a save that reached the data service.
#[derive(Debug)]
pub struct SaveReport {
    /// Rows submitted
    pub submitted: usize,
    /// Set when the reload after a successful save failed
    pub reload_error: Option<ListingError>,
}

impl SaveReport {
    pub fn message(&self) -> &'static str {
        SAVED_MESSAGE
    }
}

/// Coordinates loading and saving against the external collaborators.
pub struct ListingEditor<D, S> {
    service: D,
    session: S,
    config: EditorConfig,
}

impl<D: DrugListingService, S: SessionManager> ListingEditor<D, S> {
    /// Create an editor with the default configuration.
    pub fn new(service: D, session: S) -> Self {
        Self::with_config(service, session, EditorConfig::default())
    }

    pub fn with_config(service: D, session: S, config: EditorConfig) -> Self {
        Self {
            service,
            session,
            config,
        }
    }

    pub fn service(&self) -> &D {
        &self.service
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Fetch and parse every listing into a fresh working list.
    pub fn load(&self) -> ListingResult<Listing> {
        let raw = self
            .service
            .get_listings()
            .map_err(|e| self.transport_failure(Operation::Load, e))?;

        let rows = raw
            .iter()
            .map(DrugListing::parse)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.transport_failure(Operation::Load, e.into()))?;

        debug!("loaded {} drug listings", rows.len());
        Ok(Listing::new(rows, self.config.max_code_length))
    }

    /// Submit the dirty rows and reload the working list on success.
    ///
    /// New rows are checked in full before submission. Loaded rows are
    /// judged by the flags their edits raised.
    pub fn save(&self, listing: &mut Listing) -> ListingResult<SaveReport> {
        let dirty = listing.dirty_indices();
        listing.validate_new_rows(&dirty);

        if self.config.normalize_order == NormalizeOrder::BeforeCheck {
            listing.normalize_dirty_names(&dirty);
        }

        let invalid = listing.invalid_dirty_indices();
        if !invalid.is_empty() {
            warn!("save rejected, rows with errors: {:?}", invalid);
            return Err(ListingError::Validation { rows: invalid });
        }

        if self.config.normalize_order == NormalizeOrder::AfterCheck {
            listing.normalize_dirty_names(&dirty);
        }

        let payload = serde_json::to_string(&listing.dirty_rows(&dirty))
            .map_err(|e| self.transport_failure(Operation::Save, e.into()))?;

        self.service
            .save_listings(&payload)
            .map_err(|e| self.transport_failure(Operation::Save, e))?;
        info!("saved {} drug listings", dirty.len());

        let reload_error = match self.load() {
            Ok(fresh) => {
                *listing = fresh;
                None
            }
            Err(e) => Some(e),
        };

        Ok(SaveReport {
            submitted: dirty.len(),
            reload_error,
        })
    }

    fn transport_failure(&self, operation: Operation, source: ServiceError) -> ListingError {
        let authentication = self.session.is_auth_error(&source);
        warn!("{:?} failed: {}", operation, source);
        if authentication {
            self.session.logout();
        }
        ListingError::Transport {
            operation,
            authentication,
            source,
        }
    }
}
