//! Drug Listing Core Library
//!
//! Editable drug listing with field validation and change-only saves.
//!
//! # Architecture
//!
//! ```text
//!   DrugListingService::get_listings
//!                 │
//!          parse raw records
//!                 │
//!   ┌─────────────▼─────────────┐
//!   │       Working Listing     │
//!   │  rows + blank trailing row│◄──── set_field / toggle_active
//!   │  per-field error flags    │       (validate, mark changed,
//!   └─────────────┬─────────────┘        grow on last row)
//!                 │
//!        dirty set (changed/added)
//!                 │
//!      uppercase names, check flags ──► "Please fix errors first!"
//!                 │
//!   DrugListingService::save_listings ──► failure: SessionManager
//!                 │                        (logout on auth error)
//!              reload
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (DrugListing, ActiveFlag, ListingField)
//! - [`editor`]: Working list, validators and the load/save coordinator
//! - [`service`]: Data service and session traits, local SQLite service
//! - [`db`]: SQLite storage behind the local service
//! - [`config`]: Editor configuration

pub mod config;
pub mod db;
pub mod editor;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use config::{EditorConfig, NormalizeOrder};
pub use db::Database;
pub use editor::{EditorStatus, Listing, ListingEditor, ListingError, Operation, SaveReport};
pub use models::{ActiveFlag, DrugListing, ListingField, ValidationFlags};
pub use service::{DrugListingService, LocalDrugService, LocalSession, ServiceError, SessionManager};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DrugListingError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Service error: {0}")]
    ServiceFailed(String),

    #[error("Session ended: {0}")]
    SessionEnded(String),
}

impl From<db::DbError> for DrugListingError {
    fn from(e: db::DbError) -> Self {
        DrugListingError::DatabaseError(e.to_string())
    }
}

impl From<ListingError> for DrugListingError {
    fn from(e: ListingError) -> Self {
        match e {
            ListingError::Validation { .. } => DrugListingError::ValidationFailed(e.to_string()),
            ListingError::RowOutOfRange { .. } => DrugListingError::InvalidInput(e.to_string()),
            ListingError::Transport { .. } if e.is_authentication() => {
                DrugListingError::SessionEnded(e.to_string())
            }
            ListingError::Transport { .. } => DrugListingError::ServiceFailed(e.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for DrugListingError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DrugListingError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path, acting as `user_id`.
#[uniffi::export]
pub fn open_database(path: String, user_id: String) -> Result<Arc<DrugListingCore>, DrugListingError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(DrugListingCore::new(db, user_id)))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory(user_id: String) -> Result<Arc<DrugListingCore>, DrugListingError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(DrugListingCore::new(db, user_id)))
}

// =========================================================================
// Main API Object
// =========================================================================

struct CoreState {
    editor: ListingEditor<LocalDrugService, LocalSession>,
    listing: Listing,
    status: EditorStatus,
}

/// Thread-safe listing editor for FFI.
#[derive(uniffi::Object)]
pub struct DrugListingCore {
    state: Mutex<CoreState>,
}

impl DrugListingCore {
    fn new(db: Database, user_id: String) -> Self {
        let config = EditorConfig::default();
        let service = LocalDrugService::new(db, user_id, &config);
        let listing = Listing::new(Vec::new(), config.max_code_length);
        let editor = ListingEditor::with_config(service, LocalSession::new(), config);
        Self {
            state: Mutex::new(CoreState {
                editor,
                listing,
                status: EditorStatus::default(),
            }),
        }
    }
}

#[uniffi::export]
impl DrugListingCore {
    // =========================================================================
    // Access Control
    // =========================================================================

    /// Grant a permission (e.g. `drug_list_edit`) to a user.
    pub fn grant_permission(&self, user_id: String, permission: String) -> Result<(), DrugListingError> {
        let state = self.state.lock()?;
        state.editor.service().db().grant_permission(&user_id, &permission)?;
        Ok(())
    }

    /// Whether an authentication failure ended the session.
    pub fn is_logged_out(&self) -> Result<bool, DrugListingError> {
        let state = self.state.lock()?;
        Ok(state.editor.session().is_logged_out())
    }

    // =========================================================================
    // Listing Operations
    // =========================================================================

    /// Reload the working list from storage. Unsaved edits are discarded.
    pub fn load(&self) -> Result<Vec<FfiDrugListing>, DrugListingError> {
        let mut state = self.state.lock()?;
        state.status.begin();
        let result = state.editor.load();
        state.status.finish_load(&result);
        state.listing = result?;
        Ok(state.listing.rows().iter().map(FfiDrugListing::from).collect())
    }

    /// Current working list, including the blank trailing row.
    pub fn rows(&self) -> Result<Vec<FfiDrugListing>, DrugListingError> {
        let state = self.state.lock()?;
        Ok(state.listing.rows().iter().map(FfiDrugListing::from).collect())
    }

    /// Edit a text field and validate it. Returns the updated row.
    pub fn set_field(
        &self,
        index: u32,
        field: ListingField,
        value: Option<String>,
    ) -> Result<FfiDrugListing, DrugListingError> {
        let mut state = self.state.lock()?;
        let index = index as usize;
        state.listing.set_field(index, field, value)?;
        Ok(FfiDrugListing::from(&state.listing.rows()[index]))
    }

    /// Check or uncheck the active box on a row. Returns the updated row.
    pub fn toggle_active(&self, index: u32, checked: bool) -> Result<FfiDrugListing, DrugListingError> {
        let mut state = self.state.lock()?;
        let index = index as usize;
        state.listing.toggle_active(index, checked)?;
        Ok(FfiDrugListing::from(&state.listing.rows()[index]))
    }

    /// Save changed rows. Returns the number of rows submitted.
    pub fn save(&self) -> Result<u32, DrugListingError> {
        let mut state = self.state.lock()?;
        let CoreState {
            editor,
            listing,
            status,
        } = &mut *state;

        status.begin();
        let result = editor.save(listing);
        status.finish_save(&result);
        Ok(result?.submitted as u32)
    }

    /// Look up one stored drug by ID, bypassing the working list.
    pub fn get_drug(&self, drug_id: i64) -> Result<Option<FfiDrugListing>, DrugListingError> {
        let state = self.state.lock()?;
        let drug = state.editor.service().db().get_drug(drug_id)?;
        Ok(drug.as_ref().map(FfiDrugListing::from))
    }

    /// Loading flag and the messages to display.
    pub fn status(&self) -> Result<FfiEditorStatus, DrugListingError> {
        let state = self.state.lock()?;
        Ok(state.status.clone().into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe drug listing row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrugListing {
    pub drug_id: Option<i64>,
    pub display_name: Option<String>,
    pub generic_name: Option<String>,
    pub brand_name: Option<String>,
    pub chemo: Option<String>,
    pub study_drug: Option<String>,
    pub chemo_type: Option<String>,
    pub treatment_type: Option<String>,
    pub chemotherapy: Option<String>,
    /// `None` when unset, otherwise 0 or 1
    pub active: Option<i64>,
    pub date_created: i64,
    pub changed: bool,
    pub added_new: bool,
    pub not_unique_error: bool,
    pub not_correct_type_error: bool,
    pub chemo_type_length_error: bool,
    pub treatment_type_length_error: bool,
    pub chemotherapy_length_error: bool,
    pub missing_name_error: bool,
}

impl From<&DrugListing> for FfiDrugListing {
    fn from(row: &DrugListing) -> Self {
        Self {
            drug_id: row.drug_id,
            display_name: row.display_name.clone(),
            generic_name: row.generic_name.clone(),
            brand_name: row.brand_name.clone(),
            chemo: row.chemo.clone(),
            study_drug: row.study_drug.clone(),
            chemo_type: row.chemo_type.clone(),
            treatment_type: row.treatment_type.clone(),
            chemotherapy: row.chemotherapy.clone(),
            active: row.active.as_int(),
            date_created: row.date_created,
            changed: row.changed,
            added_new: row.added_new,
            not_unique_error: row.errors.not_unique,
            not_correct_type_error: row.errors.not_correct_type,
            chemo_type_length_error: row.errors.chemo_type_length,
            treatment_type_length_error: row.errors.treatment_type_length,
            chemotherapy_length_error: row.errors.chemotherapy_length,
            missing_name_error: row.errors.missing_name,
        }
    }
}

/// FFI-safe editor status.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEditorStatus {
    pub loading: bool,
    pub error_message: Option<String>,
    pub additional_message: Option<String>,
}

impl From<EditorStatus> for FfiEditorStatus {
    fn from(status: EditorStatus) -> Self {
        Self {
            loading: status.loading,
            error_message: status.error_message,
            additional_message: status.additional_message,
        }
    }
}
