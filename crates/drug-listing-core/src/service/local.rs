//! SQLite-backed drug listing service.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};

use super::{DrugListingService, ServiceError, ServiceResult, SessionManager, NO_RIGHTS};
use crate::config::EditorConfig;
use crate::db::Database;
use crate::models::DrugListing;

/// Data service answering from a local database on behalf of one user.
pub struct LocalDrugService {
    db: Database,
    user_id: String,
    edit_permission: String,
}

impl LocalDrugService {
    /// Create a service acting as `user_id`.
    pub fn new(db: Database, user_id: impl Into<String>, config: &EditorConfig) -> Self {
        Self {
            db,
            user_id: user_id.into(),
            edit_permission: config.edit_permission.clone(),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl DrugListingService for LocalDrugService {
    fn get_listings(&self) -> ServiceResult<Vec<serde_json::Value>> {
        let drugs = self.db.list_drugs()?;
        debug!("loaded {} drug listings", drugs.len());
        drugs
            .iter()
            .map(|d| serde_json::to_value(d).map_err(ServiceError::from))
            .collect()
    }

    fn save_listings(&self, payload: &str) -> ServiceResult<()> {
        if !self.db.has_permission(&self.user_id, &self.edit_permission)? {
            warn!("user {} lacks {}", self.user_id, self.edit_permission);
            return Err(ServiceError::AccessDenied(NO_RIGHTS.to_string()));
        }

        let drugs: Vec<DrugListing> = serde_json::from_str(payload)?;
        let now = chrono::Utc::now().timestamp();
        let written = self.db.apply_drug_changes(&drugs, &self.user_id, now)?;
        debug!("user {} saved {} drug listings", self.user_id, written);
        Ok(())
    }
}

/// Session flag for an embedded editor. Logging out only records the fact;
/// the host decides what to do with it.
#[derive(Debug, Default)]
pub struct LocalSession {
    logged_out: AtomicBool,
}

impl LocalSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_out(&self) -> bool {
        self.logged_out.load(Ordering::SeqCst)
    }
}

impl SessionManager for LocalSession {
    fn logout(&self) {
        info!("session logged out");
        self.logged_out.store(true, Ordering::SeqCst);
    }
}
