//! Listing editor integration tests.
//!
//! These drive the editor through recording fakes for the data service and
//! the session manager.

use std::cell::{Cell, RefCell};

use drug_listing_core::editor::{ListingEditor, ListingError, Operation, FIX_ERRORS_MESSAGE};
use drug_listing_core::models::{ActiveFlag, ListingField};
use drug_listing_core::service::{
    DrugListingService, ServiceError, ServiceResult, SessionManager, AUTHENTICATION_ERROR,
};
use serde_json::{json, Value};

/// Data service returning canned records and recording submitted payloads.
#[derive(Default)]
struct RecordingService {
    records: RefCell<Vec<Value>>,
    submitted: RefCell<Vec<Value>>,
    load_failure: Option<&'static str>,
    save_failure: Option<&'static str>,
    loads: Cell<u32>,
}

impl RecordingService {
    fn with_records(records: Vec<Value>) -> Self {
        Self {
            records: RefCell::new(records),
            ..Default::default()
        }
    }

    fn last_payload(&self) -> Vec<Value> {
        let submitted = self.submitted.borrow();
        let payload = submitted.last().expect("nothing submitted");
        payload.as_array().unwrap().clone()
    }
}

impl DrugListingService for RecordingService {
    fn get_listings(&self) -> ServiceResult<Vec<Value>> {
        self.loads.set(self.loads.get() + 1);
        if let Some(body) = self.load_failure {
            return Err(ServiceError::Failed {
                status: Some(500),
                body: body.to_string(),
            });
        }
        Ok(self.records.borrow().clone())
    }

    fn save_listings(&self, payload: &str) -> ServiceResult<()> {
        if let Some(body) = self.save_failure {
            return Err(ServiceError::Failed {
                status: Some(401),
                body: body.to_string(),
            });
        }
        self.submitted
            .borrow_mut()
            .push(serde_json::from_str(payload).unwrap());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSession {
    logouts: Cell<u32>,
}

impl SessionManager for RecordingSession {
    fn logout(&self) {
        self.logouts.set(self.logouts.get() + 1);
    }
}

fn two_drugs() -> Vec<Value> {
    vec![
        json!({"drugId": 1, "displayName": "asp", "active": 1, "dateCreated": 100}),
        json!({"drugId": 2, "displayName": "ibu", "active": 1, "dateCreated": 100}),
    ]
}

#[test]
fn test_load_appends_blank_row() {
    let service = RecordingService::with_records(two_drugs());
    let editor = ListingEditor::new(&service, RecordingSession::default());

    let listing = editor.load().unwrap();
    assert_eq!(listing.len(), 3);

    let blank = listing.get(2).unwrap();
    assert!(blank.added_new);
    assert_eq!(blank.active, ActiveFlag::Active);
    assert!(blank.drug_id.is_none());
    assert!(blank.date_created > 0);
}

#[test]
fn test_edit_existing_row_submits_only_that_row() {
    let service = RecordingService::with_records(two_drugs());
    let editor = ListingEditor::new(&service, RecordingSession::default());
    let mut listing = editor.load().unwrap();

    listing
        .set_field(0, ListingField::DisplayName, Some("aspirin".into()))
        .unwrap();
    let report = editor.save(&mut listing).unwrap();

    assert_eq!(report.submitted, 1);
    assert!(report.reload_error.is_none());
    assert_eq!(report.message(), "Data saved");

    let payload = service.last_payload();
    assert_eq!(payload.len(), 1);
    assert_eq!(payload[0]["drugId"], json!(1));
    assert_eq!(payload[0]["displayName"], json!("ASPIRIN"));
    assert_eq!(payload[0]["changed"], json!(true));
    assert_eq!(payload[0]["addedNew"], json!(false));
}

#[test]
fn test_edit_blank_row_submits_single_new_row() {
    let service = RecordingService::with_records(two_drugs());
    let editor = ListingEditor::new(&service, RecordingSession::default());
    let mut listing = editor.load().unwrap();

    listing
        .set_field(2, ListingField::DisplayName, Some("naproxen".into()))
        .unwrap();
    listing
        .set_field(2, ListingField::StudyDrug, Some("0".into()))
        .unwrap();
    // editing the last row appended a new blank one
    assert_eq!(listing.len(), 4);

    editor.save(&mut listing).unwrap();

    let payload = service.last_payload();
    assert_eq!(payload.len(), 1);
    assert_eq!(payload[0]["displayName"], json!("NAPROXEN"));
    assert_eq!(payload[0]["addedNew"], json!(true));
    assert_eq!(payload[0]["active"], json!(1));
    assert_eq!(payload[0]["drugId"], Value::Null);
}

#[test]
fn test_successful_save_reloads_list() {
    let service = RecordingService::with_records(two_drugs());
    let editor = ListingEditor::new(&service, RecordingSession::default());
    let mut listing = editor.load().unwrap();

    listing.toggle_active(1, false).unwrap();
    *service.records.borrow_mut() = vec![json!({"drugId": 1, "displayName": "ASP"})];
    editor.save(&mut listing).unwrap();

    assert_eq!(service.loads.get(), 2);
    assert_eq!(listing.len(), 2);
    assert!(listing.dirty_indices().is_empty());
}

#[test]
fn test_duplicate_names_abort_save() {
    let service = RecordingService::default();
    let editor = ListingEditor::new(&service, RecordingSession::default());
    let mut listing = editor.load().unwrap();

    listing
        .set_field(0, ListingField::DisplayName, Some("A".into()))
        .unwrap();
    listing
        .set_field(1, ListingField::DisplayName, Some("A".into()))
        .unwrap();

    assert!(listing.get(0).unwrap().errors.not_unique);
    assert!(listing.get(1).unwrap().errors.not_unique);

    let err = editor.save(&mut listing).unwrap_err();
    assert!(matches!(err, ListingError::Validation { ref rows } if rows == &vec![0, 1]));
    assert_eq!(err.to_string(), FIX_ERRORS_MESSAGE);
    assert!(service.submitted.borrow().is_empty());
    assert_eq!(service.loads.get(), 1);
}

#[test]
fn test_new_row_with_only_a_name_aborts_save() {
    let service = RecordingService::with_records(two_drugs());
    let editor = ListingEditor::new(&service, RecordingSession::default());
    let mut listing = editor.load().unwrap();

    listing
        .set_field(2, ListingField::DisplayName, Some("naproxen".into()))
        .unwrap();

    let err = editor.save(&mut listing).unwrap_err();
    assert!(matches!(err, ListingError::Validation { ref rows } if rows == &vec![2]));
    assert!(service.submitted.borrow().is_empty());
}

#[test]
fn test_new_row_without_name_aborts_save() {
    let service = RecordingService::with_records(two_drugs());
    let editor = ListingEditor::new(&service, RecordingSession::default());
    let mut listing = editor.load().unwrap();

    listing
        .set_field(2, ListingField::ChemoType, Some("C".into()))
        .unwrap();
    listing
        .set_field(2, ListingField::StudyDrug, Some("1".into()))
        .unwrap();

    let err = editor.save(&mut listing).unwrap_err();
    assert!(matches!(err, ListingError::Validation { ref rows } if rows == &vec![2]));
    assert_eq!(err.to_string(), FIX_ERRORS_MESSAGE);
    assert!(listing.get(2).unwrap().errors.missing_name);
    assert!(service.submitted.borrow().is_empty());

    listing
        .set_field(2, ListingField::DisplayName, Some("naproxen".into()))
        .unwrap();
    editor.save(&mut listing).unwrap();
    assert_eq!(service.last_payload()[0]["displayName"], json!("NAPROXEN"));
}

#[test]
fn test_clearing_error_allows_save() {
    let service = RecordingService::with_records(two_drugs());
    let editor = ListingEditor::new(&service, RecordingSession::default());
    let mut listing = editor.load().unwrap();

    listing
        .set_field(0, ListingField::ChemoType, Some("CX".into()))
        .unwrap();
    assert!(editor.save(&mut listing).is_err());

    listing
        .set_field(0, ListingField::ChemoType, Some("C".into()))
        .unwrap();
    assert!(editor.save(&mut listing).is_ok());
    assert_eq!(service.submitted.borrow().len(), 1);
}

#[test]
fn test_save_auth_failure_logs_out_once() {
    let service = RecordingService {
        save_failure: Some(AUTHENTICATION_ERROR),
        ..RecordingService::with_records(two_drugs())
    };
    let editor = ListingEditor::new(&service, RecordingSession::default());
    let mut listing = editor.load().unwrap();

    listing.on_field_edited(0).unwrap();
    let err = editor.save(&mut listing).unwrap_err();

    assert_eq!(editor.session().logouts.get(), 1);
    assert!(err.is_authentication());
    assert_eq!(err.to_string(), Operation::Save.failure_message());
    assert_ne!(err.to_string(), Operation::Load.failure_message());
}

#[test]
fn test_load_auth_failure_logs_out() {
    let service = RecordingService {
        load_failure: Some(AUTHENTICATION_ERROR),
        ..Default::default()
    };
    let editor = ListingEditor::new(&service, RecordingSession::default());

    let err = editor.load().unwrap_err();
    assert_eq!(editor.session().logouts.get(), 1);
    assert_eq!(err.to_string(), Operation::Load.failure_message());
}

#[test]
fn test_load_generic_failure_keeps_session() {
    let service = RecordingService {
        load_failure: Some("Internal Server Error"),
        ..Default::default()
    };
    let editor = ListingEditor::new(&service, RecordingSession::default());

    let err = editor.load().unwrap_err();
    assert_eq!(editor.session().logouts.get(), 0);
    assert!(matches!(
        err,
        ListingError::Transport {
            operation: Operation::Load,
            authentication: false,
            ..
        }
    ));
}
