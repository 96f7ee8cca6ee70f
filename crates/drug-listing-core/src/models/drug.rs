//! Drug listing record model.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Tri-state active flag carried by a drug listing.
///
/// On the wire this is `null`, `0` or `1`. Booleans are accepted on input
/// since some callers send `true`/`false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveFlag {
    #[default]
    Unset,
    Inactive,
    Active,
}

impl ActiveFlag {
    /// Collapse a checkbox state into a definite flag.
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            ActiveFlag::Active
        } else {
            ActiveFlag::Inactive
        }
    }

    /// Integer representation used by storage, `None` for unset.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ActiveFlag::Unset => None,
            ActiveFlag::Inactive => Some(0),
            ActiveFlag::Active => Some(1),
        }
    }

    pub fn from_int(value: Option<i64>) -> Self {
        match value {
            None => ActiveFlag::Unset,
            Some(0) => ActiveFlag::Inactive,
            Some(_) => ActiveFlag::Active,
        }
    }
}

impl Serialize for ActiveFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_int() {
            Some(v) => serializer.serialize_i64(v),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ActiveFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawFlag {
            Int(i64),
            Bool(bool),
        }

        let raw = Option::<RawFlag>::deserialize(deserializer)?;
        Ok(match raw {
            None => ActiveFlag::Unset,
            Some(RawFlag::Int(v)) => ActiveFlag::from_int(Some(v)),
            Some(RawFlag::Bool(b)) => ActiveFlag::from_checked(b),
        })
    }
}

/// Per-field validation errors on a row. Never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationFlags {
    /// Display name collides with another row
    pub not_unique: bool,
    /// Study drug is not numeric
    pub not_correct_type: bool,
    pub chemo_type_length: bool,
    pub treatment_type_length: bool,
    pub chemotherapy_length: bool,
    /// New row without a display name
    pub missing_name: bool,
}

impl ValidationFlags {
    /// True if any flag is raised.
    pub fn any(&self) -> bool {
        self.not_unique
            || self.not_correct_type
            || self.chemo_type_length
            || self.treatment_type_length
            || self.chemotherapy_length
            || self.missing_name
    }
}

/// One drug listing row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DrugListing {
    /// Server ID, absent for rows not yet saved
    #[serde(default)]
    pub drug_id: Option<i64>,
    /// Name shown in the listing (stored uppercased)
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub generic_name: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub chemo: Option<String>,
    /// Expected to be numeric
    #[serde(default)]
    pub study_drug: Option<String>,
    /// Single character code
    #[serde(default)]
    pub chemo_type: Option<String>,
    /// Single character code
    #[serde(default)]
    pub treatment_type: Option<String>,
    /// Single character code
    #[serde(default)]
    pub chemotherapy: Option<String>,
    #[serde(default)]
    pub active: ActiveFlag,
    /// Creation time, seconds since epoch
    #[serde(default)]
    pub date_created: i64,
    /// Set once any field was edited
    #[serde(default)]
    pub changed: bool,
    /// Set for rows synthesized client-side
    #[serde(default)]
    pub added_new: bool,
    #[serde(skip)]
    pub errors: ValidationFlags,
}

impl DrugListing {
    /// Parse a raw record received from the data service.
    pub fn parse(raw: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut listing: DrugListing = serde_json::from_value(raw.clone())?;
        // edit state is client-side only
        listing.changed = false;
        listing.added_new = false;
        Ok(listing)
    }

    /// Create the blank row appended to the end of a listing.
    pub fn blank(date_created: i64) -> Self {
        Self {
            active: ActiveFlag::Active,
            date_created,
            added_new: true,
            ..Default::default()
        }
    }

    /// True if no user-editable text field holds content.
    pub fn is_blank(&self) -> bool {
        [
            &self.display_name,
            &self.generic_name,
            &self.brand_name,
            &self.chemo,
            &self.study_drug,
            &self.chemo_type,
            &self.treatment_type,
            &self.chemotherapy,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, |s| s.trim().is_empty()))
    }

    /// Rows that must be sent on save.
    pub fn is_dirty(&self) -> bool {
        self.changed || (self.added_new && !self.is_blank())
    }

    /// Display name normalized for comparison, `None` when empty.
    pub fn name_key(&self) -> Option<String> {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
    }

    /// Uppercase the display name in place.
    pub fn normalize_display_name(&mut self) {
        if let Some(name) = self.display_name.as_mut() {
            *name = name.to_uppercase();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_server_record() {
        let raw = json!({
            "drugId": 7,
            "displayName": "ABRAXANE",
            "genericName": "PACLITAXEL",
            "studyDrug": "0",
            "chemoType": "C",
            "treatmentType": "H",
            "chemotherapy": "Y",
            "active": 1,
            "dateCreated": 1500000000,
        });

        let listing = DrugListing::parse(&raw).unwrap();
        assert_eq!(listing.drug_id, Some(7));
        assert_eq!(listing.display_name.as_deref(), Some("ABRAXANE"));
        assert_eq!(listing.brand_name, None);
        assert_eq!(listing.active, ActiveFlag::Active);
        assert_eq!(listing.date_created, 1500000000);
        assert!(!listing.changed);
        assert!(!listing.added_new);
    }

    #[test]
    fn test_parse_ignores_client_edit_state() {
        let raw = json!({"drugId": 1, "displayName": "X", "changed": true, "addedNew": true});
        let listing = DrugListing::parse(&raw).unwrap();
        assert!(!listing.changed);
        assert!(!listing.added_new);
    }

    #[test]
    fn test_active_flag_wire_forms() {
        let unset: DrugListing = serde_json::from_value(json!({"active": null})).unwrap();
        let inactive: DrugListing = serde_json::from_value(json!({"active": 0})).unwrap();
        let active_bool: DrugListing = serde_json::from_value(json!({"active": true})).unwrap();
        let missing: DrugListing = serde_json::from_value(json!({})).unwrap();

        assert_eq!(unset.active, ActiveFlag::Unset);
        assert_eq!(inactive.active, ActiveFlag::Inactive);
        assert_eq!(active_bool.active, ActiveFlag::Active);
        assert_eq!(missing.active, ActiveFlag::Unset);
    }

    #[test]
    fn test_serialize_skips_error_flags() {
        let mut listing = DrugListing::blank(10);
        listing.errors.not_unique = true;
        let value = serde_json::to_value(&listing).unwrap();

        assert_eq!(value["active"], json!(1));
        assert_eq!(value["addedNew"], json!(true));
        assert_eq!(value["drugId"], serde_json::Value::Null);
        assert!(value.get("errors").is_none());
        assert!(value.get("notUnique").is_none());
    }

    #[test]
    fn test_blank_row() {
        let row = DrugListing::blank(42);
        assert!(row.is_blank());
        assert!(row.added_new);
        assert!(!row.is_dirty());
        assert_eq!(row.active, ActiveFlag::Active);
        assert_eq!(row.date_created, 42);
    }

    #[test]
    fn test_whitespace_only_row_is_blank() {
        let mut row = DrugListing::blank(0);
        row.display_name = Some("   ".into());
        assert!(row.is_blank());
        row.chemo_type = Some("C".into());
        assert!(!row.is_blank());
        assert!(row.is_dirty());
    }

    #[test]
    fn test_name_key() {
        let mut row = DrugListing::default();
        assert_eq!(row.name_key(), None);
        row.display_name = Some("  aspirin ".into());
        assert_eq!(row.name_key(), Some("ASPIRIN".into()));
        row.display_name = Some(" ".into());
        assert_eq!(row.name_key(), None);
    }

    #[test]
    fn test_validation_flags_any() {
        let mut flags = ValidationFlags::default();
        assert!(!flags.any());
        flags.chemotherapy_length = true;
        assert!(flags.any());

        let missing = ValidationFlags {
            missing_name: true,
            ..Default::default()
        };
        assert!(missing.any());
    }
}
