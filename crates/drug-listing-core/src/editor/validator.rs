//! Field validators for listing rows.
//!
//! Each validator clears and recomputes the flags it owns on a single row.
//! Uniqueness reads the other rows but never writes to them.

use crate::models::DrugListing;

/// Parse a study drug value.
///
/// The value is trimmed and must be a finite decimal number. Empty,
/// whitespace-only and absent values are not numbers. Leading zeros are
/// accepted; `NaN`, `inf` and hex literals are not.
pub fn parse_study_drug(value: Option<&str>) -> Option<f64> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whether a text field is longer than `max_len` chars.
pub fn exceeds_length(value: Option<&str>, max_len: usize) -> bool {
    value.map_or(false, |s| s.chars().count() > max_len)
}

/// Flag the row at `index` if another row carries the same display name.
///
/// Names compare case-insensitively with surrounding whitespace ignored.
/// Rows without a name never collide.
pub fn validate_uniqueness(rows: &mut [DrugListing], index: usize) {
    if index >= rows.len() {
        return;
    }
    let key = rows[index].name_key();
    let not_unique = match key {
        Some(ref key) => rows
            .iter()
            .enumerate()
            .any(|(i, row)| i != index && row.name_key().as_ref() == Some(key)),
        None => false,
    };
    rows[index].errors.not_unique = not_unique;
}

/// Flag the row if its study drug is not numeric.
pub fn validate_numeric_type(row: &mut DrugListing) {
    row.errors.not_correct_type = parse_study_drug(row.study_drug.as_deref()).is_none();
}

/// Flag each code field longer than `max_len` chars.
pub fn validate_field_lengths(row: &mut DrugListing, max_len: usize) {
    row.errors.chemo_type_length = exceeds_length(row.chemo_type.as_deref(), max_len);
    row.errors.treatment_type_length = exceeds_length(row.treatment_type.as_deref(), max_len);
    row.errors.chemotherapy_length = exceeds_length(row.chemotherapy.as_deref(), max_len);
}

/// Flag the row if it is a new row without a display name.
pub fn validate_name_present(row: &mut DrugListing) {
    row.errors.missing_name = row.added_new && row.name_key().is_none();
}
