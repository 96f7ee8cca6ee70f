//! The editable working list.

use super::validator;
use super::{ListingError, ListingResult};
use crate::models::{ActiveFlag, DrugListing, FieldCheck, ListingField};

/// Working list of drug listings, always ending in one blank row.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    rows: Vec<DrugListing>,
    max_code_length: usize,
}

impl Listing {
    /// Build a working list from loaded rows and append the blank row.
    pub fn new(rows: Vec<DrugListing>, max_code_length: usize) -> Self {
        let mut listing = Self {
            rows,
            max_code_length,
        };
        listing.push_blank();
        listing
    }

    pub fn rows(&self) -> &[DrugListing] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DrugListing> {
        self.rows.get(index)
    }

    fn push_blank(&mut self) {
        let now = chrono::Utc::now().timestamp();
        self.rows.push(DrugListing::blank(now));
    }

    fn row_mut(&mut self, index: usize) -> ListingResult<&mut DrugListing> {
        let len = self.rows.len();
        self.rows
            .get_mut(index)
            .ok_or(ListingError::RowOutOfRange { index, len })
    }

    /// Mark a row edited; editing the last row grows the list.
    pub fn on_field_edited(&mut self, index: usize) -> ListingResult<()> {
        self.row_mut(index)?.changed = true;
        if index == self.rows.len() - 1 {
            self.push_blank();
        }
        Ok(())
    }

    /// Apply a checkbox change to the active flag.
    pub fn toggle_active(&mut self, index: usize, checked: bool) -> ListingResult<()> {
        let row = self.row_mut(index)?;
        row.changed = true;
        row.active = ActiveFlag::from_checked(checked);
        self.on_field_edited(index)
    }

    /// Write a text field, run its validator and mark the row edited.
    ///
    /// A display name edit also re-checks every row that shared the old or
    /// the new name, so collision flags never go stale.
    pub fn set_field(
        &mut self,
        index: usize,
        field: ListingField,
        value: Option<String>,
    ) -> ListingResult<()> {
        let old_key = self.row_mut(index)?.name_key();
        *field.slot(self.row_mut(index)?) = value;
        match field.check() {
            FieldCheck::Uniqueness => self.recheck_names(index, old_key),
            FieldCheck::Numeric => self.validate_numeric_type(index)?,
            FieldCheck::Length => self.validate_field_lengths(index)?,
            FieldCheck::None => {}
        }
        self.on_field_edited(index)
    }

    fn recheck_names(&mut self, index: usize, old_key: Option<String>) {
        let new_key = self.rows[index].name_key();
        let affected: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, row)| {
                let key = row.name_key();
                *i == index || (key.is_some() && (key == old_key || key == new_key))
            })
            .map(|(i, _)| i)
            .collect();
        for i in affected {
            validator::validate_uniqueness(&mut self.rows, i);
        }
    }

    pub fn validate_uniqueness(&mut self, index: usize) -> ListingResult<()> {
        self.row_mut(index)?;
        validator::validate_uniqueness(&mut self.rows, index);
        Ok(())
    }

    pub fn validate_numeric_type(&mut self, index: usize) -> ListingResult<()> {
        validator::validate_numeric_type(self.row_mut(index)?);
        Ok(())
    }

    pub fn validate_field_lengths(&mut self, index: usize) -> ListingResult<()> {
        let max_len = self.max_code_length;
        validator::validate_field_lengths(self.row_mut(index)?, max_len);
        Ok(())
    }

    /// Run every validator on one row.
    pub fn validate_row(&mut self, index: usize) -> ListingResult<()> {
        self.validate_uniqueness(index)?;
        self.validate_numeric_type(index)?;
        self.validate_field_lengths(index)
    }

    /// Fully validate new rows before they are submitted.
    ///
    /// Loaded rows keep the flags set while editing; new rows have every
    /// field checked since untouched fields never ran a validator.
    pub fn validate_new_rows(&mut self, indices: &[usize]) {
        let max_len = self.max_code_length;
        for &i in indices {
            let row = &mut self.rows[i];
            if row.added_new {
                validator::validate_name_present(row);
                validator::validate_numeric_type(row);
                validator::validate_field_lengths(row, max_len);
            }
        }
    }

    /// Indices of rows that must be sent on save.
    pub fn dirty_indices(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_dirty())
            .map(|(i, _)| i)
            .collect()
    }

    /// Dirty rows whose error flags block a save.
    pub fn invalid_dirty_indices(&self) -> Vec<usize> {
        self.dirty_indices()
            .into_iter()
            .filter(|&i| self.rows[i].errors.any())
            .collect()
    }

    pub(crate) fn normalize_dirty_names(&mut self, indices: &[usize]) {
        for &i in indices {
            self.rows[i].normalize_display_name();
        }
    }

    pub(crate) fn dirty_rows(&self, indices: &[usize]) -> Vec<&DrugListing> {
        indices.iter().map(|&i| &self.rows[i]).collect()
    }
}
