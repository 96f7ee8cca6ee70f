//! Editable text fields of a drug listing.

use super::DrugListing;

/// A text column the user can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum ListingField {
    DisplayName,
    GenericName,
    BrandName,
    Chemo,
    StudyDrug,
    ChemoType,
    TreatmentType,
    Chemotherapy,
}

/// Which validator runs after a field changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    Uniqueness,
    Numeric,
    Length,
    None,
}

impl ListingField {
    pub fn check(&self) -> FieldCheck {
        match self {
            ListingField::DisplayName => FieldCheck::Uniqueness,
            ListingField::StudyDrug => FieldCheck::Numeric,
            ListingField::ChemoType | ListingField::TreatmentType | ListingField::Chemotherapy => {
                FieldCheck::Length
            }
            ListingField::GenericName | ListingField::BrandName | ListingField::Chemo => {
                FieldCheck::None
            }
        }
    }

    /// Mutable access to the field on a row.
    pub fn slot<'a>(&self, listing: &'a mut DrugListing) -> &'a mut Option<String> {
        match self {
            ListingField::DisplayName => &mut listing.display_name,
            ListingField::GenericName => &mut listing.generic_name,
            ListingField::BrandName => &mut listing.brand_name,
            ListingField::Chemo => &mut listing.chemo,
            ListingField::StudyDrug => &mut listing.study_drug,
            ListingField::ChemoType => &mut listing.chemo_type,
            ListingField::TreatmentType => &mut listing.treatment_type,
            ListingField::Chemotherapy => &mut listing.chemotherapy,
        }
    }
}
