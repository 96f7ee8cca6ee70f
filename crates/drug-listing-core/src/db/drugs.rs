//! Drug listing database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{ActiveFlag, DrugListing};

const SELECT_COLUMNS: &str = r#"
    SELECT drug_id, display_name, generic_name, brand_name, chemo,
           study_drug, chemo_type, treatment_type, chemotherapy,
           active, date_created
    FROM drug_list
"#;

fn row_to_listing(row: &Row<'_>) -> rusqlite::Result<DrugListing> {
    Ok(DrugListing {
        drug_id: row.get(0)?,
        display_name: row.get(1)?,
        generic_name: row.get(2)?,
        brand_name: row.get(3)?,
        chemo: row.get(4)?,
        study_drug: row.get(5)?,
        chemo_type: row.get(6)?,
        treatment_type: row.get(7)?,
        chemotherapy: row.get(8)?,
        active: ActiveFlag::from_int(row.get(9)?),
        date_created: row.get(10)?,
        ..Default::default()
    })
}

impl Database {
    /// List all drugs ordered by display name.
    pub fn list_drugs(&self) -> DbResult<Vec<DrugListing>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY display_name");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_listing)?;

        let mut drugs = Vec::new();
        for row in rows {
            drugs.push(row?);
        }
        Ok(drugs)
    }

    /// Get a drug by ID.
    pub fn get_drug(&self, drug_id: i64) -> DbResult<Option<DrugListing>> {
        let sql = format!("{SELECT_COLUMNS} WHERE drug_id = ?");
        Ok(self
            .conn
            .query_row(&sql, [drug_id], row_to_listing)
            .optional()?)
    }

    /// Insert a new drug, returning its ID.
    pub fn insert_drug(&self, drug: &DrugListing, changed_by: &str, now: i64) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO drug_list (
                display_name, generic_name, brand_name, chemo, study_drug,
                chemo_type, treatment_type, chemotherapy, active,
                date_created, date_updated, changed_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                drug.display_name,
                drug.generic_name,
                drug.brand_name,
                drug.chemo,
                drug.study_drug,
                drug.chemo_type,
                drug.treatment_type,
                drug.chemotherapy,
                drug.active.as_int(),
                drug.date_created,
                now,
                changed_by,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update an existing drug by ID.
    pub fn update_drug(&self, drug: &DrugListing, changed_by: &str, now: i64) -> DbResult<()> {
        let drug_id = drug
            .drug_id
            .ok_or_else(|| DbError::NotFound("drug without id".into()))?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE drug_list SET
                display_name = ?2,
                generic_name = ?3,
                brand_name = ?4,
                chemo = ?5,
                study_drug = ?6,
                chemo_type = ?7,
                treatment_type = ?8,
                chemotherapy = ?9,
                active = ?10,
                date_updated = ?11,
                changed_by = ?12
            WHERE drug_id = ?1
            "#,
            params![
                drug_id,
                drug.display_name,
                drug.generic_name,
                drug.brand_name,
                drug.chemo,
                drug.study_drug,
                drug.chemo_type,
                drug.treatment_type,
                drug.chemotherapy,
                drug.active.as_int(),
                now,
                changed_by,
            ],
        )?;

        if rows_affected == 0 {
            return Err(DbError::NotFound(format!("drug {drug_id}")));
        }
        Ok(())
    }

    /// Apply a batch of edits atomically.
    ///
    /// Rows flagged `added_new` are inserted, all others are updated by ID.
    /// Returns the number of rows written.
    pub fn apply_drug_changes(
        &self,
        drugs: &[DrugListing],
        changed_by: &str,
        now: i64,
    ) -> DbResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for drug in drugs {
            if drug.added_new {
                self.insert_drug(drug, changed_by, now)?;
            } else {
                self.update_drug(drug, changed_by, now)?;
            }
        }
        tx.commit()?;
        Ok(drugs.len())
    }
}
