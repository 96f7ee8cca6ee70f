//! SQLite schema definition.

/// Complete database schema for the drug listing store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Drug Listings
-- ============================================================================

CREATE TABLE IF NOT EXISTS drug_list (
    drug_id INTEGER PRIMARY KEY AUTOINCREMENT,
    display_name TEXT NOT NULL UNIQUE,
    generic_name TEXT,
    brand_name TEXT,
    chemo TEXT,
    study_drug TEXT,
    chemo_type TEXT,
    treatment_type TEXT,
    chemotherapy TEXT,
    active INTEGER,                              -- NULL, 0 or 1
    date_created INTEGER NOT NULL,               -- epoch seconds
    date_updated INTEGER,                        -- epoch seconds
    changed_by TEXT
);

CREATE INDEX IF NOT EXISTS idx_drug_list_active ON drug_list(active);

-- ============================================================================
-- Access Control
-- ============================================================================

CREATE TABLE IF NOT EXISTS user_permissions (
    user_id TEXT NOT NULL,
    permission TEXT NOT NULL,
    granted_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (user_id, permission)
);
"#;
