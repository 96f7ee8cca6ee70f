//! User permission operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};

impl Database {
    /// Grant a permission to a user. Granting twice is a no-op.
    pub fn grant_permission(&self, user_id: &str, permission: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO user_permissions (user_id, permission) VALUES (?1, ?2)",
            params![user_id, permission],
        )?;
        Ok(())
    }

    /// Revoke a permission. Returns whether it was held.
    pub fn revoke_permission(&self, user_id: &str, permission: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM user_permissions WHERE user_id = ?1 AND permission = ?2",
            params![user_id, permission],
        )?;
        Ok(rows_affected > 0)
    }

    /// Check whether a user holds a permission.
    pub fn has_permission(&self, user_id: &str, permission: &str) -> DbResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM user_permissions WHERE user_id = ?1 AND permission = ?2",
                params![user_id, permission],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
