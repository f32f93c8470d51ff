//! Inventory database operations.
//!
//! Pair uniqueness is owned by the table's composite primary key; writes go
//! through a single `INSERT ... ON CONFLICT DO UPDATE` statement so two
//! concurrent reports for the same pair leave exactly one row.

use rusqlite::{params, OptionalExtension, Row};

use super::pharmacies::pharmacy_at;
use super::{like_pattern, Database, DbError, DbResult};
use crate::models::{InventoryEntry, Pharmacy};

impl Database {
    /// Record the stock level of a medicine at a pharmacy.
    ///
    /// Creates the entry on first report and overwrites it afterwards. Every
    /// call stamps the current time, even when the stock is unchanged.
    pub fn upsert_inventory(
        &self,
        pharmacy_id: &str,
        medicine_id: &str,
        stock: u32,
    ) -> DbResult<InventoryEntry> {
        if self.get_pharmacy(pharmacy_id)?.is_none() {
            return Err(DbError::NotFound(format!("pharmacy {}", pharmacy_id)));
        }
        if self.get_medicine(medicine_id)?.is_none() {
            return Err(DbError::NotFound(format!("medicine {}", medicine_id)));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let entry = self
            .conn
            .query_row(
                r#"
                INSERT INTO pharmacy_inventory (pharmacy_id, medicine_id, stock, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(pharmacy_id, medicine_id) DO UPDATE SET
                    stock = excluded.stock,
                    updated_at = excluded.updated_at
                RETURNING pharmacy_id, medicine_id, stock, updated_at
                "#,
                params![pharmacy_id, medicine_id, stock, now],
                entry_from_row,
            )
            .map_err(|e| match e {
                // Parent deleted between the existence check and the write
                rusqlite::Error::SqliteFailure(ref f, _)
                    if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
                {
                    DbError::NotFound(format!("pharmacy {} or medicine {}", pharmacy_id, medicine_id))
                }
                other => other.into(),
            })?;

        tracing::debug!(
            pharmacy_id,
            medicine_id,
            stock = entry.stock,
            "Inventory updated"
        );
        Ok(entry)
    }

    /// Get the inventory entry for a pharmacy/medicine pair.
    pub fn get_inventory_entry(
        &self,
        pharmacy_id: &str,
        medicine_id: &str,
    ) -> DbResult<Option<InventoryEntry>> {
        self.conn
            .query_row(
                r#"
                SELECT pharmacy_id, medicine_id, stock, updated_at
                FROM pharmacy_inventory
                WHERE pharmacy_id = ?1 AND medicine_id = ?2
                "#,
                params![pharmacy_id, medicine_id],
                entry_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List every inventory entry for a medicine.
    pub fn list_inventory_by_medicine(&self, medicine_id: &str) -> DbResult<Vec<InventoryEntry>> {
        self.list_inventory_where("medicine_id = ?", medicine_id)
    }

    /// List every inventory entry held by a pharmacy.
    pub fn list_inventory_by_pharmacy(&self, pharmacy_id: &str) -> DbResult<Vec<InventoryEntry>> {
        self.list_inventory_where("pharmacy_id = ?", pharmacy_id)
    }

    /// List inventory entries for a medicine joined with their pharmacies.
    ///
    /// Rows come back in the order the pairs were first reported.
    pub fn list_inventory_with_pharmacies(
        &self,
        medicine_id: &str,
    ) -> DbResult<Vec<(Pharmacy, InventoryEntry)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.id, p.name, p.address, p.latitude, p.longitude, p.phone,
                   p.email, p.registration_id, p.created_at,
                   i.pharmacy_id, i.medicine_id, i.stock, i.updated_at
            FROM pharmacy_inventory i
            JOIN pharmacies p ON p.id = i.pharmacy_id
            WHERE i.medicine_id = ?
            ORDER BY i.rowid
            "#,
        )?;

        let rows = stmt.query_map([medicine_id], |row| {
            Ok((pharmacy_at(row, 0)?, entry_at(row, 9)?))
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List inventory entries whose medicine name or generic name contains
    /// `query`, ignoring case.
    pub fn list_inventory_by_medicine_name(&self, query: &str) -> DbResult<Vec<InventoryEntry>> {
        self.list_inventory_joined(
            "JOIN medicines m ON m.id = i.medicine_id
             WHERE m.name LIKE ?1 ESCAPE '\\' OR m.generic_name LIKE ?1 ESCAPE '\\'",
            query,
        )
    }

    /// List inventory entries held by pharmacies whose name contains `query`,
    /// ignoring case.
    pub fn list_inventory_by_pharmacy_name(&self, query: &str) -> DbResult<Vec<InventoryEntry>> {
        self.list_inventory_joined(
            "JOIN pharmacies p ON p.id = i.pharmacy_id
             WHERE p.name LIKE ?1 ESCAPE '\\'",
            query,
        )
    }

    fn list_inventory_joined(&self, join: &str, query: &str) -> DbResult<Vec<InventoryEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT i.pharmacy_id, i.medicine_id, i.stock, i.updated_at
             FROM pharmacy_inventory i
             {}
             ORDER BY i.rowid",
            join
        ))?;
        let rows = stmt.query_map([like_pattern(query)], entry_from_row)?;
        let entries = rows.collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(query, matched = entries.len(), "Inventory name search");
        Ok(entries)
    }

    fn list_inventory_where(&self, predicate: &str, key: &str) -> DbResult<Vec<InventoryEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT pharmacy_id, medicine_id, stock, updated_at
             FROM pharmacy_inventory
             WHERE {}
             ORDER BY rowid",
            predicate
        ))?;
        let rows = stmt.query_map([key], entry_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn entry_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<InventoryEntry> {
    Ok(InventoryEntry {
        pharmacy_id: row.get(offset)?,
        medicine_id: row.get(offset + 1)?,
        stock: row.get(offset + 2)?,
        updated_at: row.get(offset + 3)?,
    })
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<InventoryEntry> {
    entry_at(row, 0)
}
