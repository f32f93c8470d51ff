//! Pharmacy directory database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{is_unique_violation, like_pattern, Database, DbError, DbResult};
use crate::models::Pharmacy;

const PHARMACY_COLUMNS: &str = "id, name, address, latitude, longitude, phone, \
                                email, registration_id, created_at";

impl Database {
    /// Register a new pharmacy.
    ///
    /// Fails with [`DbError::Constraint`] when the email (ignoring case) or
    /// the registration ID is already taken.
    pub fn insert_pharmacy(&self, pharmacy: &Pharmacy) -> DbResult<()> {
        let result = self.conn.execute(
            r#"
            INSERT INTO pharmacies (
                id, name, address, latitude, longitude, phone,
                email, registration_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                pharmacy.id,
                pharmacy.name,
                pharmacy.address,
                pharmacy.latitude,
                pharmacy.longitude,
                pharmacy.phone,
                pharmacy.email.trim(),
                pharmacy.registration_id,
                pharmacy.created_at,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(DbError::Constraint(format!(
                "pharmacy already registered with email {} or registration id {}",
                pharmacy.email,
                pharmacy.registration_id.as_deref().unwrap_or("-")
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a pharmacy by ID.
    pub fn get_pharmacy(&self, id: &str) -> DbResult<Option<Pharmacy>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM pharmacies WHERE id = ?", PHARMACY_COLUMNS),
                [id],
                pharmacy_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a pharmacy by registration email, ignoring case.
    pub fn find_pharmacy_by_email(&self, email: &str) -> DbResult<Option<Pharmacy>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM pharmacies WHERE email = ?", PHARMACY_COLUMNS),
                [email.trim()],
                pharmacy_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Search pharmacies whose name contains `query`, ignoring case.
    pub fn search_pharmacies(&self, query: &str, limit: usize) -> DbResult<Vec<Pharmacy>> {
        let pattern = like_pattern(query);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM pharmacies
             WHERE name LIKE ?1 ESCAPE '\\'
             ORDER BY name
             LIMIT ?2",
            PHARMACY_COLUMNS
        ))?;

        let rows = stmt.query_map(params![pattern, limit as i64], pharmacy_from_row)?;

        let mut pharmacies = Vec::new();
        for row in rows {
            pharmacies.push(row?);
        }
        Ok(pharmacies)
    }

    /// List every pharmacy in the directory, in insertion order.
    pub fn list_pharmacies(&self) -> DbResult<Vec<Pharmacy>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM pharmacies ORDER BY rowid",
            PHARMACY_COLUMNS
        ))?;
        let rows = stmt.query_map([], pharmacy_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

/// Map a row selected with the pharmacy column list, starting at `offset`.
pub(super) fn pharmacy_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<Pharmacy> {
    Ok(Pharmacy {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        address: row.get(offset + 2)?,
        latitude: row.get(offset + 3)?,
        longitude: row.get(offset + 4)?,
        phone: row.get(offset + 5)?,
        email: row.get(offset + 6)?,
        registration_id: row.get(offset + 7)?,
        created_at: row.get(offset + 8)?,
    })
}

fn pharmacy_from_row(row: &Row<'_>) -> rusqlite::Result<Pharmacy> {
    pharmacy_at(row, 0)
}
