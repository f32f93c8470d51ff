//! Medicine catalog database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{like_pattern, Database, DbResult};
use crate::models::Medicine;

const MEDICINE_COLUMNS: &str = "id, name, generic_name, strength, form, price, \
                                manufacture_date, expiry_date, created_at";

impl Database {
    /// Insert a new medicine.
    pub fn insert_medicine(&self, medicine: &Medicine) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO medicines (
                id, name, generic_name, strength, form, price,
                manufacture_date, expiry_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                medicine.id,
                medicine.name,
                medicine.generic_name,
                medicine.strength,
                medicine.form,
                medicine.price,
                medicine.manufacture_date,
                medicine.expiry_date,
                medicine.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a medicine by ID.
    pub fn get_medicine(&self, id: &str) -> DbResult<Option<Medicine>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM medicines WHERE id = ?", MEDICINE_COLUMNS),
                [id],
                medicine_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Find the first medicine whose primary or generic name equals `name`,
    /// ignoring case.
    ///
    /// When several rows match, the earliest inserted one wins. No other
    /// tie-break is applied.
    pub fn find_medicine_by_name(&self, name: &str) -> DbResult<Option<Medicine>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM medicines
                     WHERE name = ?1 OR generic_name = ?1
                     ORDER BY rowid
                     LIMIT 1",
                    MEDICINE_COLUMNS
                ),
                [name.trim()],
                medicine_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Search medicines whose primary or generic name contains `query`.
    pub fn search_medicines(&self, query: &str, limit: usize) -> DbResult<Vec<Medicine>> {
        let pattern = like_pattern(query);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM medicines
             WHERE name LIKE ?1 ESCAPE '\\' OR generic_name LIKE ?1 ESCAPE '\\'
             ORDER BY name
             LIMIT ?2",
            MEDICINE_COLUMNS
        ))?;

        let rows = stmt.query_map(params![pattern, limit as i64], medicine_from_row)?;

        let mut medicines = Vec::new();
        for row in rows {
            medicines.push(row?);
        }
        Ok(medicines)
    }

    /// List every medicine in insertion order.
    pub fn list_medicines(&self) -> DbResult<Vec<Medicine>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM medicines ORDER BY rowid",
            MEDICINE_COLUMNS
        ))?;
        let rows = stmt.query_map([], medicine_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn medicine_from_row(row: &Row<'_>) -> rusqlite::Result<Medicine> {
    Ok(Medicine {
        id: row.get(0)?,
        name: row.get(1)?,
        generic_name: row.get(2)?,
        strength: row.get(3)?,
        form: row.get(4)?,
        price: row.get(5)?,
        manufacture_date: row.get(6)?,
        expiry_date: row.get(7)?,
        created_at: row.get(8)?,
    })
}
