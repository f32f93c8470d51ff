//! SQLite schema definition.

/// Complete database schema for medstock.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Medicine Catalog
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicines (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL COLLATE NOCASE,
    generic_name TEXT COLLATE NOCASE,
    strength TEXT,
    form TEXT,                                   -- tablet, syrup, ...
    price REAL NOT NULL DEFAULT 0,
    manufacture_date TEXT,
    expiry_date TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_medicines_name ON medicines(name);
CREATE INDEX IF NOT EXISTS idx_medicines_generic_name ON medicines(generic_name);

-- ============================================================================
-- Pharmacies
-- ============================================================================

CREATE TABLE IF NOT EXISTS pharmacies (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    phone TEXT,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    registration_id TEXT UNIQUE,                 -- NULLs never collide
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_pharmacies_name ON pharmacies(name);

-- ============================================================================
-- Inventory (one row per pharmacy/medicine pair)
-- ============================================================================

CREATE TABLE IF NOT EXISTS pharmacy_inventory (
    pharmacy_id TEXT NOT NULL REFERENCES pharmacies(id) ON DELETE CASCADE,
    medicine_id TEXT NOT NULL REFERENCES medicines(id) ON DELETE CASCADE,
    stock INTEGER NOT NULL CHECK (stock >= 0),
    updated_at TEXT NOT NULL,
    PRIMARY KEY (pharmacy_id, medicine_id)
);

CREATE INDEX IF NOT EXISTS idx_inventory_medicine ON pharmacy_inventory(medicine_id);

-- ============================================================================
-- Demand Notifications
-- ============================================================================

CREATE TABLE IF NOT EXISTS notifications (
    id TEXT PRIMARY KEY,
    pharmacy_id TEXT NOT NULL REFERENCES pharmacies(id) ON DELETE CASCADE,
    medicine_id TEXT NOT NULL REFERENCES medicines(id) ON DELETE CASCADE,
    message TEXT NOT NULL,
    created_at TEXT NOT NULL,
    read_status INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_notifications_pharmacy ON notifications(pharmacy_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute(
            "INSERT INTO pharmacies (id, name, address, latitude, longitude, email)
             VALUES ('p1', 'Apollo', '12 MG Road', 0.0, 0.0, 'apollo@example.com')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO medicines (id, name) VALUES ('m1', 'Crocin')",
            [],
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_is_reentrant() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_email_unique_ignoring_case() {
        let conn = setup();
        let result = conn.execute(
            "INSERT INTO pharmacies (id, name, address, latitude, longitude, email)
             VALUES ('p2', 'Other', 'Elsewhere', 1.0, 1.0, 'APOLLO@example.com')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_stock_rejected() {
        let conn = setup();
        let result = conn.execute(
            "INSERT INTO pharmacy_inventory (pharmacy_id, medicine_id, stock, updated_at)
             VALUES ('p1', 'm1', -1, datetime('now'))",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_orphan_inventory_rejected() {
        let conn = setup();
        let result = conn.execute(
            "INSERT INTO pharmacy_inventory (pharmacy_id, medicine_id, stock, updated_at)
             VALUES ('missing', 'm1', 1, datetime('now'))",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_inventory_cascades_on_pharmacy_delete() {
        let conn = setup();
        conn.execute(
            "INSERT INTO pharmacy_inventory (pharmacy_id, medicine_id, stock, updated_at)
             VALUES ('p1', 'm1', 5, datetime('now'))",
            [],
        )
        .unwrap();
        conn.execute("DELETE FROM pharmacies WHERE id = 'p1'", []).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM pharmacy_inventory", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
