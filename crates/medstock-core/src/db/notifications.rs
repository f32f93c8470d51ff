//! Notification database operations.

use rusqlite::{params, Row};

use super::{Database, DbResult};
use crate::models::Notification;

impl Database {
    /// Insert a new notification.
    pub fn insert_notification(&self, notification: &Notification) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO notifications (
                id, pharmacy_id, medicine_id, message, created_at, read_status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                notification.id,
                notification.pharmacy_id,
                notification.medicine_id,
                notification.message,
                notification.created_at,
                notification.read,
            ],
        )?;
        Ok(())
    }

    /// List notifications addressed to a pharmacy, newest first.
    pub fn list_notifications_for_pharmacy(
        &self,
        pharmacy_id: &str,
    ) -> DbResult<Vec<Notification>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, pharmacy_id, medicine_id, message, created_at, read_status
            FROM notifications
            WHERE pharmacy_id = ?
            ORDER BY rowid DESC
            "#,
        )?;
        let rows = stmt.query_map([pharmacy_id], notification_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Mark a notification as read. Returns false if it does not exist.
    pub fn mark_notification_read(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("UPDATE notifications SET read_status = 1 WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Count unread notifications for a pharmacy.
    pub fn count_unread_notifications(&self, pharmacy_id: &str) -> DbResult<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE pharmacy_id = ?1 AND read_status = 0",
            params![pharmacy_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn notification_from_row(row: &Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get(0)?,
        pharmacy_id: row.get(1)?,
        medicine_id: row.get(2)?,
        message: row.get(3)?,
        created_at: row.get(4)?,
        read: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::models::{Medicine, Pharmacy};

    fn setup_db() -> (Database, Pharmacy, Medicine) {
        let db = Database::open_in_memory().unwrap();
        let pharmacy = Pharmacy::new(
            "Apollo".into(),
            "12 MG Road".into(),
            "apollo@example.com".into(),
            GeoPoint::new(12.97, 77.59),
        );
        let medicine = Medicine::new("Crocin".into());
        db.insert_pharmacy(&pharmacy).unwrap();
        db.insert_medicine(&medicine).unwrap();
        (db, pharmacy, medicine)
    }

    #[test]
    fn test_insert_and_list() {
        let (db, p, m) = setup_db();
        let first = Notification::new(p.id.clone(), m.id.clone(), "first".into());
        let second = Notification::new(p.id.clone(), m.id.clone(), "second".into());
        db.insert_notification(&first).unwrap();
        db.insert_notification(&second).unwrap();

        let listed = db.list_notifications_for_pharmacy(&p.id).unwrap();
        assert_eq!(listed, vec![second, first]);
    }

    #[test]
    fn test_identical_messages_are_not_deduplicated() {
        let (db, p, m) = setup_db();
        for _ in 0..3 {
            let n = Notification::new(p.id.clone(), m.id.clone(), "same".into());
            db.insert_notification(&n).unwrap();
        }
        assert_eq!(db.list_notifications_for_pharmacy(&p.id).unwrap().len(), 3);
    }

    #[test]
    fn test_mark_read() {
        let (db, p, m) = setup_db();
        let n = Notification::new(p.id.clone(), m.id.clone(), "hello".into());
        db.insert_notification(&n).unwrap();
        assert_eq!(db.count_unread_notifications(&p.id).unwrap(), 1);

        assert!(db.mark_notification_read(&n.id).unwrap());
        assert_eq!(db.count_unread_notifications(&p.id).unwrap(), 0);
        assert!(db.list_notifications_for_pharmacy(&p.id).unwrap()[0].read);

        assert!(!db.mark_notification_read("missing").unwrap());
    }

    #[test]
    fn test_unknown_pharmacy_rejected() {
        let (db, _, m) = setup_db();
        let n = Notification::new("missing".into(), m.id.clone(), "hello".into());
        assert!(db.insert_notification(&n).is_err());
    }
}
