//! Resolution of request parameters to catalog records.

use crate::db::Database;
use crate::models::{Medicine, Pharmacy};

use super::{LocatorError, LocatorResult};

/// Resolves medicine names and pharmacy emails to canonical records.
pub struct CatalogLookup<'a> {
    db: &'a Database,
}

impl<'a> CatalogLookup<'a> {
    /// Create a new catalog lookup.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Resolve a medicine by primary or generic name, ignoring case.
    ///
    /// If several medicines answer to the name, the first one in store order
    /// is returned.
    pub fn resolve_medicine(&self, name: &str) -> LocatorResult<Medicine> {
        // SQLite NOCASE only folds ASCII
        let found = if name.is_ascii() {
            self.db.find_medicine_by_name(name)?
        } else {
            self.db
                .list_medicines()?
                .into_iter()
                .find(|m| m.answers_to(name))
        };

        found.ok_or_else(|| LocatorError::MedicineNotFound(name.to_string()))
    }

    /// Resolve a pharmacy by registration email, ignoring case.
    pub fn resolve_pharmacy_by_email(&self, email: &str) -> LocatorResult<Pharmacy> {
        self.db
            .find_pharmacy_by_email(email)?
            .ok_or_else(|| LocatorError::PharmacyNotFound(email.to_string()))
    }
}
