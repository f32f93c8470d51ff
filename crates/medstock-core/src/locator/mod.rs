//! Supply matching and demand notification.
//!
//! Pipeline: Catalog Lookup → (Matcher | Notifier)
//!
//! The matcher answers "who near me has this in stock?". When the answer is
//! empty the notifier tells every pharmacy in range that someone asked.

mod catalog;
mod matcher;
mod notifier;

pub use catalog::*;
pub use matcher::*;
pub use notifier::*;

use thiserror::Error;

/// Radius used when the caller does not supply one.
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 20.0;

/// Locator errors.
#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("No such medicine: {0}")]
    MedicineNotFound(String),

    #[error("No such pharmacy: {0}")]
    PharmacyNotFound(String),
}

pub type LocatorResult<T> = Result<T, LocatorError>;
