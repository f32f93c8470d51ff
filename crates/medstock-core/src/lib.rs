//! Medstock Core Library
//!
//! Finds pharmacies near a patient that stock a medicine and, when none do,
//! tells nearby pharmacies about the unmet demand.
//!
//! # Architecture
//!
//! ```text
//!              find_nearest_supply                 notify_demand
//!                      │                                 │
//!                      ▼                                 ▼
//!             ┌─────────────────┐               ┌─────────────────┐
//!             │     Matcher     │               │    Notifier     │
//!             │ stock > 0       │               │ every pharmacy  │
//!             │ distance ≤ r    │               │ distance ≤ r    │
//!             │ nearest first   │               │ 1 row each      │
//!             └────────┬────────┘               └────────┬────────┘
//!                      │         Catalog Lookup          │
//!                      └──────────────┬──────────────────┘
//!                                     │   Geo Math (haversine)
//!                                     ▼
//!          medicines · pharmacies · pharmacy_inventory · notifications
//!                              (SQLite)
//! ```
//!
//! # Modules
//!
//! - [`geo`]: Great-circle distance
//! - [`db`]: SQLite record store with atomic inventory upsert
//! - [`models`]: Domain types (Medicine, Pharmacy, InventoryEntry, Notification)
//! - [`locator`]: Catalog lookup, supply matcher, demand notifier
//! - [`config`]: TOML configuration
//! - [`logging`]: `tracing` subscriber setup

pub mod config;
pub mod db;
pub mod geo;
pub mod locator;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use geo::{distance_km, GeoPoint};
pub use locator::{CatalogLookup, Matcher, Notifier, DEFAULT_SEARCH_RADIUS_KM};
pub use models::{InventoryEntry, Medicine, Notification, Pharmacy, SupplyListing, SupplyMatch};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedStockError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for MedStockError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => MedStockError::NotFound(what),
            db::DbError::Constraint(msg) => MedStockError::Conflict(msg),
            db::DbError::Sqlite(e) => MedStockError::StoreUnavailable(e.to_string()),
        }
    }
}

impl From<locator::LocatorError> for MedStockError {
    fn from(e: locator::LocatorError) -> Self {
        match e {
            locator::LocatorError::Database(e) => e.into(),
            not_found @ (locator::LocatorError::MedicineNotFound(_)
            | locator::LocatorError::PharmacyNotFound(_)) => {
                MedStockError::NotFound(not_found.to_string())
            }
        }
    }
}

impl From<config::ConfigError> for MedStockError {
    fn from(e: config::ConfigError) -> Self {
        MedStockError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for MedStockError {
    fn from(e: serde_json::Error) -> Self {
        MedStockError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedStockError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedStockError::StoreUnavailable(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<MedStockCore>, MedStockError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(MedStockCore::new(db, Config::default())))
}

/// Open or create a database, reading settings from a TOML file.
#[uniffi::export]
pub fn open_database_with_config(
    path: String,
    config_path: String,
) -> Result<Arc<MedStockCore>, MedStockError> {
    let config = Config::load(std::path::Path::new(&config_path))?;
    let db = Database::open(&path)?;
    Ok(Arc::new(MedStockCore::new(db, config)))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<MedStockCore>, MedStockError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(MedStockCore::new(db, Config::default())))
}

/// Install the `tracing` subscriber. Returns false if one already exists.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) -> bool {
    logging::init_logging(filter.as_deref().unwrap_or(config::DEFAULT_LOG_FILTER))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
///
/// This is the request boundary: coordinates, radii and stock levels are
/// validated here before they reach the locator.
#[derive(uniffi::Object)]
pub struct MedStockCore {
    db: Arc<Mutex<Database>>,
    config: Config,
}

impl MedStockCore {
    fn new(db: Database, config: Config) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            config,
        }
    }
}

#[uniffi::export]
impl MedStockCore {
    /// Configured search radius in km.
    pub fn search_radius_km(&self) -> f64 {
        self.config.search_radius_km
    }

    /// Configured `tracing` filter directive.
    pub fn log_filter(&self) -> String {
        self.config.log_filter.clone()
    }

    /// Install the `tracing` subscriber using the configured filter.
    ///
    /// `RUST_LOG` still takes precedence. Returns false if a subscriber
    /// already exists.
    pub fn init_logging(&self) -> bool {
        logging::init_logging(&self.config.log_filter)
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Add a medicine to the catalog.
    pub fn add_medicine(&self, medicine: FfiNewMedicine) -> Result<FfiMedicine, MedStockError> {
        if medicine.name.trim().is_empty() {
            return Err(MedStockError::InvalidInput("medicine name is empty".into()));
        }
        if !medicine.price.is_finite() || medicine.price < 0.0 {
            return Err(MedStockError::InvalidInput(format!(
                "price must be non-negative, got {}",
                medicine.price
            )));
        }
        let db = self.db.lock()?;
        let medicine: Medicine = medicine.into();
        db.insert_medicine(&medicine)?;
        Ok(medicine.into())
    }

    /// Search medicines by primary or generic name.
    pub fn search_medicines(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiMedicine>, MedStockError> {
        let db = self.db.lock()?;
        let medicines = db.search_medicines(&query, limit as usize)?;
        Ok(medicines.into_iter().map(|m| m.into()).collect())
    }

    /// Register a pharmacy. Emails are unique ignoring case.
    pub fn add_pharmacy(&self, pharmacy: FfiNewPharmacy) -> Result<FfiPharmacy, MedStockError> {
        if pharmacy.email.trim().is_empty() {
            return Err(MedStockError::InvalidInput("pharmacy email is empty".into()));
        }
        let location = validate_point(pharmacy.latitude, pharmacy.longitude)?;
        let db = self.db.lock()?;
        let pharmacy = pharmacy.into_pharmacy(location);
        db.insert_pharmacy(&pharmacy)?;
        Ok(pharmacy.into())
    }

    /// Search pharmacies by name.
    pub fn search_pharmacies(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiPharmacy>, MedStockError> {
        let db = self.db.lock()?;
        let pharmacies = db.search_pharmacies(&query, limit as usize)?;
        Ok(pharmacies.into_iter().map(|p| p.into()).collect())
    }

    /// Get a pharmacy by registration email.
    pub fn get_pharmacy_by_email(&self, email: String) -> Result<FfiPharmacy, MedStockError> {
        let db = self.db.lock()?;
        let pharmacy = CatalogLookup::new(&db).resolve_pharmacy_by_email(&email)?;
        Ok(pharmacy.into())
    }

    // =========================================================================
    // Inventory Operations
    // =========================================================================

    /// Report the stock of a medicine at the pharmacy registered with `email`.
    pub fn update_stock(
        &self,
        pharmacy_email: String,
        medicine_id: String,
        stock: i64,
    ) -> Result<FfiInventoryEntry, MedStockError> {
        let stock = u32::try_from(stock).map_err(|_| {
            MedStockError::InvalidInput(format!("stock must be between 0 and {}, got {}", u32::MAX, stock))
        })?;
        let db = self.db.lock()?;
        let pharmacy = CatalogLookup::new(&db).resolve_pharmacy_by_email(&pharmacy_email)?;
        let entry = db.upsert_inventory(&pharmacy.id, &medicine_id, stock)?;
        Ok(entry.into())
    }

    /// Inventory held by the pharmacy registered with `email`.
    pub fn inventory_for_pharmacy(
        &self,
        pharmacy_email: String,
    ) -> Result<Vec<FfiInventoryEntry>, MedStockError> {
        let db = self.db.lock()?;
        let pharmacy = CatalogLookup::new(&db).resolve_pharmacy_by_email(&pharmacy_email)?;
        let entries = db.list_inventory_by_pharmacy(&pharmacy.id)?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    /// Inventory entries for a medicine across all pharmacies.
    pub fn inventory_for_medicine(
        &self,
        medicine_id: String,
    ) -> Result<Vec<FfiInventoryEntry>, MedStockError> {
        let db = self.db.lock()?;
        if db.get_medicine(&medicine_id)?.is_none() {
            return Err(MedStockError::NotFound(format!("medicine {}", medicine_id)));
        }
        let entries = db.list_inventory_by_medicine(&medicine_id)?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    /// Inventory entries for medicines whose name or generic name contains
    /// `name`, ignoring case.
    pub fn inventory_by_medicine_name(
        &self,
        name: String,
    ) -> Result<Vec<FfiInventoryEntry>, MedStockError> {
        let db = self.db.lock()?;
        let entries = db.list_inventory_by_medicine_name(&name)?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    /// Inventory entries for pharmacies whose name contains `name`, ignoring
    /// case.
    pub fn inventory_by_pharmacy_name(
        &self,
        name: String,
    ) -> Result<Vec<FfiInventoryEntry>, MedStockError> {
        let db = self.db.lock()?;
        let entries = db.list_inventory_by_pharmacy_name(&name)?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    // =========================================================================
    // Matching Operations
    // =========================================================================

    /// In-stock pharmacies within the configured radius, nearest first.
    pub fn find_nearest_supply(
        &self,
        medicine_name: String,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<FfiSupplyListing>, MedStockError> {
        self.find_nearest_supply_within(medicine_name, latitude, longitude, self.config.search_radius_km)
    }

    /// In-stock pharmacies within `radius_km`, nearest first.
    pub fn find_nearest_supply_within(
        &self,
        medicine_name: String,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<FfiSupplyListing>, MedStockError> {
        let listings = self.supply_listings(&medicine_name, latitude, longitude, radius_km)?;
        Ok(listings.into_iter().map(|l| l.into()).collect())
    }

    /// Same as [`Self::find_nearest_supply`], rendered as a JSON array.
    pub fn find_nearest_supply_json(
        &self,
        medicine_name: String,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, MedStockError> {
        let listings = self.supply_listings(
            &medicine_name,
            latitude,
            longitude,
            self.config.search_radius_km,
        )?;
        Ok(models::listings_to_json(&listings)?)
    }

    // =========================================================================
    // Notification Operations
    // =========================================================================

    /// Tell every pharmacy within the configured radius about the demand.
    pub fn notify_demand(
        &self,
        medicine_name: String,
        latitude: f64,
        longitude: f64,
    ) -> Result<FfiDemandNotice, MedStockError> {
        self.notify_demand_within(medicine_name, latitude, longitude, self.config.search_radius_km)
    }

    /// Tell every pharmacy within `radius_km` about the demand.
    pub fn notify_demand_within(
        &self,
        medicine_name: String,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<FfiDemandNotice, MedStockError> {
        let origin = validate_point(latitude, longitude)?;
        validate_radius(radius_km)?;
        let db = self.db.lock()?;
        let notifier = Notifier::with_template(&db, &self.config.demand_message);
        let notified = notifier.notify_demand(&medicine_name, origin, radius_km)?;

        Ok(FfiDemandNotice {
            notified_count: u32::try_from(notified).unwrap_or(u32::MAX),
            message: "Nearby pharmacies have been notified about this request.".into(),
        })
    }

    /// Notifications addressed to a pharmacy, newest first.
    pub fn notifications_for_pharmacy(
        &self,
        pharmacy_id: String,
    ) -> Result<Vec<FfiNotification>, MedStockError> {
        let db = self.db.lock()?;
        let notifications = Notifier::new(&db).notifications_for_pharmacy(&pharmacy_id)?;
        Ok(notifications.into_iter().map(|n| n.into()).collect())
    }

    /// Mark a notification as read.
    pub fn mark_notification_read(&self, notification_id: String) -> Result<(), MedStockError> {
        let db = self.db.lock()?;
        if !db.mark_notification_read(&notification_id)? {
            return Err(MedStockError::NotFound(format!(
                "notification {}",
                notification_id
            )));
        }
        Ok(())
    }

    /// Number of unread notifications for a pharmacy.
    pub fn unread_notification_count(&self, pharmacy_id: String) -> Result<u32, MedStockError> {
        let db = self.db.lock()?;
        Ok(db.count_unread_notifications(&pharmacy_id)?)
    }
}

impl MedStockCore {
    fn supply_listings(
        &self,
        medicine_name: &str,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<SupplyListing>, MedStockError> {
        let origin = validate_point(latitude, longitude)?;
        validate_radius(radius_km)?;
        let db = self.db.lock()?;
        let matches = Matcher::new(&db).find_nearest_supply(medicine_name, origin, radius_km)?;
        Ok(matches.iter().map(SupplyListing::from).collect())
    }
}

fn validate_point(latitude: f64, longitude: f64) -> Result<GeoPoint, MedStockError> {
    let point = GeoPoint::new(latitude, longitude);
    if !point.is_valid() {
        return Err(MedStockError::InvalidInput(format!(
            "coordinates out of range: ({}, {})",
            latitude, longitude
        )));
    }
    Ok(point)
}

fn validate_radius(radius_km: f64) -> Result<(), MedStockError> {
    if !config::is_valid_radius(radius_km) {
        return Err(MedStockError::InvalidInput(format!(
            "radius must be a positive number of km, got {}",
            radius_km
        )));
    }
    Ok(())
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe medicine.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub id: String,
    pub name: String,
    pub generic_name: Option<String>,
    pub strength: Option<String>,
    pub form: Option<String>,
    pub price: f64,
    pub manufacture_date: Option<String>,
    pub expiry_date: Option<String>,
}

impl From<Medicine> for FfiMedicine {
    fn from(m: Medicine) -> Self {
        Self {
            id: m.id,
            name: m.name,
            generic_name: m.generic_name,
            strength: m.strength,
            form: m.form,
            price: m.price,
            manufacture_date: m.manufacture_date,
            expiry_date: m.expiry_date,
        }
    }
}

/// FFI-safe medicine registration request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewMedicine {
    pub name: String,
    pub generic_name: Option<String>,
    pub strength: Option<String>,
    pub form: Option<String>,
    pub price: f64,
    pub manufacture_date: Option<String>,
    pub expiry_date: Option<String>,
}

impl From<FfiNewMedicine> for Medicine {
    fn from(m: FfiNewMedicine) -> Self {
        let mut medicine = Medicine::new(m.name.trim().to_string());
        medicine.generic_name = m.generic_name;
        medicine.strength = m.strength;
        medicine.form = m.form;
        medicine.price = m.price;
        medicine.manufacture_date = m.manufacture_date;
        medicine.expiry_date = m.expiry_date;
        medicine
    }
}

/// FFI-safe pharmacy.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPharmacy {
    pub id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub email: String,
    pub registration_id: Option<String>,
}

impl From<Pharmacy> for FfiPharmacy {
    fn from(p: Pharmacy) -> Self {
        Self {
            id: p.id,
            name: p.name,
            address: p.address,
            latitude: p.latitude,
            longitude: p.longitude,
            phone: p.phone,
            email: p.email,
            registration_id: p.registration_id,
        }
    }
}

/// FFI-safe pharmacy registration request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPharmacy {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub email: String,
    pub registration_id: Option<String>,
}

impl FfiNewPharmacy {
    fn into_pharmacy(self, location: GeoPoint) -> Pharmacy {
        let mut pharmacy = Pharmacy::new(self.name, self.address, self.email, location);
        pharmacy.phone = self.phone;
        pharmacy.registration_id = self.registration_id;
        pharmacy
    }
}

/// FFI-safe inventory entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInventoryEntry {
    pub pharmacy_id: String,
    pub medicine_id: String,
    pub stock: u32,
    pub updated_at: String,
}

impl From<InventoryEntry> for FfiInventoryEntry {
    fn from(e: InventoryEntry) -> Self {
        Self {
            pharmacy_id: e.pharmacy_id,
            medicine_id: e.medicine_id,
            stock: e.stock,
            updated_at: e.updated_at,
        }
    }
}

/// FFI-safe supply listing.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSupplyListing {
    pub pharmacy_id: String,
    pub pharmacy_name: String,
    pub address: String,
    pub distance_km: f64,
    pub stock: u32,
}

impl From<SupplyListing> for FfiSupplyListing {
    fn from(l: SupplyListing) -> Self {
        Self {
            pharmacy_id: l.pharmacy_id,
            pharmacy_name: l.pharmacy_name,
            address: l.address,
            distance_km: l.distance_km,
            stock: l.stock,
        }
    }
}

/// FFI-safe demand notification result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDemandNotice {
    pub notified_count: u32,
    pub message: String,
}

/// FFI-safe notification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotification {
    pub id: String,
    pub pharmacy_id: String,
    pub medicine_id: String,
    pub message: String,
    pub created_at: String,
    pub read: bool,
}

impl From<Notification> for FfiNotification {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            pharmacy_id: n.pharmacy_id,
            medicine_id: n.medicine_id,
            message: n.message,
            created_at: n.created_at,
            read: n.read,
        }
    }
}
