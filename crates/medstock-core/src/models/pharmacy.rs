//! Pharmacy models.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A registered pharmacy.
///
/// Distance from a query origin is never stored here; matching and
/// notification results carry it alongside the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pharmacy {
    /// Stable identifier (UUID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Postal address
    pub address: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Contact phone
    pub phone: Option<String>,
    /// Registration email, unique ignoring case
    pub email: String,
    /// Tax/registration number, unique when present
    pub registration_id: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Pharmacy {
    /// Create a new pharmacy with required fields.
    pub fn new(name: String, address: String, email: String, location: GeoPoint) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            address,
            latitude: location.latitude,
            longitude: location.longitude,
            phone: None,
            email,
            registration_id: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Geographic position of the pharmacy.
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}
