//! Matching and fan-out result models.

use serde::{Deserialize, Serialize};

use super::{InventoryEntry, Pharmacy};

/// A pharmacy that can supply the requested medicine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplyMatch {
    /// The supplying pharmacy
    pub pharmacy: Pharmacy,
    /// Its inventory entry for the medicine
    pub entry: InventoryEntry,
    /// Distance from the query origin in km
    pub distance_km: f64,
}

/// Flat view of a [`SupplyMatch`] for callers outside the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplyListing {
    pub pharmacy_id: String,
    pub pharmacy_name: String,
    pub address: String,
    pub distance_km: f64,
    pub stock: u32,
}

impl From<&SupplyMatch> for SupplyListing {
    fn from(m: &SupplyMatch) -> Self {
        Self {
            pharmacy_id: m.pharmacy.id.clone(),
            pharmacy_name: m.pharmacy.name.clone(),
            address: m.pharmacy.address.clone(),
            distance_km: m.distance_km,
            stock: m.entry.stock,
        }
    }
}

/// A pharmacy selected as a notification target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NearbyPharmacy {
    /// The pharmacy
    pub pharmacy: Pharmacy,
    /// Distance from the query origin in km
    pub distance_km: f64,
}

/// Render supply listings as a JSON array.
pub fn listings_to_json(listings: &[SupplyListing]) -> Result<String, serde_json::Error> {
    serde_json::to_string(listings)
}
