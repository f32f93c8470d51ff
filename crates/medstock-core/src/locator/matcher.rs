//! Nearest-supply ranking.
//!
//! Steps:
//! 1. Resolve the medicine
//! 2. Load its inventory rows with their pharmacies
//! 3. Drop rows with no stock
//! 4. Attach the distance from the origin
//! 5. Drop rows beyond the radius (inclusive bound)
//! 6. Stable sort by distance, nearest first

use crate::db::Database;
use crate::geo::{distance_km, GeoPoint};
use crate::models::{InventoryEntry, Pharmacy, SupplyMatch};

use super::{CatalogLookup, LocatorResult};

/// Finds pharmacies near a point that stock a medicine.
pub struct Matcher<'a> {
    db: &'a Database,
    catalog: CatalogLookup<'a>,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher.
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            catalog: CatalogLookup::new(db),
        }
    }

    /// Find in-stock pharmacies within `radius_km` of `origin`, nearest first.
    ///
    /// An unknown medicine is an error; a known medicine nobody nearby stocks
    /// yields an empty list.
    pub fn find_nearest_supply(
        &self,
        medicine_name: &str,
        origin: GeoPoint,
        radius_km: f64,
    ) -> LocatorResult<Vec<SupplyMatch>> {
        let medicine = self.catalog.resolve_medicine(medicine_name)?;
        let candidates = self.db.list_inventory_with_pharmacies(&medicine.id)?;
        let candidate_count = candidates.len();

        let matches = rank_supply(candidates, origin, radius_km);

        tracing::debug!(
            medicine = %medicine.name,
            candidates = candidate_count,
            matched = matches.len(),
            radius_km,
            "Nearest supply search complete"
        );
        Ok(matches)
    }
}

/// Filter and order inventory rows for an origin and radius.
///
/// Rows with equal distance keep their input order.
pub fn rank_supply(
    candidates: Vec<(Pharmacy, InventoryEntry)>,
    origin: GeoPoint,
    radius_km: f64,
) -> Vec<SupplyMatch> {
    let mut matches: Vec<SupplyMatch> = candidates
        .into_iter()
        .filter(|(_, entry)| entry.is_in_stock())
        .map(|(pharmacy, entry)| {
            let distance_km = distance_km(&origin, &pharmacy.location());
            SupplyMatch {
                pharmacy,
                entry,
                distance_km,
            }
        })
        .filter(|m| m.distance_km <= radius_km)
        .collect();

    matches.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    matches
}
