//! Demand fan-out to nearby pharmacies.
//!
//! Every pharmacy within the radius gets one fresh notification per demand
//! event, whatever its current stock. Earlier unread notifications for the
//! same medicine are not consulted.

use crate::db::Database;
use crate::geo::{distance_km, GeoPoint};
use crate::models::{render_demand_message, NearbyPharmacy, Notification, Pharmacy};

use super::{CatalogLookup, LocatorResult};

/// Default demand message; `{medicine}` is replaced by the medicine name.
pub const DEFAULT_DEMAND_MESSAGE: &str =
    "Patient requested {medicine} in your area, please update stock if available.";

/// Notifies pharmacies of unmet demand.
pub struct Notifier<'a> {
    db: &'a Database,
    catalog: CatalogLookup<'a>,
    message_template: String,
}

impl<'a> Notifier<'a> {
    /// Create a notifier using the default message template.
    pub fn new(db: &'a Database) -> Self {
        Self::with_template(db, DEFAULT_DEMAND_MESSAGE)
    }

    /// Create a notifier with a custom message template.
    pub fn with_template(db: &'a Database, template: &str) -> Self {
        Self {
            db,
            catalog: CatalogLookup::new(db),
            message_template: template.to_string(),
        }
    }

    /// Notify every pharmacy within `radius_km` of `origin` that the medicine
    /// was requested. Returns how many notifications were created.
    ///
    /// A failed insert is logged and skipped; the remaining pharmacies are
    /// still notified.
    pub fn notify_demand(
        &self,
        medicine_name: &str,
        origin: GeoPoint,
        radius_km: f64,
    ) -> LocatorResult<usize> {
        let medicine = self.catalog.resolve_medicine(medicine_name)?;
        let targets = pharmacies_within(self.db.list_pharmacies()?, origin, radius_km);
        let message = render_demand_message(&self.message_template, &medicine.name);

        let mut notified = 0;
        for target in &targets {
            let notification =
                Notification::new(target.pharmacy.id.clone(), medicine.id.clone(), message.clone());
            match self.db.insert_notification(&notification) {
                Ok(()) => notified += 1,
                Err(e) => tracing::warn!(
                    pharmacy_id = %target.pharmacy.id,
                    error = %e,
                    "Failed to create demand notification"
                ),
            }
        }

        tracing::info!(
            medicine = %medicine.name,
            in_range = targets.len(),
            notified,
            radius_km,
            "Demand notifications created"
        );
        Ok(notified)
    }

    /// Notifications addressed to a pharmacy, newest first.
    pub fn notifications_for_pharmacy(&self, pharmacy_id: &str) -> LocatorResult<Vec<Notification>> {
        Ok(self.db.list_notifications_for_pharmacy(pharmacy_id)?)
    }
}

/// Select pharmacies within `radius_km` of `origin`, preserving input order.
pub fn pharmacies_within(
    pharmacies: Vec<Pharmacy>,
    origin: GeoPoint,
    radius_km: f64,
) -> Vec<NearbyPharmacy> {
    pharmacies
        .into_iter()
        .map(|pharmacy| {
            let distance_km = distance_km(&origin, &pharmacy.location());
            NearbyPharmacy {
                pharmacy,
                distance_km,
            }
        })
        .filter(|n| n.distance_km <= radius_km)
        .collect()
}
