//! Inventory models.

use serde::{Deserialize, Serialize};

/// Stock level of one medicine at one pharmacy.
///
/// There is at most one entry per (pharmacy, medicine) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryEntry {
    /// Pharmacy holding the stock
    pub pharmacy_id: String,
    /// Medicine being stocked
    pub medicine_id: String,
    /// Units on hand
    pub stock: u32,
    /// Timestamp of the last stock report
    pub updated_at: String,
}

impl InventoryEntry {
    /// Whether the pharmacy can currently supply the medicine.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }
}
