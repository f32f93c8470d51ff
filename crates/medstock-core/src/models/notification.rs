//! Demand notification models.

use serde::{Deserialize, Serialize};

/// Placeholder replaced by the medicine name in demand messages.
pub const MEDICINE_PLACEHOLDER: &str = "{medicine}";

/// A demand notification addressed to a pharmacy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    /// Unique notification ID
    pub id: String,
    /// Pharmacy the notification is addressed to
    pub pharmacy_id: String,
    /// Medicine that was requested
    pub medicine_id: String,
    /// Message shown to the pharmacy
    pub message: String,
    /// Creation timestamp
    pub created_at: String,
    /// Whether the pharmacy has seen it
    pub read: bool,
}

impl Notification {
    /// Create a new, unread notification.
    pub fn new(pharmacy_id: String, medicine_id: String, message: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pharmacy_id,
            medicine_id,
            message,
            created_at: chrono::Utc::now().to_rfc3339(),
            read: false,
        }
    }
}

/// Render a demand message from a template.
pub fn render_demand_message(template: &str, medicine_name: &str) -> String {
    template.replace(MEDICINE_PLACEHOLDER, medicine_name)
}
