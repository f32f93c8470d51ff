//! Medicine catalog models.

use serde::{Deserialize, Serialize};

/// A medicine in the shared catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medicine {
    /// Stable identifier (UUID)
    pub id: String,
    /// Primary (brand) name
    pub name: String,
    /// Generic name, also accepted when resolving by name
    pub generic_name: Option<String>,
    /// Strength (e.g., "500mg")
    pub strength: Option<String>,
    /// Dosage form (e.g., "tablet", "syrup")
    pub form: Option<String>,
    /// Unit price
    pub price: f64,
    /// Manufacture date (ISO 8601)
    pub manufacture_date: Option<String>,
    /// Expiry date (ISO 8601)
    pub expiry_date: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Medicine {
    /// Create a new medicine with required fields.
    pub fn new(name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            generic_name: None,
            strength: None,
            form: None,
            price: 0.0,
            manufacture_date: None,
            expiry_date: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Check whether a requested name refers to this medicine.
    ///
    /// Case-insensitive equality against the primary or the generic name.
    pub fn answers_to(&self, requested: &str) -> bool {
        let requested = requested.trim().to_lowercase();
        self.name.to_lowercase() == requested
            || self
                .generic_name
                .as_ref()
                .is_some_and(|g| g.to_lowercase() == requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_medicine() {
        let med = Medicine::new("Crocin".into());
        assert_eq!(med.name, "Crocin");
        assert_eq!(med.id.len(), 36); // UUID format
        assert!(med.generic_name.is_none());
    }

    #[test]
    fn test_answers_to_primary_and_generic() {
        let mut med = Medicine::new("Crocin".into());
        med.generic_name = Some("Paracetamol".into());

        assert!(med.answers_to("crocin"));
        assert!(med.answers_to("PARACETAMOL"));
        assert!(med.answers_to("  Paracetamol "));
        assert!(!med.answers_to("Croc"));
        assert!(!med.answers_to("Ibuprofen"));
    }
}
