//! Address types.

use crate::ids::AddressId;
use serde::{Deserialize, Serialize};

/// A Kuwaiti delivery address (area / block / street / building).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Address {
    /// Address ID (None for unsaved addresses).
    #[serde(default)]
    pub id: Option<AddressId>,
    /// Recipient name.
    pub full_name: String,
    /// Contact phone.
    pub phone: String,
    /// Governorate (e.g., "Hawalli").
    #[serde(default)]
    pub governorate: String,
    /// Area (e.g., "Salmiya").
    pub area: String,
    /// Block number.
    pub block: String,
    /// Street name or number.
    pub street: String,
    /// Building / house number.
    pub building: String,
    /// Floor.
    #[serde(default)]
    pub floor: Option<String>,
    /// Apartment.
    #[serde(default)]
    pub apartment: Option<String>,
    /// Directions for the courier.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Address {
    /// Create a new address with the required fields.
    pub fn new(
        full_name: impl Into<String>,
        phone: impl Into<String>,
        area: impl Into<String>,
        block: impl Into<String>,
        street: impl Into<String>,
        building: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            phone: phone.into(),
            area: area.into(),
            block: block.into(),
            street: street.into(),
            building: building.into(),
            ..Default::default()
        }
    }

    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            ("full name", &self.full_name),
            ("phone", &self.phone),
            ("area", &self.area),
            ("block", &self.block),
            ("street", &self.street),
            ("building", &self.building),
        ];
        required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Check if all required fields are present.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![
            self.area.clone(),
            format!("Block {}", self.block),
            format!("Street {}", self.street),
            format!("Building {}", self.building),
        ];
        if let Some(ref floor) = self.floor {
            parts.push(format!("Floor {}", floor));
        }
        if let Some(ref apartment) = self.apartment {
            parts.push(format!("Apt {}", apartment));
        }
        if !self.governorate.is_empty() {
            parts.push(self.governorate.clone());
        }
        parts.join(", ")
    }
}
