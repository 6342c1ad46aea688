use serde::{Deserialize, Serialize};

use pantry_core::{DomainError, DomainResult, ItemId};

use crate::category::Category;

/// One pantry record as held by the storage collaborator.
///
/// `quantity` is kept as text, the way the collection stores it; use
/// [`PantryItem::quantity_value`] to read it as a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: ItemId,
    pub name: String,
    pub quantity: String,
    pub category: Category,
    #[serde(default, alias = "imageDescription")]
    pub unit: String,
}

impl PantryItem {
    pub fn quantity_value(&self) -> DomainResult<u64> {
        parse_stored_quantity(&self.quantity)
    }

    /// Name used for dedup lookups (never stored).
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Secondary display line: `"{quantity}  {unit} - {category}"`.
    pub fn summary(&self) -> String {
        format!("{}  {} - {}", self.quantity, self.unit, self.category)
    }

    pub(crate) fn name_contains(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
    }

    pub(crate) fn category_contains(&self, needle_lower: &str) -> bool {
        self.category.label().to_lowercase().contains(needle_lower)
    }
}

/// Payload for creating a record. The collection assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub quantity: String,
    pub category: Category,
    #[serde(default)]
    pub unit: String,
}

impl NewItem {
    pub fn into_item(self, id: ItemId) -> PantryItem {
        PantryItem {
            id,
            name: self.name,
            quantity: self.quantity,
            category: self.category,
            unit: self.unit,
        }
    }
}

/// Partial update: only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ItemPatch {
    pub fn quantity(quantity: u64) -> Self {
        Self {
            quantity: Some(quantity.to_string()),
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.unit.is_none()
    }

    pub fn apply_to(&self, item: &mut PantryItem) {
        if let Some(q) = &self.quantity {
            item.quantity = q.clone();
        }
        if let Some(u) = &self.unit {
            item.unit = u.clone();
        }
    }
}

/// Trimmed, lower-cased name used only for matching.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Read a quantity as stored (non-negative integer text).
pub fn parse_stored_quantity(text: &str) -> DomainResult<u64> {
    text.trim()
        .parse::<u64>()
        .map_err(|_| DomainError::invariant(format!("stored quantity {text:?} is not a non-negative integer")))
}
