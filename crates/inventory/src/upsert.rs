//! Add-or-increment merge keyed by normalized name.

use serde::{Deserialize, Serialize};

use pantry_core::{DomainError, DomainResult, ItemId};

use crate::category::Category;
use crate::item::{ItemPatch, NewItem, PantryItem, normalize_name};

pub const MSG_MISSING_FIELDS: &str = "Please fill in all fields.";
pub const MSG_NON_POSITIVE: &str = "Positive amount only.";
pub const MSG_NOT_A_NUMBER: &str = "Quantity must be a whole number.";
pub const MSG_UNKNOWN_CATEGORY: &str = "Unknown category.";

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, alias = "imageDescription")]
    pub unit: String,
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    name: String,
    delta: u64,
    category: Category,
    unit: String,
}

impl ValidDraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn delta(&self) -> u64 {
        self.delta
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }
}

impl ItemDraft {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            category: category.into(),
            unit: String::new(),
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Check the draft before anything is sent to storage.
    ///
    /// Order: required fields, then quantity, then category.
    pub fn validate(&self) -> DomainResult<ValidDraft> {
        let name = self.name.trim();
        let quantity = self.quantity.trim();
        let category = self.category.trim();

        if name.is_empty() || quantity.is_empty() || category.is_empty() {
            return Err(DomainError::validation(MSG_MISSING_FIELDS));
        }

        let delta = quantity
            .parse::<i64>()
            .map_err(|_| DomainError::validation(MSG_NOT_A_NUMBER))?;
        if delta <= 0 {
            return Err(DomainError::validation(MSG_NON_POSITIVE));
        }

        let category = category
            .parse::<Category>()
            .map_err(|_| DomainError::validation(MSG_UNKNOWN_CATEGORY))?;

        Ok(ValidDraft {
            name: name.to_string(),
            delta: delta as u64,
            category,
            unit: self.unit.trim().to_string(),
        })
    }
}

/// What the caller must send to storage to apply an add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertPlan {
    Create(NewItem),
    Update { id: ItemId, patch: ItemPatch },
}

/// Decide between creating a record and incrementing an existing one.
///
/// The first record whose normalized name equals the draft's wins. An existing
/// record keeps its name and category; its unit is replaced only by a
/// non-empty draft unit.
pub fn plan_upsert(items: &[PantryItem], draft: &ValidDraft) -> DomainResult<UpsertPlan> {
    let key = normalize_name(&draft.name);

    let Some(existing) = items.iter().find(|item| item.normalized_name() == key) else {
        return Ok(UpsertPlan::Create(NewItem {
            name: draft.name.clone(),
            quantity: draft.delta.to_string(),
            category: draft.category,
            unit: draft.unit.clone(),
        }));
    };

    let total = existing
        .quantity_value()?
        .checked_add(draft.delta)
        .ok_or_else(|| DomainError::invariant("quantity overflow"))?;

    let mut patch = ItemPatch::quantity(total);
    if !draft.unit.is_empty() {
        patch = patch.with_unit(draft.unit.clone());
    }

    Ok(UpsertPlan::Update {
        id: existing.id,
        patch,
    })
}
