//! Single-step quantity changes from the per-item controls.
//!
//! Both plans take the quantity the caller rendered, not a fresh read.

use pantry_core::{DomainResult, ItemId};

use crate::item::parse_stored_quantity;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QuantityChange {
    /// Persist the new quantity.
    Set { id: ItemId, quantity: u64 },
    /// Quantity reached zero: delete the record.
    Remove { id: ItemId },
}

impl QuantityChange {
    pub fn id(&self) -> ItemId {
        match self {
            QuantityChange::Set { id, .. } | QuantityChange::Remove { id } => *id,
        }
    }
}

pub fn plan_increase(id: ItemId, current: &str) -> DomainResult<QuantityChange> {
    let quantity = parse_stored_quantity(current)?.saturating_add(1);
    Ok(QuantityChange::Set { id, quantity })
}

pub fn plan_decrease(id: ItemId, current: &str) -> DomainResult<QuantityChange> {
    let quantity = parse_stored_quantity(current)?.saturating_sub(1);
    if quantity == 0 {
        return Ok(QuantityChange::Remove { id });
    }
    Ok(QuantityChange::Set { id, quantity })
}
