//! Pantry inventory domain module.
//!
//! This crate contains the item-merge and search rules of the tracker,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).
//! Storage-facing operations are expressed as *plans* the caller executes
//! against its storage collaborator.

pub mod adjust;
pub mod category;
pub mod item;
pub mod upsert;
pub mod view;

pub use adjust::{QuantityChange, plan_decrease, plan_increase};
pub use category::{Category, UnknownCategory};
pub use item::{ItemPatch, NewItem, PantryItem, normalize_name, parse_stored_quantity};
pub use upsert::{ItemDraft, UpsertPlan, ValidDraft, plan_upsert};
pub use view::{SearchIter, SearchView};
