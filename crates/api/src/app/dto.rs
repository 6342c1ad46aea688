use serde::{Deserialize, Serialize};

use pantry_infra::{Notification, TrackerState};
use pantry_inventory::{Category, ItemDraft, PantryItem, QuantityChange};

// -------------------------
// Request DTOs
// -------------------------

/// Quantity as it arrives from a form: typed text or a bare JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(i64),
    Text(String),
}

impl QuantityInput {
    pub fn into_text(self) -> String {
        match self {
            QuantityInput::Number(n) => n.to_string(),
            QuantityInput::Text(s) => s,
        }
    }
}

/// Body of `POST /items` and `PUT /form`. Missing fields are left empty so
/// validation reports them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: Option<QuantityInput>,
    #[serde(default)]
    pub category: String,
    #[serde(default, alias = "imageDescription")]
    pub unit: Option<String>,
}

impl From<ItemRequest> for ItemDraft {
    fn from(req: ItemRequest) -> Self {
        let quantity = req.quantity.map(QuantityInput::into_text).unwrap_or_default();
        ItemDraft::new(req.name, quantity, req.category).with_unit(req.unit.unwrap_or_default())
    }
}

/// Optional body of the increase/decrease controls: the quantity the client
/// was showing when the button was pressed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdjustRequest {
    #[serde(default)]
    pub quantity: Option<QuantityInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemsQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamQuery {
    pub category: Option<Category>,
}

// -------------------------
// Response DTOs
// -------------------------

/// One rendered row of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: String,
    pub name: String,
    pub quantity: String,
    pub category: Category,
    pub unit: String,
    pub summary: String,
}

impl From<&PantryItem> for ItemView {
    fn from(item: &PantryItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            quantity: item.quantity.clone(),
            category: item.category,
            unit: item.unit.clone(),
            summary: item.summary(),
        }
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn items_to_json<'a>(search: &str, items: impl IntoIterator<Item = &'a PantryItem>) -> serde_json::Value {
    let items: Vec<ItemView> = items.into_iter().map(ItemView::from).collect();
    serde_json::json!({
        "search": search,
        "count": items.len(),
        "items": items,
    })
}

pub fn change_to_json(change: QuantityChange) -> serde_json::Value {
    match change {
        QuantityChange::Set { id, quantity } => serde_json::json!({
            "id": id.to_string(),
            "quantity": quantity.to_string(),
            "removed": false,
        }),
        QuantityChange::Remove { id } => serde_json::json!({
            "id": id.to_string(),
            "quantity": null,
            "removed": true,
        }),
    }
}

pub fn notification_to_json(notification: Option<&Notification>) -> serde_json::Value {
    match notification {
        Some(n) => serde_json::json!({
            "notification": {
                "message": n.message,
                "severity": n.severity,
                "raised_at": n.raised_at.to_rfc3339(),
                "expires_at": n.expires_at().to_rfc3339(),
            }
        }),
        None => serde_json::json!({ "notification": null }),
    }
}

pub fn recipes_to_json(state: &TrackerState) -> serde_json::Value {
    serde_json::json!({
        "recipes": state.recipes_text(),
        "loading": state.is_loading(),
    })
}

pub fn categories_to_json() -> serde_json::Value {
    let labels: Vec<&'static str> = Category::ALL.iter().map(|c| c.label()).collect();
    serde_json::json!({ "categories": labels })
}
