use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entity::OrgId;
use crate::domain::patch::PatchField;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryItemId(pub String);

/// Spare parts, tyres, consumables kept at the depot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub org_id: OrgId,
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_cost: Decimal,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl InventoryPatch {
    pub fn apply(&self, item: &mut InventoryItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(sku) = &self.sku {
            item.sku = sku.clone();
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(unit_cost) = self.unit_cost {
            item.unit_cost = unit_cost;
        }
        if let Some(location) = &self.location {
            item.location = location.clone();
        }
    }

    pub fn fields(&self) -> Vec<PatchField> {
        let mut fields = Vec::new();
        if let Some(name) = &self.name {
            fields.push(PatchField::text("name", name.clone()));
        }
        if let Some(sku) = &self.sku {
            fields.push(PatchField::text("sku", sku.clone()));
        }
        if let Some(quantity) = self.quantity {
            fields.push(PatchField::integer("quantity", quantity));
        }
        if let Some(unit_cost) = self.unit_cost {
            fields.push(PatchField::decimal("unit_cost", unit_cost));
        }
        if let Some(location) = &self.location {
            fields.push(PatchField::text("location", location.clone()));
        }
        fields
    }
}
