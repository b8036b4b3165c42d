use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerPatch;
use crate::domain::driver::DriverPatch;
use crate::domain::employee::EmployeePatch;
use crate::domain::entity::EntityType;
use crate::domain::expense::ExpensePatch;
use crate::domain::inventory::InventoryPatch;
use crate::domain::invoice::InvoicePatch;
use crate::domain::trip::TripPatch;
use crate::domain::truck::TruckPatch;

/// A single set field of a patch, addressed by its storage column. The
/// storage layer turns these into a partial UPDATE; fields that are `None`
/// on the patch never show up here and are never written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchField {
    pub column: &'static str,
    pub value: FieldValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(NaiveDate),
}

impl PatchField {
    pub fn text(column: &'static str, value: impl Into<String>) -> Self {
        Self { column, value: FieldValue::Text(value.into()) }
    }

    pub fn integer(column: &'static str, value: i64) -> Self {
        Self { column, value: FieldValue::Integer(value) }
    }

    pub fn decimal(column: &'static str, value: Decimal) -> Self {
        Self { column, value: FieldValue::Decimal(value) }
    }

    pub fn date(column: &'static str, value: NaiveDate) -> Self {
        Self { column, value: FieldValue::Date(value) }
    }
}

/// Snapshot of a proposed (or original) state of one business record,
/// keyed by entity type. Each variant carries only the fields that are
/// legally updatable for that record kind; everything else (ids, org
/// scope, timestamps) is outside the reach of an edit request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity_type", rename_all = "snake_case")]
pub enum EntityPatch {
    Truck(TruckPatch),
    Driver(DriverPatch),
    Trip(TripPatch),
    Expense(ExpensePatch),
    Customer(CustomerPatch),
    Invoice(InvoicePatch),
    Employee(EmployeePatch),
    Inventory(InventoryPatch),
}

impl EntityPatch {
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityPatch::Truck(_) => EntityType::Truck,
            EntityPatch::Driver(_) => EntityType::Driver,
            EntityPatch::Trip(_) => EntityType::Trip,
            EntityPatch::Expense(_) => EntityType::Expense,
            EntityPatch::Customer(_) => EntityType::Customer,
            EntityPatch::Invoice(_) => EntityType::Invoice,
            EntityPatch::Employee(_) => EntityType::Employee,
            EntityPatch::Inventory(_) => EntityType::Inventory,
        }
    }

    /// Set fields as `(column, value)` pairs for the storage layer.
    pub fn fields(&self) -> Vec<PatchField> {
        match self {
            EntityPatch::Truck(patch) => patch.fields(),
            EntityPatch::Driver(patch) => patch.fields(),
            EntityPatch::Trip(patch) => patch.fields(),
            EntityPatch::Expense(patch) => patch.fields(),
            EntityPatch::Customer(patch) => patch.fields(),
            EntityPatch::Invoice(patch) => patch.fields(),
            EntityPatch::Employee(patch) => patch.fields(),
            EntityPatch::Inventory(patch) => patch.fields(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}
