use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entity::OrgId;
use crate::domain::patch::PatchField;
use crate::domain::truck::TruckId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpenseId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub org_id: OrgId,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub incurred_on: NaiveDate,
    pub truck_id: Option<TruckId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpensePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incurred_on: Option<NaiveDate>,
}

impl ExpensePatch {
    pub fn apply(&self, expense: &mut Expense) {
        if let Some(category) = &self.category {
            expense.category = category.clone();
        }
        if let Some(description) = &self.description {
            expense.description = description.clone();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(incurred_on) = self.incurred_on {
            expense.incurred_on = incurred_on;
        }
    }

    pub fn fields(&self) -> Vec<PatchField> {
        let mut fields = Vec::new();
        if let Some(category) = &self.category {
            fields.push(PatchField::text("category", category.clone()));
        }
        if let Some(description) = &self.description {
            fields.push(PatchField::text("description", description.clone()));
        }
        if let Some(amount) = self.amount {
            fields.push(PatchField::decimal("amount", amount));
        }
        if let Some(incurred_on) = self.incurred_on {
            fields.push(PatchField::date("incurred_on", incurred_on));
        }
        fields
    }
}
