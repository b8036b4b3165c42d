use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerId;
use crate::domain::entity::OrgId;
use crate::domain::patch::PatchField;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Void,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Void => "void",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub org_id: OrgId,
    pub customer_id: CustomerId,
    pub number: String,
    pub amount: Decimal,
    pub status: InvoiceStatus,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<NaiveDate>,
}

impl InvoicePatch {
    pub fn apply(&self, invoice: &mut Invoice) {
        if let Some(number) = &self.number {
            invoice.number = number.clone();
        }
        if let Some(amount) = self.amount {
            invoice.amount = amount;
        }
        if let Some(status) = self.status {
            invoice.status = status;
        }
        if let Some(issued_on) = self.issued_on {
            invoice.issued_on = issued_on;
        }
        if let Some(due_on) = self.due_on {
            invoice.due_on = due_on;
        }
    }

    pub fn fields(&self) -> Vec<PatchField> {
        let mut fields = Vec::new();
        if let Some(number) = &self.number {
            fields.push(PatchField::text("number", number.clone()));
        }
        if let Some(amount) = self.amount {
            fields.push(PatchField::decimal("amount", amount));
        }
        if let Some(status) = self.status {
            fields.push(PatchField::text("status", status.as_str()));
        }
        if let Some(issued_on) = self.issued_on {
            fields.push(PatchField::date("issued_on", issued_on));
        }
        if let Some(due_on) = self.due_on {
            fields.push(PatchField::date("due_on", due_on));
        }
        fields
    }
}
