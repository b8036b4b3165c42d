use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::OrgId;
use crate::domain::patch::PatchField;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub org_id: OrgId,
    pub name: String,
    pub contact_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl CustomerPatch {
    pub fn apply(&self, customer: &mut Customer) {
        if let Some(name) = &self.name {
            customer.name = name.clone();
        }
        if let Some(contact_name) = &self.contact_name {
            customer.contact_name = contact_name.clone();
        }
        if let Some(phone) = &self.phone {
            customer.phone = phone.clone();
        }
        if let Some(email) = &self.email {
            customer.email = email.clone();
        }
        if let Some(address) = &self.address {
            customer.address = address.clone();
        }
    }

    pub fn fields(&self) -> Vec<PatchField> {
        let mut fields = Vec::new();
        if let Some(name) = &self.name {
            fields.push(PatchField::text("name", name.clone()));
        }
        if let Some(contact_name) = &self.contact_name {
            fields.push(PatchField::text("contact_name", contact_name.clone()));
        }
        if let Some(phone) = &self.phone {
            fields.push(PatchField::text("phone", phone.clone()));
        }
        if let Some(email) = &self.email {
            fields.push(PatchField::text("email", email.clone()));
        }
        if let Some(address) = &self.address {
            fields.push(PatchField::text("address", address.clone()));
        }
        fields
    }
}
