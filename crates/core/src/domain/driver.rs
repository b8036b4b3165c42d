use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::OrgId;
use crate::domain::patch::PatchField;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Active,
    OnLeave,
    Inactive,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Active => "active",
            DriverStatus::OnLeave => "on_leave",
            DriverStatus::Inactive => "inactive",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub org_id: OrgId,
    pub name: String,
    pub phone: String,
    pub license_number: String,
    pub status: DriverStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DriverStatus>,
}

impl DriverPatch {
    pub fn apply(&self, driver: &mut Driver) {
        if let Some(name) = &self.name {
            driver.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            driver.phone = phone.clone();
        }
        if let Some(license_number) = &self.license_number {
            driver.license_number = license_number.clone();
        }
        if let Some(status) = self.status {
            driver.status = status;
        }
    }

    pub fn fields(&self) -> Vec<PatchField> {
        let mut fields = Vec::new();
        if let Some(name) = &self.name {
            fields.push(PatchField::text("name", name.clone()));
        }
        if let Some(phone) = &self.phone {
            fields.push(PatchField::text("phone", phone.clone()));
        }
        if let Some(license_number) = &self.license_number {
            fields.push(PatchField::text("license_number", license_number.clone()));
        }
        if let Some(status) = self.status {
            fields.push(PatchField::text("status", status.as_str()));
        }
        fields
    }
}
