use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::OrgId;
use crate::domain::patch::PatchField;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub org_id: OrgId,
    pub name: String,
    pub title: String,
    pub phone: String,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EmployeeStatus>,
}

impl EmployeePatch {
    pub fn apply(&self, employee: &mut Employee) {
        if let Some(name) = &self.name {
            employee.name = name.clone();
        }
        if let Some(title) = &self.title {
            employee.title = title.clone();
        }
        if let Some(phone) = &self.phone {
            employee.phone = phone.clone();
        }
        if let Some(status) = self.status {
            employee.status = status;
        }
    }

    pub fn fields(&self) -> Vec<PatchField> {
        let mut fields = Vec::new();
        if let Some(name) = &self.name {
            fields.push(PatchField::text("name", name.clone()));
        }
        if let Some(title) = &self.title {
            fields.push(PatchField::text("title", title.clone()));
        }
        if let Some(phone) = &self.phone {
            fields.push(PatchField::text("phone", phone.clone()));
        }
        if let Some(status) = self.status {
            fields.push(PatchField::text("status", status.as_str()));
        }
        fields
    }
}
