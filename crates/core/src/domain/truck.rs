use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::OrgId;
use crate::domain::patch::PatchField;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TruckId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruckStatus {
    Available,
    InService,
    Maintenance,
    Retired,
}

impl TruckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TruckStatus::Available => "available",
            TruckStatus::InService => "in_service",
            TruckStatus::Maintenance => "maintenance",
            TruckStatus::Retired => "retired",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truck {
    pub id: TruckId,
    pub org_id: OrgId,
    pub plate_number: String,
    pub model: String,
    pub capacity_kg: i64,
    pub status: TruckStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Updatable fields of a truck. `None` means "leave unchanged".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruckPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_kg: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TruckStatus>,
}

impl TruckPatch {
    pub fn apply(&self, truck: &mut Truck) {
        if let Some(plate_number) = &self.plate_number {
            truck.plate_number = plate_number.clone();
        }
        if let Some(model) = &self.model {
            truck.model = model.clone();
        }
        if let Some(capacity_kg) = self.capacity_kg {
            truck.capacity_kg = capacity_kg;
        }
        if let Some(status) = self.status {
            truck.status = status;
        }
    }

    pub fn fields(&self) -> Vec<PatchField> {
        let mut fields = Vec::new();
        if let Some(plate_number) = &self.plate_number {
            fields.push(PatchField::text("plate_number", plate_number.clone()));
        }
        if let Some(model) = &self.model {
            fields.push(PatchField::text("model", model.clone()));
        }
        if let Some(capacity_kg) = self.capacity_kg {
            fields.push(PatchField::integer("capacity_kg", capacity_kg));
        }
        if let Some(status) = self.status {
            fields.push(PatchField::text("status", status.as_str()));
        }
        fields
    }
}
