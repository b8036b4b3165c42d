use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::driver::DriverId;
use crate::domain::entity::OrgId;
use crate::domain::patch::PatchField;
use crate::domain::truck::TruckId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Scheduled,
    InTransit,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Scheduled => "scheduled",
            TripStatus::InTransit => "in_transit",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub org_id: OrgId,
    pub truck_id: TruckId,
    pub driver_id: DriverId,
    pub origin: String,
    pub destination: String,
    pub cargo_description: String,
    pub scheduled_on: NaiveDate,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reassigning a trip's truck or driver is an edit like any other field;
/// referential validity of the new id is the entity store's concern.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truck_id: Option<TruckId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<DriverId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TripStatus>,
}

impl TripPatch {
    pub fn apply(&self, trip: &mut Trip) {
        if let Some(truck_id) = &self.truck_id {
            trip.truck_id = truck_id.clone();
        }
        if let Some(driver_id) = &self.driver_id {
            trip.driver_id = driver_id.clone();
        }
        if let Some(origin) = &self.origin {
            trip.origin = origin.clone();
        }
        if let Some(destination) = &self.destination {
            trip.destination = destination.clone();
        }
        if let Some(cargo_description) = &self.cargo_description {
            trip.cargo_description = cargo_description.clone();
        }
        if let Some(scheduled_on) = self.scheduled_on {
            trip.scheduled_on = scheduled_on;
        }
        if let Some(status) = self.status {
            trip.status = status;
        }
    }

    pub fn fields(&self) -> Vec<PatchField> {
        let mut fields = Vec::new();
        if let Some(truck_id) = &self.truck_id {
            fields.push(PatchField::text("truck_id", truck_id.0.clone()));
        }
        if let Some(driver_id) = &self.driver_id {
            fields.push(PatchField::text("driver_id", driver_id.0.clone()));
        }
        if let Some(origin) = &self.origin {
            fields.push(PatchField::text("origin", origin.clone()));
        }
        if let Some(destination) = &self.destination {
            fields.push(PatchField::text("destination", destination.clone()));
        }
        if let Some(cargo_description) = &self.cargo_description {
            fields.push(PatchField::text("cargo_description", cargo_description.clone()));
        }
        if let Some(scheduled_on) = self.scheduled_on {
            fields.push(PatchField::date("scheduled_on", scheduled_on));
        }
        if let Some(status) = self.status {
            fields.push(PatchField::text("status", status.as_str()));
        }
        fields
    }
}
