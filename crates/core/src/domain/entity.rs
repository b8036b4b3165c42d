use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a business record within its own table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgId(pub String);

/// Closed set of business record kinds that can be targeted by an edit
/// request. The snake_case tags are stable: they appear in persisted rows
/// and in notification payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Truck,
    Driver,
    Trip,
    Expense,
    Customer,
    Invoice,
    Employee,
    Inventory,
}

impl EntityType {
    pub const ALL: [EntityType; 8] = [
        EntityType::Truck,
        EntityType::Driver,
        EntityType::Trip,
        EntityType::Expense,
        EntityType::Customer,
        EntityType::Invoice,
        EntityType::Employee,
        EntityType::Inventory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Truck => "truck",
            EntityType::Driver => "driver",
            EntityType::Trip => "trip",
            EntityType::Expense => "expense",
            EntityType::Customer => "customer",
            EntityType::Invoice => "invoice",
            EntityType::Employee => "employee",
            EntityType::Inventory => "inventory",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown entity type `{0}`")]
pub struct UnknownEntityType(pub String);

impl std::str::FromStr for EntityType {
    type Err = UnknownEntityType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "truck" => Ok(EntityType::Truck),
            "driver" => Ok(EntityType::Driver),
            "trip" => Ok(EntityType::Trip),
            "expense" => Ok(EntityType::Expense),
            "customer" => Ok(EntityType::Customer),
            "invoice" => Ok(EntityType::Invoice),
            "employee" => Ok(EntityType::Employee),
            "inventory" => Ok(EntityType::Inventory),
            other => Err(UnknownEntityType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityType, UnknownEntityType};

    #[test]
    fn tags_round_trip_through_from_str() {
        for entity_type in EntityType::ALL {
            let parsed: EntityType = entity_type.as_str().parse().expect("tag should parse");
            assert_eq!(parsed, entity_type);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let error = "supplier".parse::<EntityType>().expect_err("supplier is not reviewable");
        assert_eq!(error, UnknownEntityType("supplier".to_string()));
    }

    #[test]
    fn parsing_trims_and_lowercases() {
        assert_eq!(" Truck ".parse::<EntityType>(), Ok(EntityType::Truck));
    }
}
