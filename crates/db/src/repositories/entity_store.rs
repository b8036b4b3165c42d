use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqliteConnection;

use fleetdesk_core::domain::entity::{EntityId, EntityType};
use fleetdesk_core::domain::patch::{EntityPatch, FieldValue};

use super::EntityApplyError;

/// Applies a typed patch to one kind of business record, inside the
/// caller's transaction. One handler per entity type; the registry below
/// owns the dispatch.
#[async_trait]
pub trait EntityPatchHandler: Send + Sync {
    fn entity_type(&self) -> EntityType;

    async fn apply(
        &self,
        conn: &mut SqliteConnection,
        entity_id: &EntityId,
        patch: &EntityPatch,
    ) -> Result<(), EntityApplyError>;
}

/// Column-level partial UPDATE against a single table. Column names come
/// from the typed patch in core, never from request payloads.
pub struct SqlEntityTable {
    entity_type: EntityType,
    table: &'static str,
}

impl SqlEntityTable {
    pub fn new(entity_type: EntityType, table: &'static str) -> Self {
        Self { entity_type, table }
    }
}

#[async_trait]
impl EntityPatchHandler for SqlEntityTable {
    fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    async fn apply(
        &self,
        conn: &mut SqliteConnection,
        entity_id: &EntityId,
        patch: &EntityPatch,
    ) -> Result<(), EntityApplyError> {
        if patch.entity_type() != self.entity_type {
            return Err(EntityApplyError::PatchMismatch {
                expected: self.entity_type.as_str().to_string(),
                got: patch.entity_type().as_str().to_string(),
            });
        }

        let fields = patch.fields();
        if fields.is_empty() {
            return Err(EntityApplyError::EmptyPatch);
        }

        let assignments = fields
            .iter()
            .map(|field| format!("{} = ?", field.column))
            .collect::<Vec<_>>()
            .join(", ");
        let sql =
            format!("UPDATE {} SET {}, updated_at = ? WHERE id = ?", self.table, assignments);

        let mut query = sqlx::query(&sql);
        for field in &fields {
            query = match &field.value {
                FieldValue::Text(value) => query.bind(value.clone()),
                FieldValue::Integer(value) => query.bind(*value),
                FieldValue::Decimal(value) => query.bind(value.to_string()),
                FieldValue::Date(value) => query.bind(value.to_string()),
            };
        }

        let result = query
            .bind(Utc::now().to_rfc3339())
            .bind(&entity_id.0)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EntityApplyError::EntityMissing {
                entity_type: self.entity_type.as_str().to_string(),
                entity_id: entity_id.0.clone(),
            });
        }

        Ok(())
    }
}

/// Dispatch table from entity-type tag to its update handler. New record
/// kinds are added by registering a handler, not by growing a match.
#[derive(Default)]
pub struct EntityStoreRegistry {
    handlers: HashMap<EntityType, Arc<dyn EntityPatchHandler>>,
}

impl EntityStoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn EntityPatchHandler>) {
        self.handlers.insert(handler.entity_type(), handler);
    }

    pub fn contains(&self, entity_type: EntityType) -> bool {
        self.handlers.contains_key(&entity_type)
    }

    pub async fn apply(
        &self,
        conn: &mut SqliteConnection,
        entity_type: EntityType,
        entity_id: &EntityId,
        patch: &EntityPatch,
    ) -> Result<(), EntityApplyError> {
        let handler = self
            .handlers
            .get(&entity_type)
            .ok_or_else(|| EntityApplyError::UnknownEntityType(entity_type.as_str().to_string()))?;
        handler.apply(conn, entity_id, patch).await
    }
}

/// Registry covering every table of the baseline schema.
pub fn default_registry() -> EntityStoreRegistry {
    let mut registry = EntityStoreRegistry::new();
    registry.register(Arc::new(SqlEntityTable::new(EntityType::Truck, "truck")));
    registry.register(Arc::new(SqlEntityTable::new(EntityType::Driver, "driver")));
    registry.register(Arc::new(SqlEntityTable::new(EntityType::Trip, "trip")));
    registry.register(Arc::new(SqlEntityTable::new(EntityType::Expense, "expense")));
    registry.register(Arc::new(SqlEntityTable::new(EntityType::Customer, "customer")));
    registry.register(Arc::new(SqlEntityTable::new(EntityType::Invoice, "invoice")));
    registry.register(Arc::new(SqlEntityTable::new(EntityType::Employee, "employee")));
    registry.register(Arc::new(SqlEntityTable::new(EntityType::Inventory, "inventory_item")));
    registry
}
