use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use fleetdesk_core::domain::edit_request::{EditRequest, EditRequestId};
use fleetdesk_core::domain::entity::{EntityType, OrgId};
use fleetdesk_core::domain::patch::{EntityPatch, FieldValue};

use super::{EditRequestRepository, EntityApplyError, RepositoryError, ReviewCommitError};

fn render(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Integer(number) => number.to_string(),
        FieldValue::Decimal(decimal) => decimal.to_string(),
        FieldValue::Date(date) => date.to_string(),
    }
}

/// In-memory double with the same conditional-commit semantics as the SQL
/// repository. Entities are kept as loose column maps so tests can assert
/// exactly which columns an approval touched.
pub struct InMemoryEditRequestRepository {
    requests: RwLock<HashMap<String, EditRequest>>,
    entities: RwLock<HashMap<(EntityType, String), HashMap<String, String>>>,
    registered: HashSet<EntityType>,
}

impl Default for InMemoryEditRequestRepository {
    fn default() -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
            entities: RwLock::new(HashMap::new()),
            registered: EntityType::ALL.into_iter().collect(),
        }
    }
}

impl InMemoryEditRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Double with a restricted dispatch table, for exercising the
    /// unknown-entity-type path.
    pub fn with_registered_types(types: impl IntoIterator<Item = EntityType>) -> Self {
        Self { registered: types.into_iter().collect(), ..Self::default() }
    }

    pub async fn insert_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        columns: &[(&str, &str)],
    ) {
        let mut entities = self.entities.write().await;
        entities.insert(
            (entity_type, entity_id.to_string()),
            columns.iter().map(|(column, value)| (column.to_string(), value.to_string())).collect(),
        );
    }

    pub async fn entity_column(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        column: &str,
    ) -> Option<String> {
        let entities = self.entities.read().await;
        entities.get(&(entity_type, entity_id.to_string()))?.get(column).cloned()
    }
}

#[async_trait::async_trait]
impl EditRequestRepository for InMemoryEditRequestRepository {
    async fn create(&self, request: &EditRequest) -> Result<(), RepositoryError> {
        let mut requests = self.requests.write().await;
        requests.insert(request.id.0.clone(), request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &EditRequestId,
    ) -> Result<Option<EditRequest>, RepositoryError> {
        let requests = self.requests.read().await;
        Ok(requests.get(&id.0).cloned())
    }

    async fn list_pending(
        &self,
        org_id: &OrgId,
        limit: u32,
    ) -> Result<Vec<EditRequest>, RepositoryError> {
        let requests = self.requests.read().await;
        let mut pending: Vec<EditRequest> = requests
            .values()
            .filter(|request| request.org_id == *org_id && request.is_pending())
            .cloned()
            .collect();
        pending.sort_by(|left, right| left.created_at.cmp(&right.created_at));
        pending.truncate(limit as usize);
        Ok(pending)
    }

    async fn commit_approval(
        &self,
        request: &EditRequest,
        patch: &EntityPatch,
    ) -> Result<bool, ReviewCommitError> {
        let mut requests = self.requests.write().await;
        let mut entities = self.entities.write().await;

        let Some(stored) = requests.get_mut(&request.id.0) else {
            return Ok(false);
        };
        if !stored.is_pending() {
            return Ok(false);
        }

        if !self.registered.contains(&request.entity_type) {
            return Err(EntityApplyError::UnknownEntityType(
                request.entity_type.as_str().to_string(),
            )
            .into());
        }
        if patch.entity_type() != request.entity_type {
            return Err(EntityApplyError::PatchMismatch {
                expected: request.entity_type.as_str().to_string(),
                got: patch.entity_type().as_str().to_string(),
            }
            .into());
        }
        let fields = patch.fields();
        if fields.is_empty() {
            return Err(EntityApplyError::EmptyPatch.into());
        }

        let key = (request.entity_type, request.entity_id.0.clone());
        let Some(entity) = entities.get_mut(&key) else {
            return Err(EntityApplyError::EntityMissing {
                entity_type: request.entity_type.as_str().to_string(),
                entity_id: request.entity_id.0.clone(),
            }
            .into());
        };

        for field in fields {
            entity.insert(field.column.to_string(), render(&field.value));
        }
        *stored = request.clone();
        Ok(true)
    }

    async fn commit_rejection(&self, request: &EditRequest) -> Result<bool, RepositoryError> {
        let mut requests = self.requests.write().await;
        let Some(stored) = requests.get_mut(&request.id.0) else {
            return Ok(false);
        };
        if !stored.is_pending() {
            return Ok(false);
        }
        *stored = request.clone();
        Ok(true)
    }
}
