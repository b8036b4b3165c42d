use async_trait::async_trait;
use thiserror::Error;

use fleetdesk_core::domain::edit_request::{EditRequest, EditRequestId};
use fleetdesk_core::domain::entity::OrgId;
use fleetdesk_core::domain::patch::EntityPatch;

pub mod edit_request;
pub mod entity_store;
pub mod memory;

pub use edit_request::SqlEditRequestRepository;
pub use entity_store::{
    default_registry, EntityPatchHandler, EntityStoreRegistry, SqlEntityTable,
};
pub use memory::InMemoryEditRequestRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Failure while applying a proposed patch to its target record.
#[derive(Debug, Error)]
pub enum EntityApplyError {
    #[error("no update handler is registered for entity type `{0}`")]
    UnknownEntityType(String),
    #[error("{entity_type} `{entity_id}` does not exist")]
    EntityMissing { entity_type: String, entity_id: String },
    #[error("patch is tagged `{got}` but the handler updates `{expected}`")]
    PatchMismatch { expected: String, got: String },
    #[error("patch contains no fields to apply")]
    EmptyPatch,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failure of the transactional review commit.
#[derive(Debug, Error)]
pub enum ReviewCommitError {
    #[error(transparent)]
    Apply(EntityApplyError),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<EntityApplyError> for ReviewCommitError {
    fn from(value: EntityApplyError) -> Self {
        Self::Apply(value)
    }
}

impl From<RepositoryError> for ReviewCommitError {
    fn from(value: RepositoryError) -> Self {
        Self::Repository(value)
    }
}

#[async_trait]
pub trait EditRequestRepository: Send + Sync {
    async fn create(&self, request: &EditRequest) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &EditRequestId)
        -> Result<Option<EditRequest>, RepositoryError>;

    /// Pending requests of one organization, oldest first.
    async fn list_pending(
        &self,
        org_id: &OrgId,
        limit: u32,
    ) -> Result<Vec<EditRequest>, RepositoryError>;

    /// Persists an approval as one unit of work: the request row update is
    /// conditioned on the row still being `pending`, and the entity patch
    /// is applied inside the same transaction. `Ok(false)` means another
    /// reviewer got there first and nothing was written.
    async fn commit_approval(
        &self,
        request: &EditRequest,
        patch: &EntityPatch,
    ) -> Result<bool, ReviewCommitError>;

    /// Same conditional update for a rejection; the target record is never
    /// touched.
    async fn commit_rejection(&self, request: &EditRequest) -> Result<bool, RepositoryError>;
}
