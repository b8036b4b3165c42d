use chrono::{DateTime, Utc};
use sqlx::Row;

use fleetdesk_core::domain::edit_request::{EditRequest, EditRequestId, EditRequestStatus};
use fleetdesk_core::domain::entity::{EntityId, EntityType, OrgId};
use fleetdesk_core::domain::patch::EntityPatch;
use fleetdesk_core::domain::session::UserId;

use super::entity_store::EntityStoreRegistry;
use super::{EditRequestRepository, RepositoryError, ReviewCommitError};
use crate::DbPool;

pub struct SqlEditRequestRepository {
    pool: DbPool,
    registry: EntityStoreRegistry,
}

impl SqlEditRequestRepository {
    pub fn new(pool: DbPool, registry: EntityStoreRegistry) -> Self {
        Self { pool, registry }
    }

    pub fn with_default_registry(pool: DbPool) -> Self {
        Self::new(pool, super::entity_store::default_registry())
    }
}

fn parse_status(s: &str) -> EditRequestStatus {
    match s {
        "approved" => EditRequestStatus::Approved,
        "rejected" => EditRequestStatus::Rejected,
        _ => EditRequestStatus::Pending,
    }
}

fn decode_patch(raw: &str) -> Result<EntityPatch, RepositoryError> {
    serde_json::from_str(raw).map_err(|e| RepositoryError::Decode(e.to_string()))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(e.to_string()))
}

fn row_to_request(row: &sqlx::sqlite::SqliteRow) -> Result<EditRequest, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let entity_type_str: String =
        row.try_get("entity_type").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let entity_id: String =
        row.try_get("entity_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let org_id: String =
        row.try_get("org_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let reason: String =
        row.try_get("reason").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let original_raw: String =
        row.try_get("original_data").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let proposed_raw: String =
        row.try_get("proposed_data").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let status_str: String =
        row.try_get("status").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let requested_by: String =
        row.try_get("requested_by").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let approved_by: Option<String> =
        row.try_get("approved_by").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let approved_at_str: Option<String> =
        row.try_get("approved_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let rejection_reason: Option<String> =
        row.try_get("rejection_reason").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let entity_type: EntityType = entity_type_str
        .parse()
        .map_err(|e: fleetdesk_core::domain::entity::UnknownEntityType| {
            RepositoryError::Decode(e.to_string())
        })?;
    let created_at = parse_timestamp(&created_at_str)?;
    let approved_at = approved_at_str.as_deref().map(parse_timestamp).transpose()?;

    Ok(EditRequest {
        id: EditRequestId(id),
        entity_type,
        entity_id: EntityId(entity_id),
        org_id: OrgId(org_id),
        reason,
        original: decode_patch(&original_raw)?,
        proposed: decode_patch(&proposed_raw)?,
        status: parse_status(&status_str),
        requested_by: UserId(requested_by),
        approved_by: approved_by.map(UserId),
        created_at,
        approved_at,
        rejection_reason,
    })
}

fn encode_patch(patch: &EntityPatch) -> Result<String, RepositoryError> {
    serde_json::to_string(patch).map_err(|e| RepositoryError::Decode(e.to_string()))
}

const SELECT_COLUMNS: &str = "id, entity_type, entity_id, org_id, reason, original_data, \
                              proposed_data, status, requested_by, approved_by, created_at, \
                              approved_at, rejection_reason";

#[async_trait::async_trait]
impl EditRequestRepository for SqlEditRequestRepository {
    async fn create(&self, request: &EditRequest) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO edit_request (id, entity_type, entity_id, org_id, reason,
                                       original_data, proposed_data, status, requested_by,
                                       approved_by, created_at, approved_at, rejection_reason)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.id.0)
        .bind(request.entity_type.as_str())
        .bind(&request.entity_id.0)
        .bind(&request.org_id.0)
        .bind(&request.reason)
        .bind(encode_patch(&request.original)?)
        .bind(encode_patch(&request.proposed)?)
        .bind(request.status.as_str())
        .bind(&request.requested_by.0)
        .bind(request.approved_by.as_ref().map(|user| user.0.clone()))
        .bind(request.created_at.to_rfc3339())
        .bind(request.approved_at.map(|at| at.to_rfc3339()))
        .bind(&request.rejection_reason)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &EditRequestId,
    ) -> Result<Option<EditRequest>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM edit_request WHERE id = ?"
        ))
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_request(r)?)),
            None => Ok(None),
        }
    }

    async fn list_pending(
        &self,
        org_id: &OrgId,
        limit: u32,
    ) -> Result<Vec<EditRequest>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM edit_request
             WHERE org_id = ? AND status = 'pending'
             ORDER BY created_at ASC
             LIMIT ?"
        ))
        .bind(&org_id.0)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_request).collect::<Result<Vec<_>, _>>()
    }

    async fn commit_approval(
        &self,
        request: &EditRequest,
        patch: &EntityPatch,
    ) -> Result<bool, ReviewCommitError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let updated = sqlx::query(
            "UPDATE edit_request
             SET status = ?, approved_by = ?, approved_at = ?
             WHERE id = ? AND status = 'pending'",
        )
        .bind(request.status.as_str())
        .bind(request.approved_by.as_ref().map(|user| user.0.clone()))
        .bind(request.approved_at.map(|at| at.to_rfc3339()))
        .bind(&request.id.0)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(RepositoryError::from)?;
            return Ok(false);
        }

        // An apply failure drops the transaction, so the status flip above
        // never becomes visible and the request stays pending.
        self.registry
            .apply(&mut tx, request.entity_type, &request.entity_id, patch)
            .await?;

        tx.commit().await.map_err(RepositoryError::from)?;
        Ok(true)
    }

    async fn commit_rejection(&self, request: &EditRequest) -> Result<bool, RepositoryError> {
        let updated = sqlx::query(
            "UPDATE edit_request
             SET status = ?, approved_by = ?, approved_at = ?, rejection_reason = ?
             WHERE id = ? AND status = 'pending'",
        )
        .bind(request.status.as_str())
        .bind(request.approved_by.as_ref().map(|user| user.0.clone()))
        .bind(request.approved_at.map(|at| at.to_rfc3339()))
        .bind(&request.rejection_reason)
        .bind(&request.id.0)
        .execute(&self.pool)
        .await?;

        Ok(updated.rows_affected() == 1)
    }
}
