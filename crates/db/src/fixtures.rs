use sqlx::Executor;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

const SEED_ORG: &str = "org-hauler-demo";

/// Seeded row ids per table; the verify pass checks each one exists.
const SEED_ROWS: &[(&str, &str)] = &[
    ("truck", "truck-demo-001"),
    ("truck", "truck-demo-002"),
    ("driver", "driver-demo-001"),
    ("driver", "driver-demo-002"),
    ("trip", "trip-demo-001"),
    ("expense", "expense-demo-001"),
    ("customer", "customer-demo-001"),
    ("invoice", "invoice-demo-001"),
    ("employee", "employee-demo-001"),
    ("inventory_item", "item-demo-001"),
];

const SEED_EDIT_REQUEST_ID: &str = "er-demo-001";

/// Deterministic demo dataset: one organization with a small fleet and a
/// single pending edit request waiting for review.
pub struct SeedDataset;

pub struct SeedResult {
    pub org_id: &'static str,
    pub rows_seeded: usize,
}

pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

impl SeedDataset {
    /// SQL fixture content loaded by `load`.
    pub const SQL: &str = include_str!("../../../config/fixtures/seed_data.sql");

    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        Ok(SeedResult { org_id: SEED_ORG, rows_seeded: SEED_ROWS.len() + 1 })
    }

    /// Verify that seed data exists and matches the contract.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for (table, id) in SEED_ROWS {
            let exists: i64 = sqlx::query_scalar(&format!(
                "SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1 AND org_id = ?2)"
            ))
            .bind(id)
            .bind(SEED_ORG)
            .fetch_one(pool)
            .await?;
            checks.push((*id, exists == 1));
        }

        let pending_request: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM edit_request WHERE id = ?1 AND status = 'pending')",
        )
        .bind(SEED_EDIT_REQUEST_ID)
        .fetch_one(pool)
        .await?;
        checks.push((SEED_EDIT_REQUEST_ID, pending_request == 1));

        let all_present = checks.iter().all(|(_, present)| *present);
        Ok(VerificationResult { all_present, checks })
    }
}
