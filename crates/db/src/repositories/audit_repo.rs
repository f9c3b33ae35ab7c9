//! Repository for the `audit_logs` table. Insert and read only.

use momentum_core::types::DbId;
use sqlx::PgPool;

use crate::models::audit::AuditLog;

/// Column list for `audit_logs` queries.
const COLUMNS: &str = "id, user_id, action, entity_type, entity_id, details, created_at";

/// Provides append/query operations for the audit trail.
pub struct AuditRepo;

impl AuditRepo {
    /// Append an audit entry, returning the generated ID.
    pub async fn insert(
        pool: &PgPool,
        user_id: Option<DbId>,
        action: &str,
        entity_type: Option<&str>,
        entity_id: Option<DbId>,
        details: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO audit_logs (user_id, action, entity_type, entity_id, details) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(user_id)
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .bind(details)
        .fetch_one(pool)
        .await
    }

    /// List entries touching a specific entity, newest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
        limit: i64,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs \
             WHERE entity_type = $1 AND entity_id = $2 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
