//! Repositories for the `routines`, `routine_steps`, and
//! `routine_executions` tables.

use momentum_core::types::DbId;
use sqlx::PgPool;

use crate::models::routine::{
    CreateRoutine, Routine, RoutineExecution, RoutineStats, RoutineStep, UpdateRoutine,
};

/// Column list for `routines` queries.
const ROUTINE_COLUMNS: &str = "id, user_id, title, description, total_minutes, \
                               flexibility_score, created_at, updated_at";

/// Column list for `routine_steps` queries.
const STEP_COLUMNS: &str =
    "id, routine_id, position, title, duration_minutes, is_flexible, created_at, updated_at";

/// Column list for `routine_executions` queries.
const EXECUTION_COLUMNS: &str = "id, routine_id, user_id, status, started_at, completed_at, \
                                 steps_completed, steps_skipped, notes, created_at";

// ---------------------------------------------------------------------------
// RoutineRepo
// ---------------------------------------------------------------------------

/// Provides CRUD operations for routines.
pub struct RoutineRepo;

impl RoutineRepo {
    /// Insert a routine, returning the full row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateRoutine,
    ) -> Result<Routine, sqlx::Error> {
        let query = format!(
            "INSERT INTO routines (user_id, title, description) \
             VALUES ($1, $2, $3) \
             RETURNING {ROUTINE_COLUMNS}"
        );
        sqlx::query_as::<_, Routine>(&query)
            .bind(user_id)
            .bind(input.title.trim())
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// List a user's routines, most recently updated first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Routine>, sqlx::Error> {
        let query = format!(
            "SELECT {ROUTINE_COLUMNS} FROM routines WHERE user_id = $1 ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Routine>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Get a routine owned by the user.
    pub async fn get_for_user(
        pool: &PgPool,
        routine_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Routine>, sqlx::Error> {
        let query = format!(
            "SELECT {ROUTINE_COLUMNS} FROM routines WHERE id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, Routine>(&query)
            .bind(routine_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Patch a routine's title/description. Absent fields are kept.
    pub async fn update(
        pool: &PgPool,
        routine_id: DbId,
        user_id: DbId,
        input: &UpdateRoutine,
    ) -> Result<Option<Routine>, sqlx::Error> {
        let query = format!(
            "UPDATE routines SET \
                title = COALESCE($3, title), \
                description = COALESCE($4, description), \
                updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {ROUTINE_COLUMNS}"
        );
        sqlx::query_as::<_, Routine>(&query)
            .bind(routine_id)
            .bind(user_id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a routine. Steps and executions cascade.
    pub async fn delete(pool: &PgPool, routine_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM routines WHERE id = $1 AND user_id = $2")
            .bind(routine_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rewrite the derived fields from the current step rows.
    ///
    /// Called after every step mutation so stored values never go stale.
    pub async fn refresh_derived(pool: &PgPool, routine_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE routines r SET \
                total_minutes = s.total, \
                flexibility_score = s.score, \
                updated_at = NOW() \
             FROM ( \
                SELECT COALESCE(SUM(duration_minutes), 0)::int AS total, \
                       CASE WHEN COUNT(*) = 0 THEN 0 \
                            ELSE COUNT(*) FILTER (WHERE is_flexible)::float / COUNT(*) \
                       END AS score \
                FROM routine_steps WHERE routine_id = $1 \
             ) s \
             WHERE r.id = $1",
        )
        .bind(routine_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RoutineStepRepo
// ---------------------------------------------------------------------------

/// Provides CRUD operations for routine steps.
pub struct RoutineStepRepo;

impl RoutineStepRepo {
    /// Append a step at the end of the routine, returning the full row.
    pub async fn create(
        pool: &PgPool,
        routine_id: DbId,
        title: &str,
        duration_minutes: i32,
        is_flexible: bool,
    ) -> Result<RoutineStep, sqlx::Error> {
        let query = format!(
            "INSERT INTO routine_steps (routine_id, position, title, duration_minutes, is_flexible) \
             SELECT $1, COALESCE(MAX(position) + 1, 0), $2, $3, $4 \
             FROM routine_steps WHERE routine_id = $1 \
             RETURNING {STEP_COLUMNS}"
        );
        sqlx::query_as::<_, RoutineStep>(&query)
            .bind(routine_id)
            .bind(title)
            .bind(duration_minutes)
            .bind(is_flexible)
            .fetch_one(pool)
            .await
    }

    /// List a routine's steps in position order.
    pub async fn list_for_routine(
        pool: &PgPool,
        routine_id: DbId,
    ) -> Result<Vec<RoutineStep>, sqlx::Error> {
        let query = format!(
            "SELECT {STEP_COLUMNS} FROM routine_steps WHERE routine_id = $1 ORDER BY position, id"
        );
        sqlx::query_as::<_, RoutineStep>(&query)
            .bind(routine_id)
            .fetch_all(pool)
            .await
    }

    /// Patch a step. Absent fields are kept.
    pub async fn update(
        pool: &PgPool,
        step_id: DbId,
        routine_id: DbId,
        title: Option<&str>,
        duration_minutes: Option<i32>,
        is_flexible: Option<bool>,
    ) -> Result<Option<RoutineStep>, sqlx::Error> {
        let query = format!(
            "UPDATE routine_steps SET \
                title = COALESCE($3, title), \
                duration_minutes = COALESCE($4, duration_minutes), \
                is_flexible = COALESCE($5, is_flexible), \
                updated_at = NOW() \
             WHERE id = $1 AND routine_id = $2 \
             RETURNING {STEP_COLUMNS}"
        );
        sqlx::query_as::<_, RoutineStep>(&query)
            .bind(step_id)
            .bind(routine_id)
            .bind(title)
            .bind(duration_minutes)
            .bind(is_flexible)
            .fetch_optional(pool)
            .await
    }

    /// Delete a step and close the position gap it leaves.
    pub async fn delete(
        pool: &PgPool,
        step_id: DbId,
        routine_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let position: Option<i32> = sqlx::query_scalar(
            "DELETE FROM routine_steps WHERE id = $1 AND routine_id = $2 RETURNING position",
        )
        .bind(step_id)
        .bind(routine_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(position) = position else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query(
            "UPDATE routine_steps SET position = position - 1, updated_at = NOW() \
             WHERE routine_id = $1 AND position > $2",
        )
        .bind(routine_id)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// RoutineExecutionRepo
// ---------------------------------------------------------------------------

/// Provides operations for routine execution history.
pub struct RoutineExecutionRepo;

impl RoutineExecutionRepo {
    /// Start an execution, returning the full row.
    pub async fn start(
        pool: &PgPool,
        routine_id: DbId,
        user_id: DbId,
    ) -> Result<RoutineExecution, sqlx::Error> {
        let query = format!(
            "INSERT INTO routine_executions (routine_id, user_id) \
             VALUES ($1, $2) \
             RETURNING {EXECUTION_COLUMNS}"
        );
        sqlx::query_as::<_, RoutineExecution>(&query)
            .bind(routine_id)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Finish a running execution with a terminal status and counts.
    ///
    /// Returns the updated row, or `None` if no running execution matched.
    pub async fn finish(
        pool: &PgPool,
        execution_id: DbId,
        user_id: DbId,
        status: &str,
        steps_completed: i32,
        steps_skipped: i32,
        notes: Option<&str>,
    ) -> Result<Option<RoutineExecution>, sqlx::Error> {
        let query = format!(
            "UPDATE routine_executions SET \
                status = $3, \
                completed_at = NOW(), \
                steps_completed = $4, \
                steps_skipped = $5, \
                notes = COALESCE($6, notes) \
             WHERE id = $1 AND user_id = $2 AND status = 'running' \
             RETURNING {EXECUTION_COLUMNS}"
        );
        sqlx::query_as::<_, RoutineExecution>(&query)
            .bind(execution_id)
            .bind(user_id)
            .bind(status)
            .bind(steps_completed)
            .bind(steps_skipped)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// List a routine's executions, newest first.
    pub async fn list_for_routine(
        pool: &PgPool,
        routine_id: DbId,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RoutineExecution>, sqlx::Error> {
        let query = format!(
            "SELECT {EXECUTION_COLUMNS} FROM routine_executions \
             WHERE routine_id = $1 AND user_id = $2 \
             ORDER BY started_at DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, RoutineExecution>(&query)
            .bind(routine_id)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Aggregate execution statistics for a routine.
    pub async fn stats(
        pool: &PgPool,
        routine_id: DbId,
        user_id: DbId,
    ) -> Result<RoutineStats, sqlx::Error> {
        sqlx::query_as::<_, RoutineStats>(
            "SELECT COUNT(*) AS total_runs, \
                    COUNT(*) FILTER (WHERE status = 'completed') AS completed_runs, \
                    COUNT(*) FILTER (WHERE status = 'abandoned') AS abandoned_runs, \
                    (AVG(EXTRACT(EPOCH FROM (completed_at - started_at)) / 60.0) \
                        FILTER (WHERE status = 'completed'))::float8 AS avg_completed_minutes \
             FROM routine_executions \
             WHERE routine_id = $1 AND user_id = $2",
        )
        .bind(routine_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
