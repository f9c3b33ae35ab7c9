//! Repository for the `tasks` table.
//!
//! Deletion is soft: `deleted_at` is stamped and every other query
//! filters on `deleted_at IS NULL`. Ownership is enforced in SQL by
//! matching `user_id` alongside the primary key, so a foreign task id
//! behaves exactly like a missing one.

use momentum_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, UpdateTask};

/// Column list for `tasks` queries.
const COLUMNS: &str = "id, user_id, title, notes, status, quadrant, position, due_date, \
                       estimated_minutes, energy_required, focus_required, completed_at, \
                       deleted_at, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task at the end of its quadrant, returning the full row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (user_id, title, notes, quadrant, position, due_date, \
                                estimated_minutes, energy_required, focus_required) \
             SELECT $1, $2, $3, $4, \
                    COALESCE(MAX(position) + 1, 0), $5, $6, $7, $8 \
             FROM tasks WHERE user_id = $1 AND quadrant = $4 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(input.title.trim())
            .bind(&input.notes)
            .bind(&input.quadrant)
            .bind(input.due_date)
            .bind(input.estimated_minutes)
            .bind(input.energy_required)
            .bind(input.focus_required)
            .fetch_one(pool)
            .await
    }

    /// List a user's live tasks, optionally filtered by quadrant and status.
    ///
    /// Ordered by quadrant then position so the matrix renders stably.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        quadrant: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let quadrant_filter = if quadrant.is_some() {
            "AND quadrant = $2"
        } else {
            "AND $2::text IS NULL"
        };
        let status_filter = if status.is_some() {
            "AND status = $3"
        } else {
            "AND $3::text IS NULL"
        };
        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE user_id = $1 AND deleted_at IS NULL {quadrant_filter} {status_filter} \
             ORDER BY quadrant, position, id"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(quadrant)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Get a single live task owned by the user.
    pub async fn get_for_user(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Patch a task's editable fields. Absent fields are kept.
    ///
    /// Returns the updated row, or `None` if the task does not exist for
    /// this user.
    pub async fn update(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET \
                title = COALESCE($3, title), \
                notes = COALESCE($4, notes), \
                status = COALESCE($5, status), \
                due_date = COALESCE($6, due_date), \
                estimated_minutes = COALESCE($7, estimated_minutes), \
                energy_required = COALESCE($8, energy_required), \
                focus_required = COALESCE($9, focus_required), \
                updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(user_id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.notes)
            .bind(&input.status)
            .bind(input.due_date)
            .bind(input.estimated_minutes)
            .bind(input.energy_required)
            .bind(input.focus_required)
            .fetch_optional(pool)
            .await
    }

    /// Move a task to a quadrant/position and shift siblings to make room.
    ///
    /// Runs in a transaction so a concurrent move never observes the gap.
    pub async fn move_task(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
        quadrant: &str,
        position: i32,
    ) -> Result<Option<Task>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let exists: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM tasks WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL \
             FOR UPDATE",
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if exists.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        // Open a slot in the target quadrant.
        sqlx::query(
            "UPDATE tasks SET position = position + 1, updated_at = NOW() \
             WHERE user_id = $1 AND quadrant = $2 AND position >= $3 \
               AND deleted_at IS NULL AND id <> $4",
        )
        .bind(user_id)
        .bind(quadrant)
        .bind(position)
        .bind(task_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE tasks SET quadrant = $3, position = $4, updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(user_id)
            .bind(quadrant)
            .bind(position)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(task))
    }

    /// Mark a task done and stamp `completed_at`.
    pub async fn complete(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET status = 'done', completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a task.
    ///
    /// Returns `true` if a live task was deleted, `false` otherwise.
    pub async fn soft_delete(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
        )
        .bind(task_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
