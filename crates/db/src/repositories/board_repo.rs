//! Repositories for the `boards` and `board_steps` tables.

use momentum_core::roles::ROLE_OWNER;
use momentum_core::types::DbId;
use sqlx::PgPool;

use crate::models::board::{Board, BoardStep, CreateBoard, UpdateBoard};

/// Column list for `boards` queries.
const BOARD_COLUMNS: &str =
    "id, owner_id, title, board_type, layout, is_template, created_at, updated_at";

/// Column list for `board_steps` queries.
const STEP_COLUMNS: &str =
    "id, board_id, position, title, visual, timer, transition, created_at, updated_at";

// ---------------------------------------------------------------------------
// BoardRepo
// ---------------------------------------------------------------------------

/// Provides CRUD operations for boards.
pub struct BoardRepo;

impl BoardRepo {
    /// Insert a board and its owner collaborator row in one transaction.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateBoard,
    ) -> Result<Board, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO boards (owner_id, title, board_type, layout, is_template) \
             VALUES ($1, $2, $3, COALESCE($4, 'list'), COALESCE($5, false)) \
             RETURNING {BOARD_COLUMNS}"
        );
        let board = sqlx::query_as::<_, Board>(&query)
            .bind(owner_id)
            .bind(input.title.trim())
            .bind(&input.board_type)
            .bind(&input.layout)
            .bind(input.is_template)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO board_collaborators (board_id, user_id, role, added_by) \
             VALUES ($1, $2, $3, $2)",
        )
        .bind(board.id)
        .bind(owner_id)
        .bind(ROLE_OWNER)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(board)
    }

    /// List boards the user owns or collaborates on.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Board>, sqlx::Error> {
        let query = format!(
            "SELECT b.{} FROM boards b \
             JOIN board_collaborators c ON c.board_id = b.id \
             WHERE c.user_id = $1 \
             ORDER BY b.updated_at DESC",
            BOARD_COLUMNS.replace(", ", ", b.")
        );
        sqlx::query_as::<_, Board>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Get a board by id.
    pub async fn find_by_id(pool: &PgPool, board_id: DbId) -> Result<Option<Board>, sqlx::Error> {
        let query = format!("SELECT {BOARD_COLUMNS} FROM boards WHERE id = $1");
        sqlx::query_as::<_, Board>(&query)
            .bind(board_id)
            .fetch_optional(pool)
            .await
    }

    /// Patch a board's editable fields. Absent fields are kept.
    pub async fn update(
        pool: &PgPool,
        board_id: DbId,
        input: &UpdateBoard,
    ) -> Result<Option<Board>, sqlx::Error> {
        let query = format!(
            "UPDATE boards SET \
                title = COALESCE($2, title), \
                layout = COALESCE($3, layout), \
                is_template = COALESCE($4, is_template), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {BOARD_COLUMNS}"
        );
        sqlx::query_as::<_, Board>(&query)
            .bind(board_id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.layout)
            .bind(input.is_template)
            .fetch_optional(pool)
            .await
    }

    /// Delete a board. Steps, collaborators, and invitations cascade.
    pub async fn delete(pool: &PgPool, board_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(board_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Duplicate a board for a user, deep-copying all steps by value.
    ///
    /// The copy belongs to `new_owner_id` alone (collaborators are not
    /// carried over) and is never a template. Step payloads are copied
    /// by value so later edits to the copy leave the source untouched.
    pub async fn duplicate(
        pool: &PgPool,
        source_board_id: DbId,
        new_owner_id: DbId,
        title: &str,
    ) -> Result<Board, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO boards (owner_id, title, board_type, layout, is_template) \
             SELECT $2, $3, board_type, layout, false \
             FROM boards WHERE id = $1 \
             RETURNING {BOARD_COLUMNS}"
        );
        let copy = sqlx::query_as::<_, Board>(&query)
            .bind(source_board_id)
            .bind(new_owner_id)
            .bind(title)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO board_steps (board_id, position, title, visual, timer, transition) \
             SELECT $2, position, title, visual, timer, transition \
             FROM board_steps WHERE board_id = $1",
        )
        .bind(source_board_id)
        .bind(copy.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO board_collaborators (board_id, user_id, role, added_by) \
             VALUES ($1, $2, $3, $2)",
        )
        .bind(copy.id)
        .bind(new_owner_id)
        .bind(ROLE_OWNER)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(copy)
    }
}

// ---------------------------------------------------------------------------
// BoardStepRepo
// ---------------------------------------------------------------------------

/// Provides CRUD operations for board steps.
pub struct BoardStepRepo;

impl BoardStepRepo {
    /// Append a step at the end of the board, returning the full row.
    pub async fn create(
        pool: &PgPool,
        board_id: DbId,
        title: &str,
        visual: &serde_json::Value,
        timer: &serde_json::Value,
        transition: &serde_json::Value,
    ) -> Result<BoardStep, sqlx::Error> {
        let query = format!(
            "INSERT INTO board_steps (board_id, position, title, visual, timer, transition) \
             SELECT $1, COALESCE(MAX(position) + 1, 0), $2, $3, $4, $5 \
             FROM board_steps WHERE board_id = $1 \
             RETURNING {STEP_COLUMNS}"
        );
        sqlx::query_as::<_, BoardStep>(&query)
            .bind(board_id)
            .bind(title)
            .bind(visual)
            .bind(timer)
            .bind(transition)
            .fetch_one(pool)
            .await
    }

    /// List a board's steps in position order.
    pub async fn list_for_board(
        pool: &PgPool,
        board_id: DbId,
    ) -> Result<Vec<BoardStep>, sqlx::Error> {
        let query = format!(
            "SELECT {STEP_COLUMNS} FROM board_steps WHERE board_id = $1 ORDER BY position, id"
        );
        sqlx::query_as::<_, BoardStep>(&query)
            .bind(board_id)
            .fetch_all(pool)
            .await
    }

    /// Patch a step. Absent fields are kept.
    pub async fn update(
        pool: &PgPool,
        step_id: DbId,
        board_id: DbId,
        title: Option<&str>,
        visual: Option<&serde_json::Value>,
        timer: Option<&serde_json::Value>,
        transition: Option<&serde_json::Value>,
    ) -> Result<Option<BoardStep>, sqlx::Error> {
        let query = format!(
            "UPDATE board_steps SET \
                title = COALESCE($3, title), \
                visual = COALESCE($4, visual), \
                timer = COALESCE($5, timer), \
                transition = COALESCE($6, transition), \
                updated_at = NOW() \
             WHERE id = $1 AND board_id = $2 \
             RETURNING {STEP_COLUMNS}"
        );
        sqlx::query_as::<_, BoardStep>(&query)
            .bind(step_id)
            .bind(board_id)
            .bind(title)
            .bind(visual)
            .bind(timer)
            .bind(transition)
            .fetch_optional(pool)
            .await
    }

    /// Delete a step and close the position gap it leaves.
    pub async fn delete(
        pool: &PgPool,
        step_id: DbId,
        board_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let position: Option<i32> = sqlx::query_scalar(
            "DELETE FROM board_steps WHERE id = $1 AND board_id = $2 RETURNING position",
        )
        .bind(step_id)
        .bind(board_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(position) = position else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query(
            "UPDATE board_steps SET position = position - 1, updated_at = NOW() \
             WHERE board_id = $1 AND position > $2",
        )
        .bind(board_id)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Reorder all steps of a board to match `ordered_ids`.
    ///
    /// Returns `false` (and changes nothing) unless `ordered_ids` is exactly
    /// the set of the board's step ids. Positions come out contiguous from 0.
    pub async fn reorder(
        pool: &PgPool,
        board_id: DbId,
        ordered_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Vec<DbId> = sqlx::query_scalar(
            "SELECT id FROM board_steps WHERE board_id = $1 ORDER BY id FOR UPDATE",
        )
        .bind(board_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut expected = ordered_ids.to_vec();
        expected.sort_unstable();
        if expected != current {
            tx.rollback().await?;
            return Ok(false);
        }

        for (position, step_id) in ordered_ids.iter().enumerate() {
            sqlx::query(
                "UPDATE board_steps SET position = $3, updated_at = NOW() \
                 WHERE id = $1 AND board_id = $2",
            )
            .bind(step_id)
            .bind(board_id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}
