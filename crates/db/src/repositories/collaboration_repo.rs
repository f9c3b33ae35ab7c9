//! Repositories for the `board_collaborators` and `board_invitations` tables.

use momentum_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::collaboration::{BoardCollaborator, BoardInvitation, CollaboratorWithUser};

/// Column list for `board_collaborators` queries.
const COLLABORATOR_COLUMNS: &str =
    "id, board_id, user_id, role, added_by, created_at, updated_at";

/// Column list for `board_invitations` queries.
const INVITATION_COLUMNS: &str = "id, board_id, inviter_id, invitee_email, role, status, \
                                  expires_at, responded_at, created_at";

// ---------------------------------------------------------------------------
// CollaboratorRepo
// ---------------------------------------------------------------------------

/// Provides CRUD operations for board collaborators.
pub struct CollaboratorRepo;

impl CollaboratorRepo {
    /// Add a collaborator to a board, returning the full row.
    ///
    /// Fails with a unique violation if the user is already a member.
    pub async fn add(
        pool: &PgPool,
        board_id: DbId,
        user_id: DbId,
        role: &str,
        added_by: DbId,
    ) -> Result<BoardCollaborator, sqlx::Error> {
        let query = format!(
            "INSERT INTO board_collaborators (board_id, user_id, role, added_by) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLLABORATOR_COLUMNS}"
        );
        sqlx::query_as::<_, BoardCollaborator>(&query)
            .bind(board_id)
            .bind(user_id)
            .bind(role)
            .bind(added_by)
            .fetch_one(pool)
            .await
    }

    /// List a board's collaborators joined with user identity.
    pub async fn list_with_users(
        pool: &PgPool,
        board_id: DbId,
    ) -> Result<Vec<CollaboratorWithUser>, sqlx::Error> {
        sqlx::query_as::<_, CollaboratorWithUser>(
            "SELECT c.id, c.board_id, c.user_id, c.role, u.username, u.display_name, \
                    c.created_at \
             FROM board_collaborators c \
             JOIN users u ON u.id = c.user_id \
             WHERE c.board_id = $1 \
             ORDER BY c.created_at, c.id",
        )
        .bind(board_id)
        .fetch_all(pool)
        .await
    }

    /// Get the role a user holds on a board, if any.
    pub async fn find_role(
        pool: &PgPool,
        board_id: DbId,
        user_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT role FROM board_collaborators WHERE board_id = $1 AND user_id = $2",
        )
        .bind(board_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Change a non-owner collaborator's role.
    ///
    /// The owner row is excluded in SQL so it can never be demoted.
    pub async fn change_role(
        pool: &PgPool,
        board_id: DbId,
        user_id: DbId,
        role: &str,
    ) -> Result<Option<BoardCollaborator>, sqlx::Error> {
        let query = format!(
            "UPDATE board_collaborators SET role = $3, updated_at = NOW() \
             WHERE board_id = $1 AND user_id = $2 AND role <> 'owner' \
             RETURNING {COLLABORATOR_COLUMNS}"
        );
        sqlx::query_as::<_, BoardCollaborator>(&query)
            .bind(board_id)
            .bind(user_id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    /// Remove a non-owner collaborator from a board.
    ///
    /// Returns `true` if a row was removed.
    pub async fn remove(
        pool: &PgPool,
        board_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM board_collaborators \
             WHERE board_id = $1 AND user_id = $2 AND role <> 'owner'",
        )
        .bind(board_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// InvitationRepo
// ---------------------------------------------------------------------------

/// Provides CRUD operations for board invitations.
pub struct InvitationRepo;

impl InvitationRepo {
    /// Create a pending invitation, returning the full row.
    ///
    /// Fails with a unique violation if the board already has a pending
    /// invitation for this email.
    pub async fn create(
        pool: &PgPool,
        board_id: DbId,
        inviter_id: DbId,
        invitee_email: &str,
        role: &str,
        expires_at: Timestamp,
    ) -> Result<BoardInvitation, sqlx::Error> {
        let query = format!(
            "INSERT INTO board_invitations (board_id, inviter_id, invitee_email, role, expires_at) \
             VALUES ($1, $2, LOWER($3), $4, $5) \
             RETURNING {INVITATION_COLUMNS}"
        );
        sqlx::query_as::<_, BoardInvitation>(&query)
            .bind(board_id)
            .bind(inviter_id)
            .bind(invitee_email)
            .bind(role)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Get an invitation by id.
    pub async fn find_by_id(
        pool: &PgPool,
        invitation_id: DbId,
    ) -> Result<Option<BoardInvitation>, sqlx::Error> {
        let query = format!("SELECT {INVITATION_COLUMNS} FROM board_invitations WHERE id = $1");
        sqlx::query_as::<_, BoardInvitation>(&query)
            .bind(invitation_id)
            .fetch_optional(pool)
            .await
    }

    /// List all invitations for a board, newest first.
    pub async fn list_for_board(
        pool: &PgPool,
        board_id: DbId,
    ) -> Result<Vec<BoardInvitation>, sqlx::Error> {
        let query = format!(
            "SELECT {INVITATION_COLUMNS} FROM board_invitations \
             WHERE board_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, BoardInvitation>(&query)
            .bind(board_id)
            .fetch_all(pool)
            .await
    }

    /// List unexpired pending invitations addressed to an email.
    pub async fn list_pending_for_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Vec<BoardInvitation>, sqlx::Error> {
        let query = format!(
            "SELECT {INVITATION_COLUMNS} FROM board_invitations \
             WHERE invitee_email = LOWER($1) AND status = 'pending' AND expires_at > NOW() \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, BoardInvitation>(&query)
            .bind(email)
            .fetch_all(pool)
            .await
    }

    /// Move a pending invitation to a terminal status.
    ///
    /// Returns the updated row, or `None` if the invitation was not pending.
    pub async fn mark_status(
        pool: &PgPool,
        invitation_id: DbId,
        status: &str,
    ) -> Result<Option<BoardInvitation>, sqlx::Error> {
        let query = format!(
            "UPDATE board_invitations SET status = $2, responded_at = NOW() \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {INVITATION_COLUMNS}"
        );
        sqlx::query_as::<_, BoardInvitation>(&query)
            .bind(invitation_id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
