//! Board collaborator and invitation models and DTOs.

use momentum_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// BoardCollaborator
// ---------------------------------------------------------------------------

/// A row from the `board_collaborators` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BoardCollaborator {
    pub id: DbId,
    pub board_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub added_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A collaborator row joined with the user's public identity, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CollaboratorWithUser {
    pub id: DbId,
    pub board_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub username: String,
    pub display_name: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for changing a collaborator's role.
#[derive(Debug, Deserialize)]
pub struct ChangeRole {
    pub role: String,
}

// ---------------------------------------------------------------------------
// BoardInvitation
// ---------------------------------------------------------------------------

/// A row from the `board_invitations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BoardInvitation {
    pub id: DbId,
    pub board_id: DbId,
    pub inviter_id: DbId,
    pub invitee_email: String,
    pub role: String,
    pub status: String,
    pub expires_at: Timestamp,
    pub responded_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating an invitation.
#[derive(Debug, Deserialize)]
pub struct CreateInvitation {
    pub invitee_email: String,
    pub role: String,
}
