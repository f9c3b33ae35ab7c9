//! Board collaborator roles and permission checks.
//!
//! Authorization is board-scoped: every collaborator row carries one of
//! these role names, and handlers re-derive permissions per call from the
//! fetched row. Owners are created implicitly with the board and can never
//! be removed or demoted.

/// Well-known role name constants.
pub const ROLE_OWNER: &str = "owner";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_VIEWER: &str = "viewer";

/// The set of all valid collaborator roles.
pub const VALID_ROLES: &[&str] = &[ROLE_OWNER, ROLE_EDITOR, ROLE_VIEWER];

/// Roles that can be granted via invitation or role change.
///
/// `owner` is excluded: a board has exactly one owner, assigned at creation.
pub const ASSIGNABLE_ROLES: &[&str] = &[ROLE_EDITOR, ROLE_VIEWER];

/// Returns `true` if the given role name is valid.
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

/// Returns `true` if the given role can be granted to a collaborator.
pub fn is_assignable_role(role: &str) -> bool {
    ASSIGNABLE_ROLES.contains(&role)
}

/// Returns `true` if the role may mutate board content (steps, title, layout).
pub fn can_edit_content(role: &str) -> bool {
    role == ROLE_OWNER || role == ROLE_EDITOR
}

/// Returns `true` if the role may manage collaborators, invitations, and
/// board deletion.
pub fn can_manage_board(role: &str) -> bool {
    role == ROLE_OWNER
}
