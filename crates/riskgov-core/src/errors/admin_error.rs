/// Errors raised by organization, invitation, and regulator administration.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("permission denied: role {role} may not {action}")]
    PermissionDenied { role: String, action: String },

    #[error("invitation {id} expired at {expired_at}")]
    InvitationExpired { id: String, expired_at: String },

    #[error("invitation {id} is {status}, expected PENDING")]
    InvitationNotPending { id: String, status: String },

    #[error("{entity} named '{name}' already exists")]
    DuplicateName { entity: &'static str, name: String },

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("{entity} {id} is in use: {reason}")]
    InUse {
        entity: &'static str,
        id: String,
        reason: String,
    },
}
