use crate::{
    errors::{AppError, AppResult},
    models::domain::TestSession,
};

/// Only the owner of a session may read or answer its problems.
pub fn require_session_owner(session: &TestSession, caller_user_id: i64) -> AppResult<()> {
    if session.user_id != caller_user_id {
        return Err(AppError::Forbidden(format!(
            "Session {} does not belong to user {}",
            session.id, caller_user_id
        )));
    }
    Ok(())
}
