use actix_session::Session;

use crate::errors::AppError;

/// The authenticated caller: member id plus the group the member belongs to.
/// Filled in at login and read ambiently by handlers; the core never receives
/// credentials, only this resolved identity.
#[derive(Debug, Clone)]
pub struct Identity {
    pub member_id: String,
    pub group_id: String,
}

pub fn current_identity(session: &Session) -> Result<Identity, AppError> {
    let member_id = session
        .get::<String>("member_id")
        .unwrap_or(None)
        .ok_or_else(|| AppError::Session("not logged in".into()))?;
    let group_id = session
        .get::<String>("group_id")
        .unwrap_or(None)
        .ok_or_else(|| AppError::Session("no group in session".into()))?;
    Ok(Identity { member_id, group_id })
}

pub fn store_identity(session: &Session, identity: &Identity) -> Result<(), AppError> {
    session
        .insert("member_id", &identity.member_id)
        .map_err(|e| AppError::Session(e.to_string()))?;
    session
        .insert("group_id", &identity.group_id)
        .map_err(|e| AppError::Session(e.to_string()))?;
    Ok(())
}
