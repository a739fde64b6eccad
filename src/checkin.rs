//! Check-in redemption state machine.
//!
//! Validates a token (`t`) or raw activity reference (`a`) and idempotently
//! redeems it into an attendance row for the calling member. Conditions are
//! checked in order and short-circuit on the first match; every outcome is
//! terminal. Store failures surface as `Err`, which the handler reports as
//! the `error` state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::session::Identity;
use crate::errors::AppError;
use crate::grant::{GrantItem, PointGrant};
use crate::ledger::reason;
use crate::models::{activity, attendance, checkin_token, points};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckinStatus {
    /// Presence recorded.
    Ok,
    /// Presence was already recorded; a success for UX purposes.
    Already,
    Invalid,
    Expired,
    Forbidden,
}

/// Hyphenated form only. `Uuid::parse_str` alone also accepts the simple,
/// braced and urn forms, which check-in links never carry; those must fall
/// through to the token lookup instead.
fn is_uuid(v: &str) -> bool {
    v.len() == 36 && Uuid::parse_str(v).is_ok()
}

/// Redeem a check-in payload for the calling member. `now` is passed in so
/// the expiry boundary is testable; expiry is strict (`now > expires_at`).
pub async fn redeem(
    pool: &SqlitePool,
    identity: &Identity,
    t: Option<&str>,
    a: Option<&str>,
    now: DateTime<Utc>,
) -> Result<CheckinStatus, AppError> {
    let t = t.unwrap_or("").trim();
    let a = a.unwrap_or("").trim();

    if t.is_empty() && a.is_empty() {
        return Ok(CheckinStatus::Invalid);
    }

    // Resolve the activity id: direct reference first, then token lookup,
    // then the token string itself as a raw id.
    let mut activity_id: Option<String> = None;
    let mut token_group: Option<String> = None;
    let mut expires_at: Option<String> = None;

    if !a.is_empty() && is_uuid(a) {
        activity_id = Some(a.to_string());
    } else if !t.is_empty() {
        match checkin_token::find_by_token(pool, t).await? {
            Some(token) => {
                activity_id = Some(token.activity_id);
                token_group = token.group_id;
                expires_at = token.expires_at;
            }
            None if is_uuid(t) => activity_id = Some(t.to_string()),
            None => return Ok(CheckinStatus::Invalid),
        }
    }

    let Some(activity_id) = activity_id else {
        return Ok(CheckinStatus::Invalid);
    };

    let Some(act) = activity::find_by_id(pool, &activity_id).await? else {
        return Ok(CheckinStatus::Invalid);
    };

    // Group isolation: the token's group wins over the activity's.
    let effective_group = token_group.unwrap_or_else(|| act.group_id.clone());
    if effective_group.is_empty() || effective_group != identity.group_id {
        return Ok(CheckinStatus::Forbidden);
    }

    // An unparseable expiry is ignored, matching the upstream client.
    if let Some(raw) = &expires_at {
        if let Ok(expiry) = DateTime::parse_from_rfc3339(raw) {
            if now > expiry.with_timezone(&Utc) {
                return Ok(CheckinStatus::Expired);
            }
        }
    }

    if attendance::exists(pool, &act.id, &identity.member_id).await? {
        return Ok(CheckinStatus::Already);
    }

    attendance::insert_present(pool, &act.id, &identity.member_id).await?;
    Ok(CheckinStatus::Ok)
}

/// Best-effort companion step for raw activity-id check-ins: grant the
/// member a single 1-point presence entry if none exists. Not part of the
/// state machine's contract; callers log and swallow errors.
pub async fn ensure_presence_points<G: PointGrant>(
    pool: &SqlitePool,
    granter: &G,
    identity: &Identity,
    activity_id: &str,
) -> Result<(), AppError> {
    let Some(act) = activity::find_by_id(pool, activity_id).await? else {
        return Ok(());
    };
    if act.group_id != identity.group_id {
        return Ok(());
    }

    let presence = reason::presence_reason(&act.title);
    if points::exists_for_member_reason(pool, &act.id, &identity.member_id, &presence).await? {
        return Ok(());
    }

    granter
        .grant(&[GrantItem::for_member(
            &identity.member_id,
            &act.id,
            1,
            &presence,
        )])
        .await
        .map_err(|e| AppError::Grant(e.0))?;
    Ok(())
}
