//! Reconciliation engine: push edited roll state back into the ledger.
//!
//! A sequential pipeline of rewrite steps, each independently idempotent
//! (delete-then-insert), each skipped in diff-only mode when its slice of
//! state equals the snapshot. There is no cross-step transaction: a failure
//! leaves earlier steps committed and the snapshot stale, so retrying the
//! whole save converges. Partial-step resumption is never attempted.

use std::collections::BTreeSet;

use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::grant::{GrantItem, PointGrant};
use crate::models::activity::Activity;
use crate::models::{attendance, points};

use super::reason;
use super::state::EditSession;

/// Returns true iff at least one step reported a change ("Update changes"
/// feedback). On any change the snapshot advances to a deep copy of the
/// current state; on failure it is left untouched.
pub async fn persist<G: PointGrant>(
    pool: &SqlitePool,
    granter: &G,
    activity: &Activity,
    session: &mut EditSession,
    diff_only: bool,
) -> Result<bool, AppError> {
    let mut changed = false;
    let mut items: Vec<GrantItem> = Vec::new();

    let cur = &session.current;
    let snap = &session.snapshot;

    // 1. Attendance: full rewrite of the presence rows.
    if !diff_only || cur.present != snap.present {
        attendance::delete_for_activity(pool, &activity.id).await?;
        for member_id in &cur.present {
            attendance::insert_present(pool, &activity.id, member_id).await?;
        }
        changed = true;
    }

    // 2. Presence points: one entry per present member at the base value.
    let presence = reason::presence_reason(&activity.title);
    let presence_needs_rewrite = !diff_only
        || cur.base_points != snap.base_points
        || cur.present != snap.present;
    if cur.base_points > 0 && !cur.present.is_empty() && presence_needs_rewrite {
        points::delete_by_reason(pool, &activity.id, &presence).await?;
        for member_id in &cur.present {
            items.push(GrantItem::for_member(
                member_id,
                &activity.id,
                cur.base_points,
                &presence,
            ));
        }
        changed = true;
    }

    // 3. Extras. The delete loop iterates the CURRENT definitions, so an
    // extra removed from the list mid-session leaves its old entries behind
    // (known gap, kept as-is).
    let extras_changed = cur.extra_defs != snap.extra_defs
        || cur.extras_selected != snap.extras_selected
        || cur.base_points != snap.base_points;
    if !diff_only || extras_changed {
        for def in &cur.extra_defs {
            let extra = reason::extra_reason(&def.label, &activity.title);
            points::delete_by_reason(pool, &activity.id, &extra).await?;
        }
        for (member_id, keys) in &cur.extras_selected {
            for def in &cur.extra_defs {
                if keys.contains(&def.key) {
                    items.push(GrantItem::for_member(
                        member_id,
                        &activity.id,
                        cur.base_points,
                        &reason::extra_reason(&def.label, &activity.title),
                    ));
                }
            }
        }
        if extras_changed {
            changed = true;
        }
    }

    // 4. Patrol bonuses, over the union of patrols ever bonused. Multiple
    // pre-existing rows were summed at hydration; the rewrite collapses them
    // to at most one.
    let bonus = reason::bonus_reason(&activity.title);
    let all_patrol_ids: BTreeSet<&String> = cur
        .bonus_by_patrol
        .keys()
        .chain(snap.bonus_by_patrol.keys())
        .collect();
    for patrol_id in all_patrol_ids {
        let now_val = cur.bonus_by_patrol.get(patrol_id).copied().unwrap_or(0);
        let snap_val = snap.bonus_by_patrol.get(patrol_id).copied().unwrap_or(0);
        if !diff_only || now_val != snap_val {
            points::delete_by_reason_and_patrol(pool, &activity.id, &bonus, patrol_id).await?;
            if now_val > 0 {
                items.push(GrantItem::for_patrol(
                    patrol_id,
                    &activity.id,
                    now_val,
                    &bonus,
                ));
            }
            if now_val != snap_val {
                changed = true;
            }
        }
    }

    // 5. Commit the batch through the grant boundary; a failure aborts the
    // save here, with steps 1-4 already applied and the snapshot stale.
    if !items.is_empty() {
        granter
            .grant(&items)
            .await
            .map_err(|e| AppError::Grant(e.0))?;
    }

    // 6. Advance the snapshot only after full success.
    if changed {
        session.snapshot = session.current.clone();
    }
    Ok(changed)
}
