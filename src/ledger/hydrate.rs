//! Hydration engine: reverse-parse one activity's attendance and point rows
//! back into editable [`RollState`].
//!
//! Best-effort by design: the ledger carries categories only as reason text,
//! so anything that is neither the presence nor the patrol-bonus encoding is
//! treated as an extra with the decoded (or literal) reason as its label.
//! Malformed or foreign-looking rows never fail hydration.

use std::collections::{BTreeMap, BTreeSet};

use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::activity::Activity;
use crate::models::{attendance, points};

use super::reason::{self, EntryCategory};
use super::state::{EditSession, ExtraDef, RollState};

/// JS legacy: a zero/absent point value infers a base of 1.
fn non_zero_or_one(points: i64) -> i64 {
    if points != 0 { points } else { 1 }
}

pub async fn hydrate(pool: &SqlitePool, activity: &Activity) -> Result<EditSession, AppError> {
    let mut state = RollState::default();

    for member_id in attendance::find_member_ids(pool, &activity.id).await? {
        state.present.insert(member_id);
    }

    let entries = points::find_by_activity(pool, &activity.id).await?;
    if entries.is_empty() {
        // Snapshot the defaults too, so an immediate diff-only save is a no-op.
        return Ok(EditSession::new(state));
    }

    // Base points come from the first presence entry carried by a member;
    // failing that, from the first extra entry seen below; failing that, 1.
    let mut inferred_base: Option<i64> = entries
        .iter()
        .find(|e| {
            e.member_id.is_some()
                && reason::classify(&e.reason, &activity.title) == EntryCategory::Presence
        })
        .map(|e| non_zero_or_one(e.points));

    let mut labels_found: Vec<String> = Vec::new();
    let mut selected: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for e in &entries {
        let label = match reason::classify(&e.reason, &activity.title) {
            EntryCategory::Presence => continue,
            EntryCategory::PatrolBonus if e.patrol_id.is_some() => continue,
            // A bonus-shaped reason carried by a member is a stray row: it
            // surfaces as an extra with the decoded text as its label.
            EntryCategory::PatrolBonus => {
                reason::decode_label(&e.reason, &activity.title).to_string()
            }
            EntryCategory::Extra(label) => label,
        };
        if !labels_found.contains(&label) {
            labels_found.push(label.clone());
        }

        if let Some(member_id) = &e.member_id {
            selected
                .entry(member_id.clone())
                .or_default()
                .insert(reason::slug(&label));
        }

        if inferred_base.is_none() {
            inferred_base = Some(non_zero_or_one(e.points));
        }
    }

    state.base_points = inferred_base.unwrap_or(1);

    // Discovered labels first, then the built-in defaults where their slug
    // is not already taken.
    fn push_def(label: &str, merged: &mut Vec<ExtraDef>, used: &mut BTreeSet<String>) {
        let key = reason::slug_or_synthetic(label);
        if used.insert(key.clone()) {
            merged.push(ExtraDef {
                key,
                label: label.to_string(),
            });
        }
    }
    let mut merged: Vec<ExtraDef> = Vec::new();
    let mut used: BTreeSet<String> = BTreeSet::new();
    for label in &labels_found {
        push_def(label, &mut merged, &mut used);
    }
    for label in reason::DEFAULT_EXTRA_LABELS {
        push_def(label, &mut merged, &mut used);
    }
    state.extra_defs = merged;
    state.extras_selected = selected;

    for e in &entries {
        if let Some(patrol_id) = &e.patrol_id {
            if reason::classify(&e.reason, &activity.title) == EntryCategory::PatrolBonus {
                *state.bonus_by_patrol.entry(patrol_id.clone()).or_insert(0) += e.points;
            }
        }
    }

    Ok(EditSession::new(state))
}
