//! Editable roll-call state and its last-persisted snapshot.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::reason;

/// An operator-defined bonus category. Not persisted as its own row: it is
/// discovered from existing point reasons at hydration time or added ad hoc
/// during editing. Two definitions collide when their slugs match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraDef {
    pub key: String,
    pub label: String,
}

/// Everything the operator can edit for one activity's roll sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollState {
    /// Member ids marked present. Set membership is the whole signal.
    pub present: BTreeSet<String>,
    pub base_points: i64,
    pub extra_defs: Vec<ExtraDef>,
    /// member id -> set of checked extra keys.
    pub extras_selected: BTreeMap<String, BTreeSet<String>>,
    pub bonus_by_patrol: BTreeMap<String, i64>,
}

impl Default for RollState {
    fn default() -> Self {
        RollState {
            present: BTreeSet::new(),
            base_points: 1,
            extra_defs: default_extra_defs(),
            extras_selected: BTreeMap::new(),
            bonus_by_patrol: BTreeMap::new(),
        }
    }
}

pub fn default_extra_defs() -> Vec<ExtraDef> {
    reason::DEFAULT_EXTRA_LABELS
        .iter()
        .map(|label| ExtraDef {
            key: reason::slug(label),
            label: (*label).to_string(),
        })
        .collect()
}

impl RollState {
    /// Add an operator-defined extra, returning its key. Fails on slug
    /// collision with an existing definition.
    pub fn add_extra(&mut self, label: &str) -> Result<String, String> {
        let label = label.trim();
        if label.is_empty() {
            return Err("label must not be empty".to_string());
        }
        let key = reason::slug_or_synthetic(label);
        if self.extra_defs.iter().any(|d| d.key == key) {
            return Err(format!("extra '{key}' already exists"));
        }
        self.extra_defs.push(ExtraDef {
            key: key.clone(),
            label: label.to_string(),
        });
        Ok(key)
    }
}

/// Validate a submitted definition list by replaying its labels through
/// [`RollState::add_extra`]: rejects empty labels and slug collisions.
pub fn check_extra_defs(defs: &[ExtraDef]) -> Result<(), String> {
    let mut scratch = RollState::default();
    scratch.extra_defs.clear();
    for def in defs {
        scratch.add_extra(&def.label)?;
    }
    Ok(())
}

/// The `{current, snapshot}` value pair owned by one editing session. The
/// snapshot is only replaced by a fully successful reconciliation, so a
/// failed save leaves it stale and a retry reconsiders the same steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditSession {
    pub current: RollState,
    pub snapshot: RollState,
}

impl EditSession {
    pub fn new(state: RollState) -> Self {
        EditSession {
            snapshot: state.clone(),
            current: state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_carries_builtin_extras() {
        let state = RollState::default();
        assert_eq!(state.base_points, 1);
        let keys: Vec<&str> = state.extra_defs.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, ["uniforme", "comportamento"]);
    }

    #[test]
    fn add_extra_rejects_slug_collision() {
        let mut state = RollState::default();
        state.add_extra("Pontualidade").expect("add");
        // Same slug, different surface form.
        let err = state.add_extra("PONTUALIDADE!").unwrap_err();
        assert!(err.contains("pontualidade"));
        assert_eq!(state.extra_defs.len(), 3);
    }

    #[test]
    fn check_extra_defs_rejects_colliding_and_empty_labels() {
        let ok = vec![
            ExtraDef { key: "uniforme".into(), label: "Uniforme".into() },
            ExtraDef { key: "pontualidade".into(), label: "Pontualidade".into() },
        ];
        assert!(check_extra_defs(&ok).is_ok());

        let colliding = vec![
            ExtraDef { key: "uniforme".into(), label: "Uniforme".into() },
            ExtraDef { key: "uniforme-2".into(), label: "UNIFORME!".into() },
        ];
        assert!(check_extra_defs(&colliding).is_err());

        let empty = vec![ExtraDef { key: "x".into(), label: "  ".into() }];
        assert!(check_extra_defs(&empty).is_err());
    }

    #[test]
    fn add_extra_with_unsluggable_label_gets_synthetic_key() {
        let mut state = RollState::default();
        let key = state.add_extra("!!!").expect("add");
        assert!(key.starts_with("extra-"));
        assert_eq!(state.extra_defs.last().map(|d| d.label.as_str()), Some("!!!"));
    }
}
