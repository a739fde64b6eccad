//! Hydration engine: reconstructing editable roll state from the ledger.

use tropa::ledger::hydrate::hydrate;
use tropa::ledger::reason;
use tropa::models::attendance;

mod common;
use common::*;

#[tokio::test]
async fn empty_ledger_hydrates_to_defaults_with_snapshot() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let gid = seed_group(pool, "G1").await;
    let act = seed_activity(pool, &gid, "Reunião").await;
    let m = seed_member(pool, &gid, "Ana").await;
    attendance::insert_present(pool, &act.id, &m.id).await.expect("attendance");

    let edit = hydrate(pool, &act).await.expect("hydrate");

    assert!(edit.current.present.contains(&m.id));
    assert_eq!(edit.current.base_points, 1);
    let keys: Vec<&str> = edit.current.extra_defs.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, ["uniforme", "comportamento"]);
    assert!(edit.current.extras_selected.is_empty());
    assert!(edit.current.bonus_by_patrol.is_empty());
    // The snapshot mirrors the defaults so an immediate diff-only save is a no-op.
    assert_eq!(edit.current, edit.snapshot);
}

#[tokio::test]
async fn base_points_inferred_from_presence_entry() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let gid = seed_group(pool, "G1").await;
    let act = seed_activity(pool, &gid, "Reunião").await;
    let m = seed_member(pool, &gid, "Ana").await;

    let presence = reason::presence_reason(&act.title);
    seed_point(pool, &act.id, Some(&m.id), None, 3, &presence).await;

    let edit = hydrate(pool, &act).await.expect("hydrate");
    assert_eq!(edit.current.base_points, 3);
}

#[tokio::test]
async fn base_points_falls_back_to_first_extra_entry() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let gid = seed_group(pool, "G1").await;
    let act = seed_activity(pool, &gid, "Reunião").await;
    let m = seed_member(pool, &gid, "Ana").await;

    let extra = reason::extra_reason("Uniforme", &act.title);
    seed_point(pool, &act.id, Some(&m.id), None, 2, &extra).await;

    let edit = hydrate(pool, &act).await.expect("hydrate");
    assert_eq!(edit.current.base_points, 2);
    // And the member's checkbox came back checked.
    assert!(edit.current.extras_selected[&m.id].contains("uniforme"));
}

#[tokio::test]
async fn discovered_extras_come_before_builtin_defaults() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let gid = seed_group(pool, "G1").await;
    let act = seed_activity(pool, &gid, "Reunião").await;
    let m = seed_member(pool, &gid, "Ana").await;

    seed_point(
        pool,
        &act.id,
        Some(&m.id),
        None,
        1,
        &reason::extra_reason("Pontualidade", &act.title),
    )
    .await;
    // A discovered label that collides with a default keeps the discovered slot.
    seed_point(
        pool,
        &act.id,
        Some(&m.id),
        None,
        1,
        &reason::extra_reason("Uniforme", &act.title),
    )
    .await;

    let edit = hydrate(pool, &act).await.expect("hydrate");
    let keys: Vec<&str> = edit.current.extra_defs.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, ["pontualidade", "uniforme", "comportamento"]);
}

#[tokio::test]
async fn foreign_reason_is_tolerated_as_literal_extra() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let gid = seed_group(pool, "G1").await;
    let act = seed_activity(pool, &gid, "Reunião").await;
    let m = seed_member(pool, &gid, "Ana").await;

    seed_point(pool, &act.id, Some(&m.id), None, 1, "migrated legacy row").await;

    let edit = hydrate(pool, &act).await.expect("hydrate");
    let labels: Vec<&str> = edit.current.extra_defs.iter().map(|d| d.label.as_str()).collect();
    assert!(labels.contains(&"migrated legacy row"));
    assert!(edit.current.extras_selected[&m.id].contains("migrated-legacy-row"));
}

#[tokio::test]
async fn member_carried_bonus_reason_surfaces_as_literal_extra() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let gid = seed_group(pool, "G1").await;
    let act = seed_activity(pool, &gid, "Reunião").await;
    let m = seed_member(pool, &gid, "Ana").await;

    // A bonus-shaped reason on a member row is a stray entry, not a bonus.
    seed_point(pool, &act.id, Some(&m.id), None, 2, &reason::bonus_reason(&act.title)).await;

    let edit = hydrate(pool, &act).await.expect("hydrate");
    assert!(edit.current.bonus_by_patrol.is_empty());
    let labels: Vec<&str> = edit.current.extra_defs.iter().map(|d| d.label.as_str()).collect();
    assert!(labels.contains(&"Bônus patrulha"));
    assert!(edit.current.extras_selected[&m.id].contains("bonus-patrulha"));
}

#[tokio::test]
async fn patrol_bonus_rows_are_summed_per_patrol() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let gid = seed_group(pool, "G1").await;
    let act = seed_activity(pool, &gid, "Reunião").await;
    let p = seed_patrol(pool, &gid, "Lobo").await;
    let q = seed_patrol(pool, &gid, "Falcão").await;

    let bonus = reason::bonus_reason(&act.title);
    seed_point(pool, &act.id, None, Some(&p.id), 3, &bonus).await;
    seed_point(pool, &act.id, None, Some(&p.id), 4, &bonus).await;
    seed_point(pool, &act.id, None, Some(&q.id), 2, &bonus).await;

    let edit = hydrate(pool, &act).await.expect("hydrate");
    assert_eq!(edit.current.bonus_by_patrol[&p.id], 7);
    assert_eq!(edit.current.bonus_by_patrol[&q.id], 2);
    // Bonus rows never become extra definitions.
    let labels: Vec<&str> = edit.current.extra_defs.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, ["Uniforme", "Comportamento"]);
}
