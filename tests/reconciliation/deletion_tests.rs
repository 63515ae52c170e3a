//! Deletion propagation in both directions.

use super::helpers::{World, card, lead, lead_id, mapping_of, task_id};
use leadsync::sync::{domain::LeadStatus, services::SyncOutcome};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removed_lead_archives_its_card_via_single_item_sync() {
    let world = World::with_mapping(mapping_of(&[("5", "T9")]));
    world
        .tasks
        .insert(card("T9", "Follow-up: Eve", LeadStatus::Contacted))
        .expect("seed card");
    let mut engine = world.engine().await;

    let outcome = engine
        .sync_lead_to_task(&lead_id("5"))
        .await
        .expect("no fatal error")
        .expect("archive succeeds");
    assert_eq!(outcome, SyncOutcome::CounterpartArchived);

    let archived = world
        .tasks
        .get(&task_id("T9"))
        .expect("task store readable")
        .expect("card still resolvable");
    assert!(archived.archived);
    assert!(world.store.snapshot().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removed_task_deletes_its_lead_via_single_item_sync() {
    let world = World::with_mapping(mapping_of(&[("5", "T9")]));
    world
        .leads
        .insert(lead("5", "Eve", LeadStatus::Contacted))
        .expect("seed lead");
    let mut engine = world.engine().await;

    let outcome = engine
        .sync_task_to_lead(&task_id("T9"))
        .await
        .expect("no fatal error")
        .expect("delete succeeds");
    assert_eq!(outcome, SyncOutcome::CounterpartDeleted);

    assert_eq!(
        world.leads.get(&lead_id("5")).expect("lead store readable"),
        None
    );
    assert!(world.store.snapshot().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deletion_sweeps_catch_out_of_band_removals() {
    let world = World::with_mapping(mapping_of(&[("1", "T1"), ("2", "T2"), ("3", "T3")]));
    // Pair (1, T1) is intact; lead 2 disappeared; card T3 disappeared.
    world
        .leads
        .insert(lead("1", "Ann", LeadStatus::New))
        .expect("seed lead");
    world
        .leads
        .insert(lead("3", "Cal", LeadStatus::New))
        .expect("seed lead");
    world
        .tasks
        .insert(card("T1", "Follow-up: Ann", LeadStatus::New))
        .expect("seed card");
    world
        .tasks
        .insert(card("T2", "Follow-up: Bea", LeadStatus::New))
        .expect("seed card");
    let mut engine = world.engine().await;

    let task_sweep = engine.sync_deleted_tasks().await.expect("sweep succeeds");
    assert_eq!(task_sweep.detected, 1);
    assert_eq!(task_sweep.removed, 1);
    assert_eq!(
        world.leads.get(&lead_id("3")).expect("lead store readable"),
        None
    );

    let lead_sweep = engine.sync_deleted_leads().await.expect("sweep succeeds");
    assert_eq!(lead_sweep.detected, 1);
    assert_eq!(lead_sweep.removed, 1);
    let archived = world
        .tasks
        .get(&task_id("T2"))
        .expect("task store readable")
        .expect("card still resolvable");
    assert!(archived.archived);

    let persisted = world.store.snapshot();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted.task_for(&lead_id("1")), Some(&task_id("T1")));
}
