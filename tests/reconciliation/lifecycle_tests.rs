//! Card creation, status propagation, and mapping repair flows.

use super::helpers::{World, card, lead, lead_id, mapping_of, task_id};
use leadsync::sync::{domain::LeadStatus, services::SyncOutcome};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn initial_sync_links_a_new_lead_end_to_end() {
    let world = World::new();
    world
        .leads
        .insert(lead("1", "Ann", LeadStatus::New))
        .expect("seed lead");
    let mut engine = world.engine().await;

    let report = engine.initial_sync().await.expect("initial sync succeeds");
    assert_eq!(report.created, 1);
    assert_eq!(report.skipped, 0);

    let mapped_task = engine
        .mapping()
        .task_for(&lead_id("1"))
        .cloned()
        .expect("lead is mapped");
    assert_eq!(engine.mapping().lead_for(&mapped_task), Some(&lead_id("1")));

    let stored_lead = world
        .leads
        .get(&lead_id("1"))
        .expect("lead store readable")
        .expect("lead exists");
    assert_eq!(stored_lead.linked_task_id, Some(mapped_task.clone()));

    let created_card = world
        .tasks
        .get(&mapped_task)
        .expect("task store readable")
        .expect("card exists");
    assert_eq!(created_card.title, "Follow-up: Ann");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rerunning_initial_sync_creates_nothing_new() {
    let world = World::new();
    world
        .leads
        .insert(lead("1", "Ann", LeadStatus::New))
        .expect("seed lead");
    world
        .leads
        .insert(lead("2", "Bea", LeadStatus::Lost))
        .expect("seed lead");
    let mut engine = world.engine().await;

    let first = engine.initial_sync().await.expect("first run succeeds");
    assert_eq!(first.created, 1);
    assert_eq!(first.skipped, 1);

    let second = engine.initial_sync().await.expect("second run succeeds");
    assert_eq!(second.created, 0);
    assert_eq!(second.skipped, 2);

    let open_cards = world.tasks.open_cards().expect("task store readable");
    assert_eq!(open_cards.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn statuses_flow_in_both_directions() {
    let world = World::with_mapping(mapping_of(&[("1", "T1")]));
    world
        .leads
        .insert(lead("1", "Ann", LeadStatus::Qualified))
        .expect("seed lead");
    world
        .tasks
        .insert(card("T1", "Follow-up: Ann", LeadStatus::New))
        .expect("seed card");
    let mut engine = world.engine().await;

    engine
        .sync_lead_to_task(&lead_id("1"))
        .await
        .expect("no fatal error")
        .expect("push succeeds");
    let synced_card = world
        .tasks
        .get(&task_id("T1"))
        .expect("task store readable")
        .expect("card exists");
    assert_eq!(synced_card.status, LeadStatus::Qualified);

    world
        .tasks
        .insert(card("T1", "Follow-up: Ann", LeadStatus::Won))
        .expect("reseed card");
    engine
        .sync_task_to_lead(&task_id("T1"))
        .await
        .expect("no fatal error")
        .expect("push succeeds");
    let synced_lead = world
        .leads
        .get(&lead_id("1"))
        .expect("lead store readable")
        .expect("lead exists");
    assert_eq!(synced_lead.status, LeadStatus::Won);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lost_mapping_is_recovered_from_the_lead_record() {
    // The mapping store starts empty, as after a load failure; the lead
    // still carries its card reference.
    let world = World::new();
    let mut ann = lead("2", "Ann", LeadStatus::Contacted);
    ann.linked_task_id = Some(task_id("T2"));
    world.leads.insert(ann).expect("seed lead");
    world
        .tasks
        .insert(card("T2", "Follow-up: Ann", LeadStatus::New))
        .expect("seed card");
    let mut engine = world.engine().await;

    let outcome = engine
        .sync_lead_to_task(&lead_id("2"))
        .await
        .expect("no fatal error")
        .expect("repair succeeds");
    assert_eq!(outcome, SyncOutcome::RepairedAndPushed);

    let persisted = world.store.snapshot();
    assert_eq!(persisted.task_for(&lead_id("2")), Some(&task_id("T2")));
    assert_eq!(persisted.lead_for(&task_id("T2")), Some(&lead_id("2")));

    let repaired_card = world
        .tasks
        .get(&task_id("T2"))
        .expect("task store readable")
        .expect("card exists");
    assert_eq!(repaired_card.status, LeadStatus::Contacted);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_sync_handles_creation_deletion_and_status_in_one_pass() {
    // Lead 1 is new and unmapped; pair (2, T2) lost its card; pair (3, T3)
    // lost its lead; pair (4, T4) diverged and converges on the card's
    // status, which is pushed to the lead before the lead-to-task pass.
    let world = World::with_mapping(mapping_of(&[("2", "T2"), ("3", "T3"), ("4", "T4")]));
    world
        .leads
        .insert(lead("1", "Ann", LeadStatus::New))
        .expect("seed lead");
    world
        .leads
        .insert(lead("2", "Bea", LeadStatus::New))
        .expect("seed lead");
    world
        .leads
        .insert(lead("4", "Dee", LeadStatus::Qualified))
        .expect("seed lead");
    world
        .tasks
        .insert(card("T3", "Follow-up: Cal", LeadStatus::New))
        .expect("seed card");
    world
        .tasks
        .insert(card("T4", "Follow-up: Dee", LeadStatus::Won))
        .expect("seed card");
    let mut engine = world.engine().await;

    let report = engine.full_sync().await.expect("full sync succeeds");
    assert_eq!(report.initial.created, 1);
    assert_eq!(report.deleted_tasks.removed, 1);
    assert_eq!(report.deleted_leads.removed, 1);

    // Lead 2 went with its card; card T3 went with its lead.
    assert_eq!(
        world.leads.get(&lead_id("2")).expect("lead store readable"),
        None
    );
    let archived = world
        .tasks
        .get(&task_id("T3"))
        .expect("task store readable")
        .expect("card still resolvable");
    assert!(archived.archived);

    // Pair (4, T4) converged on the card's status.
    let pushed_lead = world
        .leads
        .get(&lead_id("4"))
        .expect("lead store readable")
        .expect("lead exists");
    assert_eq!(pushed_lead.status, LeadStatus::Won);
    let pushed_card = world
        .tasks
        .get(&task_id("T4"))
        .expect("task store readable")
        .expect("card exists");
    assert_eq!(pushed_card.status, LeadStatus::Won);

    // Only the surviving pairs remain mapped.
    assert!(engine.mapping().contains_lead(&lead_id("1")));
    assert!(engine.mapping().contains_lead(&lead_id("4")));
    assert_eq!(engine.mapping().len(), 2);
}
