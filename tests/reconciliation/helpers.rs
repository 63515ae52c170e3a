//! Shared test helpers for reconciliation integration tests.

use leadsync::sync::{
    adapters::memory::{InMemoryLeadSource, InMemoryMappingStore, InMemoryTaskSource},
    domain::{Lead, LeadId, LeadStatus, MappingRecord, TaskCard, TaskId},
    services::ReconciliationEngine,
};
use mockable::DefaultClock;
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

/// Installs a tracing subscriber once, honouring `RUST_LOG`.
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init()
                .ok();
        }
    });
}

/// Engine type used by the integration tests.
pub type TestEngine = ReconciliationEngine<
    InMemoryLeadSource,
    InMemoryTaskSource,
    InMemoryMappingStore<DefaultClock>,
>;

/// The two external stores and the mapping store backing a test engine.
pub struct World {
    /// In-memory lead store.
    pub leads: Arc<InMemoryLeadSource>,
    /// In-memory task store.
    pub tasks: Arc<InMemoryTaskSource>,
    /// In-memory mapping store.
    pub store: Arc<InMemoryMappingStore<DefaultClock>>,
}

impl World {
    /// Creates a world with empty stores.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mapping(MappingRecord::new())
    }

    /// Creates a world whose mapping store already holds a record.
    #[must_use]
    pub fn with_mapping(record: MappingRecord) -> Self {
        init_test_logging();
        Self {
            leads: Arc::new(InMemoryLeadSource::new()),
            tasks: Arc::new(InMemoryTaskSource::new()),
            store: Arc::new(InMemoryMappingStore::with_record(
                record,
                Arc::new(DefaultClock),
            )),
        }
    }

    /// Builds an engine over this world's stores, loading the mapping.
    pub async fn engine(&self) -> TestEngine {
        ReconciliationEngine::load(
            Arc::clone(&self.leads),
            Arc::clone(&self.tasks),
            Arc::clone(&self.store),
        )
        .await
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a validated lead id.
///
/// # Panics
///
/// Panics when the raw value is empty.
#[must_use]
pub fn lead_id(raw: &str) -> LeadId {
    LeadId::new(raw).expect("valid lead id")
}

/// Builds a validated task id.
///
/// # Panics
///
/// Panics when the raw value is empty.
#[must_use]
pub fn task_id(raw: &str) -> TaskId {
    TaskId::new(raw).expect("valid task id")
}

/// Builds a mapping record from literal pairs.
///
/// # Panics
///
/// Panics when a pair repeats an id.
#[must_use]
pub fn mapping_of(pairs: &[(&str, &str)]) -> MappingRecord {
    let mut record = MappingRecord::new();
    for (l, t) in pairs {
        record.put(lead_id(l), task_id(t)).expect("seed pair");
    }
    record
}

/// Builds a lead record with a derived email and a fixed source.
#[must_use]
pub fn lead(id: &str, name: &str, status: LeadStatus) -> Lead {
    Lead {
        id: lead_id(id),
        name: name.to_owned(),
        email: format!("{}@example.com", name.to_ascii_lowercase()),
        status,
        linked_task_id: None,
        source: "webform".to_owned(),
    }
}

/// Builds an open task card.
#[must_use]
pub fn card(id: &str, title: &str, status: LeadStatus) -> TaskCard {
    TaskCard {
        id: task_id(id),
        title: title.to_owned(),
        status,
        description: String::new(),
        archived: false,
    }
}
