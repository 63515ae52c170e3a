//! Thread-safe in-memory adapters.
//!
//! Reference implementations of the three ports, used by tests and demos in
//! place of the real external services.

mod lead;
mod mapping;
mod task;

pub use lead::InMemoryLeadSource;
pub use mapping::InMemoryMappingStore;
pub use task::InMemoryTaskSource;
