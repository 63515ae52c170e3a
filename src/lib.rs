//! `LeadSync`: bidirectional lead/task reconciliation engine.
//!
//! This crate keeps two independently-owned record stores — a lead store
//! and a task store — consistent by maintaining an explicit, persisted
//! identity mapping between their records and propagating status and
//! lifecycle changes in both directions.
//!
//! # Architecture
//!
//! `LeadSync` follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the two external stores and
//!   the durable mapping store
//! - **Adapters**: Concrete implementations of ports (in-memory, JSON file)
//!
//! Client implementations for the real external services and any user
//! interface live outside this crate; it exposes only the reconciliation
//! operations and their reports.

pub mod sync;
