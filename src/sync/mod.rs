//! Lead/task reconciliation for `LeadSync`.
//!
//! Keeps the external lead store and the external task store consistent by
//! maintaining a persisted identity mapping between their records and
//! propagating status and lifecycle changes in both directions. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The reconciliation engine in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod settings;

#[cfg(test)]
mod tests;
