//! Unit and service tests for the sync module.
