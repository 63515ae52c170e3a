//! Adapter implementations of the sync ports.

pub mod json_file;
pub mod memory;
