//! Draft History
//!
//! Append-only snapshots of draft configurations, written after updates.

pub mod errors;
mod memory;
pub mod models;
mod repository;
pub mod service;

pub use errors::DraftHistoryError;
pub use memory::MemoryDraftHistoryService;
pub use service::*;
