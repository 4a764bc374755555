//! Drafts
//!
//! In-progress cake configurations, one current draft per user.

pub mod errors;
mod memory;
pub mod models;
mod repository;
pub mod service;

pub use errors::DraftsServiceError;
pub use memory::MemoryDraftsService;
pub use service::*;
