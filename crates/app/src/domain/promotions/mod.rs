//! Promotions
//!
//! Promo-code lookup. Codes are trimmed and matched case-insensitively.

mod errors;
mod memory;
pub mod models;
mod repository;
pub mod service;

pub use errors::PromotionsServiceError;
pub use memory::MemoryPromotionsService;
pub use service::*;
