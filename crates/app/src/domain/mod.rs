//! Patisserie Domain Concerns

pub mod drafts;
pub mod history;
pub mod promotions;
pub mod rate_limits;
pub mod users;
