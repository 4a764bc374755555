//! Pricing Handlers

pub(crate) mod catalog;
pub(crate) mod delivery;
pub(crate) mod quote;
