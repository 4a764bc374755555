//! Promo Code Handlers

pub(crate) mod apply;
