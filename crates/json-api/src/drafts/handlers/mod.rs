//! Draft Handlers

pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod history;
pub(crate) mod latest;
