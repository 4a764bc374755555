//! Order Total Handlers

pub(crate) mod create;
