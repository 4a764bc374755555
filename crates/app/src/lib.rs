//! Draft persistence, promo lookup, rate limiting and draft autosave for the
//! patisserie storefront.

pub mod context;
pub mod database;
pub mod domain;
pub mod sync;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
