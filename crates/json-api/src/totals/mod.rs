//! Order Totals

mod handlers;

pub(crate) use handlers::*;
