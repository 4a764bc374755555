//! Shared fixtures for database-backed service tests.

mod db;

pub(crate) use context::TestContext;
