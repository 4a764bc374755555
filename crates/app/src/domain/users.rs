//! Users
//!
//! Accounts live in the storefront's identity provider; only their ids are
//! stored here.

use crate::uuids::TypedUuid;

/// Storefront user.
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;
