//! Draft Models

use jiff::Timestamp;
use serde_json::Value;

use crate::{domain::users::UserUuid, uuids::TypedUuid};

/// Draft UUID
pub type DraftUuid = TypedUuid<Draft>;

/// Draft Model
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub uuid: DraftUuid,
    pub owner: UserUuid,

    /// Opaque configuration blob; only narrowed when priced.
    pub config: Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New or updated draft data
#[derive(Debug, Clone, PartialEq)]
pub struct NewDraft {
    pub owner: UserUuid,
    pub config: Value,

    /// Existing draft to update; `None` finds or creates the owner's draft.
    pub draft: Option<DraftUuid>,
}
