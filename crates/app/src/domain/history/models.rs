//! Draft History Models

use jiff::Timestamp;
use serde_json::Value;

use crate::{
    domain::{drafts::models::DraftUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// History entry UUID
pub type DraftHistoryEntryUuid = TypedUuid<DraftHistoryEntry>;

/// Snapshot of a draft configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DraftHistoryEntry {
    pub uuid: DraftHistoryEntryUuid,
    pub draft: DraftUuid,
    pub author: UserUuid,
    pub config: Value,
    pub recorded_at: Timestamp,
}

/// New history entry data
#[derive(Debug, Clone, PartialEq)]
pub struct NewDraftHistoryEntry {
    pub draft: DraftUuid,
    pub author: UserUuid,
    pub config: Value,
}
