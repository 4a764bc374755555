//! Local Mirror
//!
//! A best-effort local copy of the configuration being edited. It survives a
//! failed save but is never treated as the source of truth.

use std::sync::Mutex;

use mockall::automock;
use rustc_hash::FxHashMap;
use serde_json::Value;
use thiserror::Error;

use crate::domain::users::UserUuid;

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("mirrored config is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("failed to encode mirrored config")]
    Encoding(#[from] serde_json::Error),

    #[error("mirror lock poisoned")]
    Poisoned,
}

#[automock]
pub trait LocalMirror: Send + Sync {
    /// Replace the owner's mirrored config.
    fn store(&self, owner: UserUuid, config: &Value) -> Result<(), MirrorError>;

    /// The owner's mirrored config, if any.
    fn load(&self, owner: UserUuid) -> Result<Option<Value>, MirrorError>;

    /// Forget the owner's mirrored config.
    fn clear(&self, owner: UserUuid) -> Result<(), MirrorError>;
}

#[derive(Debug, Default)]
struct MirrorState {
    entries: FxHashMap<UserUuid, (u64, String)>,
    sequence: u64,
}

/// Mirror kept in process memory, bounded by entry count and payload size.
/// The least recently written entry is evicted when full.
#[derive(Debug)]
pub struct MemoryMirror {
    max_entries: usize,
    max_payload_bytes: usize,
    state: Mutex<MirrorState>,
}

impl MemoryMirror {
    pub const DEFAULT_MAX_ENTRIES: usize = 1_024;
    pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 64 * 1_024;

    #[must_use]
    pub fn new(max_entries: usize, max_payload_bytes: usize) -> Self {
        Self {
            max_entries: max_entries.max(1),
            max_payload_bytes,
            state: Mutex::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().map_or(0, |state| state.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryMirror {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ENTRIES, Self::DEFAULT_MAX_PAYLOAD_BYTES)
    }
}

impl LocalMirror for MemoryMirror {
    fn store(&self, owner: UserUuid, config: &Value) -> Result<(), MirrorError> {
        let encoded = serde_json::to_string(config)?;

        if encoded.len() > self.max_payload_bytes {
            return Err(MirrorError::TooLarge {
                size: encoded.len(),
                limit: self.max_payload_bytes,
            });
        }

        let mut state = self.state.lock().map_err(|_poisoned| MirrorError::Poisoned)?;

        if !state.entries.contains_key(&owner) && state.entries.len() >= self.max_entries {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, (sequence, _))| *sequence)
                .map(|(owner, _)| *owner);

            if let Some(oldest) = oldest {
                state.entries.remove(&oldest);
            }
        }

        state.sequence += 1;

        let sequence = state.sequence;

        state.entries.insert(owner, (sequence, encoded));

        Ok(())
    }

    fn load(&self, owner: UserUuid) -> Result<Option<Value>, MirrorError> {
        let state = self.state.lock().map_err(|_poisoned| MirrorError::Poisoned)?;

        state
            .entries
            .get(&owner)
            .map(|(_, encoded)| serde_json::from_str(encoded))
            .transpose()
            .map_err(MirrorError::from)
    }

    fn clear(&self, owner: UserUuid) -> Result<(), MirrorError> {
        self.state
            .lock()
            .map_err(|_poisoned| MirrorError::Poisoned)?
            .entries
            .remove(&owner);

        Ok(())
    }
}
