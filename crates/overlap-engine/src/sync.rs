//! Snapshot persistence through an opaque key-value document mapping.
//!
//! The realtime-collaboration variant persists store state through an
//! external document sync primitive (load / save / remote-update callback).
//! The engine treats it as an opaque durable string mapping with no
//! transactional semantics across concurrent writers: whoever saves last
//! wins, and a remote update replaces local contents wholesale.

use crate::error::{EngineError, Result};
use crate::store::{AvailabilityStore, StoreSnapshot};

/// An external durable key → serialized-state mapping.
///
/// Implementations surface transport failures as [`EngineError::Sync`].
pub trait SyncDocument {
    /// Read the serialized state stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>>;
    /// Durably store `state` under `key`.
    fn save(&mut self, key: &str, state: &str) -> Result<()>;
}

/// Serialize a snapshot to its wire form (JSON).
pub fn encode_snapshot(snapshot: &StoreSnapshot) -> Result<String> {
    serde_json::to_string(snapshot).map_err(|e| EngineError::Sync(e.to_string()))
}

/// Parse a snapshot from its wire form.
pub fn decode_snapshot(state: &str) -> Result<StoreSnapshot> {
    serde_json::from_str(state).map_err(|e| EngineError::Sync(e.to_string()))
}

/// Persist the store's current state under `key`.
pub fn save_store(store: &AvailabilityStore, doc: &mut dyn SyncDocument, key: &str) -> Result<()> {
    let state = encode_snapshot(&store.snapshot())?;
    doc.save(key, &state)
}

/// Load a previously saved snapshot from `key`, if one exists.
pub fn load_store(doc: &dyn SyncDocument, key: &str) -> Result<Option<StoreSnapshot>> {
    match doc.load(key)? {
        Some(state) => Ok(Some(decode_snapshot(&state)?)),
        None => Ok(None),
    }
}

/// Ingest a remote update: replace the store's contents with the serialized
/// state delivered by the document's update callback. Observers are notified.
pub fn apply_remote(store: &mut AvailabilityStore, state: &str) -> Result<()> {
    store.restore(decode_snapshot(state)?);
    Ok(())
}
