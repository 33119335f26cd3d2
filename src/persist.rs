//! Versioned persisted documents and schema migration.
//!
//! Each store round-trips one JSON document under a fixed key:
//! `{ "version": <u32>, "state": { "<collection>": [...] } }` — the layout
//! the original deployment wrote. On load, documents persisted at an older
//! schema version run through the pending migration steps before the state
//! is considered valid; the document is re-persisted at the current version
//! on the next save.
//!
//! Failure semantics: a corrupt or unreadable document never prevents
//! startup (the caller falls back to seed data), and a failed write is
//! logged and swallowed — the in-memory state stays authoritative.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::StorageArea;

/// The on-disk envelope. Unknown extra fields are ignored, not rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedDocument {
    pub version: u32,
    pub state: Value,
}

/// One migration step, upgrading a raw state document *to* `to_version`.
///
/// Steps must be deterministic and idempotent, must never drop entities,
/// and must leave fields they don't recognize untouched.
pub struct Migration {
    pub to_version: u32,
    pub run: fn(&mut Value),
}

/// Serialize and write a store's state. Best-effort: failures are logged
/// and swallowed, never surfaced to the mutation that triggered the save.
pub fn save_document(storage: &mut dyn StorageArea, key: &str, version: u32, state: Value) {
    let doc = PersistedDocument { version, state };
    match serde_json::to_string(&doc) {
        Ok(content) => {
            if let Err(e) = storage.set_item(key, &content) {
                log::warn!("Failed to persist {key}: {e}");
            }
        }
        Err(e) => log::warn!("Failed to serialize {key}: {e}"),
    }
}

/// Load a store's state, running pending migrations.
///
/// Returns `None` when the key is absent, the document is unparseable, or
/// it was written by a newer schema than this build knows (forward-compat
/// guard — newer data is treated as absent rather than misread).
pub fn load_document(
    storage: &dyn StorageArea,
    key: &str,
    current_version: u32,
    migrations: &[Migration],
) -> Option<Value> {
    let raw = storage.get_item(key)?;

    let mut doc: PersistedDocument = match serde_json::from_str(&raw) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("Corrupt persisted document at {key}: {e}; falling back to seed data");
            return None;
        }
    };

    if doc.version > current_version {
        log::warn!(
            "Document at {key} has schema v{} but this build supports up to v{}; ignoring it",
            doc.version,
            current_version
        );
        return None;
    }

    if doc.version < current_version {
        for migration in migrations {
            if migration.to_version > doc.version && migration.to_version <= current_version {
                (migration.run)(&mut doc.state);
                log::info!("Migrated {key} to schema v{}", migration.to_version);
            }
        }
    }

    Some(doc.state)
}
