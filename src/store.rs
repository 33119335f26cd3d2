//! Generic entity store: CRUD, queries, form session, persistence.
//!
//! One [`EntityStore`] is the single source of truth for one entity
//! collection. Mutations execute synchronously on `&mut self` (there is
//! exactly one writer context), update the in-memory collection first, then
//! flush a best-effort save through the persistence adapter and notify
//! change listeners. Reads of record always come from memory.
//!
//! Everything entity-specific — record shape, id synthesis, timestamps,
//! searchable fields, sort keys, seed data, migrations — is fixed by an
//! [`EntitySchema`] implementation; `members` and `portfolio` provide the
//! two concrete instances.

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

use crate::persist::{self, Migration};
use crate::storage::StorageArea;

// ---------------------------------------------------------------------------
// Schema contract
// ---------------------------------------------------------------------------

/// Per-instance configuration of the generic store.
pub trait EntitySchema {
    /// The entity record, as persisted.
    type Record: Clone + Serialize + DeserializeOwned;
    /// Stable unique identifier within the collection.
    type Id: Clone + PartialEq + std::fmt::Debug;
    /// Validated create payload (no id, no timestamps).
    type Draft;
    /// Partial update payload; absent fields leave the record untouched.
    type Patch;
    /// Sortable-field selector.
    type SortField: Copy;

    /// Fixed storage key for the persisted document.
    const STORAGE_KEY: &'static str;
    /// Current schema version of the persisted document.
    const SCHEMA_VERSION: u32;
    /// Name of the collection array inside the persisted `state` object.
    const COLLECTION_FIELD: &'static str;

    /// Migration steps for documents written at older schema versions.
    fn migrations() -> &'static [Migration] {
        &[]
    }

    /// Initial dataset used when the persisted collection is empty or absent.
    fn seed() -> Vec<Self::Record>;

    fn id(record: &Self::Record) -> Self::Id;

    /// Build a full record from a draft: synthesize a fresh id that cannot
    /// collide with `existing`, and stamp creation timestamps.
    fn create(draft: Self::Draft, existing: &[Self::Record]) -> Self::Record;

    /// Shallow-merge a patch over a record, refreshing the update timestamp
    /// where the schema carries one.
    fn apply_patch(record: &mut Self::Record, patch: Self::Patch);

    /// Case-insensitive substring match over the schema's searchable fields.
    /// `needle` arrives lowercased and non-empty.
    fn matches(record: &Self::Record, needle: &str) -> bool;

    fn sort_key(record: &Self::Record, field: Self::SortField) -> SortKey;

    fn default_sort_field() -> Self::SortField;
}

// ---------------------------------------------------------------------------
// Sort keys
// ---------------------------------------------------------------------------

/// Comparison key projected out of a record for one sortable field.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Text(String),
    Number(f64),
}

impl SortKey {
    /// Total order over keys of the same kind. Text compares by
    /// NFC-normalized codepoints; mixed kinds compare equal (a schema never
    /// produces them for one field).
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.nfc().cmp(b.nfc()),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

// ---------------------------------------------------------------------------
// Form session
// ---------------------------------------------------------------------------

/// State of the create/edit form session.
///
/// Transitions: `Closed -> Creating` (open create form), `Closed -> Editing`
/// (open edit form), and back to `Closed` on close, successful add, or
/// successful update. There is no direct `Creating -> Editing` transition;
/// the form closes first.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormSession<R> {
    #[default]
    Closed,
    Creating,
    Editing(R),
}

impl<R> FormSession<R> {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// The record being edited, when in the `Editing` state.
    pub fn editing(&self) -> Option<&R> {
        match self {
            Self::Editing(record) => Some(record),
            _ => None,
        }
    }
}

/// Fired after every mutation; the rendering layer decides how to re-render.
pub type ChangeListener = Box<dyn Fn()>;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// In-memory entity collection with persistence, queries, and a form
/// session. One instance per entity type, owned by the application context.
pub struct EntityStore<S: EntitySchema> {
    records: Vec<S::Record>,
    form: FormSession<S::Record>,
    search_term: String,
    sort_field: S::SortField,
    sort_direction: SortDirection,
    listeners: Vec<ChangeListener>,
    storage: Box<dyn StorageArea>,
}

impl<S: EntitySchema> EntityStore<S> {
    /// Load the store from `storage`, migrating older documents and seeding
    /// when the persisted collection is absent, corrupt, or empty.
    pub fn open(storage: Box<dyn StorageArea>) -> Self {
        let records = persist::load_document(
            storage.as_ref(),
            S::STORAGE_KEY,
            S::SCHEMA_VERSION,
            S::migrations(),
        )
        .and_then(|state| Self::decode_collection(&state))
        .filter(|records| !records.is_empty())
        .unwrap_or_else(|| {
            let seed = S::seed();
            log::info!("Seeding {} with {} records", S::STORAGE_KEY, seed.len());
            seed
        });

        Self {
            records,
            form: FormSession::Closed,
            search_term: String::new(),
            sort_field: S::default_sort_field(),
            sort_direction: SortDirection::Ascending,
            listeners: Vec::new(),
            storage,
        }
    }

    fn decode_collection(state: &Value) -> Option<Vec<S::Record>> {
        let list = state.get(S::COLLECTION_FIELD)?;
        match serde_json::from_value(list.clone()) {
            Ok(records) => Some(records),
            Err(e) => {
                log::warn!(
                    "Persisted collection {} is unreadable: {e}; falling back to seed data",
                    S::STORAGE_KEY
                );
                None
            }
        }
    }

    // -- reads --------------------------------------------------------------

    /// The collection in insertion order.
    pub fn records(&self) -> &[S::Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pure lookup by id.
    pub fn get(&self, id: &S::Id) -> Option<&S::Record> {
        self.records.iter().find(|r| S::id(r) == *id)
    }

    /// Case-insensitive substring search over the schema's searchable
    /// fields. An empty (or whitespace) query returns the whole collection
    /// in collection order.
    pub fn search(&self, query: &str) -> Vec<&S::Record> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|r| S::matches(r, &needle))
            .collect()
    }

    /// The collection filtered by the stored search term.
    pub fn filtered(&self) -> Vec<&S::Record> {
        self.search(&self.search_term)
    }

    /// A freshly ordered copy of the collection; never mutates the
    /// underlying order. Descending is the exact reverse of ascending.
    pub fn sorted_view(&self, field: S::SortField, direction: SortDirection) -> Vec<S::Record> {
        let mut view: Vec<S::Record> = self.records.clone();
        view.sort_by(|a, b| S::sort_key(a, field).compare(&S::sort_key(b, field)));
        if direction == SortDirection::Descending {
            view.reverse();
        }
        view
    }

    /// Filtered by the stored search term, then ordered by the stored sort
    /// parameters — the listing-page view.
    pub fn sorted(&self) -> Vec<S::Record> {
        let mut view: Vec<S::Record> = self.filtered().into_iter().cloned().collect();
        view.sort_by(|a, b| {
            S::sort_key(a, self.sort_field).compare(&S::sort_key(b, self.sort_field))
        });
        if self.sort_direction == SortDirection::Descending {
            view.reverse();
        }
        view
    }

    // -- mutations ----------------------------------------------------------

    /// Insert a new record built from a validated draft. Synthesizes a fresh
    /// id that cannot collide with the collection, appends, and closes the
    /// form session.
    pub fn add(&mut self, draft: S::Draft) {
        let record = S::create(draft, &self.records);
        self.records.push(record);
        self.form = FormSession::Closed;
        self.after_mutation();
    }

    /// Shallow-merge `patch` over the record with `id`. Unknown ids are a
    /// silent no-op — the record may have been deleted elsewhere, and the
    /// next render simply reflects its absence.
    pub fn update(&mut self, id: &S::Id, patch: S::Patch) {
        let Some(record) = self.records.iter_mut().find(|r| S::id(r) == *id) else {
            return;
        };
        S::apply_patch(record, patch);
        self.form = FormSession::Closed;
        self.after_mutation();
    }

    /// Remove the record with `id`; clears the edit reference if it pointed
    /// at the deleted record. Unknown ids are a no-op.
    pub fn delete(&mut self, id: &S::Id) {
        let before = self.records.len();
        self.records.retain(|r| S::id(r) != *id);
        if self.records.len() == before {
            return;
        }
        if self.form.editing().is_some_and(|r| S::id(r) == *id) {
            self.form = FormSession::Closed;
        }
        self.after_mutation();
    }

    /// Append any seed records whose ids are not already present. Existing
    /// records are never overwritten.
    pub fn load_missing_seed(&mut self) {
        let mut added = 0;
        for record in S::seed() {
            if self.get(&S::id(&record)).is_none() {
                self.records.push(record);
                added += 1;
            }
        }
        if added > 0 {
            log::info!("Loaded {added} seed records into {}", S::STORAGE_KEY);
            self.after_mutation();
        }
    }

    /// Replace the whole collection with the seed dataset.
    pub fn reset_to_seed(&mut self) {
        self.records = S::seed();
        self.form = FormSession::Closed;
        self.after_mutation();
    }

    // -- form session -------------------------------------------------------

    pub fn form(&self) -> &FormSession<S::Record> {
        &self.form
    }

    /// The record currently being edited, if any.
    pub fn editing(&self) -> Option<&S::Record> {
        self.form.editing()
    }

    pub fn open_create_form(&mut self) {
        self.form = FormSession::Creating;
        self.notify();
    }

    /// Open the edit form over a copy of `record`; the collection entry is
    /// only touched by a later `update`.
    pub fn open_edit_form(&mut self, record: S::Record) {
        self.form = FormSession::Editing(record);
        self.notify();
    }

    pub fn close_form(&mut self) {
        self.form = FormSession::Closed;
        self.notify();
    }

    // -- query state --------------------------------------------------------

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.notify();
    }

    pub fn sorting(&self) -> (S::SortField, SortDirection) {
        (self.sort_field, self.sort_direction)
    }

    pub fn set_sorting(&mut self, field: S::SortField, direction: SortDirection) {
        self.sort_field = field;
        self.sort_direction = direction;
        self.notify();
    }

    // -- listeners & persistence --------------------------------------------

    /// Register a change listener, fired after every mutation and query-state
    /// change.
    pub fn subscribe(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }

    fn after_mutation(&mut self) {
        self.persist();
        self.notify();
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener();
        }
    }

    /// Flush the collection through the persistence adapter. Best-effort:
    /// a failed write never fails the mutation.
    fn persist(&mut self) {
        let list = match serde_json::to_value(&self.records) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("Failed to serialize {} collection: {e}", S::STORAGE_KEY);
                return;
            }
        };
        let mut state = serde_json::Map::new();
        state.insert(S::COLLECTION_FIELD.to_string(), list);
        persist::save_document(
            self.storage.as_mut(),
            S::STORAGE_KEY,
            S::SCHEMA_VERSION,
            Value::Object(state),
        );
    }
}
