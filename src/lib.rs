//! Client-side persisted entity stores for a student-portfolio and
//! band-member management app.
//!
//! Two store instances — [`members::MemberStore`] and
//! [`portfolio::PortfolioStore`] — share one generic engine
//! ([`store::EntityStore`]) covering CRUD, substring search, field sorting,
//! form-session state, change notification, and versioned JSON persistence
//! with forward migrations. An [`context::AppContext`] owns both and is
//! passed around explicitly; the crate keeps no global state.
//!
//! Persistence is best-effort: the in-memory collection is the read of
//! record, and a failed save is logged and swallowed rather than surfaced to
//! the mutation path.

pub mod context;
pub mod error;
pub mod images;
pub mod members;
pub mod persist;
pub mod portfolio;
pub mod stats;
pub mod storage;
pub mod store;

pub use context::AppContext;
pub use error::StoreError;
pub use images::ImageRef;
pub use store::{EntitySchema, EntityStore, FormSession, SortDirection, SortKey};
