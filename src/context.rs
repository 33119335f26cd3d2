//! Application context: the owned set of entity stores.
//!
//! Callers construct one [`AppContext`] at startup and pass it (or `&mut`
//! borrows of its stores) down explicitly. Nothing in this crate reaches for
//! global state.

use std::path::Path;

use crate::error::StoreError;
use crate::members::MemberStore;
use crate::portfolio::PortfolioStore;
use crate::storage::{DirStorage, MemoryStorage};

pub struct AppContext {
    pub members: MemberStore,
    pub portfolio: PortfolioStore,
}

impl AppContext {
    /// Open both stores over per-key JSON documents under `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref();
        Ok(Self {
            members: MemberStore::open(Box::new(DirStorage::open(root)?)),
            portfolio: PortfolioStore::open(Box::new(DirStorage::open(root)?)),
        })
    }

    /// Open the stores in the default per-user data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self {
            members: MemberStore::open(Box::new(DirStorage::open_default()?)),
            portfolio: PortfolioStore::open(Box::new(DirStorage::open_default()?)),
        })
    }

    /// Stores backed by process-local memory; nothing touches the disk.
    pub fn in_memory() -> Self {
        Self {
            members: MemberStore::open(Box::new(MemoryStorage::new())),
            portfolio: PortfolioStore::open(Box::new(MemoryStorage::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_context_seeds_both_stores() {
        let ctx = AppContext::in_memory();
        assert!(!ctx.members.is_empty());
        assert!(!ctx.portfolio.is_empty());
    }

    #[test]
    fn test_open_shares_one_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let mut ctx = AppContext::open(dir.path()).unwrap();
            let first = ctx.members.records()[0].id;
            ctx.members.delete(&first);
        }

        let ctx = AppContext::open(dir.path()).unwrap();
        assert!(dir.path().join("member-store.json").exists());
        assert_eq!(
            ctx.members.len(),
            crate::members::seed_members().len() - 1
        );
    }
}
