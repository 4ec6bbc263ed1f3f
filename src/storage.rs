//! The storefront repository: persisted user state behind typed
//! load/save operations.
//!
//! This module defines the [`Repository`] (async) and
//! [`BlockingRepository`] (blocking) traits via a shared macro, so both
//! flavours expose the same method list. Backends hand out fully typed
//! values; lenient parsing of catalog records happens inside the backend
//! through [`crate::normalize`].

#[cfg(feature = "storage-file")]
mod file;
mod memory;

#[cfg(feature = "storage-file")]
pub use file::FileStorage;
pub use memory::InMemoryStorage;

use std::collections::HashSet;

use crate::models::{CatalogEntry, EntryId};

/// Generates a repository trait (async or blocking) with all methods.
///
/// Uses `@methods` to define the method list once, and `@method` to render
/// each method in async (`impl Future + Send`) or blocking (`fn`) style.
macro_rules! define_repository {
    // ── Entry points ────────────────────────────────────────────────
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: async_mode,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_repository!(@methods async_mode);
        }
    };
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: blocking,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_repository!(@methods blocking);
        }
    };

    // ── Single method list (shared between both variants) ───────────
    (@methods $mode:ident) => {
        // User-submitted catalog entries
        define_repository!(@method $mode, user_entries,
            "Returns the user-submitted catalog entries in storage order.\n\nMalformed records are dropped and an unparsable document reads as empty.\n\n# Errors\n\nReturns an error if the storage backend fails to read.",
            -> Result<Vec<CatalogEntry>>);
        define_repository!(@method $mode, upsert_user_entries,
            "Inserts or replaces user-submitted entries (matched by ID).\n\nReplaced entries keep their position; new ones are appended.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            items: Vec<CatalogEntry>, -> Result<()>);
        define_repository!(@method $mode, remove_user_entries,
            "Removes user-submitted entries by ID and returns how many were removed.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            ids: &[EntryId], -> Result<usize>);

        // Cached location
        define_repository!(@method $mode, location,
            "Returns the last known location, if any.\n\n# Errors\n\nReturns an error if the storage backend fails to read.",
            -> Result<Option<Location>>);
        define_repository!(@method $mode, set_location,
            "Caches the current location.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            location: Location, -> Result<()>);
        define_repository!(@method $mode, clear_location,
            "Forgets the cached location.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            -> Result<()>);

        // Cart
        define_repository!(@method $mode, cart,
            "Returns the current cart.\n\n# Errors\n\nReturns an error if the storage backend fails to read.",
            -> Result<Cart>);
        define_repository!(@method $mode, set_cart,
            "Replaces the stored cart.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            cart: Cart, -> Result<()>);

        // Order history
        define_repository!(@method $mode, orders,
            "Returns past orders, oldest first.\n\n# Errors\n\nReturns an error if the storage backend fails to read.",
            -> Result<Vec<Order>>);
        define_repository!(@method $mode, push_order,
            "Appends an order to the history.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            order: Order, -> Result<()>);

        // Clear
        define_repository!(@method $mode, clear,
            "Removes all stored data.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            -> Result<()>);
    };

    // ── Blocking method renderer ────────────────────────────────────
    (@method blocking, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*) -> $ret;
    };

    // ── Async method renderer (returns impl Future + Send) ──────────
    (@method async_mode, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*)
            -> impl core::future::Future<Output = $ret> + Send;
    };
}

#[cfg(feature = "async")]
mod async_repository {
    //! Async repository trait definition.

    use crate::error::Result;
    use crate::models::{Cart, CatalogEntry, EntryId, Location, Order};

    define_repository! {
        trait_name: Repository,
        trait_doc: "Async repository for the storefront's persisted state.\n\nAll methods take `&self`; implementations use interior mutability\n(e.g. `Mutex`) for thread-safe mutation.",
        mode: async_mode,
    }
}

#[cfg(feature = "blocking")]
mod blocking_repository {
    //! Blocking repository trait definition.

    use crate::error::Result;
    use crate::models::{Cart, CatalogEntry, EntryId, Location, Order};

    define_repository! {
        trait_name: BlockingRepository,
        trait_doc: "Blocking repository for the storefront's persisted state.\n\nAll methods take `&self`; implementations use interior mutability\n(e.g. `Mutex`) for thread-safe mutation.",
        mode: blocking,
    }
}

#[cfg(feature = "async")]
pub use async_repository::Repository;
#[cfg(feature = "blocking")]
pub use blocking_repository::BlockingRepository;

/// Merges `new_items` into `existing` by id.
///
/// An entry whose id is already stored replaces the first stored entry
/// with that id in place; others are appended in the order given.
fn upsert_entries(existing: &mut Vec<CatalogEntry>, new_items: Vec<CatalogEntry>) {
    for item in new_items {
        match existing.iter_mut().find(|stored| stored.id == item.id) {
            Some(stored) => *stored = item,
            None => existing.push(item),
        }
    }
}

/// Drops every entry whose id is in `ids`, returning how many went.
fn remove_entries(existing: &mut Vec<CatalogEntry>, ids: &[EntryId]) -> usize {
    let id_set: HashSet<&EntryId> = ids.iter().collect();
    let before = existing.len();
    existing.retain(|entry| !id_set.contains(&entry.id));
    before.saturating_sub(existing.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::entry_at;

    #[test]
    fn upsert_replaces_in_place_and_appends() {
        let mut stored = vec![
            entry_at(1, "One", "Restaurants", None),
            entry_at(2, "Two", "Restaurants", None),
        ];
        upsert_entries(
            &mut stored,
            vec![
                entry_at(3, "Three", "Groceries", None),
                entry_at(1, "One v2", "Restaurants", None),
            ],
        );
        let names: Vec<&str> = stored.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["One v2", "Two", "Three"]);
    }

    #[test]
    fn remove_counts_dropped_entries() {
        let mut stored = vec![
            entry_at(1, "One", "Restaurants", None),
            entry_at(2, "Two", "Restaurants", None),
        ];
        assert_eq!(remove_entries(&mut stored, &[EntryId::new(2), EntryId::new(9)]), 1);
        assert_eq!(remove_entries(&mut stored, &[]), 0);
        assert_eq!(stored.len(), 1);
    }
}
