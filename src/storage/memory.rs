//! In-memory repository backend.
//!
//! Provides [`InMemoryStorage`], a thread-safe in-memory implementation of
//! the repository traits. Useful for tests and for sessions that should
//! leave nothing behind.

use std::sync::Mutex;

#[cfg(feature = "async")]
use core::future::{self, Future};

use crate::error::{Result, StorefrontError};
use crate::models::{Cart, CatalogEntry, EntryId, Location, Order};

/// Thread-safe in-memory repository.
///
/// This type implements both [`super::Repository`] (async) and
/// [`super::BlockingRepository`] (blocking) traits.
///
/// # Upsert semantics
///
/// Like [`super::FileStorage`], upserts merge by id: stored entries with
/// matching ids are replaced in place, new entries are appended.
///
/// # Example
///
/// ```rust
/// use storefront_rs::storage::InMemoryStorage;
///
/// let storage = InMemoryStorage::new();
/// // Use with the Storefront or StorefrontBlocking builders:
/// // StorefrontBlocking::builder().storage(storage).build()
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    /// All state behind a single mutex for thread-safe interior mutability.
    inner: Mutex<Inner>,
}

/// Inner mutable state.
#[derive(Debug, Default)]
struct Inner {
    /// User-submitted catalog entries.
    user_entries: Vec<CatalogEntry>,
    /// Cached location.
    location: Option<Location>,
    /// Current cart.
    cart: Cart,
    /// Order history, oldest first.
    orders: Vec<Order>,
}

impl InMemoryStorage {
    /// Creates a new empty in-memory storage.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-populated with user-submitted entries.
    #[inline]
    #[must_use]
    pub fn with_entries(user_entries: Vec<CatalogEntry>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                user_entries,
                ..Inner::default()
            }),
        }
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R, F: FnOnce(&mut Inner) -> R>(&self, op: F) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(op(&mut inner))
    }
}

/// Converts a mutex poison error into a [`StorefrontError::Storage`].
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> StorefrontError {
    StorefrontError::Storage(err.to_string().into())
}

// ── BlockingRepository implementation ───────────────────────────────────

#[cfg(feature = "blocking")]
impl super::BlockingRepository for InMemoryStorage {
    #[inline]
    fn user_entries(&self) -> Result<Vec<CatalogEntry>> {
        self.with_lock(|inner| inner.user_entries.clone())
    }

    #[inline]
    fn upsert_user_entries(&self, items: Vec<CatalogEntry>) -> Result<()> {
        self.with_lock(|inner| super::upsert_entries(&mut inner.user_entries, items))
    }

    #[inline]
    fn remove_user_entries(&self, ids: &[EntryId]) -> Result<usize> {
        self.with_lock(|inner| super::remove_entries(&mut inner.user_entries, ids))
    }

    #[inline]
    fn location(&self) -> Result<Option<Location>> {
        self.with_lock(|inner| inner.location)
    }

    #[inline]
    fn set_location(&self, location: Location) -> Result<()> {
        self.with_lock(|inner| inner.location = Some(location))
    }

    #[inline]
    fn clear_location(&self) -> Result<()> {
        self.with_lock(|inner| inner.location = None)
    }

    #[inline]
    fn cart(&self) -> Result<Cart> {
        self.with_lock(|inner| inner.cart.clone())
    }

    #[inline]
    fn set_cart(&self, cart: Cart) -> Result<()> {
        self.with_lock(|inner| inner.cart = cart)
    }

    #[inline]
    fn orders(&self) -> Result<Vec<Order>> {
        self.with_lock(|inner| inner.orders.clone())
    }

    #[inline]
    fn push_order(&self, order: Order) -> Result<()> {
        self.with_lock(|inner| inner.orders.push(order))
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.with_lock(|inner| *inner = Inner::default())
    }
}

// ── Repository (async) implementation ───────────────────────────────────

#[cfg(feature = "async")]
impl super::Repository for InMemoryStorage {
    #[inline]
    fn user_entries(&self) -> impl Future<Output = Result<Vec<CatalogEntry>>> + Send {
        future::ready(self.with_lock(|inner| inner.user_entries.clone()))
    }

    #[inline]
    fn upsert_user_entries(
        &self,
        items: Vec<CatalogEntry>,
    ) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| super::upsert_entries(&mut inner.user_entries, items)))
    }

    #[inline]
    fn remove_user_entries(&self, ids: &[EntryId]) -> impl Future<Output = Result<usize>> + Send {
        future::ready(self.with_lock(|inner| super::remove_entries(&mut inner.user_entries, ids)))
    }

    #[inline]
    fn location(&self) -> impl Future<Output = Result<Option<Location>>> + Send {
        future::ready(self.with_lock(|inner| inner.location))
    }

    #[inline]
    fn set_location(&self, location: Location) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| inner.location = Some(location)))
    }

    #[inline]
    fn clear_location(&self) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| inner.location = None))
    }

    #[inline]
    fn cart(&self) -> impl Future<Output = Result<Cart>> + Send {
        future::ready(self.with_lock(|inner| inner.cart.clone()))
    }

    #[inline]
    fn set_cart(&self, cart: Cart) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| inner.cart = cart))
    }

    #[inline]
    fn orders(&self) -> impl Future<Output = Result<Vec<Order>>> + Send {
        future::ready(self.with_lock(|inner| inner.orders.clone()))
    }

    #[inline]
    fn push_order(&self, order: Order) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| inner.orders.push(order)))
    }

    #[inline]
    fn clear(&self) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| *inner = Inner::default()))
    }
}
