//! High-level storefront with integrated repository.
//!
//! Combines the bundled static catalog, a [`Repository`] /
//! [`BlockingRepository`] backend, a distance threshold and the shared
//! [`LocationSignal`] into one handle exposing the storefront operations:
//! browsing, registration and management of user-submitted entries, the
//! cart, checkout and order history.
//!
//! [`Repository`]: crate::storage::Repository
//! [`BlockingRepository`]: crate::storage::BlockingRepository
//! [`LocationSignal`]: crate::location::LocationSignal

use crate::catalog::Catalog;
use crate::models::EntryId;

/// Picks an id for a new entry: `now_millis`, bumped until no entry in
/// `catalog` carries it.
fn next_entry_id(catalog: &Catalog, now_millis: i64) -> EntryId {
    let mut candidate = now_millis;
    while catalog.contains(EntryId::new(candidate)) {
        candidate = candidate.saturating_add(1);
    }
    EntryId::new(candidate)
}

/// Generates a high-level storefront (async or blocking).
macro_rules! define_storefront {
    (
        storefront_name: $storefront:ident,
        builder_name: $builder:ident,
        repository_trait: $repository_trait:ident,
        storefront_doc: $storefront_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder<S: $repository_trait> {
            /// Repository backend.
            storage: Option<S>,
            /// Static catalog override.
            static_entries: Option<Vec<CatalogEntry>>,
            /// Far threshold in kilometers.
            threshold_km: f64,
            /// Shared location signal.
            signal: Option<LocationSignal>,
        }

        impl<S: $repository_trait> $builder<S> {
            /// Sets the repository backend.
            #[inline]
            #[must_use]
            pub fn storage(mut self, storage: S) -> Self {
                self.storage = Some(storage);
                self
            }

            /// Replaces the bundled static catalog.
            #[inline]
            #[must_use]
            pub fn static_catalog(mut self, entries: Vec<CatalogEntry>) -> Self {
                self.static_entries = Some(entries);
                self
            }

            /// Sets the distance, in kilometers, beyond which an entry is
            /// far. Defaults to [`DEFAULT_THRESHOLD_KM`].
            #[inline]
            #[must_use]
            pub fn threshold_km(mut self, threshold_km: f64) -> Self {
                self.threshold_km = threshold_km;
                self
            }

            /// Publishes location changes on an existing signal instead of
            /// a private one.
            #[inline]
            #[must_use]
            pub fn location_signal(mut self, signal: LocationSignal) -> Self {
                self.signal = Some(signal);
                self
            }

            /// Builds the storefront.
            ///
            /// # Errors
            ///
            /// Returns [`StorefrontError::Storage`] if no storage was provided.
            #[inline]
            pub fn build(self) -> Result<$storefront<S>> {
                let storage = self.storage.ok_or_else(|| {
                    StorefrontError::Storage("storage backend is required".into())
                })?;
                Ok($storefront {
                    storage,
                    static_entries: self.static_entries.unwrap_or_else(static_catalog),
                    threshold_km: self.threshold_km,
                    signal: self.signal.unwrap_or_default(),
                })
            }
        }

        #[doc = $storefront_doc]
        #[derive(Debug)]
        pub struct $storefront<S: $repository_trait> {
            /// Repository backend.
            storage: S,
            /// Static catalog, placed before user-submitted entries.
            static_entries: Vec<CatalogEntry>,
            /// Far threshold in kilometers.
            threshold_km: f64,
            /// Current location.
            signal: LocationSignal,
        }

        impl<S: $repository_trait> $storefront<S> {
            /// Creates a new builder for configuring the storefront.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder<S> {
                $builder {
                    storage: None,
                    static_entries: None,
                    threshold_km: DEFAULT_THRESHOLD_KM,
                    signal: None,
                }
            }

            /// Returns the repository backend.
            #[inline]
            #[must_use]
            pub const fn storage(&self) -> &S {
                &self.storage
            }

            /// Distance threshold used for the `is_far` flag.
            #[inline]
            #[must_use]
            pub const fn threshold_km(&self) -> f64 {
                self.threshold_km
            }

            /// The shared location signal.
            #[inline]
            #[must_use]
            pub const fn location_signal(&self) -> &LocationSignal {
                &self.signal
            }

            /// Subscribes to location changes.
            #[inline]
            #[must_use]
            pub fn subscribe_location(&self) -> watch::Receiver<Option<Location>> {
                self.signal.subscribe()
            }

            /// Latest known location, as published on the signal.
            #[inline]
            #[must_use]
            pub fn current_location(&self) -> Option<Location> {
                self.signal.current()
            }

            // ── Location ───────────────────────────────────────────────

            /// Publishes the location cached in the repository, if any.
            ///
            /// Returns what was published.
            ///
            /// # Errors
            ///
            /// Returns an error if the repository fails to read.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn restore_location(&self) -> Result<Option<Location>> {
                let cached = self.storage.location() $( .$await_ext )? ?;
                tracing::debug!(found = cached.is_some(), "restoring cached location");
                let _previous = self.signal.set(cached);
                Ok(cached)
            }

            /// Caches `location` and publishes it to subscribers.
            ///
            /// # Errors
            ///
            /// Returns an error if the repository fails to write.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn set_location(&self, location: Location) -> Result<()> {
                self.storage.set_location(location) $( .$await_ext )? ?;
                let _previous = self.signal.set(Some(location));
                Ok(())
            }

            /// Forgets the cached location and publishes "unknown".
            ///
            /// # Errors
            ///
            /// Returns an error if the repository fails to write.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn clear_location(&self) -> Result<()> {
                self.storage.clear_location() $( .$await_ext )? ?;
                let _previous = self.signal.clear();
                Ok(())
            }

            // ── Catalog ────────────────────────────────────────────────

            /// Loads the merged catalog: static entries, then the
            /// user-submitted ones in storage order.
            ///
            /// # Errors
            ///
            /// Returns an error if the repository fails to read.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn load_catalog(&self) -> Result<Catalog> {
                let user_entries = self.storage.user_entries() $( .$await_ext )? ?;
                Ok(Catalog::merge(self.static_entries.clone(), user_entries))
            }

            /// Loads the merged catalog annotated for the current location.
            ///
            /// # Errors
            ///
            /// Returns an error if the repository fails to read.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn located_catalog(&self) -> Result<LocatedCatalog> {
                let catalog = self.load_catalog() $( .$await_ext )? ?;
                Ok(catalog.locate(self.current_location(), self.threshold_km))
            }

            /// Looks up one entry, annotated for the current location.
            ///
            /// # Errors
            ///
            /// Returns [`StorefrontError::EntryNotFound`] if no entry has
            /// `id`, or an error if the repository fails to read.
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn restaurant(&self, id: EntryId) -> Result<LocatedEntry> {
                let located = self.located_catalog() $( .$await_ext )? ?;
                located
                    .find(id)
                    .cloned()
                    .ok_or(StorefrontError::EntryNotFound(id))
            }

            /// Returns the user-submitted entries, for management views.
            ///
            /// # Errors
            ///
            /// Returns an error if the repository fails to read.
            #[inline]
            pub $($async_kw)? fn user_entries(&self) -> Result<Vec<CatalogEntry>> {
                self.storage.user_entries() $( .$await_ext )?
            }

            // ── Registration and management ────────────────────────────

            /// Validates `draft` and stores it as a new user-submitted
            /// entry.
            ///
            /// The id comes from the current time in milliseconds, bumped
            /// past any id already in the merged catalog.
            ///
            /// # Errors
            ///
            /// Returns [`StorefrontError::Registration`] if the draft is
            /// invalid, or an error if the repository fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn register_restaurant(
                &self,
                draft: RestaurantRegistration,
            ) -> Result<CatalogEntry> {
                draft.validate()?;
                let catalog = self.load_catalog() $( .$await_ext )? ?;
                let id = next_entry_id(&catalog, Utc::now().timestamp_millis());
                let entry = draft.into_entry(id)?;
                self.storage.upsert_user_entries(vec![entry.clone()]) $( .$await_ext )? ?;
                tracing::info!(%id, name = %entry.name, "registered restaurant");
                Ok(entry)
            }

            /// Replaces a user-submitted entry, keeping its id.
            ///
            /// # Errors
            ///
            /// Returns [`StorefrontError::EntryNotFound`] if no
            /// user-submitted entry has `id` (static entries are
            /// read-only), [`StorefrontError::Registration`] if the draft
            /// is invalid, or an error if the repository fails.
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn update_restaurant(
                &self,
                id: EntryId,
                draft: RestaurantRegistration,
            ) -> Result<CatalogEntry> {
                let stored = self.storage.user_entries() $( .$await_ext )? ?;
                if !stored.iter().any(|entry| entry.id == id) {
                    return Err(StorefrontError::EntryNotFound(id));
                }
                let entry = draft.into_entry(id)?;
                self.storage.upsert_user_entries(vec![entry.clone()]) $( .$await_ext )? ?;
                tracing::info!(name = %entry.name, "updated restaurant");
                Ok(entry)
            }

            /// Deletes a user-submitted entry.
            ///
            /// Returns `false` if nothing was removed, including when `id`
            /// names a static entry.
            ///
            /// # Errors
            ///
            /// Returns an error if the repository fails.
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn remove_restaurant(&self, id: EntryId) -> Result<bool> {
                let removed = self.storage.remove_user_entries(&[id]) $( .$await_ext )? ?;
                tracing::debug!(removed, "removed restaurant");
                Ok(removed > 0)
            }

            // ── Cart and orders ────────────────────────────────────────

            /// Returns the current cart.
            ///
            /// # Errors
            ///
            /// Returns an error if the repository fails to read.
            #[inline]
            pub $($async_kw)? fn cart(&self) -> Result<Cart> {
                self.storage.cart() $( .$await_ext )?
            }

            /// Adds a menu item of a catalog entry to the cart.
            ///
            /// Far entries can be added too; locality only affects
            /// browsing.
            ///
            /// # Errors
            ///
            /// Returns [`StorefrontError::EntryNotFound`] or
            /// [`StorefrontError::MenuItemNotFound`] for unknown ids, or an
            /// error if the repository fails.
            #[tracing::instrument(skip_all, fields(entry = %entry_id, item = %item_id))]
            pub $($async_kw)? fn add_to_cart(
                &self,
                entry_id: EntryId,
                item_id: MenuItemId,
            ) -> Result<CartItem> {
                let catalog = self.load_catalog() $( .$await_ext )? ?;
                let entry = catalog
                    .find(entry_id)
                    .ok_or(StorefrontError::EntryNotFound(entry_id))?;
                let item = entry.menu_item(item_id).ok_or(StorefrontError::MenuItemNotFound {
                    entry: entry_id,
                    item: item_id,
                })?;
                let line = CartItem::new(entry, item);
                let mut cart = self.storage.cart() $( .$await_ext )? ?;
                cart.add(line.clone());
                self.storage.set_cart(cart) $( .$await_ext )? ?;
                Ok(line)
            }

            /// Removes the cart line at `index`.
            ///
            /// Returns `None` (and leaves the cart untouched) when the
            /// index is out of range.
            ///
            /// # Errors
            ///
            /// Returns an error if the repository fails.
            #[tracing::instrument(skip_all, fields(index = index))]
            pub $($async_kw)? fn remove_from_cart(&self, index: usize) -> Result<Option<CartItem>> {
                let mut cart = self.storage.cart() $( .$await_ext )? ?;
                let removed = cart.remove(index);
                if removed.is_some() {
                    self.storage.set_cart(cart) $( .$await_ext )? ?;
                }
                Ok(removed)
            }

            /// Empties the cart.
            ///
            /// # Errors
            ///
            /// Returns an error if the repository fails to write.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn clear_cart(&self) -> Result<()> {
                self.storage.set_cart(Cart::new()) $( .$await_ext )?
            }

            /// Turns the cart into an order, appends it to the history and
            /// empties the cart.
            ///
            /// Returns `Ok(None)` and records nothing when the cart is
            /// empty. No payment is taken.
            ///
            /// The cart is emptied before the order is recorded, so a
            /// retry after a partial failure cannot record the order twice.
            /// If recording fails the cart is put back.
            ///
            /// # Errors
            ///
            /// Returns an error if the repository fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn checkout(&self) -> Result<Option<Order>> {
                let mut cart = self.storage.cart() $( .$await_ext )? ?;
                if cart.is_empty() {
                    tracing::debug!("checkout with empty cart");
                    return Ok(None);
                }
                let order = Order::new(cart.take(), Utc::now());
                self.storage.set_cart(cart) $( .$await_ext )? ?;
                if let Err(err) = self.storage.push_order(order.clone()) $( .$await_ext )? {
                    tracing::warn!(error = %err, "failed to record order, restoring cart");
                    let restored = Cart::from(order.items);
                    if let Err(restore_err) = self.storage.set_cart(restored) $( .$await_ext )? {
                        tracing::error!(error = %restore_err, "failed to restore cart");
                    }
                    return Err(err);
                }
                tracing::info!(items = order.items.len(), total = order.total, "order placed");
                Ok(Some(order))
            }

            /// Returns past orders, oldest first.
            ///
            /// # Errors
            ///
            /// Returns an error if the repository fails to read.
            #[inline]
            pub $($async_kw)? fn orders(&self) -> Result<Vec<Order>> {
                self.storage.orders() $( .$await_ext )?
            }
        }
    };
}

// ── Async variant ───────────────────────────────────────────────────────

#[cfg(feature = "async")]
mod async_storefront {
    //! Async high-level storefront.

    use chrono::Utc;
    use tokio::sync::watch;

    use crate::catalog::{Catalog, DEFAULT_THRESHOLD_KM, LocatedCatalog, static_catalog};
    use crate::error::{Result, StorefrontError};
    use crate::location::LocationSignal;
    use crate::models::{
        Cart, CartItem, CatalogEntry, EntryId, LocatedEntry, Location, MenuItemId, Order,
    };
    use crate::registration::RestaurantRegistration;
    use crate::storage::Repository;

    use super::next_entry_id;

    define_storefront! {
        storefront_name: Storefront,
        builder_name: StorefrontBuilder,
        repository_trait: Repository,
        storefront_doc: "High-level async storefront with integrated repository.\n\nUse [`Storefront::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`Storefront`].",
        async_kw: async,
        await_kw: await,
    }
}

// ── Blocking variant ────────────────────────────────────────────────────

#[cfg(feature = "blocking")]
mod blocking_storefront {
    //! Blocking high-level storefront.

    use chrono::Utc;
    use tokio::sync::watch;

    use crate::catalog::{Catalog, DEFAULT_THRESHOLD_KM, LocatedCatalog, static_catalog};
    use crate::error::{Result, StorefrontError};
    use crate::location::LocationSignal;
    use crate::models::{
        Cart, CartItem, CatalogEntry, EntryId, LocatedEntry, Location, MenuItemId, Order,
    };
    use crate::registration::RestaurantRegistration;
    use crate::storage::BlockingRepository;

    use super::next_entry_id;

    define_storefront! {
        storefront_name: StorefrontBlocking,
        builder_name: StorefrontBlockingBuilder,
        repository_trait: BlockingRepository,
        storefront_doc: "High-level blocking storefront with integrated repository.\n\nUse [`StorefrontBlocking::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`StorefrontBlocking`].",
    }
}

#[cfg(feature = "async")]
pub use async_storefront::{Storefront, StorefrontBuilder};
#[cfg(feature = "blocking")]
pub use blocking_storefront::{StorefrontBlocking, StorefrontBlockingBuilder};
