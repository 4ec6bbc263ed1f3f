//! Catalog aggregation, locality filtering and cart state for a food and
//! grocery storefront.
//!
//! The crate merges a bundled static catalog with user-submitted
//! restaurants, flags every entry as near or far from the current
//! location (haversine distance against a threshold, 5 km by default) and
//! answers the storefront's browse, search and offers queries. Persisted
//! state (user entries, the cached location, the cart and order history)
//! lives behind the [`storage::Repository`] /
//! [`storage::BlockingRepository`] traits.
//!
//! Most callers want the [`storefront`] façade:
//!
//! ```rust
//! # #[cfg(feature = "blocking")]
//! # fn main() -> storefront_rs::error::Result<()> {
//! use storefront_rs::models::{CategorySelection, Location};
//! use storefront_rs::storage::InMemoryStorage;
//! use storefront_rs::storefront::StorefrontBlocking;
//!
//! let store = StorefrontBlocking::builder()
//!     .storage(InMemoryStorage::new())
//!     .build()?;
//! if let Some(here) = Location::new(19.0596, 72.8295) {
//!     store.set_location(here)?;
//! }
//! let catalog = store.located_catalog()?;
//! let view = catalog.browse(&CategorySelection::All, "");
//! assert!(!view.is_empty());
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "blocking"))]
//! # fn main() {}
//! ```

pub mod catalog;
pub mod error;
pub mod location;
pub mod models;
pub mod normalize;
pub mod registration;
pub mod storage;
pub mod storefront;

pub use error::{RegistrationError, Result, StorefrontError};
