//! Data models for the storefront.
//!
//! This module contains the typed catalog records, the derived
//! [`LocatedEntry`] view, selector state, cart/order records and newtype
//! ID wrappers.

mod cart;
mod catalog_entry;
mod ids;
mod location;
mod menu_item;
mod selection;

pub use cart::{Cart, CartItem, Order};
pub use catalog_entry::{CatalogEntry, DEFAULT_CATEGORY, LocatedEntry};
pub use ids::{EntryId, MenuItemId};
pub use location::{EARTH_RADIUS_KM, Location};
pub use menu_item::MenuItem;
pub use selection::{ALL_CATEGORIES, CategorySelection};
