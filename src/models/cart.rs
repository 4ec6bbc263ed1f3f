//! Cart and order history models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CatalogEntry, EntryId, MenuItem};

/// A menu item placed in the cart, remembering where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Owning catalog entry.
    pub entry_id: EntryId,
    /// Name of the owning entry at the time the item was added.
    pub restaurant_name: String,
    /// Snapshot of the menu item.
    #[serde(flatten)]
    pub item: MenuItem,
}

impl CartItem {
    /// Snapshots `item` from `entry`.
    #[inline]
    #[must_use]
    pub fn new(entry: &CatalogEntry, item: &MenuItem) -> Self {
        Self {
            entry_id: entry.id,
            restaurant_name: entry.name.clone(),
            item: item.clone(),
        }
    }
}

/// The shopping cart: an ordered list that may hold the same item twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    /// Items in the order they were added.
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an item.
    #[inline]
    pub fn add(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// Removes the item at `index`, or returns `None` if out of range.
    #[inline]
    pub fn remove(&mut self, index: usize) -> Option<CartItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Empties the cart, returning what it held.
    #[inline]
    pub fn take(&mut self) -> Vec<CartItem> {
        core::mem::take(&mut self.items)
    }

    /// Items in insertion order.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the cart holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of effective prices.
    #[inline]
    #[must_use]
    pub fn total(&self) -> f64 {
        total_of(&self.items)
    }
}

impl From<Vec<CartItem>> for Cart {
    #[inline]
    fn from(items: Vec<CartItem>) -> Self {
        Self { items }
    }
}

/// A completed checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Items bought.
    pub items: Vec<CartItem>,
    /// Amount charged (sum of effective prices).
    pub total: f64,
}

impl Order {
    /// Builds an order from the given items, stamping it with `placed_at`.
    #[inline]
    #[must_use]
    pub fn new(items: Vec<CartItem>, placed_at: DateTime<Utc>) -> Self {
        let total = total_of(&items);
        Self {
            placed_at,
            items,
            total,
        }
    }

    /// Total saved through offers across the order.
    #[inline]
    #[must_use]
    pub fn savings(&self) -> f64 {
        self.items
            .iter()
            .filter_map(|line| line.item.savings())
            .sum()
    }
}

/// Sum of effective prices.
fn total_of(items: &[CartItem]) -> f64 {
    items.iter().map(|line| line.item.effective_price()).sum()
}
