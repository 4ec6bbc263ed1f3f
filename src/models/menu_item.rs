//! Menu item model.

use serde::{Deserialize, Serialize};

use super::MenuItemId;

/// A sellable item on a catalog entry's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Identifier, unique within the owning entry's menu.
    pub id: MenuItemId,
    /// Display name.
    pub name: String,
    /// Regular price (currency units, non-negative).
    pub price: f64,
    /// Discounted price; replaces `price` when present.
    #[serde(default)]
    pub offer_price: Option<f64>,
    /// Picture URL.
    #[serde(default)]
    pub image: Option<String>,
}

impl MenuItem {
    /// Returns `true` if the item is on offer.
    #[inline]
    #[must_use]
    pub const fn has_offer(&self) -> bool {
        self.offer_price.is_some()
    }

    /// Price actually charged: the offer price when present, else the
    /// regular price.
    #[inline]
    #[must_use]
    pub fn effective_price(&self) -> f64 {
        self.offer_price.unwrap_or(self.price)
    }

    /// Amount saved by the offer, or `None` when the item is not on offer.
    #[inline]
    #[must_use]
    pub fn savings(&self) -> Option<f64> {
        self.offer_price.map(|offer| self.price - offer)
    }

    /// Case-insensitive substring match of the item name.
    #[inline]
    #[must_use]
    pub fn name_contains(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
    }
}
