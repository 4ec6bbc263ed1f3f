//! Catalog entry model (restaurant or store).

use serde::{Deserialize, Serialize};

use super::{EntryId, Location, MenuItem, MenuItemId};

/// Category label used for entries whose category is blank.
pub const DEFAULT_CATEGORY: &str = "Other";

/// A sellable venue with a menu.
///
/// Values of this type are fully typed: lenient input (numbers given as
/// strings, missing menus) is normalized by [`crate::normalize`] before
/// a `CatalogEntry` is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Identifier, the sole correlation key for this entry.
    pub id: EntryId,
    /// Display name.
    pub name: String,
    /// Coarse classification tag, e.g. `Restaurants` or `Groceries`.
    #[serde(default)]
    pub category: String,
    /// Cuisine description.
    #[serde(default)]
    pub cuisine: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Picture URL.
    #[serde(default)]
    pub image: String,
    /// Typical delivery time in minutes.
    #[serde(default)]
    pub delivery_time: f64,
    /// Starting price in currency units.
    #[serde(default)]
    pub price: f64,
    /// Free-text place name, e.g. `Mumbai, Andheri`.
    #[serde(default, rename = "location", skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    /// Latitude in degrees.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude in degrees.
    #[serde(default)]
    pub long: Option<f64>,
    /// Menu in display order.
    #[serde(default)]
    pub menu: Vec<MenuItem>,
}

impl CatalogEntry {
    /// Trimmed category, or [`DEFAULT_CATEGORY`] when blank.
    #[inline]
    #[must_use]
    pub fn category_label(&self) -> &str {
        let trimmed = self.category.trim();
        if trimmed.is_empty() {
            DEFAULT_CATEGORY
        } else {
            trimmed
        }
    }

    /// Position of the entry, if both coordinates are present and valid.
    #[inline]
    #[must_use]
    pub fn coordinates(&self) -> Option<Location> {
        Location::new(self.lat?, self.long?)
    }

    /// Looks up a menu item by id.
    #[inline]
    #[must_use]
    pub fn menu_item(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.menu.iter().find(|item| item.id == id)
    }

    /// Case-insensitive substring match of the entry name.
    ///
    /// `needle_lower` must already be lowercased.
    #[inline]
    #[must_use]
    pub fn name_contains(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
    }

    /// Returns `true` if any menu item name contains `needle_lower`.
    #[inline]
    #[must_use]
    pub fn menu_contains(&self, needle_lower: &str) -> bool {
        self.menu.iter().any(|item| item.name_contains(needle_lower))
    }
}

/// A catalog entry paired with its derived locality flag.
///
/// `is_far` is computed from the entry's coordinates, the current
/// location and a threshold; it is never persisted, so this type only
/// serializes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatedEntry {
    /// The underlying entry.
    #[serde(flatten)]
    pub entry: CatalogEntry,
    /// Whether the entry is beyond the threshold or its distance is
    /// unknown.
    pub is_far: bool,
}

impl AsRef<Self> for CatalogEntry {
    #[inline]
    fn as_ref(&self) -> &Self {
        self
    }
}

impl core::ops::Deref for LocatedEntry {
    type Target = CatalogEntry;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.entry
    }
}

impl AsRef<CatalogEntry> for LocatedEntry {
    #[inline]
    fn as_ref(&self) -> &CatalogEntry {
        &self.entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: &str) -> CatalogEntry {
        CatalogEntry {
            id: EntryId::new(1),
            name: "Pizza Hub".to_owned(),
            category: category.to_owned(),
            cuisine: "Italian".to_owned(),
            address: String::new(),
            image: String::new(),
            delivery_time: 30.0,
            price: 200.0,
            location_name: None,
            lat: Some(10.0),
            long: Some(10.0),
            menu: vec![MenuItem {
                id: MenuItemId::new(1),
                name: "Margherita".to_owned(),
                price: 200.0,
                offer_price: None,
                image: None,
            }],
        }
    }

    #[test]
    fn category_label_trims_and_defaults() {
        assert_eq!(entry("  Groceries ").category_label(), "Groceries");
        assert_eq!(entry("").category_label(), DEFAULT_CATEGORY);
        assert_eq!(entry("   ").category_label(), DEFAULT_CATEGORY);
    }

    #[test]
    fn coordinates_require_both_values() {
        let mut e = entry("Restaurants");
        assert!(e.coordinates().is_some());
        e.long = None;
        assert!(e.coordinates().is_none());
        e.long = Some(f64::NAN);
        assert!(e.coordinates().is_none());
    }

    #[test]
    fn zero_coordinates_are_valid() {
        let mut e = entry("Restaurants");
        e.lat = Some(0.0);
        e.long = Some(0.0);
        assert!(e.coordinates().is_some());
    }

    #[test]
    fn menu_lookup_and_search() {
        let e = entry("Restaurants");
        assert!(e.menu_item(MenuItemId::new(1)).is_some());
        assert!(e.menu_item(MenuItemId::new(2)).is_none());
        assert!(e.menu_contains("margh"));
        assert!(e.name_contains("pizza"));
        assert!(!e.name_contains("Pizza"));
    }

    #[test]
    fn located_entry_serializes_flat() {
        let located = LocatedEntry {
            entry: entry("Restaurants"),
            is_far: true,
        };
        let json = serde_json::to_value(&located).unwrap();
        assert_eq!(json["name"], "Pizza Hub");
        assert_eq!(json["isFar"], true);
        assert_eq!(json["deliveryTime"], 30.0);
        assert_eq!(located.category_label(), "Restaurants");
    }
}
