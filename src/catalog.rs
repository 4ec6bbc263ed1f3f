//! Catalog aggregation and locality filtering.
//!
//! A [`Catalog`] is the concatenation of the bundled static catalog and
//! the user-submitted entries read from the repository, in that order.
//! Combining it with a location yields a [`LocatedCatalog`], whose entries
//! carry a freshly computed `is_far` flag and which answers the browse,
//! search and offers queries.
//!
//! Everything here is pure: no function touches storage or fails.

mod locality;
mod offers;
mod search;

pub use locality::{DEFAULT_THRESHOLD_KM, annotate_distance, is_far};
pub use offers::{OfferItem, Offers, browse_offers, offers_by_category, offers_in_category};
pub use search::{
    Browse, CategoryGroup, Grouped, browse, filter_by_category, group_by_category, matches_search,
};

use crate::models::{CatalogEntry, CategorySelection, EntryId, LocatedEntry, Location};
use crate::normalize;

/// The bundled static catalog document.
const STATIC_CATALOG_JSON: &str = include_str!("../data/restaurants.json");

/// Loads the static catalog shipped with the crate.
#[must_use]
pub fn static_catalog() -> Vec<CatalogEntry> {
    normalize::parse_catalog(STATIC_CATALOG_JSON)
}

/// Finds the first entry carrying `id`.
///
/// Duplicate ids are not rejected anywhere; the entry that comes first in
/// merged order (static before user-submitted) wins.
#[inline]
#[must_use]
pub fn find_entry<E: AsRef<CatalogEntry>>(catalog: &[E], id: EntryId) -> Option<&E> {
    catalog.iter().find(|entry| entry.as_ref().id == id)
}

/// The merged catalog: static entries first, then user-submitted ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    /// Entries in merged order.
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Concatenates `static_entries` and `user_entries`, preserving the
    /// order of both.
    #[must_use]
    pub fn merge(static_entries: Vec<CatalogEntry>, user_entries: Vec<CatalogEntry>) -> Self {
        let mut entries = static_entries;
        entries.extend(user_entries);
        tracing::debug!(entries = entries.len(), "merged catalog");
        Self { entries }
    }

    /// Entries in merged order.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds an entry by id; see [`find_entry`].
    #[inline]
    #[must_use]
    pub fn find(&self, id: EntryId) -> Option<&CatalogEntry> {
        find_entry(&self.entries, id)
    }

    /// Returns `true` if any entry carries `id`.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: EntryId) -> bool {
        self.find(id).is_some()
    }

    /// Annotates the catalog against `location` and `threshold_km`.
    #[must_use]
    pub fn locate(&self, location: Option<Location>, threshold_km: f64) -> LocatedCatalog {
        LocatedCatalog {
            entries: annotate_distance(&self.entries, location, threshold_km),
            location,
            threshold_km,
        }
    }
}

impl From<Vec<CatalogEntry>> for Catalog {
    #[inline]
    fn from(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }
}

/// A snapshot of the catalog annotated for one location and threshold.
///
/// The flags are never updated in place: a location change means calling
/// [`Catalog::locate`] again.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedCatalog {
    /// Annotated entries in merged order.
    entries: Vec<LocatedEntry>,
    /// Location the flags were computed for.
    location: Option<Location>,
    /// Threshold the flags were computed with.
    threshold_km: f64,
}

impl LocatedCatalog {
    /// Annotated entries in merged order.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[LocatedEntry] {
        &self.entries
    }

    /// Location the snapshot was computed for.
    #[inline]
    #[must_use]
    pub const fn location(&self) -> Option<Location> {
        self.location
    }

    /// Threshold the snapshot was computed with.
    #[inline]
    #[must_use]
    pub const fn threshold_km(&self) -> f64 {
        self.threshold_km
    }

    /// Finds an entry by id; see [`find_entry`].
    #[inline]
    #[must_use]
    pub fn find(&self, id: EntryId) -> Option<&LocatedEntry> {
        find_entry(&self.entries, id)
    }

    /// Browses the snapshot with a category selection and search string.
    #[inline]
    #[must_use]
    pub fn browse(&self, selection: &CategorySelection, search: &str) -> Browse<'_> {
        browse(&self.entries, selection, search)
    }

    /// See [`group_by_category`].
    #[inline]
    #[must_use]
    pub fn group_by_category(&self, search: &str) -> Grouped<&LocatedEntry> {
        group_by_category(&self.entries, search)
    }

    /// See [`filter_by_category`].
    #[inline]
    #[must_use]
    pub fn filter_by_category(&self, category: &str, search: &str) -> Vec<&LocatedEntry> {
        filter_by_category(&self.entries, category, search)
    }

    /// Browses discounted items; locality does not apply.
    #[inline]
    #[must_use]
    pub fn offers(&self, selection: &CategorySelection, search: &str) -> Offers<'_> {
        browse_offers(&self.entries, selection, search)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{CatalogEntry, EntryId, MenuItem, MenuItemId};

    /// Builds a minimal entry with an empty menu.
    pub(crate) fn entry_at(
        id: i64,
        name: &str,
        category: &str,
        coords: Option<(f64, f64)>,
    ) -> CatalogEntry {
        CatalogEntry {
            id: EntryId::new(id),
            name: name.to_owned(),
            category: category.to_owned(),
            cuisine: String::new(),
            address: String::new(),
            image: String::new(),
            delivery_time: 30.0,
            price: 100.0,
            location_name: None,
            lat: coords.map(|(lat, _)| lat),
            long: coords.map(|(_, lon)| lon),
            menu: Vec::new(),
        }
    }

    /// Replaces the menu with items named `names`, priced 100.
    pub(crate) fn with_menu(mut entry: CatalogEntry, names: &[&str]) -> CatalogEntry {
        entry.menu = names
            .iter()
            .zip(1_i64..)
            .map(|(name, id)| MenuItem {
                id: MenuItemId::new(id),
                name: (*name).to_owned(),
                price: 100.0,
                offer_price: None,
                image: None,
            })
            .collect();
        entry
    }
}
