//! Discounted menu items across the catalog.
//!
//! The offers view ignores locality: every entry contributes its offered
//! items whether or not it is near the current location.

use super::search::Grouped;
use crate::models::{CartItem, CatalogEntry, CategorySelection, MenuItem};

/// A discounted menu item together with the entry selling it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfferItem<'cat> {
    /// Entry selling the item.
    pub restaurant: &'cat CatalogEntry,
    /// The item on offer.
    pub item: &'cat MenuItem,
}

impl OfferItem<'_> {
    /// Snapshots the offer as a cart line.
    #[inline]
    #[must_use]
    pub fn to_cart_item(&self) -> CartItem {
        CartItem::new(self.restaurant, self.item)
    }
}

/// Result of browsing offers with a category selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Offers<'cat> {
    /// No category selected.
    NoCategory,
    /// Offers from every category, grouped by label.
    Grouped(Grouped<OfferItem<'cat>>),
    /// Offers from a single category.
    Filtered(Vec<OfferItem<'cat>>),
}

impl Offers<'_> {
    /// Returns `true` if there is nothing to display.
    #[allow(
        clippy::pattern_type_mismatch,
        reason = "borrowed view variants are matched through match ergonomics"
    )]
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::NoCategory => true,
            Self::Grouped(grouped) => grouped.is_empty(),
            Self::Filtered(items) => items.is_empty(),
        }
    }
}

/// Offered items of `entry` whose name contains `needle_lower`.
fn offers_of<'cat>(
    entry: &'cat CatalogEntry,
    needle_lower: &str,
) -> impl Iterator<Item = OfferItem<'cat>> {
    entry
        .menu
        .iter()
        .filter(|item| item.has_offer() && item.name_contains(needle_lower))
        .map(move |item| OfferItem {
            restaurant: entry,
            item,
        })
}

/// Groups every offered item matching `search` by its entry's category
/// label.
///
/// Entries without matching offers contribute nothing, so no group is
/// ever empty.
#[must_use]
pub fn offers_by_category<'cat, E: AsRef<CatalogEntry>>(
    catalog: &'cat [E],
    search: &str,
) -> Grouped<OfferItem<'cat>> {
    let needle = search.to_lowercase();
    let mut grouped = Grouped::new();
    for entry in catalog.iter().map(AsRef::as_ref) {
        for offer in offers_of(entry, &needle) {
            grouped.push(entry.category_label(), offer);
        }
    }
    grouped
}

/// Offered items matching `search` from entries labeled `category`.
#[must_use]
pub fn offers_in_category<'cat, E: AsRef<CatalogEntry>>(
    catalog: &'cat [E],
    category: &str,
    search: &str,
) -> Vec<OfferItem<'cat>> {
    let tag = category.trim();
    let needle = search.to_lowercase();
    catalog
        .iter()
        .map(AsRef::as_ref)
        .filter(|entry| entry.category_label() == tag)
        .flat_map(|entry| offers_of(entry, &needle))
        .collect()
}

/// Dispatches on the selector like [`super::browse`], over offers.
#[must_use]
pub fn browse_offers<'cat, E: AsRef<CatalogEntry>>(
    catalog: &'cat [E],
    selection: &CategorySelection,
    search: &str,
) -> Offers<'cat> {
    if let Some(tag) = selection.tag() {
        Offers::Filtered(offers_in_category(catalog, tag, search))
    } else if selection.is_all() {
        Offers::Grouped(offers_by_category(catalog, search))
    } else {
        Offers::NoCategory
    }
}
