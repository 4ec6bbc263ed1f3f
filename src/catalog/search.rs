//! Category grouping, category filtering and free-text search.

use std::collections::HashMap;

use crate::models::{CatalogEntry, CategorySelection, LocatedEntry};

/// Items sharing one category label.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<T> {
    /// Trimmed category, or `Other` when blank.
    pub label: String,
    /// Items in catalog order.
    pub items: Vec<T>,
}

/// Category groups in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouped<T> {
    /// Groups in the order their label first appeared.
    groups: Vec<CategoryGroup<T>>,
    /// Position of each label in `groups`.
    index: HashMap<String, usize>,
}

impl<T> Default for Grouped<T> {
    #[inline]
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Grouped<T> {
    /// Creates an empty grouping.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item` to the group for `label`, opening the group if this
    /// is the first time the label is seen.
    #[inline]
    pub fn push(&mut self, label: &str, item: T) {
        if let Some(group) = self
            .index
            .get(label)
            .copied()
            .and_then(|pos| self.groups.get_mut(pos))
        {
            group.items.push(item);
            return;
        }
        let _previous = self.index.insert(label.to_owned(), self.groups.len());
        self.groups.push(CategoryGroup {
            label: label.to_owned(),
            items: vec![item],
        });
    }

    /// Items under `label`, if that group exists.
    #[inline]
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&[T]> {
        let pos = *self.index.get(label)?;
        self.groups.get(pos).map(|group| group.items.as_slice())
    }

    /// Labels in first-seen order.
    #[inline]
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.label.as_str())
    }

    /// Iterates over the groups in first-seen order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, CategoryGroup<T>> {
        self.groups.iter()
    }

    /// Number of groups.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` when nothing matched; callers render a
    /// "no results" state.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of items across all groups.
    #[inline]
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }
}

impl<T> IntoIterator for Grouped<T> {
    type Item = CategoryGroup<T>;
    type IntoIter = <Vec<CategoryGroup<T>> as IntoIterator>::IntoIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'grp, T> IntoIterator for &'grp Grouped<T> {
    type Item = &'grp CategoryGroup<T>;
    type IntoIter = core::slice::Iter<'grp, CategoryGroup<T>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Result of browsing the catalog with a category selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Browse<'cat> {
    /// No category selected; nothing to show.
    NoCategory,
    /// "All categories": matching entries grouped by label.
    Grouped(Grouped<&'cat LocatedEntry>),
    /// A concrete category: matching entries in catalog order.
    Filtered(Vec<&'cat LocatedEntry>),
}

impl Browse<'_> {
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
            Self::Filtered(entries) => entries.is_empty(),
        }
    }
}

/// Returns `true` if the entry name or any menu item name contains
/// `needle_lower`.
///
/// An empty needle matches everything.
#[inline]
#[must_use]
pub fn matches_search(entry: &CatalogEntry, needle_lower: &str) -> bool {
    entry.name_contains(needle_lower) || entry.menu_contains(needle_lower)
}

/// Groups matching entries by category label for the "all categories"
/// view.
///
/// With an empty `search`, far entries are left out entirely; they only
/// surface while the user is searching. Otherwise an entry is kept when
/// its name or one of its menu items contains `search`
/// (case-insensitive).
#[must_use]
pub fn group_by_category<'cat>(
    catalog: &'cat [LocatedEntry],
    search: &str,
) -> Grouped<&'cat LocatedEntry> {
    let needle = search.to_lowercase();
    let mut grouped = Grouped::new();
    for entry in catalog {
        if search.is_empty() && entry.is_far {
            continue;
        }
        if matches_search(entry, &needle) {
            grouped.push(entry.category_label(), entry);
        }
    }
    grouped
}

/// Entries of one category matching `search`, in catalog order.
///
/// While searching, far entries are included; search overrides locality.
/// With an empty `search`, only entries that are not far are returned.
#[must_use]
pub fn filter_by_category<'cat>(
    catalog: &'cat [LocatedEntry],
    category: &str,
    search: &str,
) -> Vec<&'cat LocatedEntry> {
    let tag = category.trim();
    let needle = search.to_lowercase();
    catalog
        .iter()
        .filter(|entry| entry.category_label() == tag)
        .filter(|entry| matches_search(entry, &needle) && (!search.is_empty() || !entry.is_far))
        .collect()
}

/// Dispatches on the selector: nothing for [`CategorySelection::None`],
/// the grouped view for [`CategorySelection::All`], the filtered view for
/// a tag.
#[must_use]
pub fn browse<'cat>(
    catalog: &'cat [LocatedEntry],
    selection: &CategorySelection,
    search: &str,
) -> Browse<'cat> {
    if let Some(tag) = selection.tag() {
        Browse::Filtered(filter_by_category(catalog, tag, search))
    } else if selection.is_all() {
        Browse::Grouped(group_by_category(catalog, search))
    } else {
        Browse::NoCategory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::annotate_distance;
    use crate::catalog::test_support::{entry_at, with_menu};
    use crate::models::Location;

    fn pizza_hub() -> CatalogEntry {
        with_menu(
            entry_at(1, "Pizza Hub", "Restaurants", Some((10.0, 10.0))),
            &["Margherita"],
        )
    }

    fn names(entries: &[&LocatedEntry]) -> Vec<String> {
        entries.iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn nearby_entry_shows_in_its_category() {
        let catalog = [pizza_hub()];
        let located = annotate_distance(&catalog, Location::new(10.0, 10.0), 5.0);
        assert!(!located[0].is_far);
        let found = filter_by_category(&located, "Restaurants", "");
        assert_eq!(names(&found), ["Pizza Hub"]);
    }

    #[test]
    fn search_overrides_locality_in_category_view() {
        let catalog = [pizza_hub()];
        let located = annotate_distance(&catalog, None, 5.0);
        assert!(located[0].is_far);
        assert!(filter_by_category(&located, "Restaurants", "").is_empty());
        let found = filter_by_category(&located, "Restaurants", "pizza");
        assert_eq!(names(&found), ["Pizza Hub"]);
    }

    #[test]
    fn menu_item_names_are_searched() {
        let catalog = [pizza_hub()];
        let located = annotate_distance(&catalog, None, 5.0);
        let found = filter_by_category(&located, "Restaurants", "MARGH");
        assert_eq!(found.len(), 1);
        assert!(filter_by_category(&located, "Restaurants", "sushi").is_empty());
    }

    #[test]
    fn blank_category_groups_under_other() {
        let catalog = [
            entry_at(1, "Fresh Basket", "Groceries", Some((10.0, 10.0))),
            entry_at(2, "Mystery Shop", "", Some((10.0, 10.0))),
        ];
        let located = annotate_distance(&catalog, Location::new(10.0, 10.0), 5.0);
        let grouped = group_by_category(&located, "");
        assert_eq!(grouped.labels().collect::<Vec<_>>(), ["Groceries", "Other"]);
        assert_eq!(grouped.get("Groceries").unwrap().len(), 1);
        assert_eq!(grouped.get("Other").unwrap().len(), 1);
    }

    #[test]
    fn grouped_view_hides_far_entries_without_search() {
        let catalog = [
            entry_at(1, "Near", "Restaurants", Some((10.0, 10.0))),
            entry_at(2, "Far", "Restaurants", Some((30.0, 30.0))),
            entry_at(3, "Unknown", "Groceries", None),
        ];
        let located = annotate_distance(&catalog, Location::new(10.0, 10.0), 5.0);
        let grouped = group_by_category(&located, "");
        for group in &grouped {
            assert!(group.items.iter().all(|e| !e.is_far));
        }
        assert_eq!(grouped.item_count(), 1);
        assert!(grouped.get("Groceries").is_none());
    }

    #[test]
    fn grouped_view_shows_far_entries_when_searching() {
        let catalog = [
            entry_at(1, "Near Cafe", "Restaurants", Some((10.0, 10.0))),
            entry_at(2, "Far Cafe", "Restaurants", Some((30.0, 30.0))),
            entry_at(3, "Far Market", "Groceries", None),
        ];
        let located = annotate_distance(&catalog, Location::new(10.0, 10.0), 5.0);
        let grouped = group_by_category(&located, "cafe");
        let cafes = grouped.get("Restaurants").unwrap();
        assert_eq!(cafes.len(), 2);
        assert!(cafes[1].is_far);
        assert!(grouped.get("Groceries").is_none());
    }

    #[test]
    fn group_order_is_first_seen_and_stable() {
        let catalog = [
            entry_at(1, "A", "Groceries", None),
            entry_at(2, "B", " Restaurants ", None),
            entry_at(3, "C", "Groceries", None),
            entry_at(4, "D", "Electronics", None),
            entry_at(5, "E", "Restaurants", None),
        ];
        let located = annotate_distance(&catalog, None, 5.0);
        // Everything is far, so only a search surfaces them.
        let grouped = group_by_category(&located, "");
        assert!(grouped.is_empty());

        let everything: Vec<LocatedEntry> = located
            .into_iter()
            .map(|mut e| {
                e.is_far = false;
                e
            })
            .collect();
        let grouped = group_by_category(&everything, "");
        assert_eq!(
            grouped.labels().collect::<Vec<_>>(),
            ["Groceries", "Restaurants", "Electronics"]
        );
        let restaurants = grouped.get("Restaurants").unwrap();
        assert_eq!(restaurants[0].name, "B");
        assert_eq!(restaurants[1].name, "E");
        let groceries = grouped.get("Groceries").unwrap();
        assert_eq!(groceries[0].name, "A");
        assert_eq!(groceries[1].name, "C");
    }

    #[test]
    fn empty_grouping_when_nothing_matches() {
        let catalog = [pizza_hub()];
        let located = annotate_distance(&catalog, Location::new(10.0, 10.0), 5.0);
        assert!(group_by_category(&located, "nothing like this").is_empty());
    }

    #[test]
    fn filter_compares_normalized_category() {
        let catalog = [
            entry_at(1, "Spaced", "  Dairy Products ", Some((10.0, 10.0))),
            entry_at(2, "Blank", "", Some((10.0, 10.0))),
        ];
        let located = annotate_distance(&catalog, Location::new(10.0, 10.0), 5.0);
        assert_eq!(filter_by_category(&located, "Dairy Products", "").len(), 1);
        assert_eq!(filter_by_category(&located, "Other", "").len(), 1);
        assert!(filter_by_category(&located, "dairy products", "").is_empty());
    }

    #[test]
    fn recomputation_is_idempotent() {
        let catalog = [
            pizza_hub(),
            entry_at(2, "Fresh Basket", "Groceries", Some((10.01, 10.01))),
            entry_at(3, "Far Away", "Groceries", Some((40.0, 40.0))),
        ];
        let located = annotate_distance(&catalog, Location::new(10.0, 10.0), 5.0);
        for search in ["", "a", "basket"] {
            assert_eq!(group_by_category(&located, search), group_by_category(&located, search));
            assert_eq!(
                filter_by_category(&located, "Groceries", search),
                filter_by_category(&located, "Groceries", search)
            );
        }
    }

    #[test]
    fn browse_dispatches_on_selection() {
        let catalog = [pizza_hub()];
        let located = annotate_distance(&catalog, Location::new(10.0, 10.0), 5.0);

        let none = browse(&located, &CategorySelection::None, "");
        assert_eq!(none, Browse::NoCategory);
        assert!(none.is_empty());

        let Browse::Grouped(grouped) = browse(&located, &CategorySelection::All, "") else {
            panic!("expected grouped view");
        };
        assert_eq!(grouped.len(), 1);

        let tag = CategorySelection::Tag("Restaurants".to_owned());
        let Browse::Filtered(entries) = browse(&located, &tag, "") else {
            panic!("expected filtered view");
        };
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn grouped_push_and_lookup() {
        let mut grouped: Grouped<u32> = Grouped::new();
        grouped.push("b", 1);
        grouped.push("a", 2);
        grouped.push("b", 3);
        assert_eq!(grouped.get("b"), Some(&[1, 3][..]));
        assert_eq!(grouped.get("a"), Some(&[2][..]));
        assert!(grouped.get("c").is_none());
        let labels: Vec<String> = grouped.into_iter().map(|g| g.label).collect();
        assert_eq!(labels, ["b", "a"]);
    }
}
