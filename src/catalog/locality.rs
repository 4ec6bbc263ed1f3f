//! Distance annotation of catalog entries.

use crate::models::{CatalogEntry, LocatedEntry, Location};

/// Default radius, in kilometers, beyond which an entry counts as far.
pub const DEFAULT_THRESHOLD_KM: f64 = 5.0_f64;

/// Returns `true` if `entry` is farther than `threshold_km` from
/// `location`, or if the distance cannot be computed.
///
/// Distance is unknown when there is no current location, or when the
/// entry lacks either coordinate (or holds a non-finite one). A NaN or
/// negative threshold is treated as zero.
#[inline]
#[must_use]
pub fn is_far(entry: &CatalogEntry, location: Option<Location>, threshold_km: f64) -> bool {
    let (Some(here), Some(there)) = (location.filter(Location::is_valid), entry.coordinates())
    else {
        return true;
    };
    here.distance_km(&there) > effective_threshold(threshold_km)
}

/// Annotates every entry with its `is_far` flag.
///
/// The input is left untouched; each output entry is a copy. Ordering is
/// preserved.
#[must_use]
pub fn annotate_distance(
    catalog: &[CatalogEntry],
    location: Option<Location>,
    threshold_km: f64,
) -> Vec<LocatedEntry> {
    catalog
        .iter()
        .map(|entry| LocatedEntry {
            is_far: is_far(entry, location, threshold_km),
            entry: entry.clone(),
        })
        .collect()
}

/// Clamps a caller-supplied threshold to a usable value.
fn effective_threshold(threshold_km: f64) -> f64 {
    if threshold_km.is_nan() || threshold_km < 0.0_f64 {
        0.0_f64
    } else {
        threshold_km
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::entry_at;

    fn here(lat: f64, lon: f64) -> Option<Location> {
        Location::new(lat, lon)
    }

    #[test]
    fn origin_is_near_itself_for_any_positive_threshold() {
        let catalog = [entry_at(1, "Null Island Diner", "Restaurants", Some((0.0, 0.0)))];
        for threshold in [0.001, 1.0, 5.0, 10_000.0] {
            let located = annotate_distance(&catalog, here(0.0, 0.0), threshold);
            assert!(!located[0].is_far, "threshold {threshold}");
        }
    }

    #[test]
    fn absent_location_marks_everything_far() {
        let catalog = [
            entry_at(1, "A", "Restaurants", Some((10.0, 10.0))),
            entry_at(2, "B", "Groceries", Some((0.0, 0.0))),
            entry_at(3, "C", "Groceries", None),
        ];
        let located = annotate_distance(&catalog, None, 1_000_000.0);
        assert!(located.iter().all(|e| e.is_far));
    }

    #[test]
    fn entry_without_coordinates_is_far() {
        let catalog = [entry_at(1, "Nowhere", "Restaurants", None)];
        let located = annotate_distance(&catalog, here(10.0, 10.0), 1_000_000.0);
        assert!(located[0].is_far);
    }

    #[test]
    fn entry_with_one_coordinate_is_far() {
        let mut half = entry_at(1, "Half", "Restaurants", Some((10.0, 10.0)));
        half.long = None;
        assert!(is_far(&half, here(10.0, 10.0), 5.0));
        half.long = Some(f64::NAN);
        assert!(is_far(&half, here(10.0, 10.0), 5.0));
    }

    #[test]
    fn threshold_is_exclusive() {
        // 1 degree of latitude is ~111.19 km.
        let shop = entry_at(1, "Shop", "Groceries", Some((11.0, 10.0)));
        let origin = here(10.0, 10.0);
        assert!(!is_far(&shop, origin, 112.0));
        assert!(is_far(&shop, origin, 111.0));
    }

    #[test]
    fn default_threshold_separates_neighbourhood_from_city() {
        let bandra = entry_at(1, "Bandra", "Restaurants", Some((19.0596, 72.8295)));
        let andheri = entry_at(2, "Andheri", "Restaurants", Some((19.1136, 72.8697)));
        let located = annotate_distance(
            &[bandra, andheri],
            here(19.0600, 72.8300),
            DEFAULT_THRESHOLD_KM,
        );
        assert!(!located[0].is_far);
        assert!(located[1].is_far);
    }

    #[test]
    fn invalid_location_counts_as_absent() {
        let shop = entry_at(1, "Shop", "Groceries", Some((10.0, 10.0)));
        let garbage = Some(Location {
            lat: f64::NAN,
            lon: 10.0,
        });
        assert!(is_far(&shop, garbage, 5.0));
    }

    #[test]
    fn bad_thresholds_collapse_to_zero() {
        let shop = entry_at(1, "Shop", "Groceries", Some((10.0, 10.0)));
        assert!(!is_far(&shop, here(10.0, 10.0), -3.0));
        assert!(!is_far(&shop, here(10.0, 10.0), f64::NAN));
        assert!(is_far(&shop, here(10.001, 10.0), f64::NAN));
    }

    #[test]
    fn annotation_copies_and_preserves_order() {
        let catalog = vec![
            entry_at(3, "C", "Restaurants", Some((10.0, 10.0))),
            entry_at(1, "A", "Restaurants", None),
        ];
        let snapshot = catalog.clone();
        let located = annotate_distance(&catalog, here(10.0, 10.0), 5.0);
        assert_eq!(catalog, snapshot);
        let names: Vec<&str> = located.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["C", "A"]);
        assert_eq!(located[0].entry, catalog[0]);
    }

    #[test]
    fn recomputed_for_each_location() {
        let catalog = [entry_at(1, "Shop", "Groceries", Some((10.0, 10.0)))];
        let near = annotate_distance(&catalog, here(10.0, 10.0), 5.0);
        let far = annotate_distance(&catalog, here(20.0, 20.0), 5.0);
        assert!(!near[0].is_far);
        assert!(far[0].is_far);
    }
}
