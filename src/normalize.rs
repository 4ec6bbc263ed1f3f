//! Validation and normalization of persisted catalog records.
//!
//! Catalog documents come from places the storefront does not control:
//! the bundled static list and whatever the registration flow wrote to
//! storage in earlier sessions. This module turns loosely-typed JSON into
//! [`CatalogEntry`] values, so the aggregator never sees a missing menu
//! or a coordinate typed as a string.
//!
//! Rules applied to each record:
//!
//! - numbers may be JSON numbers or numeric strings; anything else is
//!   absent;
//! - an entry without an id or with a blank name is dropped;
//! - a blank category becomes [`DEFAULT_CATEGORY`];
//! - a missing or non-array `menu` is empty;
//! - a menu item without a name or a usable non-negative price is dropped,
//!   and one without an id gets its 1-based menu position;
//! - an offer price that is negative or not strictly below the price is
//!   discarded.
//!
//! None of these functions fail: unparsable documents yield an empty list.

use serde_json::Value;

use crate::models::{CatalogEntry, DEFAULT_CATEGORY, EntryId, MenuItem, MenuItemId};

/// Parses a JSON document holding an array of catalog records.
///
/// Returns an empty list when the document is not valid JSON or not an
/// array; malformed records inside an otherwise valid array are skipped.
#[must_use]
pub fn parse_catalog(json: &str) -> Vec<CatalogEntry> {
    match serde_json::from_str::<Value>(json) {
        Ok(value) => catalog_from_value(&value),
        Err(err) => {
            tracing::warn!(error = %err, "catalog document is not valid JSON, treating as empty");
            Vec::new()
        }
    }
}

/// Normalizes an already-parsed JSON array of catalog records.
#[must_use]
pub fn catalog_from_value(value: &Value) -> Vec<CatalogEntry> {
    let Some(records) = value.as_array() else {
        tracing::warn!("catalog document is not an array, treating as empty");
        return Vec::new();
    };
    let entries: Vec<CatalogEntry> = records.iter().filter_map(entry_from_value).collect();
    let dropped = records.len() - entries.len();
    if dropped > 0 {
        tracing::warn!(dropped, kept = entries.len(), "dropped malformed catalog records");
    }
    entries
}

/// Reads the id of a raw catalog record with the same coercion the
/// normalizer applies, so writers can match records they cannot parse.
#[must_use]
pub fn record_id(value: &Value) -> Option<EntryId> {
    coerce_id(value.get("id")).map(EntryId::new)
}

/// Normalizes a single catalog record, or returns `None` if it cannot be
/// salvaged.
#[must_use]
pub fn entry_from_value(value: &Value) -> Option<CatalogEntry> {
    let Some(id) = coerce_id(value.get("id")) else {
        tracing::debug!("catalog record has no usable id");
        return None;
    };
    let name = coerce_string(value.get("name"));
    if name.is_empty() {
        tracing::debug!(%id, "catalog record has no name");
        return None;
    }

    let category = coerce_string(value.get("category"));
    let menu = value
        .get("menu")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(position, item)| menu_item_from_value(item, position))
                .collect()
        })
        .unwrap_or_default();
    let location_name = Some(coerce_string(value.get("location"))).filter(|s| !s.is_empty());

    Some(CatalogEntry {
        id: EntryId::new(id),
        name,
        category: if category.is_empty() {
            DEFAULT_CATEGORY.to_owned()
        } else {
            category
        },
        cuisine: coerce_string(value.get("cuisine")),
        address: coerce_string(value.get("address")),
        image: coerce_string(value.get("image")),
        delivery_time: coerce_f64(value.get("deliveryTime")).unwrap_or_default(),
        price: coerce_f64(value.get("price")).unwrap_or_default(),
        location_name,
        lat: coerce_f64(value.get("lat")),
        long: coerce_f64(value.get("long")),
        menu,
    })
}

/// Normalizes one menu record found at `position` in its menu.
fn menu_item_from_value(value: &Value, position: usize) -> Option<MenuItem> {
    let name = coerce_string(value.get("name"));
    if name.is_empty() {
        return None;
    }
    let price = coerce_f64(value.get("price")).filter(|price| *price >= 0.0_f64)?;
    let offer_price = coerce_f64(value.get("offerPrice")).filter(|offer| {
        let usable = *offer >= 0.0_f64 && *offer < price;
        if !usable {
            tracing::warn!(item = %name, offer, price, "discarding offer price not below price");
        }
        usable
    });
    let id = coerce_id(value.get("id"))
        .or_else(|| i64::try_from(position).ok().map(|pos| pos + 1))?;
    let image = Some(coerce_string(value.get("image"))).filter(|s| !s.is_empty());

    Some(MenuItem {
        id: MenuItemId::new(id),
        name,
        price,
        offer_price,
        image,
    })
}

/// Reads a finite number from a JSON number or a numeric string.
#[allow(
    clippy::pattern_type_mismatch,
    reason = "JSON values are inspected by reference through match ergonomics"
)]
fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }?;
    number.is_finite().then_some(number)
}

/// Reads an integral id from a JSON number or a numeric string.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp,
    clippy::pattern_type_mismatch,
    reason = "float ids are only accepted when exactly integral and within i64 range"
)]
fn coerce_id(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| {
            let float = n.as_f64()?;
            let integral = float.is_finite()
                && float.fract() == 0.0_f64
                && (i64::MIN as f64..=i64::MAX as f64).contains(&float);
            integral.then_some(float as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reads a trimmed string; non-strings become empty.
fn coerce_string(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unparsable_document_is_empty() {
        assert!(parse_catalog("not json at all").is_empty());
        assert!(parse_catalog("").is_empty());
        assert!(parse_catalog(r#"{"id": 1}"#).is_empty());
        assert!(parse_catalog("null").is_empty());
    }

    #[test]
    fn record_id_matches_lenient_ids() {
        assert_eq!(record_id(&json!({"id": " 7 "})), Some(EntryId::new(7)));
        assert_eq!(record_id(&json!({"id": 7.0})), Some(EntryId::new(7)));
        assert_eq!(record_id(&json!({"id": 7, "name": ""})), Some(EntryId::new(7)));
        assert_eq!(record_id(&json!({"name": "no id"})), None);
        assert_eq!(record_id(&json!("scalar")), None);
    }

    #[test]
    fn well_formed_entry() {
        let entries = parse_catalog(
            r#"[{
                "id": 1,
                "name": "Pizza Hub",
                "category": "Restaurants",
                "cuisine": "Italian",
                "address": "MG Road",
                "image": "https://img/pizza.jpg",
                "deliveryTime": 30,
                "price": 200,
                "lat": 10,
                "long": 10,
                "menu": [{"id": 1, "name": "Margherita", "price": 200}]
            }]"#,
        );
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.id, EntryId::new(1));
        assert_eq!(entry.category, "Restaurants");
        assert_eq!(entry.lat, Some(10.0));
        assert_eq!(entry.menu.len(), 1);
        assert!(entry.coordinates().is_some());
    }

    #[test]
    fn string_numbers_are_coerced() {
        let entry = entry_from_value(&json!({
            "id": "1717000000000",
            "name": "Fresh Mart",
            "category": "Groceries",
            "deliveryTime": "25",
            "price": " 99.5 ",
            "lat": "19.076",
            "long": "72.8777",
            "menu": [{"id": "5", "name": "Milk", "price": "60", "offerPrice": "55"}]
        }))
        .unwrap();
        assert_eq!(entry.id, EntryId::new(1_717_000_000_000));
        assert!((entry.delivery_time - 25.0).abs() < f64::EPSILON);
        assert!((entry.price - 99.5).abs() < f64::EPSILON);
        assert_eq!(entry.lat, Some(19.076));
        assert_eq!(entry.menu[0].id, MenuItemId::new(5));
        assert_eq!(entry.menu[0].offer_price, Some(55.0));
    }

    #[test]
    fn missing_menu_and_category_defaults() {
        let entry = entry_from_value(&json!({"id": 2, "name": "Corner Shop"})).unwrap();
        assert!(entry.menu.is_empty());
        assert_eq!(entry.category, DEFAULT_CATEGORY);
        assert!(entry.lat.is_none());
        assert!(entry.coordinates().is_none());

        let raw = json!({"id": 3, "name": "X", "category": "  ", "menu": "nope"});
        let entry = entry_from_value(&raw).unwrap();
        assert_eq!(entry.category, DEFAULT_CATEGORY);
        assert!(entry.menu.is_empty());
    }

    #[test]
    fn garbage_coordinates_become_absent() {
        let entry = entry_from_value(&json!({
            "id": 4, "name": "Nowhere", "lat": "", "long": "abc"
        }))
        .unwrap();
        assert!(entry.lat.is_none());
        assert!(entry.long.is_none());

        let entry = entry_from_value(&json!({"id": 5, "name": "Half", "lat": 12.0, "long": null}))
            .unwrap();
        assert_eq!(entry.lat, Some(12.0));
        assert!(entry.coordinates().is_none());
    }

    #[test]
    fn records_without_id_or_name_are_dropped() {
        let entries = parse_catalog(
            r#"[
                {"name": "No Id"},
                {"id": 7, "name": "   "},
                {"id": 8.5, "name": "Fractional"},
                {"id": 9, "name": "Keeper"},
                42,
                "text"
            ]"#,
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Keeper");
    }

    #[test]
    fn float_ids_that_are_integral_are_kept() {
        let entry = entry_from_value(&json!({"id": 1.7e12, "name": "Big Id"})).unwrap();
        assert_eq!(entry.id, EntryId::new(1_700_000_000_000));
    }

    #[test]
    fn bad_menu_items_are_dropped() {
        let entry = entry_from_value(&json!({
            "id": 1,
            "name": "Menu Test",
            "menu": [
                {"id": 1, "name": "", "price": 10},
                {"id": 2, "name": "No Price"},
                {"id": 3, "name": "Negative", "price": -5},
                {"id": 4, "name": "Good", "price": 10},
                null
            ]
        }))
        .unwrap();
        assert_eq!(entry.menu.len(), 1);
        assert_eq!(entry.menu[0].name, "Good");
    }

    #[test]
    fn offer_not_below_price_is_discarded() {
        let entry = entry_from_value(&json!({
            "id": 1,
            "name": "Offers",
            "menu": [
                {"id": 1, "name": "Equal", "price": 10, "offerPrice": 10},
                {"id": 2, "name": "Higher", "price": 10, "offerPrice": 12},
                {"id": 3, "name": "Blank", "price": 10, "offerPrice": ""},
                {"id": 4, "name": "Null", "price": 10, "offerPrice": null},
                {"id": 5, "name": "Real", "price": 10, "offerPrice": 7}
            ]
        }))
        .unwrap();
        let offers: Vec<Option<f64>> = entry.menu.iter().map(|item| item.offer_price).collect();
        assert_eq!(offers, vec![None, None, None, None, Some(7.0)]);
    }

    #[test]
    fn menu_items_without_id_use_position() {
        let entry = entry_from_value(&json!({
            "id": 1,
            "name": "Positions",
            "menu": [
                {"name": "First", "price": 1},
                {"name": "Second", "price": 2}
            ]
        }))
        .unwrap();
        assert_eq!(entry.menu[0].id, MenuItemId::new(1));
        assert_eq!(entry.menu[1].id, MenuItemId::new(2));
    }

    #[test]
    fn storage_order_is_preserved() {
        let entries = parse_catalog(
            r#"[{"id": 3, "name": "C"}, {"id": 1, "name": "A"}, {"id": 2, "name": "B"}]"#,
        );
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }
}
