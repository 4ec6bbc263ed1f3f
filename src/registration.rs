//! Restaurant self-registration drafts.
//!
//! A [`RestaurantRegistration`] is what the registration form submits. It
//! is deliberately loose (numbers are optional, strings may be blank) and
//! only becomes a [`CatalogEntry`] once [`RestaurantRegistration::into_entry`]
//! has validated it.

use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;
use crate::models::{CatalogEntry, EntryId, Location, MenuItem, MenuItemId};

/// One menu row of a registration draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuItemDraft {
    /// Item name.
    pub name: String,
    /// Regular price.
    pub price: Option<f64>,
    /// Optional discounted price.
    pub offer_price: Option<f64>,
    /// Optional picture URL.
    pub image: Option<String>,
}

/// A restaurant registration or edit, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestaurantRegistration {
    /// Display name.
    pub name: String,
    /// Category tag, e.g. `Restaurants`.
    pub category: String,
    /// Cuisine description.
    pub cuisine: String,
    /// Street address.
    pub address: String,
    /// Picture URL.
    pub image: String,
    /// Typical delivery time in minutes.
    pub delivery_time: Option<f64>,
    /// Starting price.
    pub price: Option<f64>,
    /// Free-text place name.
    pub location: Option<String>,
    /// Latitude in degrees.
    pub lat: Option<f64>,
    /// Longitude in degrees.
    pub long: Option<f64>,
    /// Menu rows in display order.
    pub menu: Vec<MenuItemDraft>,
}

impl RestaurantRegistration {
    /// Checks the draft without consuming it.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, checking the name, category,
    /// coordinates and then each menu row in order.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.name.trim().is_empty() {
            return Err(RegistrationError::MissingName);
        }
        if self.category.trim().is_empty() {
            return Err(RegistrationError::MissingCategory);
        }
        if self.coordinates().is_none() {
            return Err(RegistrationError::MissingCoordinates);
        }
        if self.menu.is_empty() {
            return Err(RegistrationError::EmptyMenu);
        }
        for (position, item) in self.menu.iter().enumerate() {
            item.validate(position)?;
        }
        Ok(())
    }

    /// Validated coordinates, if both are present and in range.
    #[inline]
    #[must_use]
    pub fn coordinates(&self) -> Option<Location> {
        Location::new(self.lat?, self.long?)
    }

    /// Validates the draft and builds the entry it describes.
    ///
    /// Menu items get consecutive ids starting at `id`, so a freshly
    /// registered entry's first item shares its number. When that range
    /// would run past `i64::MAX` the items are numbered from 1 instead.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] if [`Self::validate`] rejects the draft.
    pub fn into_entry(self, id: EntryId) -> Result<CatalogEntry, RegistrationError> {
        self.validate()?;
        let (Some(lat), Some(long)) = (self.lat, self.long) else {
            return Err(RegistrationError::MissingCoordinates);
        };
        let count = i64::try_from(self.menu.len()).unwrap_or(i64::MAX);
        let first_item = if id.get().checked_add(count).is_some() {
            id.get()
        } else {
            1
        };
        let menu = self
            .menu
            .into_iter()
            .zip(first_item..)
            .map(|(draft, item_id)| draft.into_item(MenuItemId::new(item_id)))
            .collect();

        Ok(CatalogEntry {
            id,
            name: self.name.trim().to_owned(),
            category: self.category.trim().to_owned(),
            cuisine: self.cuisine.trim().to_owned(),
            address: self.address.trim().to_owned(),
            image: self.image.trim().to_owned(),
            delivery_time: self.delivery_time.filter(|t| t.is_finite()).unwrap_or_default(),
            price: self.price.filter(|p| p.is_finite()).unwrap_or_default(),
            location_name: self
                .location
                .map(|name| name.trim().to_owned())
                .filter(|name| !name.is_empty()),
            lat: Some(lat),
            long: Some(long),
            menu,
        })
    }
}

impl From<&CatalogEntry> for RestaurantRegistration {
    /// Prefills an edit form from an existing entry.
    #[inline]
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            name: entry.name.clone(),
            category: entry.category.clone(),
            cuisine: entry.cuisine.clone(),
            address: entry.address.clone(),
            image: entry.image.clone(),
            delivery_time: Some(entry.delivery_time),
            price: Some(entry.price),
            location: entry.location_name.clone(),
            lat: entry.lat,
            long: entry.long,
            menu: entry.menu.iter().map(MenuItemDraft::from).collect(),
        }
    }
}

impl MenuItemDraft {
    /// Checks one menu row found at `position` (0-based).
    ///
    /// # Errors
    ///
    /// Rejects a blank name, a missing or negative price, and an offer
    /// price that is negative or not strictly below the price.
    pub fn validate(&self, position: usize) -> Result<(), RegistrationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RegistrationError::MenuItemName(position.saturating_add(1)));
        }
        let Some(price) = self.price.filter(|p| p.is_finite() && *p >= 0.0_f64) else {
            return Err(RegistrationError::MenuItemPrice(name.to_owned()));
        };
        if let Some(offer) = self.offer_price
            && !(offer.is_finite() && offer >= 0.0_f64 && offer < price)
        {
            return Err(RegistrationError::OfferPrice(name.to_owned()));
        }
        Ok(())
    }

    /// Builds the menu item; assumes the row has been validated.
    fn into_item(self, id: MenuItemId) -> MenuItem {
        MenuItem {
            id,
            name: self.name.trim().to_owned(),
            price: self.price.unwrap_or_default(),
            offer_price: self.offer_price,
            image: self
                .image
                .map(|image| image.trim().to_owned())
                .filter(|image| !image.is_empty()),
        }
    }
}

impl From<&MenuItem> for MenuItemDraft {
    #[inline]
    fn from(item: &MenuItem) -> Self {
        Self {
            name: item.name.clone(),
            price: Some(item.price),
            offer_price: item.offer_price,
            image: item.image.clone(),
        }
    }
}
