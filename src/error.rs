//! Error types for the storefront library.

use crate::models::{EntryId, MenuItemId};

/// All errors that can occur when using the storefront.
///
/// The catalog aggregation functions never fail; errors only come from
/// the repository, from id lookups on behalf of a caller, and from
/// registration drafts that do not pass validation.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Repository backend failed.
    #[error("storage error: {0}")]
    Storage(Box<dyn core::error::Error + Send + Sync>),

    /// No catalog entry carries the requested id.
    #[error("catalog entry not found: {0}")]
    EntryNotFound(EntryId),

    /// The entry exists but has no menu item with the requested id.
    #[error("menu item {item} not found in catalog entry {entry}")]
    MenuItemNotFound {
        /// Owning catalog entry.
        entry: EntryId,
        /// Requested menu item.
        item: MenuItemId,
    },

    /// A registration draft was rejected.
    #[error("invalid registration: {0}")]
    Registration(#[from] RegistrationError),
}

/// Reasons a restaurant registration draft is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// The restaurant name is blank.
    #[error("restaurant name is required")]
    MissingName,

    /// No category was selected.
    #[error("please select a category")]
    MissingCategory,

    /// The menu has no items.
    #[error("please add at least one menu item")]
    EmptyMenu,

    /// Latitude or longitude is missing or not a valid coordinate.
    #[error("latitude and longitude are required for location tracking")]
    MissingCoordinates,

    /// A menu item has a blank name.
    #[error("menu item #{0} has no name")]
    MenuItemName(usize),

    /// A menu item has a missing, negative or non-finite price.
    #[error("menu item `{0}` needs a non-negative price")]
    MenuItemPrice(String),

    /// A menu item's offer price is not below its regular price.
    #[error("offer price of menu item `{0}` must be below its price")]
    OfferPrice(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, StorefrontError>;
