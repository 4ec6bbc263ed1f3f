//! Current-location sources.
//!
//! [`LocationSignal`] is the observable cell the storefront publishes the
//! current location on. Anything that renders locality-dependent views
//! subscribes to it and re-annotates the catalog whenever it changes,
//! instead of polling storage.

use tokio::sync::watch;

use crate::models::Location;

/// Something that knows where the user is, if anywhere.
pub trait LocationProvider {
    /// Returns the current location, or `None` when it is unknown.
    ///
    /// Providers that fail (permission denied, geocoding error) report
    /// `None`; the aggregator treats that as "everything is far".
    fn current_location(&self) -> Option<Location>;
}

/// A provider that always reports the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedLocation(pub Option<Location>);

impl LocationProvider for FixedLocation {
    #[inline]
    fn current_location(&self) -> Option<Location> {
        self.0
    }
}

/// Observable current location backed by a [`watch`] channel.
///
/// Cloning a signal yields another handle to the same cell.
#[derive(Debug, Clone)]
pub struct LocationSignal {
    /// Publishing half; receivers are created on demand.
    sender: watch::Sender<Option<Location>>,
}

impl Default for LocationSignal {
    #[inline]
    fn default() -> Self {
        Self::new(None)
    }
}

impl LocationSignal {
    /// Creates a signal holding `initial`.
    ///
    /// An invalid location is stored as `None`.
    #[inline]
    #[must_use]
    pub fn new(initial: Option<Location>) -> Self {
        let (sender, _receiver) = watch::channel(initial.filter(Location::is_valid));
        Self { sender }
    }

    /// Publishes a new location, returning the previous one.
    ///
    /// Subscribers are notified even when the value did not change; an
    /// invalid location is published as `None`.
    #[inline]
    pub fn set(&self, location: Option<Location>) -> Option<Location> {
        let published = location.filter(Location::is_valid);
        tracing::debug!(location = ?published, "publishing location");
        self.sender.send_replace(published)
    }

    /// Publishes "location unknown", returning the previous value.
    #[inline]
    pub fn clear(&self) -> Option<Location> {
        self.set(None)
    }

    /// Latest published value.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<Location> {
        *self.sender.borrow()
    }

    /// Subscribes to changes.
    ///
    /// The receiver starts out with the current value marked as seen;
    /// `changed().await` resolves on the next publish.
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Location>> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[inline]
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl LocationProvider for LocationSignal {
    #[inline]
    fn current_location(&self) -> Option<Location> {
        self.current()
    }
}
