//! Category selector state.

/// Selector sentinel meaning "every category, grouped".
pub const ALL_CATEGORIES: &str = "All";

/// The category chosen in the storefront's selector.
///
/// `None` and `All` are sentinels, not data values: no entry is ever
/// tagged with them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategorySelection {
    /// Nothing selected; the storefront shows a prompt instead of results.
    #[default]
    None,
    /// All categories, grouped by label.
    All,
    /// A concrete category tag.
    Tag(String),
}

impl CategorySelection {
    /// Parses selector text: blank is [`Self::None`], `All` is
    /// [`Self::All`], anything else is a trimmed tag.
    #[inline]
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" => Self::None,
            ALL_CATEGORIES => Self::All,
            tag => Self::Tag(tag.to_owned()),
        }
    }

    /// Selector text for this selection.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.tag().unwrap_or(if self.is_all() { ALL_CATEGORIES } else { "" })
    }

    /// The concrete tag, or `None` for either sentinel.
    #[allow(
        clippy::pattern_type_mismatch,
        reason = "binding the tag by reference needs either a ref pattern or match ergonomics"
    )]
    #[inline]
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Tag(tag) => Some(tag),
            Self::None | Self::All => None,
        }
    }

    /// Returns `true` for the "all categories" sentinel.
    #[inline]
    #[must_use]
    pub fn is_all(&self) -> bool {
        *self == Self::All
    }
}

impl core::str::FromStr for CategorySelection {
    type Err = core::convert::Infallible;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl core::fmt::Display for CategorySelection {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
