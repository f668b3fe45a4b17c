//! Canonical business categories.
//!
//! Callers supply free-form category strings ("Coffee Shop", "petrol").
//! [`normalise_category`] folds them into a [`CategoryKey`] that every
//! downstream lookup (competitor clause, complementary profile) shares.
//!
//! # Examples
//! ```
//! use sitewise_core::normalise_category;
//!
//! assert_eq!(normalise_category("  Coffee Shop ").as_str(), "cafe");
//! assert_eq!(normalise_category("Petrol").as_str(), "fuel");
//! assert_eq!(normalise_category("Bakery").as_str(), "bakery");
//! ```

/// Key used when a category is blank or has no profile of its own.
pub const GENERIC_CATEGORY: &str = "generic";

/// Synonym table mapping cleaned input to canonical keys.
///
/// Every canonical key on the right-hand side must map to itself (or be
/// absent from the left-hand side) so normalisation stays idempotent.
const SYNONYMS: &[(&str, &str)] = &[
    ("coffee", "cafe"),
    ("coffee shop", "cafe"),
    ("coffeehouse", "cafe"),
    ("café", "cafe"),
    ("cafe", "cafe"),
    ("gas", "fuel"),
    ("gas station", "fuel"),
    ("petrol", "fuel"),
    ("petrol station", "fuel"),
    ("fuel", "fuel"),
    ("restaurants", "restaurant"),
    ("diner", "restaurant"),
    ("eatery", "restaurant"),
    ("clothing", "clothing_store"),
    ("clothes", "clothing_store"),
    ("clothing store", "clothing_store"),
    ("apparel", "clothing_store"),
    ("fitness", "gym"),
    ("fitness centre", "gym"),
    ("fitness center", "gym"),
    ("medical centre", "hospital"),
    ("medical center", "hospital"),
];

/// A normalised, lower-case business category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CategoryKey(String);

impl CategoryKey {
    /// The fallback category.
    pub fn generic() -> Self {
        Self(GENERIC_CATEGORY.to_owned())
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Report whether this is the fallback category.
    pub fn is_generic(&self) -> bool {
        self.0 == GENERIC_CATEGORY
    }
}

impl AsRef<str> for CategoryKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fold a free-form category into its canonical key.
///
/// Trims, collapses internal whitespace and lower-cases the input before
/// consulting the synonym table. Unmapped input passes through as its own
/// key; blank input becomes [`GENERIC_CATEGORY`]. The function is total and
/// idempotent.
pub fn normalise_category(raw: &str) -> CategoryKey {
    let cleaned = raw
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    if cleaned.is_empty() {
        return CategoryKey::generic();
    }
    let canonical = SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == cleaned)
        .map_or(cleaned, |(_, canonical)| (*canonical).to_owned());
    CategoryKey(canonical)
}
