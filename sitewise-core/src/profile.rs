//! Per-category tag profiles.
//!
//! A [`CategoryProfile`] pairs the clause that identifies competitors of a
//! category with the ordered [`TagProfile`] of complementary features that
//! tend to attract its customers. [`CategoryProfiles`] is the read-only
//! lookup table shared by every request.

use std::collections::BTreeMap;

use crate::category::{CategoryKey, GENERIC_CATEGORY};

static EMPTY_PROFILE: TagProfile = TagProfile {
    clauses: Vec::new(),
};

/// Ordered tag clauses describing complementary features.
///
/// Clauses take any form accepted by [`crate::query::build_clauses`]:
/// `node["amenity"="school"]`, `["shop"]`, `shop` or `shop=mall`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagProfile {
    clauses: Vec<String>,
}

impl TagProfile {
    /// Build a profile from clauses, preserving order.
    pub fn new<I, S>(clauses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            clauses: clauses.into_iter().map(Into::into).collect(),
        }
    }

    /// The clauses in declaration order.
    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    /// Report whether the profile contributes no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.iter().all(|clause| clause.trim().is_empty())
    }
}

/// Competitor and complementary definitions for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryProfile {
    /// Clause matching competing businesses, if it differs from the
    /// `amenity=<category>` default.
    pub competitor: Option<String>,
    /// Complementary feature clauses.
    pub complementary: TagProfile,
}

impl CategoryProfile {
    /// A profile that only lists complementary clauses.
    pub fn complementary<I, S>(clauses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            competitor: None,
            complementary: TagProfile::new(clauses),
        }
    }

    /// Override the competitor clause.
    #[must_use]
    pub fn with_competitor(mut self, clause: impl Into<String>) -> Self {
        self.competitor = Some(clause.into());
        self
    }
}

/// Lookup table from canonical category to profile.
///
/// The [`Default`] table carries the built-in profiles, including a
/// `generic` entry used for categories without a profile of their own.
/// [`CategoryProfiles::new`] starts empty, so unknown categories resolve to
/// an empty complementary profile.
///
/// # Examples
/// ```
/// use sitewise_core::{CategoryProfiles, normalise_category};
///
/// let profiles = CategoryProfiles::default();
/// let restaurant = normalise_category("restaurant");
/// assert_eq!(profiles.complementary_profile(&restaurant).clauses().len(), 4);
/// assert_eq!(profiles.competitor_clause(&restaurant), "amenity=restaurant");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryProfiles {
    entries: BTreeMap<String, CategoryProfile>,
}

impl CategoryProfiles {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert or replace the profile for `key`.
    pub fn insert(&mut self, key: impl Into<String>, profile: CategoryProfile) {
        self.entries.insert(key.into(), profile);
    }

    /// Add a profile while returning `self` for chaining.
    #[must_use]
    pub fn with_profile(mut self, key: impl Into<String>, profile: CategoryProfile) -> Self {
        self.insert(key, profile);
        self
    }

    /// Profile registered for exactly `key`, if any.
    pub fn get(&self, key: &CategoryKey) -> Option<&CategoryProfile> {
        self.entries.get(key.as_str())
    }

    /// Clause identifying competitors of `key`.
    ///
    /// Defaults to `amenity=<key>` when the profile has no override.
    pub fn competitor_clause(&self, key: &CategoryKey) -> String {
        self.get(key)
            .and_then(|profile| profile.competitor.clone())
            .unwrap_or_else(|| format!("amenity={key}"))
    }

    /// Complementary profile for `key`.
    ///
    /// Falls back to the `generic` entry, then to an empty profile.
    pub fn complementary_profile(&self, key: &CategoryKey) -> &TagProfile {
        self.get(key)
            .or_else(|| self.entries.get(GENERIC_CATEGORY))
            .map_or(&EMPTY_PROFILE, |profile| &profile.complementary)
    }
}

impl Default for CategoryProfiles {
    fn default() -> Self {
        Self::new()
            .with_profile(
                "restaurant",
                CategoryProfile::complementary([
                    r#"["office"]"#,
                    r#"["amenity"="school"]"#,
                    r#"["amenity"="college"]"#,
                    r#"["shop"]"#,
                ]),
            )
            .with_profile(
                "clothing_store",
                CategoryProfile::complementary([
                    r#"["shop"="mall"]"#,
                    r#"["amenity"="marketplace"]"#,
                    r#"["highway"="bus_stop"]"#,
                ])
                .with_competitor("shop=clothes"),
            )
            .with_profile(
                "gym",
                CategoryProfile::complementary([
                    r#"["landuse"="residential"]"#,
                    r#"["leisure"="park"]"#,
                    r#"["amenity"="school"]"#,
                ])
                .with_competitor("leisure=fitness_centre"),
            )
            .with_profile(
                "hospital",
                CategoryProfile::complementary([
                    r#"["amenity"="pharmacy"]"#,
                    r#"["amenity"="clinic"]"#,
                    r#"["amenity"="parking"]"#,
                    r#"["highway"="bus_stop"]"#,
                ]),
            )
            .with_profile(
                GENERIC_CATEGORY,
                CategoryProfile::complementary([
                    r#"["shop"]"#,
                    r#"["amenity"]"#,
                    r#"["public_transport"="stop_position"]"#,
                    r#"["highway"="bus_stop"]"#,
                ]),
            )
    }
}
