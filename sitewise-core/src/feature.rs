//! Feature-database elements and deduplicated counts.
//!
//! Overpass may return the same element more than once when several
//! clauses match it. [`FeatureCount::from_elements`] keeps the first
//! occurrence of every `(element type, id)` pair so counts reflect distinct
//! features regardless of response order.

use std::collections::{BTreeMap, HashSet};

use geo::Coord;

/// One of the three OpenStreetMap geometry kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ElementType {
    /// A single point.
    Node,
    /// An ordered list of nodes.
    Way,
    /// A group of members.
    Relation,
}

impl ElementType {
    /// All element types in query order.
    pub const ALL: [Self; 3] = [Self::Node, Self::Way, Self::Relation];

    /// Overpass QL keyword for this element type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "node" => Ok(Self::Node),
            "way" => Ok(Self::Way),
            "relation" => Ok(Self::Relation),
            _ => Err(format!("unknown element type '{s}'")),
        }
    }
}

/// An element returned by the feature database.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Ways and
/// relations carry their centroid when the query requested `out center`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureElement {
    /// Geometry kind.
    pub element_type: ElementType,
    /// Identifier, unique per element type.
    pub id: u64,
    /// OpenStreetMap tags.
    pub tags: BTreeMap<String, String>,
    /// Node position or way/relation centre, when supplied.
    pub location: Option<Coord<f64>>,
}

impl FeatureElement {
    /// Construct an element without tags or location.
    pub fn bare(element_type: ElementType, id: u64) -> Self {
        Self {
            element_type,
            id,
            tags: BTreeMap::new(),
            location: None,
        }
    }

    /// Identity key used for deduplication.
    pub fn key(&self) -> (ElementType, u64) {
        (self.element_type, self.id)
    }
}

/// Distinct elements matched by a query.
///
/// # Examples
/// ```
/// use sitewise_core::{ElementType, FeatureCount, FeatureElement};
///
/// let count = FeatureCount::from_elements([
///     FeatureElement::bare(ElementType::Node, 1),
///     FeatureElement::bare(ElementType::Way, 1),
///     FeatureElement::bare(ElementType::Node, 1),
/// ]);
/// assert_eq!(count.count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCount {
    elements: Vec<FeatureElement>,
}

impl FeatureCount {
    /// A count of zero.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Deduplicate elements by `(element type, id)`, keeping first
    /// occurrences in input order.
    pub fn from_elements<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = FeatureElement>,
    {
        let mut seen = HashSet::new();
        let elements = elements
            .into_iter()
            .filter(|element| seen.insert(element.key()))
            .collect();
        Self { elements }
    }

    /// Number of distinct elements.
    pub fn count(&self) -> u64 {
        u64::try_from(self.elements.len()).unwrap_or(u64::MAX)
    }

    /// Distinct elements in first-seen order.
    pub fn elements(&self) -> &[FeatureElement] {
        &self.elements
    }

    /// Report whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
