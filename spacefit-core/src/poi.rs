use std::collections::BTreeMap;

use geo::Coord;

use crate::{CategoryCode, PoiGroup};

/// A categorised place near the analysed location.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
/// `distance_m` is the provider-reported distance from the analysis point.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use spacefit_core::{CategoryCode, PointOfInterest};
///
/// let poi = PointOfInterest::new(
///     "Seoul Clinic",
///     CategoryCode::Hospital,
///     Coord { x: 127.0, y: 37.5 },
///     120.0,
/// );
///
/// assert_eq!(poi.name, "Seoul Clinic");
/// assert!(poi.address.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    /// Place name.
    pub name: String,
    /// Provider category.
    pub category: CategoryCode,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Distance from the analysis point in metres.
    pub distance_m: f64,
    /// Street address.
    pub address: String,
}

impl PointOfInterest {
    /// Construct a `PointOfInterest` without an address.
    pub fn new(
        name: impl Into<String>,
        category: CategoryCode,
        location: Coord<f64>,
        distance_m: f64,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            location,
            distance_m,
            address: String::new(),
        }
    }

    /// Attach a street address while returning `self` for chaining.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }
}

/// POIs retrieved around one location, grouped by [`PoiGroup`].
///
/// Within a group POIs keep the provider's relevance order. Groups that were
/// never populated read as empty.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use spacefit_core::{CategoryCode, PoiCollection, PoiGroup, PointOfInterest};
///
/// let mut pois = PoiCollection::new();
/// pois.push(PointOfInterest::new("Cafe", CategoryCode::Cafe, Coord { x: 0.0, y: 0.0 }, 10.0));
///
/// assert_eq!(pois.count(PoiGroup::Cafes), 1);
/// assert!(pois.get(PoiGroup::Medical).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoiCollection {
    groups: BTreeMap<PoiGroup, Vec<PointOfInterest>>,
}

impl PoiCollection {
    /// Construct an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection in which every group is present but empty.
    #[must_use]
    pub fn with_all_groups() -> Self {
        Self {
            groups: PoiGroup::ALL.into_iter().map(|g| (g, Vec::new())).collect(),
        }
    }

    /// Replace the POIs held for `group`.
    pub fn insert(&mut self, group: PoiGroup, pois: Vec<PointOfInterest>) {
        self.groups.insert(group, pois);
    }

    /// Append a POI to the group of its category.
    pub fn push(&mut self, poi: PointOfInterest) {
        self.groups.entry(poi.category.group()).or_default().push(poi);
    }

    /// Return the POIs held for `group`.
    #[must_use]
    pub fn get(&self, group: PoiGroup) -> &[PointOfInterest] {
        self.groups
            .get(&group)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Return the number of POIs held for `group`.
    #[must_use]
    pub fn count(&self, group: PoiGroup) -> usize {
        self.get(group).len()
    }

    /// Return the number of POIs across all groups.
    #[must_use]
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Report whether the collection holds no POIs at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate over populated groups in retrieval order.
    pub fn iter(&self) -> impl Iterator<Item = (PoiGroup, &[PointOfInterest])> {
        self.groups
            .iter()
            .map(|(group, pois)| (*group, pois.as_slice()))
    }

    /// Return the POI closest to the analysis point within `group`.
    ///
    /// Ties keep the provider's order.
    #[must_use]
    pub fn nearest(&self, group: PoiGroup) -> Option<&PointOfInterest> {
        self.get(group)
            .iter()
            .reduce(|best, poi| if poi.distance_m < best.distance_m { poi } else { best })
    }
}

impl FromIterator<PointOfInterest> for PoiCollection {
    fn from_iter<I: IntoIterator<Item = PointOfInterest>>(iter: I) -> Self {
        let mut collection = Self::new();
        for poi in iter {
            collection.push(poi);
        }
        collection
    }
}
