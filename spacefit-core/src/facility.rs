//! Existing public facilities and their canonical categories.
//!
//! Facility snapshots arrive with free-text category labels. They are folded
//! into [`FacilityCategory`] by an ordered list of keyword rules; the first
//! matching rule wins because several patterns overlap (a "어린이공원" is a
//! park, but "어린이놀이터" must be tested first).

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use geo::Coord;
use regex::Regex;
use serde::{Serialize, Serializer};

/// Canonical categories of donated or existing public facilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacilityCategory {
    /// Children's playgrounds (어린이놀이터).
    Playground,
    /// Parks (공원).
    Park,
    /// Public parking lots (공용주차장).
    PublicParking,
    /// Senior citizens' centres (경로당).
    SeniorCenter,
    /// Daycare centres (어린이집).
    Daycare,
    /// Small neighbourhood libraries (작은도서관).
    SmallLibrary,
    /// Resident sports facilities (주민운동시설).
    SportsFacility,
    /// Village community halls (마을회관).
    CommunityHall,
    /// Cultural facilities (문화시설).
    CulturalFacility,
    /// Health and medical facilities (보건의료시설).
    HealthFacility,
    /// Anything the rules do not recognise (기타).
    Other,
}

/// Ordered keyword rules; earlier entries take precedence.
const CATEGORY_RULES: [(&str, FacilityCategory); 10] = [
    ("어린이놀이터|놀이터", FacilityCategory::Playground),
    ("공원", FacilityCategory::Park),
    ("공용주차장|주차장", FacilityCategory::PublicParking),
    ("경로당", FacilityCategory::SeniorCenter),
    ("어린이집|보육시설", FacilityCategory::Daycare),
    ("작은도서관|도서관", FacilityCategory::SmallLibrary),
    ("주민운동시설|운동시설", FacilityCategory::SportsFacility),
    ("마을회관|회관", FacilityCategory::CommunityHall),
    ("문화시설", FacilityCategory::CulturalFacility),
    ("보건의료시설|의료시설", FacilityCategory::HealthFacility),
];

static COMPILED_RULES: LazyLock<Vec<(Regex, FacilityCategory)>> = LazyLock::new(|| {
    CATEGORY_RULES
        .iter()
        .filter_map(|(pattern, category)| {
            Regex::new(&format!("(?i){pattern}"))
                .ok()
                .map(|regex| (regex, *category))
        })
        .collect()
});

impl FacilityCategory {
    /// Every category with a facility-type mapping, in rule order.
    pub const CANONICAL: [Self; 10] = [
        Self::Playground,
        Self::Park,
        Self::PublicParking,
        Self::SeniorCenter,
        Self::Daycare,
        Self::SmallLibrary,
        Self::SportsFacility,
        Self::CommunityHall,
        Self::CulturalFacility,
        Self::HealthFacility,
    ];

    /// Fold a free-text category label into a canonical category.
    ///
    /// Blank labels and labels no rule recognises map to
    /// [`FacilityCategory::Other`].
    ///
    /// # Examples
    /// ```
    /// use spacefit_core::FacilityCategory;
    ///
    /// assert_eq!(FacilityCategory::normalise("소공원"), FacilityCategory::Park);
    /// assert_eq!(FacilityCategory::normalise("어린이놀이터(공원 내)"), FacilityCategory::Playground);
    /// assert_eq!(FacilityCategory::normalise(""), FacilityCategory::Other);
    /// ```
    #[must_use]
    pub fn normalise(raw: &str) -> Self {
        let label = raw.trim();
        if label.is_empty() {
            return Self::Other;
        }
        COMPILED_RULES
            .iter()
            .find(|(regex, _)| regex.is_match(label))
            .map_or(Self::Other, |(_, category)| *category)
    }

    /// Korean label used as the grouping key in facility snapshots.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Playground => "어린이놀이터",
            Self::Park => "공원",
            Self::PublicParking => "공용주차장",
            Self::SeniorCenter => "경로당",
            Self::Daycare => "어린이집",
            Self::SmallLibrary => "작은도서관",
            Self::SportsFacility => "주민운동시설",
            Self::CommunityHall => "마을회관",
            Self::CulturalFacility => "문화시설",
            Self::HealthFacility => "보건의료시설",
            Self::Other => "기타",
        }
    }

    /// English plural used in narrative text.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Playground => "playgrounds",
            Self::Park => "parks",
            Self::PublicParking => "public parking lots",
            Self::SeniorCenter => "senior centres",
            Self::Daycare => "daycare centres",
            Self::SmallLibrary => "small libraries",
            Self::SportsFacility => "sports facilities",
            Self::CommunityHall => "community halls",
            Self::CulturalFacility => "cultural facilities",
            Self::HealthFacility => "health facilities",
            Self::Other => "other facilities",
        }
    }

    /// Facility-rule type that competes with this category, if any.
    #[must_use]
    pub const fn facility_type(self) -> Option<&'static str> {
        match self {
            Self::Playground => Some("playground"),
            Self::Park => Some("park"),
            Self::PublicParking => Some("parking_lot"),
            Self::SeniorCenter => Some("senior_center"),
            Self::Daycare => Some("daycare"),
            Self::SmallLibrary => Some("library"),
            Self::SportsFacility => Some("sports_facility"),
            Self::CommunityHall => Some("community_center"),
            Self::CulturalFacility => Some("cultural_facility"),
            Self::HealthFacility => Some("health_facility"),
            Self::Other => None,
        }
    }

    /// Return the category a facility-rule type competes with.
    ///
    /// # Examples
    /// ```
    /// use spacefit_core::FacilityCategory;
    ///
    /// assert_eq!(
    ///     FacilityCategory::for_facility_type("library"),
    ///     Some(FacilityCategory::SmallLibrary)
    /// );
    /// assert_eq!(FacilityCategory::for_facility_type("stadium"), None);
    /// ```
    #[must_use]
    pub fn for_facility_type(facility_type: &str) -> Option<Self> {
        Self::CANONICAL
            .into_iter()
            .find(|category| category.facility_type() == Some(facility_type))
    }
}

impl std::fmt::Display for FacilityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FacilityCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A previously built public facility.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingFacility {
    /// Facility name.
    pub name: String,
    /// Canonical category.
    pub category: FacilityCategory,
    /// Category label as it appeared in the source.
    pub raw_category: String,
    /// Floor or site area in square metres.
    pub area: Option<f64>,
    /// Street address or free-text location.
    pub address: Option<String>,
    /// Position with `x = longitude` and `y = latitude`.
    pub coordinate: Option<Coord<f64>>,
    /// Date the facility was completed or handed over.
    pub established: Option<NaiveDate>,
    /// Free-text remarks.
    pub notes: Option<String>,
}

impl ExistingFacility {
    /// Construct a facility whose category is normalised from `raw_category`.
    pub fn new(name: impl Into<String>, raw_category: impl Into<String>) -> Self {
        let raw = raw_category.into();
        Self {
            name: name.into(),
            category: FacilityCategory::normalise(&raw),
            raw_category: raw,
            area: None,
            address: None,
            coordinate: None,
            established: None,
            notes: None,
        }
    }

    /// Attach a coordinate while returning `self` for chaining.
    #[must_use]
    pub const fn with_coordinate(mut self, coordinate: Coord<f64>) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    /// Attach an area while returning `self` for chaining.
    #[must_use]
    pub const fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }
}

/// Snapshot of existing facilities grouped by canonical category.
///
/// The snapshot is loaded once and shared read-only between analyses.
///
/// # Examples
/// ```
/// use spacefit_core::{ExistingFacilities, ExistingFacility, FacilityCategory};
///
/// let snapshot: ExistingFacilities = [
///     ExistingFacility::new("Sunrise Park", "근린공원"),
///     ExistingFacility::new("Hill Park", "공원"),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(snapshot.count(FacilityCategory::Park), 2);
/// assert_eq!(snapshot.total(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExistingFacilities {
    groups: BTreeMap<FacilityCategory, Vec<ExistingFacility>>,
}

impl ExistingFacilities {
    /// Construct an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a facility under its canonical category.
    pub fn push(&mut self, facility: ExistingFacility) {
        self.groups
            .entry(facility.category)
            .or_default()
            .push(facility);
    }

    /// Return the facilities recorded under `category`.
    #[must_use]
    pub fn get(&self, category: FacilityCategory) -> &[ExistingFacility] {
        self.groups
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Return the number of facilities recorded under `category`.
    #[must_use]
    pub fn count(&self, category: FacilityCategory) -> usize {
        self.get(category).len()
    }

    /// Return the number of facilities across every category.
    #[must_use]
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Return the number of distinct categories present.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.groups.len()
    }

    /// Report whether the snapshot holds no facilities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate over populated categories in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (FacilityCategory, &[ExistingFacility])> {
        self.groups
            .iter()
            .map(|(category, items)| (*category, items.as_slice()))
    }

    /// Keep only the facilities whose category is listed in `categories`.
    #[must_use]
    pub fn filtered(&self, categories: &[FacilityCategory]) -> Self {
        Self {
            groups: self
                .groups
                .iter()
                .filter(|(category, _)| categories.contains(category))
                .map(|(category, items)| (*category, items.clone()))
                .collect(),
        }
    }
}

impl FromIterator<ExistingFacility> for ExistingFacilities {
    fn from_iter<I: IntoIterator<Item = ExistingFacility>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for facility in iter {
            snapshot.push(facility);
        }
        snapshot
    }
}
