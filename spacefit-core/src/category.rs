//! Place categories reported by the location provider.
//!
//! [`CategoryCode`] mirrors the provider's eighteen category group codes and
//! [`PoiGroup`] is the key POIs are grouped under once retrieved. The mapping
//! between the two is an exhaustive `match`, so adding a code without a group
//! fails to compile.
//!
//! # Examples
//! ```
//! use spacefit_core::{CategoryCode, PoiGroup};
//!
//! let code: CategoryCode = "HP8".parse().unwrap();
//! assert_eq!(code.group(), PoiGroup::Medical);
//! assert_eq!(PoiGroup::Medical.code(), CategoryCode::Hospital);
//! assert_eq!(PoiGroup::Medical.as_str(), "medical");
//! ```

use serde::{Deserialize, Serialize};

/// Category group codes understood by the location provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoryCode {
    /// Large supermarkets.
    #[serde(rename = "MT1")]
    LargeMart,
    /// Convenience stores.
    #[serde(rename = "CS2")]
    ConvenienceStore,
    /// Daycares and kindergartens.
    #[serde(rename = "PS3")]
    Daycare,
    /// Schools.
    #[serde(rename = "SC4")]
    School,
    /// Private academies.
    #[serde(rename = "AC5")]
    Academy,
    /// Parking lots.
    #[serde(rename = "PK6")]
    Parking,
    /// Gas and charging stations.
    #[serde(rename = "OL7")]
    GasStation,
    /// Subway stations.
    #[serde(rename = "SW8")]
    SubwayStation,
    /// Banks.
    #[serde(rename = "BK9")]
    Bank,
    /// Cultural venues.
    #[serde(rename = "CT1")]
    Culture,
    /// Real estate agencies.
    #[serde(rename = "AG2")]
    RealEstate,
    /// Public offices.
    #[serde(rename = "PO3")]
    PublicOffice,
    /// Tourist attractions.
    #[serde(rename = "AT4")]
    TouristSpot,
    /// Lodging.
    #[serde(rename = "AD5")]
    Accommodation,
    /// Restaurants.
    #[serde(rename = "FD6")]
    Restaurant,
    /// Cafes.
    #[serde(rename = "CE7")]
    Cafe,
    /// Hospitals and clinics.
    #[serde(rename = "HP8")]
    Hospital,
    /// Pharmacies.
    #[serde(rename = "PM9")]
    Pharmacy,
}

impl CategoryCode {
    /// Every category code in the provider's declaration order.
    pub const ALL: [Self; 18] = [
        Self::LargeMart,
        Self::ConvenienceStore,
        Self::Daycare,
        Self::School,
        Self::Academy,
        Self::Parking,
        Self::GasStation,
        Self::SubwayStation,
        Self::Bank,
        Self::Culture,
        Self::RealEstate,
        Self::PublicOffice,
        Self::TouristSpot,
        Self::Accommodation,
        Self::Restaurant,
        Self::Cafe,
        Self::Hospital,
        Self::Pharmacy,
    ];

    /// Return the provider's three-character code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LargeMart => "MT1",
            Self::ConvenienceStore => "CS2",
            Self::Daycare => "PS3",
            Self::School => "SC4",
            Self::Academy => "AC5",
            Self::Parking => "PK6",
            Self::GasStation => "OL7",
            Self::SubwayStation => "SW8",
            Self::Bank => "BK9",
            Self::Culture => "CT1",
            Self::RealEstate => "AG2",
            Self::PublicOffice => "PO3",
            Self::TouristSpot => "AT4",
            Self::Accommodation => "AD5",
            Self::Restaurant => "FD6",
            Self::Cafe => "CE7",
            Self::Hospital => "HP8",
            Self::Pharmacy => "PM9",
        }
    }

    /// Return the grouping key POIs of this category are stored under.
    #[must_use]
    pub const fn group(self) -> PoiGroup {
        match self {
            Self::LargeMart => PoiGroup::LargeMarts,
            Self::ConvenienceStore => PoiGroup::ConvenienceStores,
            Self::Daycare => PoiGroup::Daycares,
            Self::School => PoiGroup::Schools,
            Self::Academy => PoiGroup::Academies,
            Self::Parking => PoiGroup::Parkings,
            Self::GasStation => PoiGroup::GasStations,
            Self::SubwayStation => PoiGroup::SubwayStations,
            Self::Bank => PoiGroup::Banks,
            Self::Culture => PoiGroup::Cultures,
            Self::RealEstate => PoiGroup::RealEstates,
            Self::PublicOffice => PoiGroup::PublicOffices,
            Self::TouristSpot => PoiGroup::TouristSpots,
            Self::Accommodation => PoiGroup::Accommodations,
            Self::Restaurant => PoiGroup::Restaurants,
            Self::Cafe => PoiGroup::Cafes,
            Self::Hospital => PoiGroup::Medical,
            Self::Pharmacy => PoiGroup::Pharmacies,
        }
    }

    /// Human-readable label used in narrative text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LargeMart => "large marts",
            Self::ConvenienceStore => "convenience stores",
            Self::Daycare => "daycares",
            Self::School => "schools",
            Self::Academy => "academies",
            Self::Parking => "parking lots",
            Self::GasStation => "gas stations",
            Self::SubwayStation => "subway stations",
            Self::Bank => "banks",
            Self::Culture => "cultural venues",
            Self::RealEstate => "real estate agencies",
            Self::PublicOffice => "public offices",
            Self::TouristSpot => "tourist attractions",
            Self::Accommodation => "accommodations",
            Self::Restaurant => "restaurants",
            Self::Cafe => "cafes",
            Self::Hospital => "hospitals",
            Self::Pharmacy => "pharmacies",
        }
    }

    /// Parse a configured code, returning `None` for codes the provider does
    /// not know about.
    #[must_use]
    pub fn lookup(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(code.trim()))
    }
}

impl std::fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| format!("unknown category code '{s}'"))
    }
}

/// Keys under which retrieved POIs are grouped.
///
/// Declaration order follows the order in which the provider is queried, so
/// ordered maps keyed by `PoiGroup` iterate in retrieval order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiGroup {
    /// Hospitals and clinics.
    Medical,
    /// Schools.
    Schools,
    /// Convenience stores.
    ConvenienceStores,
    /// Subway stations.
    SubwayStations,
    /// Cafes.
    Cafes,
    /// Large supermarkets.
    LargeMarts,
    /// Daycares and kindergartens.
    Daycares,
    /// Private academies.
    Academies,
    /// Parking lots.
    Parkings,
    /// Gas and charging stations.
    GasStations,
    /// Banks.
    Banks,
    /// Cultural venues.
    Cultures,
    /// Real estate agencies.
    RealEstates,
    /// Public offices.
    PublicOffices,
    /// Tourist attractions.
    TouristSpots,
    /// Lodging.
    Accommodations,
    /// Restaurants.
    Restaurants,
    /// Pharmacies.
    Pharmacies,
}

impl PoiGroup {
    /// Every group in retrieval order.
    pub const ALL: [Self; 18] = [
        Self::Medical,
        Self::Schools,
        Self::ConvenienceStores,
        Self::SubwayStations,
        Self::Cafes,
        Self::LargeMarts,
        Self::Daycares,
        Self::Academies,
        Self::Parkings,
        Self::GasStations,
        Self::Banks,
        Self::Cultures,
        Self::RealEstates,
        Self::PublicOffices,
        Self::TouristSpots,
        Self::Accommodations,
        Self::Restaurants,
        Self::Pharmacies,
    ];

    /// Return the category code whose POIs populate this group.
    #[must_use]
    pub const fn code(self) -> CategoryCode {
        match self {
            Self::Medical => CategoryCode::Hospital,
            Self::Schools => CategoryCode::School,
            Self::ConvenienceStores => CategoryCode::ConvenienceStore,
            Self::SubwayStations => CategoryCode::SubwayStation,
            Self::Cafes => CategoryCode::Cafe,
            Self::LargeMarts => CategoryCode::LargeMart,
            Self::Daycares => CategoryCode::Daycare,
            Self::Academies => CategoryCode::Academy,
            Self::Parkings => CategoryCode::Parking,
            Self::GasStations => CategoryCode::GasStation,
            Self::Banks => CategoryCode::Bank,
            Self::Cultures => CategoryCode::Culture,
            Self::RealEstates => CategoryCode::RealEstate,
            Self::PublicOffices => CategoryCode::PublicOffice,
            Self::TouristSpots => CategoryCode::TouristSpot,
            Self::Accommodations => CategoryCode::Accommodation,
            Self::Restaurants => CategoryCode::Restaurant,
            Self::Pharmacies => CategoryCode::Pharmacy,
        }
    }

    /// Return the group key as a snake-case `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Medical => "medical",
            Self::Schools => "schools",
            Self::ConvenienceStores => "convenience_stores",
            Self::SubwayStations => "subway_stations",
            Self::Cafes => "cafes",
            Self::LargeMarts => "large_marts",
            Self::Daycares => "daycares",
            Self::Academies => "academies",
            Self::Parkings => "parkings",
            Self::GasStations => "gas_stations",
            Self::Banks => "banks",
            Self::Cultures => "cultures",
            Self::RealEstates => "real_estates",
            Self::PublicOffices => "public_offices",
            Self::TouristSpots => "tourist_spots",
            Self::Accommodations => "accommodations",
            Self::Restaurants => "restaurants",
            Self::Pharmacies => "pharmacies",
        }
    }
}

impl std::fmt::Display for PoiGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
