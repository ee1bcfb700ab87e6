//! Kakao Local API response documents.
//!
//! Address, keyword and category searches share one envelope: a `documents`
//! array whose entries carry coordinates and distances as strings. Fields the
//! engine does not use are ignored.
//!
//! See: <https://developers.kakao.com/docs/latest/en/local/dev-guide>

use geo::Coord;
use serde::Deserialize;
use spacefit_core::{CategoryCode, Location, PointOfInterest};

/// Search response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    /// Matching documents in the provider's relevance order.
    #[serde(default)]
    pub documents: Vec<Document>,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    /// Provider-supplied error description.
    #[serde(default)]
    pub message: Option<String>,
}

/// One search hit.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Document {
    /// Lot-number address.
    #[serde(default)]
    pub address_name: Option<String>,
    /// Road-name address.
    #[serde(default)]
    pub road_address_name: Option<String>,
    /// Place name; absent for address searches.
    #[serde(default)]
    pub place_name: Option<String>,
    /// Longitude as a decimal string.
    #[serde(default)]
    pub x: Option<String>,
    /// Latitude as a decimal string.
    #[serde(default)]
    pub y: Option<String>,
    /// Distance from the search centre in metres, as a string.
    #[serde(default)]
    pub distance: Option<String>,
}

fn non_blank(field: Option<&String>) -> Option<&str> {
    field.map(|value| value.trim()).filter(|value| !value.is_empty())
}

fn parse_number(field: Option<&String>) -> Option<f64> {
    non_blank(field)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

impl Document {
    /// Position with `x = longitude`, when both coordinates parse.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coord<f64>> {
        Some(Coord {
            x: parse_number(self.x.as_ref())?,
            y: parse_number(self.y.as_ref())?,
        })
    }

    /// Best display address: lot number, then road name, then place name.
    #[must_use]
    pub fn display_address(&self) -> Option<&str> {
        non_blank(self.address_name.as_ref())
            .or_else(|| non_blank(self.road_address_name.as_ref()))
            .or_else(|| non_blank(self.place_name.as_ref()))
    }

    /// Convert a geocoding hit into a [`Location`].
    ///
    /// Address searches label the hit with its lot-number address only;
    /// keyword searches fall back to the road address and the place name.
    #[must_use]
    pub fn into_location(self, keyword_hit: bool) -> Option<Location> {
        let coordinate = self.coordinate()?;
        let label = if keyword_hit {
            self.display_address()
        } else {
            non_blank(self.address_name.as_ref())
        };
        Some(Location {
            address: label.unwrap_or_default().to_owned(),
            coordinate,
        })
    }

    /// Convert a category-search hit into a [`PointOfInterest`].
    ///
    /// Hits without usable coordinates are dropped. An unparseable distance
    /// reads as zero.
    #[must_use]
    pub fn into_poi(self, category: CategoryCode) -> Option<PointOfInterest> {
        let coordinate = self.coordinate()?;
        let distance = parse_number(self.distance.as_ref()).unwrap_or(0.0);
        let address = non_blank(self.address_name.as_ref())
            .or_else(|| non_blank(self.road_address_name.as_ref()))
            .unwrap_or_default()
            .to_owned();
        let name = non_blank(self.place_name.as_ref())
            .unwrap_or_default()
            .to_owned();
        Some(PointOfInterest::new(name, category, coordinate, distance).with_address(address))
    }
}
