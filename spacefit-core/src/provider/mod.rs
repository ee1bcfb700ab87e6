//! Collaborators that supply locations, nearby POIs and existing facilities.
//!
//! [`LocationProvider`] resolves an address and retrieves POIs around it;
//! [`FacilityLoader`] supplies the existing-facility snapshot. Both traits are
//! synchronous and `Send + Sync` so a single instance can serve concurrent
//! analyses.

mod error;

use geo::Coord;

use crate::{ExistingFacilities, PoiCollection};

pub use error::ProviderError;

/// A geocoded address.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Address as reported by the provider.
    pub address: String,
    /// Position with `x = longitude` and `y = latitude`.
    pub coordinate: Coord<f64>,
}

impl Location {
    /// Construct a location from latitude and longitude in degrees.
    ///
    /// # Examples
    /// ```
    /// use spacefit_core::Location;
    ///
    /// let city_hall = Location::new("Seoul City Hall", 37.5663, 126.9779);
    /// assert_eq!(city_hall.lat(), 37.5663);
    /// assert_eq!(city_hall.coordinate.x, 126.9779);
    /// ```
    pub fn new(address: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            address: address.into(),
            coordinate: Coord { x: lng, y: lat },
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.coordinate.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.coordinate.x
    }
}

/// Resolve addresses and retrieve nearby POIs.
///
/// # Examples
///
/// ```rust
/// use spacefit_core::{Location, LocationProvider, PoiCollection, ProviderError};
///
/// struct Fixed;
///
/// impl LocationProvider for Fixed {
///     fn geocode(&self, address: &str) -> Result<Option<Location>, ProviderError> {
///         Ok((!address.is_empty()).then(|| Location::new(address, 37.5, 127.0)))
///     }
///
///     fn search_all_categories(&self, _: &Location) -> Result<PoiCollection, ProviderError> {
///         Ok(PoiCollection::with_all_groups())
///     }
/// }
///
/// let location = Fixed.geocode("Jongno-gu")?.expect("resolved");
/// assert!(Fixed.search_all_categories(&location)?.is_empty());
/// # Ok::<(), ProviderError>(())
/// ```
pub trait LocationProvider: Send + Sync {
    /// Resolve `address` to a location.
    ///
    /// Returns `Ok(None)` when the provider knows no such address.
    ///
    /// # Errors
    /// Returns [`ProviderError::InvalidRequest`] when the request is
    /// malformed and another variant when the provider fails.
    fn geocode(&self, address: &str) -> Result<Option<Location>, ProviderError>;

    /// Retrieve POIs of every category around `location`.
    ///
    /// Within each group POIs keep the provider's relevance order.
    ///
    /// # Errors
    /// Returns a [`ProviderError`] when any category lookup fails.
    fn search_all_categories(&self, location: &Location) -> Result<PoiCollection, ProviderError>;
}

impl<P: LocationProvider + ?Sized> LocationProvider for &P {
    fn geocode(&self, address: &str) -> Result<Option<Location>, ProviderError> {
        (**self).geocode(address)
    }

    fn search_all_categories(&self, location: &Location) -> Result<PoiCollection, ProviderError> {
        (**self).search_all_categories(location)
    }
}

impl<P: LocationProvider + ?Sized> LocationProvider for Box<P> {
    fn geocode(&self, address: &str) -> Result<Option<Location>, ProviderError> {
        (**self).geocode(address)
    }

    fn search_all_categories(&self, location: &Location) -> Result<PoiCollection, ProviderError> {
        (**self).search_all_categories(location)
    }
}

/// Supply the snapshot of existing public facilities.
///
/// Loading never fails from the caller's point of view: implementations log
/// any problem and return an empty snapshot.
pub trait FacilityLoader: Send + Sync {
    /// Load every existing facility grouped by canonical category.
    fn load(&self) -> ExistingFacilities;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::test_support::{FailingLocationProvider, StaticLocationProvider};

    #[rstest]
    fn boxed_providers_delegate() {
        let provider: Box<dyn LocationProvider> = Box::new(StaticLocationProvider::new(
            Location::new("Mapo-gu", 37.56, 126.90),
            PoiCollection::new(),
        ));
        let location = provider
            .geocode("Mapo-gu")
            .expect("static geocode")
            .expect("known address");
        assert_eq!(location.address, "Mapo-gu");
    }

    #[rstest]
    fn failing_provider_reports_error() {
        let provider = FailingLocationProvider::new(ProviderError::Unauthorized);
        let err = (&provider).geocode("anywhere").expect_err("always fails");
        assert_eq!(err, ProviderError::Unauthorized);
        assert!(!err.is_invalid_request());
    }
}
