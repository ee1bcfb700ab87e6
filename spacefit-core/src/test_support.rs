//! In-memory collaborators used by unit and behaviour tests.

use std::sync::Mutex;

use crate::{
    ExistingFacilities, FacilityLoader, Location, LocationProvider, PoiCollection, ProviderError,
};

/// `LocationProvider` that resolves one address to a fixed location.
///
/// Geocoding matches the configured address exactly after trimming; every
/// other address is reported as not found. POI searches return the configured
/// collection regardless of location.
#[derive(Debug, Clone)]
pub struct StaticLocationProvider {
    location: Location,
    pois: PoiCollection,
}

impl StaticLocationProvider {
    /// Resolve `location.address` to `location` and answer searches with `pois`.
    #[must_use]
    pub const fn new(location: Location, pois: PoiCollection) -> Self {
        Self { location, pois }
    }
}

impl LocationProvider for StaticLocationProvider {
    fn geocode(&self, address: &str) -> Result<Option<Location>, ProviderError> {
        Ok((address.trim() == self.location.address).then(|| self.location.clone()))
    }

    fn search_all_categories(&self, _location: &Location) -> Result<PoiCollection, ProviderError> {
        Ok(self.pois.clone())
    }
}

/// `LocationProvider` whose every call fails with the configured error.
#[derive(Debug)]
pub struct FailingLocationProvider {
    error: ProviderError,
    calls: Mutex<usize>,
}

impl FailingLocationProvider {
    /// Fail every call with `error`.
    #[must_use]
    pub const fn new(error: ProviderError) -> Self {
        Self {
            error,
            calls: Mutex::new(0),
        }
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.lock().map_or(0, |calls| *calls)
    }

    fn fail<T>(&self) -> Result<T, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls = calls.saturating_add(1);
        }
        Err(self.error.clone())
    }
}

impl LocationProvider for FailingLocationProvider {
    fn geocode(&self, _address: &str) -> Result<Option<Location>, ProviderError> {
        self.fail()
    }

    fn search_all_categories(&self, _location: &Location) -> Result<PoiCollection, ProviderError> {
        self.fail()
    }
}

/// `FacilityLoader` returning a fixed snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticFacilityLoader {
    snapshot: ExistingFacilities,
}

impl StaticFacilityLoader {
    /// Answer every load with `snapshot`.
    #[must_use]
    pub const fn new(snapshot: ExistingFacilities) -> Self {
        Self { snapshot }
    }
}

impl FacilityLoader for StaticFacilityLoader {
    fn load(&self) -> ExistingFacilities {
        self.snapshot.clone()
    }
}
