//! Test helpers for composing analyze CLI workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use spacefit_core::test_support::StaticLocationProvider;
use spacefit_core::{Location, LocationProvider, PoiCollection};
use tempfile::TempDir;

use super::*;
use crate::analyze::{AnalyzeConfig, ProviderBuilder};

pub(super) const KNOWN_ADDRESS: &str = "Sejong-daero 175";
pub(super) const KNOWN_LAT: f64 = 37.5663;
pub(super) const KNOWN_LNG: f64 = 126.9779;

/// Temporary directory that is removed when dropped.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .unwrap_or_else(|path| panic!("tempdir is not UTF-8: {path:?}"));
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &str) {
    std::fs::write(path, contents)
        .unwrap_or_else(|err| panic!("failed to write {path}: {err}"));
}

/// Facility register holding one park at the known address.
pub(super) fn park_register() -> String {
    format!(
        r#"[{{"시설명": "City Hall Park", "시설종류": "근린공원", "면적(㎡)": 1200, "위도": {KNOWN_LAT}, "경도": {KNOWN_LNG}}}]"#
    )
}

/// Provider builder handing out a provider that only knows the known address.
#[derive(Debug, Default)]
pub(super) struct StubProviderBuilder {
    pub(super) built: std::cell::Cell<usize>,
}

impl ProviderBuilder for StubProviderBuilder {
    fn build(&self, _config: &AnalyzeConfig) -> Result<Box<dyn LocationProvider>, CliError> {
        self.built.set(self.built.get() + 1);
        Ok(Box::new(StaticLocationProvider::new(
            Location::new(KNOWN_ADDRESS, KNOWN_LAT, KNOWN_LNG),
            PoiCollection::with_all_groups(),
        )))
    }
}
