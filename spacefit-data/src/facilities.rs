//! Existing-facility snapshot loaded from a spreadsheet export.
//!
//! The donated-facility register is maintained as a spreadsheet. Exported as
//! JSON it becomes an array of row objects keyed by the sheet's header cells.
//! Headers vary between revisions of the register, so each key is folded
//! into a [`Field`] by ordered keyword rules; the first matching rule wins.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{Days, NaiveDate};
use geo::Coord;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use spacefit_core::{
    ExistingFacilities, ExistingFacility, FacilityCategory, FacilityLoader, count_to_f64,
};
use thiserror::Error;

/// Failures while reading a facility export. Never escapes the loader.
#[derive(Debug, Error)]
pub(crate) enum FacilityLoadError {
    #[error("failed to read facility export at {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("facility export at {path} is not a JSON array of rows")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Standard column a header maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Field {
    Name,
    Category,
    Area,
    Location,
    Latitude,
    Longitude,
    Established,
    Notes,
}

const HEADER_RULES: [(&str, Field); 8] = [
    ("시설명|명칭", Field::Name),
    ("시설종류|구분|유형|카테고리", Field::Category),
    ("면적|규모", Field::Area),
    ("주소|위치|소재지", Field::Location),
    ("위도|lat", Field::Latitude),
    ("경도|lng|lon", Field::Longitude),
    ("설치일|준공일|완료일", Field::Established),
    ("비고|메모", Field::Notes),
];

static COMPILED_HEADERS: LazyLock<Vec<(Regex, Field)>> = LazyLock::new(|| {
    HEADER_RULES
        .iter()
        .filter_map(|(pattern, field)| {
            Regex::new(&format!("(?i){pattern}"))
                .ok()
                .map(|regex| (regex, *field))
        })
        .collect()
});

/// Spreadsheet serial day zero.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Last serial day spreadsheets represent (9999-12-31).
const MAX_SERIAL_DAY: f64 = 2_958_465.0;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];

fn field_for(header: &str) -> Option<Field> {
    let label = header.trim();
    if label.is_empty() {
        return None;
    }
    COMPILED_HEADERS
        .iter()
        .find(|(regex, _)| regex.is_match(label))
        .map(|(_, field)| *field)
}

/// One spreadsheet row with its cells keyed by standard column.
#[derive(Debug, Default)]
struct Row<'a> {
    cells: BTreeMap<Field, &'a Value>,
}

impl<'a> Row<'a> {
    /// Keep the first non-blank cell for each standard column.
    fn from_object(object: &'a Map<String, Value>) -> Self {
        let mut row = Self::default();
        for (header, value) in object {
            let Some(field) = field_for(header) else {
                continue;
            };
            if text(value).is_some() {
                row.cells.entry(field).or_insert(value);
            }
        }
        row
    }

    fn get(&self, field: Field) -> Option<&'a Value> {
        self.cells.get(&field).copied()
    }

    fn text(&self, field: Field) -> Option<String> {
        self.get(field).and_then(text)
    }

    fn number(&self, field: Field) -> Option<f64> {
        self.get(field).and_then(number)
    }

    fn into_facility(self) -> Option<ExistingFacility> {
        let name = self.text(Field::Name)?;
        let mut facility =
            ExistingFacility::new(name, self.text(Field::Category).unwrap_or_default());
        facility.area = self.number(Field::Area);
        facility.address = self.text(Field::Location);
        facility.coordinate = self
            .number(Field::Latitude)
            .zip(self.number(Field::Longitude))
            .map(|(lat, lng)| Coord { x: lng, y: lat });
        facility.established = self.get(Field::Established).and_then(date);
        facility.notes = self.text(Field::Notes);
        Some(facility)
    }
}

/// Trimmed, non-blank text of a cell.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => Some(raw.trim().to_owned()).filter(|cell| !cell.is_empty()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Finite numeric value of a cell; numeric text is accepted.
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|cell| cell.is_finite())
}

/// Calendar date of a cell: ISO-like text or a spreadsheet serial day.
fn date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(_) => number(value).and_then(serial_date),
        Value::String(raw) => {
            let cell = raw.trim();
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(cell, format).ok())
                .or_else(|| cell.parse::<f64>().ok().and_then(serial_date))
        }
        _ => None,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "serial days are range-checked before truncation"
)]
fn serial_date(serial: f64) -> Option<NaiveDate> {
    if !(0.0..=MAX_SERIAL_DAY).contains(&serial) {
        return None;
    }
    let (year, month, day) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(year, month, day)?.checked_add_days(Days::new(serial.trunc() as u64))
}

/// Parse an export into facilities, skipping rows without a name.
fn parse_rows(text: &str) -> Result<Vec<ExistingFacility>, serde_json::Error> {
    let rows: Vec<Value> = serde_json::from_str(text)?;
    let total = rows.len();
    let facilities: Vec<ExistingFacility> = rows
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|object| Row::from_object(object).into_facility())
        .collect();
    if facilities.len() < total {
        log::warn!(
            "dropped {} of {total} facility rows without a name",
            total.saturating_sub(facilities.len())
        );
    }
    Ok(facilities)
}

/// Area statistics for one facility category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryStatistics {
    /// Facilities in the category.
    pub count: usize,
    /// Sum of recorded areas in square metres; missing areas count as zero.
    pub total_area: f64,
    /// Mean area over every facility, two decimal places.
    pub average_area: f64,
}

impl CategoryStatistics {
    #[expect(clippy::float_arithmetic, reason = "area sums and means")]
    fn from_facilities(facilities: &[ExistingFacility]) -> Self {
        let count = facilities.len();
        let total_area: f64 = facilities
            .iter()
            .map(|facility| facility.area.unwrap_or(0.0))
            .sum();
        let average_area = if count == 0 {
            0.0
        } else {
            (total_area / count_to_f64(count) * 100.0).round() / 100.0
        };
        Self {
            count,
            total_area,
            average_area,
        }
    }
}

/// [`FacilityLoader`] reading a JSON export of the facility register.
///
/// Every load re-reads the file. An unreadable or malformed export is logged
/// and yields an empty snapshot.
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use spacefit_core::{FacilityCategory, FacilityLoader};
/// use spacefit_data::JsonFacilityLoader;
///
/// let dir = tempfile::tempdir()?;
/// let path = Utf8PathBuf::from_path_buf(dir.path().join("facilities.json"))
///     .map_err(|_| std::io::Error::other("non-UTF-8 temp dir"))?;
/// std::fs::write(
///     &path,
///     r#"[{"시설명": "Maple Playground", "시설종류": "어린이놀이터", "면적(㎡)": 320}]"#,
/// )?;
///
/// let snapshot = JsonFacilityLoader::new(path).load();
/// assert_eq!(snapshot.count(FacilityCategory::Playground), 1);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonFacilityLoader {
    path: Utf8PathBuf,
}

impl JsonFacilityLoader {
    /// Read the export at `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the export.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn try_load(&self) -> Result<ExistingFacilities, FacilityLoadError> {
        let text =
            spacefit_fs::read_to_string(&self.path).map_err(|source| FacilityLoadError::Read {
                path: self.path.clone(),
                source,
            })?;
        let facilities = parse_rows(&text).map_err(|source| FacilityLoadError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(facilities.into_iter().collect())
    }

    /// Load only the facilities in `categories`.
    #[must_use]
    pub fn load_by_types(&self, categories: &[FacilityCategory]) -> ExistingFacilities {
        self.load().filtered(categories)
    }

    /// Count and area statistics per populated category.
    #[must_use]
    pub fn statistics(&self) -> BTreeMap<FacilityCategory, CategoryStatistics> {
        self.load()
            .iter()
            .map(|(category, facilities)| {
                (category, CategoryStatistics::from_facilities(facilities))
            })
            .collect()
    }
}

impl FacilityLoader for JsonFacilityLoader {
    fn load(&self) -> ExistingFacilities {
        match self.try_load() {
            Ok(snapshot) => {
                log::debug!(
                    "loaded {} existing facilities from {}",
                    snapshot.total(),
                    self.path
                );
                snapshot
            }
            Err(err) => {
                log::error!("{err}; continuing without existing facilities");
                ExistingFacilities::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("시설명", Some(Field::Name))]
    #[case("명칭", Some(Field::Name))]
    #[case("시설 구분", Some(Field::Category))]
    #[case("면적(㎡)", Some(Field::Area))]
    #[case("소재지", Some(Field::Location))]
    #[case("Lat", Some(Field::Latitude))]
    #[case("LNG", Some(Field::Longitude))]
    #[case("준공일", Some(Field::Established))]
    #[case("메모", Some(Field::Notes))]
    #[case("관리번호", None)]
    #[case("  ", None)]
    fn headers_fold_into_standard_columns(#[case] header: &str, #[case] expected: Option<Field>) {
        assert_eq!(field_for(header), expected);
    }

    #[rstest]
    fn every_header_rule_compiles() {
        assert_eq!(COMPILED_HEADERS.len(), HEADER_RULES.len());
    }

    #[rstest]
    fn first_matching_column_in_file_order_wins() {
        // "명칭" sorts before "시설명", so a sorted map would pick the second column.
        let facilities =
            parse_rows(r#"[{ "시설명": "Maple Playground", "명칭": "Register 12" }]"#)
                .expect("valid export");

        let names: Vec<&str> = facilities.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Maple Playground"]);
    }

    #[rstest]
    #[case("시설명(위치)", Field::Name)]
    #[case("구분(면적)", Field::Category)]
    #[case("위치(위도)", Field::Location)]
    fn earlier_header_rules_win(#[case] header: &str, #[case] expected: Field) {
        assert_eq!(field_for(header), Some(expected));
    }

    #[rstest]
    #[case(json!("2021-03-15"), NaiveDate::from_ymd_opt(2021, 3, 15))]
    #[case(json!("2021.03.15"), NaiveDate::from_ymd_opt(2021, 3, 15))]
    #[case(json!("2021/3/15"), NaiveDate::from_ymd_opt(2021, 3, 15))]
    #[case(json!(44270), NaiveDate::from_ymd_opt(2021, 3, 15))]
    #[case(json!(44270.75), NaiveDate::from_ymd_opt(2021, 3, 15))]
    #[case(json!("44270"), NaiveDate::from_ymd_opt(2021, 3, 15))]
    #[case(json!("someday"), None)]
    #[case(json!(-1), None)]
    #[case(json!(null), None)]
    fn dates_accept_text_and_serial_days(#[case] cell: Value, #[case] expected: Option<NaiveDate>) {
        assert_eq!(date(&cell), expected);
    }

    #[rstest]
    #[case(json!(320), Some(320.0))]
    #[case(json!(" 1,250.5 "), Some(1250.5))]
    #[case(json!("n/a"), None)]
    #[case(json!(true), None)]
    fn numbers_accept_numeric_text(#[case] cell: Value, #[case] expected: Option<f64>) {
        assert_eq!(number(&cell), expected);
    }

    #[rstest]
    fn rows_become_facilities() {
        let facilities = parse_rows(
            r#"[
                {
                    "연번": 1,
                    "시설명": " Maple Playground ",
                    "시설종류": "어린이놀이터",
                    "면적(㎡)": "320",
                    "소재지": "Seoul Mapo-gu",
                    "위도": 37.5512,
                    "경도": "126.9105",
                    "준공일": "2019-06-01",
                    "비고": "donated"
                }
            ]"#,
        )
        .expect("valid export");

        let [playground] = facilities.as_slice() else {
            panic!("expected one facility, got {facilities:?}");
        };
        assert_eq!(playground.name, "Maple Playground");
        assert_eq!(playground.category, FacilityCategory::Playground);
        assert_eq!(playground.area, Some(320.0));
        assert_eq!(playground.address.as_deref(), Some("Seoul Mapo-gu"));
        assert_eq!(
            playground.coordinate,
            Some(Coord {
                x: 126.9105,
                y: 37.5512
            })
        );
        assert_eq!(playground.established, NaiveDate::from_ymd_opt(2019, 6, 1));
        assert_eq!(playground.notes.as_deref(), Some("donated"));
    }

    #[rstest]
    fn rows_without_names_or_objects_are_skipped() {
        let facilities = parse_rows(
            r#"[
                {"시설명": "", "시설종류": "공원"},
                {"시설종류": "공원"},
                42,
                {"시설명": "Hill Park", "시설종류": "근린공원"}
            ]"#,
        )
        .expect("valid export");

        assert_eq!(facilities.len(), 1);
        assert!(facilities.iter().all(|f| f.name == "Hill Park"));
    }

    #[rstest]
    fn coordinates_need_both_axes() {
        let facilities =
            parse_rows(r#"[{"시설명": "Hall", "시설종류": "마을회관", "위도": 37.5}]"#)
                .expect("valid export");
        assert!(facilities.iter().all(|f| f.coordinate.is_none()));
    }

    #[rstest]
    fn unmatched_categories_keep_their_label() {
        let facilities = parse_rows(r#"[{"명칭": "Depot", "유형": "차고지"}]"#).expect("valid");
        let [depot] = facilities.as_slice() else {
            panic!("expected one facility");
        };
        assert_eq!(depot.category, FacilityCategory::Other);
        assert_eq!(depot.raw_category, "차고지");
    }

    #[rstest]
    fn objects_are_not_a_row_array() {
        assert!(parse_rows(r#"{"시설명": "Hall"}"#).is_err());
    }

    #[rstest]
    fn statistics_average_over_every_facility() {
        let stats = CategoryStatistics::from_facilities(&[
            ExistingFacility::new("A", "공원").with_area(100.0),
            ExistingFacility::new("B", "공원").with_area(50.5),
            ExistingFacility::new("C", "공원"),
        ]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.total_area, 150.5);
        assert_eq!(stats.average_area, 50.17);
    }

    #[rstest]
    fn empty_statistics_are_zero() {
        let stats = CategoryStatistics::from_facilities(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.average_area, 0.0);
    }

    #[rstest]
    fn missing_exports_load_as_empty() {
        let loader = JsonFacilityLoader::new("/nonexistent/spacefit/facilities.json");
        assert!(loader.load().is_empty());
        assert!(loader.statistics().is_empty());
    }
}
