// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Raw optimizer configuration.
//!
//! `ScheduleConfig` mirrors what a caller hands the optimizer before any
//! validation: water availability may be a single value or a monthly list,
//! per-crop arrays are unchecked, and off-season keys are loosely typed. The
//! input normalizer (`crate::problem::Problem::from_config`) turns it into a
//! fixed-length, validated problem.
//!
//! The struct is serde-loadable with camelCase keys. Keys the optimizer does
//! not know are collected in `unrecognized` and reported as warnings instead
//! of failing the load.
//!
//! ```rust
//! use sowplan_model::config::ScheduleConfig;
//!
//! let config = ScheduleConfig::from_json(r#"{
//!     "waterAvailable": 5000,
//!     "landAvailable": 10,
//!     "cropCount": 1,
//!     "cropCycle": [1],
//!     "waterUse": [0],
//!     "cropProfit": [1000],
//!     "colour": "green"
//! }"#).unwrap();
//! assert_eq!(config.land_available, 10);
//! assert!(config.unrecognized.contains_key("colour"));
//! ```

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Water available per month: one value for every month, or a list.
///
/// A list of exactly one value is broadcast like a scalar. Any other list
/// must hold one value per calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WaterAvailability {
    Uniform(i64),
    Monthly(Vec<i64>),
}

impl Default for WaterAvailability {
    fn default() -> Self {
        WaterAvailability::Uniform(100_000)
    }
}

impl From<i64> for WaterAvailability {
    fn from(value: i64) -> Self {
        WaterAvailability::Uniform(value)
    }
}

impl From<Vec<i64>> for WaterAvailability {
    fn from(values: Vec<i64>) -> Self {
        WaterAvailability::Monthly(values)
    }
}

impl<const N: usize> From<[i64; N]> for WaterAvailability {
    fn from(values: [i64; N]) -> Self {
        WaterAvailability::Monthly(values.to_vec())
    }
}

/// A loosely typed reference to a crop as it appears in off-season maps.
///
/// Numeric keys (`2`), numeric strings (`"2"`) and generated crop labels
/// (`"c2"`) all resolve to the 1-based crop id. Anything else is kept verbatim
/// so the normalizer can report it as an unknown crop.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CropRef {
    Id(u64),
    Label(String),
}

impl CropRef {
    fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('c').unwrap_or(trimmed);
        match digits.parse::<u64>() {
            Ok(id) if !digits.is_empty() => CropRef::Id(id),
            _ => CropRef::Label(raw.to_string()),
        }
    }
}

impl std::fmt::Display for CropRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CropRef::Id(id) => write!(f, "{}", id),
            CropRef::Label(label) => write!(f, "{}", label),
        }
    }
}

impl From<u64> for CropRef {
    fn from(id: u64) -> Self {
        CropRef::Id(id)
    }
}

impl From<u32> for CropRef {
    fn from(id: u32) -> Self {
        CropRef::Id(id as u64)
    }
}

impl From<&str> for CropRef {
    fn from(raw: &str) -> Self {
        CropRef::parse(raw)
    }
}

impl Serialize for CropRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CropRef::Id(id) => serializer.serialize_u64(*id),
            CropRef::Label(label) => serializer.serialize_str(label),
        }
    }
}

impl<'de> Deserialize<'de> for CropRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CropRefVisitor;

        impl de::Visitor<'_> for CropRefVisitor {
            type Value = CropRef;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "a crop id such as 2, \"2\" or \"c2\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<CropRef, E> {
                Ok(CropRef::Id(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<CropRef, E> {
                Ok(match u64::try_from(v) {
                    Ok(id) => CropRef::Id(id),
                    Err(_) => CropRef::Label(v.to_string()),
                })
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CropRef, E> {
                Ok(CropRef::parse(v))
            }
        }

        deserializer.deserialize_any(CropRefVisitor)
    }
}

fn deserialize_off_season<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<CropRef, Vec<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OffSeasonVisitor;

    impl<'de> de::Visitor<'de> for OffSeasonVisitor {
        type Value = BTreeMap<CropRef, Vec<u32>>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "a map from crop ids to lists of month numbers")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: de::MapAccess<'de>,
        {
            let mut map: BTreeMap<CropRef, Vec<u32>> = BTreeMap::new();
            while let Some((crop, months)) = access.next_entry::<CropRef, Vec<u32>>()? {
                match map.get_mut(&crop) {
                    Some(existing) => {
                        tracing::warn!(
                            crop = %crop,
                            "crop named more than once in cropOffSeason, merging months"
                        );
                        existing.extend(months);
                    }
                    None => {
                        map.insert(crop, months);
                    }
                }
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(OffSeasonVisitor)
}

/// The raw, unvalidated configuration of one optimizer run.
///
/// `Default` carries a four crop example setup that is ready to solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleConfig {
    /// Water available per month.
    pub water_available: WaterAvailability,
    /// Land available in every month, shared by all crops.
    pub land_available: i64,
    /// Number of declared crops.
    pub crop_count: usize,
    /// Months from sowing to harvest, per crop.
    pub crop_cycle: Vec<u32>,
    /// Water use per unit of area per month, per crop.
    pub water_use: Vec<i64>,
    /// Profit per unit of area per harvest, per crop.
    pub crop_profit: Vec<i64>,
    /// Optional display names, per crop. Defaults to `c1..cN`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_names: Option<Vec<String>>,
    /// Months (numbered `1..=12`) in which a crop may not be planted.
    ///
    /// Keys naming the same crop (`"2"` and `"c2"`) are merged on load.
    #[serde(
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "deserialize_off_season"
    )]
    pub crop_off_season: BTreeMap<CropRef, Vec<u32>>,
    /// Number of years the schedule represents.
    pub total_years: i64,
    /// Whole years between sowing and first harvest, per crop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_year_lag: Option<Vec<i64>>,
    /// Wall-clock budget handed to the solver, in seconds.
    pub max_solve_seconds: f64,
    /// Configuration keys that are not understood by the optimizer.
    #[serde(flatten)]
    pub unrecognized: BTreeMap<String, serde_json::Value>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            water_available: WaterAvailability::default(),
            land_available: 2000,
            crop_count: 4,
            crop_cycle: vec![3, 4, 5, 4],
            water_use: vec![300, 200, 350, 400],
            crop_profit: vec![75_000, 60_000, 100_000, 150_000],
            crop_names: None,
            crop_off_season: BTreeMap::new(),
            total_years: 1,
            multi_year_lag: None,
            max_solve_seconds: 10.0,
            unrecognized: BTreeMap::new(),
        }
    }
}

impl ScheduleConfig {
    /// Creates the default configuration.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from a JSON document.
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Sets the water availability.
    #[inline]
    pub fn with_water_available<W>(mut self, water: W) -> Self
    where
        W: Into<WaterAvailability>,
    {
        self.water_available = water.into();
        self
    }

    /// Sets the land availability.
    #[inline]
    pub fn with_land_available(mut self, land: i64) -> Self {
        self.land_available = land;
        self
    }

    /// Sets the declared number of crops.
    #[inline]
    pub fn with_crop_count(mut self, crop_count: usize) -> Self {
        self.crop_count = crop_count;
        self
    }

    /// Sets the cycle length of every crop.
    #[inline]
    pub fn with_crop_cycle(mut self, cycle: Vec<u32>) -> Self {
        self.crop_cycle = cycle;
        self
    }

    /// Sets the monthly water use of every crop.
    #[inline]
    pub fn with_water_use(mut self, water_use: Vec<i64>) -> Self {
        self.water_use = water_use;
        self
    }

    /// Sets the per-harvest profit of every crop.
    #[inline]
    pub fn with_crop_profit(mut self, profit: Vec<i64>) -> Self {
        self.crop_profit = profit;
        self
    }

    /// Sets the crop display names.
    #[inline]
    pub fn with_crop_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.crop_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Excludes a crop from the given months (numbered `1..=12`).
    ///
    /// Calling this twice for the same crop merges the month lists.
    #[inline]
    pub fn with_off_season<C, I>(mut self, crop: C, months: I) -> Self
    where
        C: Into<CropRef>,
        I: IntoIterator<Item = u32>,
    {
        self.crop_off_season
            .entry(crop.into())
            .or_default()
            .extend(months);
        self
    }

    /// Sets the number of years the schedule represents.
    #[inline]
    pub fn with_total_years(mut self, years: i64) -> Self {
        self.total_years = years;
        self
    }

    /// Sets the whole-year lag before the first harvest of every crop.
    #[inline]
    pub fn with_multi_year_lag(mut self, lag: Vec<i64>) -> Self {
        self.multi_year_lag = Some(lag);
        self
    }

    /// Sets the solver time budget in seconds.
    #[inline]
    pub fn with_max_solve_seconds(mut self, seconds: f64) -> Self {
        self.max_solve_seconds = seconds;
        self
    }

    /// Records an extra option. Unknown options are reported as warnings.
    #[inline]
    pub fn with_option<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        self.unrecognized.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_example_setup() {
        let config = ScheduleConfig::default();
        assert_eq!(config.water_available, WaterAvailability::Uniform(100_000));
        assert_eq!(config.land_available, 2000);
        assert_eq!(config.crop_count, 4);
        assert_eq!(config.crop_cycle, vec![3, 4, 5, 4]);
        assert_eq!(config.water_use, vec![300, 200, 350, 400]);
        assert_eq!(config.crop_profit, vec![75_000, 60_000, 100_000, 150_000]);
        assert_eq!(config.total_years, 1);
        assert!(config.multi_year_lag.is_none());
        assert_eq!(config.max_solve_seconds, 10.0);
        assert!(config.unrecognized.is_empty());
    }

    #[test]
    fn test_crop_ref_parsing() {
        assert_eq!(CropRef::from("2"), CropRef::Id(2));
        assert_eq!(CropRef::from("c3"), CropRef::Id(3));
        assert_eq!(CropRef::from(" 4 "), CropRef::Id(4));
        assert_eq!(CropRef::from("c"), CropRef::Label("c".into()));
        assert_eq!(CropRef::from("maize"), CropRef::Label("maize".into()));
        assert_eq!(CropRef::from(7u32), CropRef::Id(7));
    }

    #[test]
    fn test_from_json_reads_camel_case_keys() {
        let config = ScheduleConfig::from_json(
            r#"{
                "waterAvailable": [1,2,3,4,5,6,7,8,9,10,11,12],
                "landAvailable": 50,
                "cropCount": 2,
                "cropCycle": [1, 2],
                "waterUse": [0, 5],
                "cropProfit": [100, 200],
                "cropNames": ["rice", "beans"],
                "cropOffSeason": { "2": [6, 7], "c1": [1] },
                "totalYears": 3,
                "multiYearLag": [0, 1],
                "maxSolveSeconds": 2.5
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.water_available,
            WaterAvailability::Monthly((1..=12).collect())
        );
        assert_eq!(config.land_available, 50);
        assert_eq!(config.crop_count, 2);
        assert_eq!(config.crop_names, Some(vec!["rice".into(), "beans".into()]));
        assert_eq!(config.crop_off_season[&CropRef::Id(2)], vec![6, 7]);
        assert_eq!(config.crop_off_season[&CropRef::Id(1)], vec![1]);
        assert_eq!(config.total_years, 3);
        assert_eq!(config.multi_year_lag, Some(vec![0, 1]));
        assert_eq!(config.max_solve_seconds, 2.5);
        assert!(config.unrecognized.is_empty());
    }

    #[test]
    fn test_from_json_merges_keys_naming_the_same_crop() {
        let config =
            ScheduleConfig::from_json(r#"{ "cropOffSeason": { "2": [2], "c2": [4] } }"#).unwrap();
        assert_eq!(config.crop_off_season.len(), 1);
        let mut months = config.crop_off_season[&CropRef::Id(2)].clone();
        months.sort_unstable();
        assert_eq!(months, vec![2, 4]);
    }

    #[test]
    fn test_from_json_missing_keys_use_defaults() {
        let config = ScheduleConfig::from_json(r#"{ "landAvailable": 7 }"#).unwrap();
        assert_eq!(config.land_available, 7);
        assert_eq!(config.crop_count, 4);
        assert_eq!(config.max_solve_seconds, 10.0);
    }

    #[test]
    fn test_from_json_collects_unknown_keys() {
        let config =
            ScheduleConfig::from_json(r#"{ "maxTime": 5, "noYrs": 2, "landAvailable": 1 }"#)
                .unwrap();
        let keys: Vec<&str> = config.unrecognized.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["maxTime", "noYrs"]);
    }

    #[test]
    fn test_from_json_rejects_malformed_documents() {
        let err = ScheduleConfig::from_json("{ \"landAvailable\": ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_builder_setters() {
        let config = ScheduleConfig::new()
            .with_water_available(500)
            .with_land_available(10)
            .with_crop_count(1)
            .with_crop_cycle(vec![2])
            .with_water_use(vec![1])
            .with_crop_profit(vec![9])
            .with_crop_names(["millet"])
            .with_off_season(1u32, [3, 4])
            .with_off_season("c1", [5])
            .with_total_years(2)
            .with_multi_year_lag(vec![1])
            .with_max_solve_seconds(1.0)
            .with_option("verbose", true);

        assert_eq!(config.water_available, WaterAvailability::Uniform(500));
        assert_eq!(config.crop_off_season[&CropRef::Id(1)], vec![3, 4, 5]);
        assert_eq!(config.crop_names, Some(vec!["millet".to_string()]));
        assert_eq!(config.unrecognized["verbose"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_serialize_keeps_unrecognized_and_skips_empty_options() {
        let config = ScheduleConfig::default().with_option("extra", 1);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["extra"], 1);
        assert!(json.get("cropNames").is_none());
        assert!(json.get("cropOffSeason").is_none());
        assert_eq!(json["landAvailable"], 2000);
    }
}
