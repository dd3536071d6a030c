// QSOMap - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Contact record (normalised output of decoding)
// =============================================================================

/// One logged radio contact (QSO).
///
/// ADIF is open-vocabulary: any field name may appear, so a record is a
/// mapping from lower-case field name to trimmed value rather than a fixed
/// struct. No key is guaranteed present. Records are built by the decoder
/// and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContactRecord {
    fields: BTreeMap<String, String>,
}

impl ContactRecord {
    /// Value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value of the first key in `keys` that is present and non-empty.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|k| self.get(k))
            .find(|v| !v.is_empty())
    }

    pub fn call(&self) -> Option<&str> {
        self.get("call")
    }

    pub fn band(&self) -> Option<&str> {
        self.get("band")
    }

    pub fn mode(&self) -> Option<&str> {
        self.get("mode")
    }

    pub fn gridsquare(&self) -> Option<&str> {
        self.get("gridsquare")
    }

    /// Operator name of the contacted station.
    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    /// Raw `YYYYMMDD` date; ADIF `qso_date` or the short `date` form.
    pub fn date(&self) -> Option<&str> {
        self.first_of(&["qso_date", "date"])
    }

    /// Raw `HHMM[SS]` time; ADIF `time_on` or the short `time` form.
    pub fn time(&self) -> Option<&str> {
        self.first_of(&["time_on", "time"])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Later inserts of the same key overwrite earlier ones.
    pub(crate) fn insert(&mut self, key: String, value: String) {
        self.fields.insert(key, value);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContactRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = ContactRecord::default();
        for (k, v) in iter {
            record.insert(k.into(), v.into());
        }
        record
    }
}

// =============================================================================
// Geographic coordinate
// =============================================================================

/// Centre point of a Maidenhead cell, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoordinate {
    /// KML coordinate tuple: `lon,lat,altitude`.
    pub fn kml_tuple(&self) -> String {
        format!("{},{},0", self.lon, self.lat)
    }
}

// =============================================================================
// Colour mapping
// =============================================================================

/// Category label (band or mode) to `#RRGGBB` colour.
///
/// Ordered by label so style definitions and legends come out in a stable
/// order regardless of how the configuration was written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMap(BTreeMap<String, String>);

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, color: impl Into<String>) {
        self.0.insert(label.into(), color.into());
    }

    /// Find the configured entry for `label`.
    ///
    /// Exact match first, then ASCII case-insensitive: decoded records are
    /// lower-cased while configuration keys usually are not. Returns the
    /// key as configured together with its colour.
    pub fn lookup(&self, label: &str) -> Option<(&str, &str)> {
        if let Some((k, v)) = self.0.get_key_value(label) {
            return Some((k.as_str(), v.as_str()));
        }
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(label))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.0.retain(|k, v| keep(k, v));
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColorMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// =============================================================================
// Locale
// =============================================================================

/// Output language: controls date formats and description templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
}

impl Locale {
    /// Parse a language code; anything unrecognised falls back to `En`.
    pub fn from_code(code: &str) -> Self {
        Self::try_from_code(code).unwrap_or_default()
    }

    /// Strict variant used by config validation to report unknown codes.
    pub fn try_from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Locale::En),
            "de" => Some(Locale::De),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
