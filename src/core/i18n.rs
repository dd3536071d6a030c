// QSOMap - core/i18n.rs
//
// Built-in string tables for the supported output languages.
// Templates use `{placeholder}` fields filled by `fill`.

use crate::core::model::Locale;
use std::collections::HashMap;

/// Popup template used when a locale has no `kml_popup` entry.
pub const FALLBACK_POPUP_TEMPLATE: &str =
    "Call: {call}<br>Mode: {mode}<br>Band: {band}<br>Name: {name}<br>Date: {date}<br>Time: {time}";

/// Strings for one locale.
pub struct I18n {
    locale: Locale,
    table: HashMap<&'static str, &'static str>,
}

macro_rules! lang_table {
    ($fn_name:ident, [ $( $k:literal => $v:literal ),* $(,)? ]) => {
        fn $fn_name() -> HashMap<&'static str, &'static str> {
            let mut m = HashMap::new();
            $( m.insert($k, $v); )*
            m
        }
    };
}

// ── English ───────────────────────────────────────────────────────────────────
lang_table!(en_table, [
    "kml_popup"        => "Call: {call}<br>Mode: {mode}<br>Band: {band}<br>Name: {name}<br>Date: {date}<br>Time: {time}",
    "qth_tooltip"      => "Your location",
    "legend_title"     => "Legend",
    "legend_bands"     => "Bands:",
    "legend_modes"     => "Modes:",
    "lines_folder"     => "Lines",
    "status_loaded"    => "Loaded {count} QSOs from {path}",
    "status_no_qsos"   => "No QSOs found in {path}",
    "status_exported"  => "Exported {placemarks} QSOs ({lines} lines) to {path}",
    "status_skipped"   => "{count} QSOs without a valid locator were not placed on the map",
]);

// ── German ────────────────────────────────────────────────────────────────────
lang_table!(de_table, [
    "kml_popup"        => "Rufzeichen: {call}<br>Betriebsart: {mode}<br>Band: {band}<br>Name: {name}<br>Datum: {date}<br>Uhrzeit: {time}",
    "qth_tooltip"      => "Dein Standort",
    "legend_title"     => "Legende",
    "legend_bands"     => "Bänder:",
    "legend_modes"     => "Betriebsarten:",
    "lines_folder"     => "Linien",
    "status_loaded"    => "{count} QSOs aus {path} geladen",
    "status_no_qsos"   => "Keine QSOs in {path} gefunden",
    "status_exported"  => "{placemarks} QSOs ({lines} Linien) nach {path} exportiert",
    "status_skipped"   => "{count} QSOs ohne gültigen Locator wurden nicht auf der Karte platziert",
]);

impl I18n {
    pub fn new(locale: Locale) -> Self {
        let table = match locale {
            Locale::En => en_table(),
            Locale::De => de_table(),
        };
        Self { locale, table }
    }

    /// Build from an explicit table, e.g. a partial translation.
    pub fn with_table(locale: Locale, table: HashMap<&'static str, &'static str>) -> Self {
        Self { locale, table }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Translation for `key`, or `None` when this locale lacks it.
    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.table.get(key).copied()
    }

    /// Translation for `key`, or the key itself when missing.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        self.table.get(key).copied().unwrap_or(key)
    }
}

/// Replace every `{name}` in `template` with its value in a single pass.
///
/// Values are inserted verbatim, never re-expanded. Unknown placeholders
/// are left as written.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((v, close)) => {
                out.push_str(v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_locales_define_the_same_keys() {
        let mut en: Vec<_> = en_table().into_keys().collect();
        let mut de: Vec<_> = de_table().into_keys().collect();
        en.sort_unstable();
        de.sort_unstable();
        assert_eq!(en, de);
    }

    #[test]
    fn test_missing_key_returns_none_and_t_echoes_key() {
        let i18n = I18n::with_table(Locale::De, HashMap::new());
        assert_eq!(i18n.get("kml_popup"), None);
        assert_eq!(i18n.t("kml_popup"), "kml_popup");
    }

    #[test]
    fn test_fill_replaces_all_occurrences() {
        let out = fill("{a}-{b}-{a}", &[("a", "1"), ("b", "2")]);
        assert_eq!(out, "1-2-1");
    }

    #[test]
    fn test_fill_does_not_reexpand_values() {
        let out = fill("{call} {band}", &[("call", "{band}"), ("band", "20m")]);
        assert_eq!(out, "{band} 20m");
    }

    #[test]
    fn test_fill_keeps_unknown_placeholders() {
        assert_eq!(fill("{x} {call", &[("call", "DL1AB")]), "{x} {call");
    }
}
