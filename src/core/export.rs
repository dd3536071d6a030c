// QSOMap - core/export.rs
//
// KML (Google Earth) export of decoded contacts.
// Core layer: builds the document in memory; writing it is the platform
// layer's job so a failed write never leaves half a document behind.
//
// Document order:
//   header (+ LookAt over own location)
//   styles: line_<band>, marker_<mode>, shared defaults
//   legend placemark
//   own-location pin
//   one folder per band with one marker per locatable contact
//   lines folder (own location -> each locatable contact)
//   footer

use crate::core::i18n::{fill, I18n, FALLBACK_POPUP_TEMPLATE};
use crate::core::locator;
use crate::core::model::{ColorMap, ContactRecord, GeoCoordinate, Locale};
use crate::util::constants::{
    DEFAULT_KML_COLOR, DEFAULT_LINE_STYLE_ID, DEFAULT_MARKER_STYLE_ID, EXPORT_TITLE_PREFIX,
    KML_ICON_HREF, KML_ICON_SCALE, KML_LINE_WIDTH, KML_LOOKAT_RANGE_M, KML_NAMESPACE,
    KML_OPAQUE_ALPHA, PROGRESS_INTERVAL, UNKNOWN_BAND, UNKNOWN_LABEL,
};
use chrono::NaiveDateTime;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::collections::HashMap;

/// Per-call export configuration. Nothing is read from global state.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Own Maidenhead locator; enables the QTH pin and connecting lines.
    pub own_locator: Option<String>,
    /// Own display name shown on the QTH pin.
    pub own_name: Option<String>,
    /// Line colour per band (`#RRGGBB`).
    pub band_colors: ColorMap,
    /// Marker colour per mode (`#RRGGBB`).
    pub mode_colors: ColorMap,
    pub locale: Locale,
    /// Timestamp written into the document name.
    pub generated_at: NaiveDateTime,
}

impl ExportOptions {
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self {
            own_locator: None,
            own_name: None,
            band_colors: ColorMap::new(),
            mode_colors: ColorMap::new(),
            locale: Locale::default(),
            generated_at,
        }
    }
}

/// A complete KML document as ordered output lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    lines: Vec<String>,
    markers: usize,
    connecting_lines: usize,
    skipped: usize,
    band_folders: usize,
}

impl ExportDocument {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The document text, lines joined with `\n`.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Number of contact markers (legend and QTH pin excluded).
    pub fn marker_count(&self) -> usize {
        self.markers
    }

    /// Number of own-location to contact lines.
    pub fn line_count(&self) -> usize {
        self.connecting_lines
    }

    /// Contacts left off the map for lack of a valid locator.
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    pub fn band_folder_count(&self) -> usize {
        self.band_folders
    }
}

/// Generate the KML document for `records`.
///
/// `on_progress(processed, total)` is called every `PROGRESS_INTERVAL`
/// records and once at the end. It only observes; output does not depend
/// on it.
pub fn generate<F>(records: &[ContactRecord], options: &ExportOptions, on_progress: F) -> ExportDocument
where
    F: FnMut(usize, usize),
{
    let i18n = I18n::new(options.locale);
    generate_with_i18n(records, options, &i18n, on_progress)
}

/// As [`generate`], with an explicit string table.
pub fn generate_with_i18n<F>(
    records: &[ContactRecord],
    options: &ExportOptions,
    i18n: &I18n,
    mut on_progress: F,
) -> ExportDocument
where
    F: FnMut(usize, usize),
{
    let own_pos = options.own_locator.as_deref().and_then(locator::to_coordinate);
    if options.own_locator.is_some() && own_pos.is_none() {
        tracing::warn!(
            locator = options.own_locator.as_deref().unwrap_or(""),
            "Own locator is invalid; QTH pin and lines omitted"
        );
    }

    let groups = group_by_band(records);
    let locale = options.locale;
    let mut kml = KmlWriter::default();

    write_header(&mut kml, options, own_pos);
    write_styles(&mut kml, &options.band_colors, &options.mode_colors);
    write_legend(&mut kml, &options.band_colors, &options.mode_colors, i18n);
    if let Some(pos) = own_pos {
        write_own_pin(&mut kml, pos, options, i18n);
    }

    let total = records.len();
    let mut processed = 0;
    let mut markers = 0;
    let mut skipped = 0;

    for group in &groups {
        kml.open("Folder");
        kml.leaf("name", &group.band);
        for (record, pos) in &group.contacts {
            processed += 1;
            match pos {
                Some(pos) => {
                    write_marker(&mut kml, record, &group.band, *pos, options, i18n);
                    markers += 1;
                }
                None => {
                    skipped += 1;
                    tracing::trace!(
                        call = record.call().unwrap_or(""),
                        grid = record.gridsquare().unwrap_or(""),
                        "Contact without valid locator skipped"
                    );
                }
            }
            if processed % PROGRESS_INTERVAL == 0 && processed < total {
                on_progress(processed, total);
            }
        }
        kml.close("Folder");
    }
    on_progress(processed, total);

    let mut connecting_lines = 0;
    if let Some(own) = own_pos {
        kml.open("Folder");
        kml.leaf("name", i18n.get("lines_folder").unwrap_or("Lines"));
        kml.leaf("visibility", "1");
        for group in &groups {
            let style = band_line_style(&options.band_colors, &group.band);
            for (_, pos) in &group.contacts {
                if let Some(pos) = pos {
                    write_line(&mut kml, own, *pos, &style);
                    connecting_lines += 1;
                }
            }
        }
        kml.close("Folder");
    }

    kml.close("Document");
    kml.raw("</kml>");

    tracing::debug!(
        records = total,
        bands = groups.len(),
        markers,
        lines = connecting_lines,
        skipped,
        locale = %locale,
        "KML document generated"
    );

    ExportDocument {
        lines: kml.lines,
        markers,
        connecting_lines,
        skipped,
        band_folders: groups.len(),
    }
}

// =============================================================================
// Grouping
// =============================================================================

struct BandGroup<'a> {
    band: String,
    contacts: Vec<(&'a ContactRecord, Option<GeoCoordinate>)>,
}

/// Group by band in first-seen order; input order is kept within a band.
/// Each contact's locator is resolved once here.
fn group_by_band(records: &[ContactRecord]) -> Vec<BandGroup<'_>> {
    let mut groups: Vec<BandGroup<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let band = record
            .band()
            .filter(|b| !b.is_empty())
            .unwrap_or(UNKNOWN_BAND);
        let pos = record.gridsquare().and_then(locator::to_coordinate);
        let slot = *index.entry(band).or_insert_with(|| {
            groups.push(BandGroup {
                band: band.to_string(),
                contacts: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].contacts.push((record, pos));
    }
    groups
}

// =============================================================================
// Sections
// =============================================================================

fn write_header(kml: &mut KmlWriter, options: &ExportOptions, own_pos: Option<GeoCoordinate>) {
    kml.raw(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    kml.raw(&format!(r#"<kml xmlns="{KML_NAMESPACE}">"#));
    kml.open("Document");

    let stamp_format = match options.locale {
        Locale::De => "%d.%m.%Y - %H:%M",
        Locale::En => "%Y-%m-%d - %H:%M",
    };
    let stamp = options.generated_at.format(stamp_format);
    kml.leaf("name", &format!("{EXPORT_TITLE_PREFIX} - {stamp}"));

    if let Some(pos) = own_pos {
        kml.open("LookAt");
        kml.leaf("longitude", &pos.lon.to_string());
        kml.leaf("latitude", &pos.lat.to_string());
        kml.leaf("altitude", "0");
        kml.leaf("range", &KML_LOOKAT_RANGE_M.to_string());
        kml.leaf("tilt", "0");
        kml.leaf("heading", "0");
        kml.leaf("altitudeMode", "relativeToGround");
        kml.close("LookAt");
    }
}

fn write_styles(kml: &mut KmlWriter, band_colors: &ColorMap, mode_colors: &ColorMap) {
    for (band, color) in band_colors.iter() {
        write_line_style(kml, &format!("line_{band}"), &kml_color(color));
    }
    for (mode, color) in mode_colors.iter() {
        write_marker_style(kml, &format!("marker_{mode}"), &kml_color(color));
    }
    write_line_style(kml, DEFAULT_LINE_STYLE_ID, DEFAULT_KML_COLOR);
    write_marker_style(kml, DEFAULT_MARKER_STYLE_ID, DEFAULT_KML_COLOR);
}

fn write_line_style(kml: &mut KmlWriter, id: &str, color: &str) {
    kml.open_with_id("Style", id);
    kml.open("LineStyle");
    kml.leaf("color", color);
    kml.leaf("width", &KML_LINE_WIDTH.to_string());
    kml.close("LineStyle");
    kml.close("Style");
}

fn write_marker_style(kml: &mut KmlWriter, id: &str, color: &str) {
    kml.open_with_id("Style", id);
    kml.open("IconStyle");
    kml.leaf("color", color);
    kml.leaf("scale", KML_ICON_SCALE);
    kml.open("Icon");
    kml.leaf("href", KML_ICON_HREF);
    kml.close("Icon");
    kml.close("IconStyle");
    kml.close("Style");
}

fn write_legend(kml: &mut KmlWriter, band_colors: &ColorMap, mode_colors: &ColorMap, i18n: &I18n) {
    let mut html = String::new();
    legend_section(&mut html, i18n.get("legend_bands").unwrap_or("Bands:"), band_colors);
    html.push_str("<br>");
    legend_section(&mut html, i18n.get("legend_modes").unwrap_or("Modes:"), mode_colors);

    kml.open("Placemark");
    kml.leaf("name", i18n.get("legend_title").unwrap_or("Legend"));
    kml.cdata("description", &html);
    write_point(kml, "0,0,0");
    kml.close("Placemark");
}

fn legend_section(html: &mut String, title: &str, colors: &ColorMap) {
    html.push_str(&format!("<b>{}</b><br>", encode_text(title)));
    for (label, color) in colors.iter() {
        html.push_str(&format!(
            "<span style=\"color:{}\">&#9632;</span> {}<br>",
            encode_double_quoted_attribute(color),
            encode_text(label)
        ));
    }
}

fn write_own_pin(kml: &mut KmlWriter, pos: GeoCoordinate, options: &ExportOptions, i18n: &I18n) {
    let tooltip = i18n.get("qth_tooltip").unwrap_or("Your location");
    let grid = options
        .own_locator
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_ascii_uppercase();
    let description = match options.own_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => format!("{tooltip}: {name} ({grid})"),
        _ => format!("{tooltip} ({grid})"),
    };

    kml.open("Placemark");
    kml.leaf("name", "QTH");
    kml.leaf("description", &description);
    write_point(kml, &pos.kml_tuple());
    kml.close("Placemark");
}

fn write_marker(
    kml: &mut KmlWriter,
    record: &ContactRecord,
    band: &str,
    pos: GeoCoordinate,
    options: &ExportOptions,
    i18n: &I18n,
) {
    let call = upper_or_unknown(record.call());
    let mode = upper_or_unknown(record.mode());
    let date = record
        .date()
        .map(|d| format_date(d, options.locale))
        .unwrap_or_default();
    let time = record.time().map(format_time).unwrap_or_default();
    let name = record.name().unwrap_or_default();

    let template = i18n.get("kml_popup").unwrap_or(FALLBACK_POPUP_TEMPLATE);
    let escaped: Vec<(&str, String)> = [
        ("call", call.as_str()),
        ("mode", mode.as_str()),
        ("band", band),
        ("name", name),
        ("date", date.as_str()),
        ("time", time.as_str()),
    ]
    .into_iter()
    .map(|(k, v)| (k, encode_text(v).into_owned()))
    .collect();
    let values: Vec<(&str, &str)> = escaped.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let description = fill(template, &values);

    let style = match options.mode_colors.lookup(&mode) {
        Some((key, _)) => format!("#marker_{key}"),
        None => format!("#{DEFAULT_MARKER_STYLE_ID}"),
    };

    kml.open("Placemark");
    kml.leaf("name", &format!("{call} ({mode})"));
    kml.cdata("description", &description);
    kml.leaf("styleUrl", &style);
    write_point(kml, &pos.kml_tuple());
    kml.close("Placemark");
}

fn band_line_style(band_colors: &ColorMap, band: &str) -> String {
    match band_colors.lookup(band) {
        Some((key, _)) => format!("#line_{key}"),
        None => format!("#{DEFAULT_LINE_STYLE_ID}"),
    }
}

fn write_line(kml: &mut KmlWriter, from: GeoCoordinate, to: GeoCoordinate, style: &str) {
    kml.open("Placemark");
    kml.leaf("styleUrl", style);
    kml.open("LineString");
    kml.leaf(
        "coordinates",
        &format!("{} {}", from.kml_tuple(), to.kml_tuple()),
    );
    kml.close("LineString");
    kml.close("Placemark");
}

fn write_point(kml: &mut KmlWriter, coordinates: &str) {
    kml.open("Point");
    kml.leaf("coordinates", coordinates);
    kml.close("Point");
}

fn upper_or_unknown(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_uppercase(),
        _ => UNKNOWN_LABEL.to_string(),
    }
}

// =============================================================================
// Value formatting
// =============================================================================

/// Re-encode `#RRGGBB` as KML `aabbggrr` with an opaque alpha channel.
///
/// Anything that is not six hex digits yields the default colour.
pub fn kml_color(hex: &str) -> String {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return DEFAULT_KML_COLOR.to_string();
    }
    let (r, g, b) = (&digits[0..2], &digits[2..4], &digits[4..6]);
    format!("{KML_OPAQUE_ALPHA}{b}{g}{r}").to_ascii_lowercase()
}

/// Format an ADIF `YYYYMMDD` date for `locale`; other input is returned as-is.
pub fn format_date(raw: &str, locale: Locale) -> String {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.to_string();
    }
    let (year, month, day) = (&raw[0..4], &raw[4..6], &raw[6..8]);
    match locale {
        Locale::De => format!("{day}.{month}.{year}"),
        Locale::En => format!("{year}-{month}-{day}"),
    }
}

/// Format an ADIF `HHMM` or `HHMMSS` time; other input is returned as-is.
pub fn format_time(raw: &str) -> String {
    if !matches!(raw.len(), 4 | 6) || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.to_string();
    }
    match raw.len() {
        6 => format!("{}:{}:{}", &raw[0..2], &raw[2..4], &raw[4..6]),
        _ => format!("{}:{}", &raw[0..2], &raw[2..4]),
    }
}

// =============================================================================
// Line writer
// =============================================================================

/// Appends indented markup lines; every text value is XML-escaped.
#[derive(Default)]
struct KmlWriter {
    lines: Vec<String>,
    depth: usize,
}

impl KmlWriter {
    fn push(&mut self, line: String) {
        let indent = "  ".repeat(self.depth);
        self.lines.push(format!("{indent}{line}"));
    }

    fn raw(&mut self, line: &str) {
        self.push(line.to_string());
    }

    fn open(&mut self, tag: &str) {
        self.push(format!("<{tag}>"));
        self.depth += 1;
    }

    fn open_with_id(&mut self, tag: &str, id: &str) {
        self.push(format!("<{tag} id=\"{}\">", encode_double_quoted_attribute(id)));
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.push(format!("</{tag}>"));
    }

    fn leaf(&mut self, tag: &str, text: &str) {
        self.push(format!("<{tag}>{}</{tag}>", encode_text(text)));
    }

    /// Element whose content is an HTML fragment wrapped in CDATA.
    fn cdata(&mut self, tag: &str, html: &str) {
        let safe = html.replace("]]>", "]]]]><![CDATA[>");
        self.push(format!("<{tag}><![CDATA[{safe}]]></{tag}>"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(18, 5, 0)
            .unwrap()
    }

    fn rec(fields: &[(&str, &str)]) -> ContactRecord {
        fields.iter().copied().collect()
    }

    fn options() -> ExportOptions {
        let mut opts = ExportOptions::new(stamp());
        opts.own_locator = Some("JN47FD".to_string());
        opts.band_colors = [("20m", "#3388FF"), ("40m", "#FF0000")].into_iter().collect();
        opts.mode_colors = [("FT8", "#00FF00")].into_iter().collect();
        opts
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_kml_color_channel_order() {
        assert_eq!(kml_color("#3388FF"), "ffff8833");
        assert_eq!(kml_color("#112233"), "ff332211");
    }

    #[test]
    fn test_kml_color_invalid_defaults_to_white() {
        assert_eq!(kml_color("#12345"), DEFAULT_KML_COLOR);
        assert_eq!(kml_color("red"), DEFAULT_KML_COLOR);
        assert_eq!(kml_color("#GGHHII"), DEFAULT_KML_COLOR);
    }

    #[test]
    fn test_format_date_by_locale() {
        assert_eq!(format_date("20240115", Locale::De), "15.01.2024");
        assert_eq!(format_date("20240115", Locale::En), "2024-01-15");
        assert_eq!(format_date("2024011", Locale::En), "2024011");
        assert_eq!(format_date("", Locale::De), "");
    }

    #[test]
    fn test_format_time_lengths() {
        assert_eq!(format_time("1430"), "14:30");
        assert_eq!(format_time("143022"), "14:30:22");
        assert_eq!(format_time("14302"), "14302");
        assert_eq!(format_time("14ü"), "14ü");
    }

    #[test]
    fn test_one_marker_and_one_line_when_second_contact_has_no_locator() {
        let records = vec![
            rec(&[("call", "dl1ab"), ("band", "20m"), ("mode", "ft8"), ("gridsquare", "jo62")]),
            rec(&[("call", "oe3xy"), ("band", "40m"), ("mode", "cw")]),
        ];
        let doc = generate(&records, &options(), |_, _| {});
        let text = doc.to_text();

        assert_eq!(doc.marker_count(), 1);
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.skipped_count(), 1);
        assert_eq!(doc.band_folder_count(), 2);
        assert_eq!(count(&text, "<LineString>"), 1);
        assert!(text.contains("<name>40m</name>"), "empty band folder still emitted");
        assert!(text.contains("<name>DL1AB (FT8)</name>"));
        assert!(!text.contains("OE3XY"));
    }

    #[test]
    fn test_without_own_locator_no_pin_and_no_lines() {
        let mut opts = options();
        opts.own_locator = Some("XX".to_string());
        let records = vec![rec(&[("call", "dl1ab"), ("band", "20m"), ("gridsquare", "jo62")])];
        let doc = generate(&records, &opts, |_, _| {});
        let text = doc.to_text();

        assert_eq!(doc.marker_count(), 1);
        assert_eq!(doc.line_count(), 0);
        assert!(!text.contains("<name>QTH</name>"));
        assert!(!text.contains("<LookAt>"));
        assert!(!text.contains("<name>Lines</name>"));
    }

    #[test]
    fn test_band_folders_in_first_seen_order_with_unknown_bucket() {
        let records = vec![
            rec(&[("call", "a1"), ("band", "40m"), ("gridsquare", "jo62")]),
            rec(&[("call", "b2"), ("gridsquare", "jn47")]),
            rec(&[("call", "c3"), ("band", "20m"), ("gridsquare", "io91")]),
            rec(&[("call", "d4"), ("band", "40m"), ("gridsquare", "km72")]),
        ];
        let text = generate(&records, &options(), |_, _| {}).to_text();

        let pos = |needle: &str| text.find(needle).unwrap_or_else(|| panic!("missing {needle}"));
        assert!(pos("<name>40m</name>") < pos("<name>Unknown</name>"));
        assert!(pos("<name>Unknown</name>") < pos("<name>20m</name>"));
        // D4 is grouped with A1 inside the 40m folder, before the Unknown folder.
        assert!(pos("<name>A1 (UNKNOWN)</name>") < pos("<name>D4 (UNKNOWN)</name>"));
        assert!(pos("<name>D4 (UNKNOWN)</name>") < pos("<name>Unknown</name>"));
    }

    #[test]
    fn test_styles_and_default_style_references() {
        let records = vec![
            rec(&[("call", "dl1ab"), ("band", "20m"), ("mode", "ft8"), ("gridsquare", "jo62")]),
            rec(&[("call", "g4abc"), ("band", "6m"), ("mode", "ssb"), ("gridsquare", "io91")]),
        ];
        let text = generate(&records, &options(), |_, _| {}).to_text();

        assert!(text.contains(r#"<Style id="line_20m">"#));
        assert!(text.contains(r#"<Style id="marker_FT8">"#));
        assert!(text.contains("<color>ffff8833</color>"));
        assert!(text.contains("<styleUrl>#marker_FT8</styleUrl>"));
        assert!(text.contains("<styleUrl>#default_marker</styleUrl>"));
        assert!(text.contains("<styleUrl>#line_20m</styleUrl>"));
        assert!(text.contains("<styleUrl>#default_line</styleUrl>"));

        let line_styles = text.find(r#"<Style id="line_20m">"#).unwrap();
        let marker_styles = text.find(r#"<Style id="marker_FT8">"#).unwrap();
        assert!(line_styles < marker_styles, "line styles precede marker styles");
    }

    #[test]
    fn test_section_order() {
        let records = vec![rec(&[("call", "dl1ab"), ("band", "20m"), ("gridsquare", "jo62")])];
        let text = generate(&records, &options(), |_, _| {}).to_text();

        let order = [
            "<?xml",
            "<Document>",
            "<LookAt>",
            "<Style id=",
            "<name>Legend</name>",
            "<name>QTH</name>",
            "<name>20m</name>",
            "<name>Lines</name>",
            "</Document>",
            "</kml>",
        ];
        let positions: Vec<usize> = order.iter().map(|n| text.find(n).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn test_localized_description_and_header() {
        let mut opts = options();
        opts.locale = Locale::De;
        let records = vec![rec(&[
            ("call", "dl1ab"),
            ("band", "20m"),
            ("mode", "ft8"),
            ("name", "hans"),
            ("qso_date", "20240115"),
            ("time_on", "143022"),
            ("gridsquare", "jo62"),
        ])];
        let text = generate(&records, &opts, |_, _| {}).to_text();

        assert!(text.contains("<name>QSOMap Export - 09.03.2024 - 18:05</name>"));
        assert!(text.contains("Rufzeichen: DL1AB<br>Betriebsart: FT8<br>Band: 20m"));
        assert!(text.contains("Datum: 15.01.2024<br>Uhrzeit: 14:30:22"));
        assert!(text.contains("<name>Legende</name>"));
    }

    #[test]
    fn test_missing_translation_uses_fallback_template() {
        let i18n = I18n::with_table(Locale::De, HashMap::new());
        let mut opts = options();
        opts.locale = Locale::De;
        let records = vec![rec(&[
            ("call", "dl1ab"),
            ("band", "20m"),
            ("mode", "cw"),
            ("qso_date", "20240115"),
            ("gridsquare", "jo62"),
        ])];
        let text = generate_with_i18n(&records, &opts, &i18n, |_, _| {}).to_text();

        assert!(text.contains("Call: DL1AB<br>Mode: CW<br>Band: 20m<br>Name: <br>Date: 15.01.2024"));
    }

    #[test]
    fn test_markup_in_values_is_escaped() {
        let records = vec![rec(&[
            ("call", "a&b"),
            ("band", "<20m>"),
            ("name", "x]]>y"),
            ("gridsquare", "jo62"),
        ])];
        let text = generate(&records, &options(), |_, _| {}).to_text();

        assert!(text.contains("<name>A&amp;B (UNKNOWN)</name>"));
        assert!(text.contains("<name>&lt;20m&gt;</name>"));
        assert!(!text.contains("x]]>y"));
    }

    #[test]
    fn test_legend_lists_all_colors() {
        let text = generate(&[], &options(), |_, _| {}).to_text();
        assert!(text.contains(r#"<span style="color:#3388FF">&#9632;</span> 20m<br>"#));
        assert!(text.contains(r#"<span style="color:#FF0000">&#9632;</span> 40m<br>"#));
        assert!(text.contains(r#"<span style="color:#00FF00">&#9632;</span> FT8<br>"#));
    }

    #[test]
    fn test_output_is_byte_identical_across_runs() {
        let records = vec![
            rec(&[("call", "dl1ab"), ("band", "20m"), ("mode", "ft8"), ("gridsquare", "jo62")]),
            rec(&[("call", "oe3xy"), ("band", "40m"), ("gridsquare", "jn88")]),
        ];
        let first = generate(&records, &options(), |_, _| {}).to_text();
        let second = generate(&records, &options(), |_, _| {}).to_text();
        assert_eq!(first, second);
    }

    #[test]
    fn test_progress_reports_and_does_not_change_output() {
        let records: Vec<ContactRecord> = (0..250)
            .map(|i| {
                let call = format!("dl{i}ab");
                rec(&[("call", call.as_str()), ("band", "20m"), ("gridsquare", "jo62")])
            })
            .collect();

        let mut calls = Vec::new();
        let with_progress = generate(&records, &options(), |done, total| calls.push((done, total)));
        let without = generate(&records, &options(), |_, _| {});

        assert_eq!(calls, vec![(100, 250), (200, 250), (250, 250)]);
        assert_eq!(with_progress, without);
    }

    #[test]
    fn test_coordinates_are_lon_lat() {
        let records = vec![rec(&[("call", "dl1ab"), ("gridsquare", "jn47")])];
        let text = generate(&records, &options(), |_, _| {}).to_text();
        assert!(text.contains("<coordinates>9,47.5,0</coordinates>"));
    }
}
