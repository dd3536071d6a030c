// QSOMap - core/locator.rs
//
// Maidenhead grid-square locator to latitude/longitude.
//
//   pos 0  A-R  longitude field, 20 deg
//   pos 1  A-R  latitude field,  10 deg
//   pos 2  0-9  longitude square, 2 deg
//   pos 3  0-9  latitude square,  1 deg
//   pos 4  A-X  longitude subsquare, 5'
//   pos 5  A-X  latitude subsquare,  2.5'
//
// The result is the centre of the finest cell given, never its corner.
// Total over its input: malformed locators yield `None`.

use crate::core::model::GeoCoordinate;

const FIELD_LON_DEG: f64 = 20.0;
const FIELD_LAT_DEG: f64 = 10.0;
const SQUARE_LON_DEG: f64 = 2.0;
const SQUARE_LAT_DEG: f64 = 1.0;
const SUBSQUARE_LON_DEG: f64 = 5.0 / 60.0;
const SUBSQUARE_LAT_DEG: f64 = 2.5 / 60.0;

/// Convert a 4- or 6-character locator to the centre of its cell.
///
/// Accepts `&str` or `Option<&str>`. Case-insensitive, surrounding
/// whitespace ignored. A 5-character locator resolves as its 4-character
/// prefix; characters past the sixth are ignored.
pub fn to_coordinate<'a>(locator: impl Into<Option<&'a str>>) -> Option<GeoCoordinate> {
    let locator = locator.into()?.trim().to_ascii_uppercase();
    let bytes = locator.as_bytes();
    if bytes.len() < 4 {
        return None;
    }

    let mut lon = -180.0 + f64::from(letter(bytes[0], b'R')?) * FIELD_LON_DEG;
    let mut lat = -90.0 + f64::from(letter(bytes[1], b'R')?) * FIELD_LAT_DEG;
    lon += f64::from(digit(bytes[2])?) * SQUARE_LON_DEG;
    lat += f64::from(digit(bytes[3])?) * SQUARE_LAT_DEG;

    if bytes.len() >= 6 {
        lon += f64::from(letter(bytes[4], b'X')?) * SUBSQUARE_LON_DEG;
        lat += f64::from(letter(bytes[5], b'X')?) * SUBSQUARE_LAT_DEG;
        lon += SUBSQUARE_LON_DEG / 2.0;
        lat += SUBSQUARE_LAT_DEG / 2.0;
    } else {
        lon += SQUARE_LON_DEG / 2.0;
        lat += SQUARE_LAT_DEG / 2.0;
    }

    Some(GeoCoordinate { lat, lon })
}

/// True when `locator` resolves to a coordinate.
pub fn is_valid(locator: &str) -> bool {
    to_coordinate(locator).is_some()
}

/// Index of an upper-case letter in `A..=last`.
fn letter(b: u8, last: u8) -> Option<u8> {
    (b'A'..=last).contains(&b).then(|| b - b'A')
}

fn digit(b: u8) -> Option<u8> {
    b.is_ascii_digit().then(|| b - b'0')
}
