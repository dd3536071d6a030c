// QSOMap - core/parser.rs
//
// ADIF contact-log decoding.
// Core layer: accepts text or raw bytes, never touches the filesystem.
//
// Only the minimal ADIF subset is supported: `<name[:len[:type]]>value`
// fields, `<eor>` record separators and an optional header ending in
// `<eoh>`. The length specifier is ignored; a value runs to the next `<`.
//
// The whole input is lower-cased before parsing. Field names become
// case-insensitive, but values lose their casing too: consumers that need
// upper-case call signs or modes must re-uppercase them.

use crate::core::model::ContactRecord;
use crate::util::constants::{ADIF_END_OF_HEADER, ADIF_END_OF_RECORD};
use crate::util::error::DecodeError;
use encoding_rs::WINDOWS_1252;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Turn raw file bytes into text.
///
/// UTF-8 is tried first (a leading byte-order mark is dropped); when that
/// fails the bytes are decoded as Windows-1252, the superset of ISO-8859-1
/// that legacy logging programs write.
pub fn decode_bytes(bytes: &[u8]) -> Result<String, DecodeError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_owned()),
        Err(utf8_err) => {
            tracing::debug!(
                valid_up_to = utf8_err.valid_up_to(),
                "Input is not UTF-8; falling back to Windows-1252"
            );
            WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned())
                .ok_or(DecodeError::UnreadableEncoding { len: bytes.len() })
        }
    }
}

/// Decode ADIF text into contact records, in input order.
///
/// Blank input is a fatal error. Segments that yield no usable field are
/// dropped silently, so a log containing only garbage decodes to an empty
/// list rather than an error.
pub fn decode(text: &str) -> Result<Vec<ContactRecord>, DecodeError> {
    if text.trim().is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let lowered = text.to_lowercase();
    let body = strip_header(&lowered);

    let segments = body.split(ADIF_END_OF_RECORD);
    let records: Vec<ContactRecord> = segments.filter_map(parse_record).collect();

    tracing::debug!(
        bytes = text.len(),
        has_header = body.len() != lowered.len(),
        records = records.len(),
        "ADIF decoded"
    );

    Ok(records)
}

/// Drop everything up to and including `<eoh>`, if the log has a header.
fn strip_header(text: &str) -> &str {
    match text.find(ADIF_END_OF_HEADER) {
        Some(pos) => &text[pos + ADIF_END_OF_HEADER.len()..],
        None => text,
    }
}

/// Parse one `<eor>`-delimited segment. `None` if it holds no field.
fn parse_record(segment: &str) -> Option<ContactRecord> {
    // Text before the first `<` is not part of any field.
    let record = segment
        .split('<')
        .skip(1)
        .filter_map(parse_field)
        .fold(ContactRecord::default(), |mut record, (key, value)| {
            record.insert(key, value);
            record
        });

    (!record.is_empty()).then_some(record)
}

/// Parse the text following one `<`: `name[:len[:type]]>value`.
fn parse_field(piece: &str) -> Option<(String, String)> {
    let (tag, value) = piece.split_once('>')?;
    let name = tag.split(':').next().unwrap_or_default().trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_record_lowercased() {
        let records = decode("<call:6>DB4REB<band>20m<mode>FT8<eor>").unwrap();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.len(), 3);
        assert_eq!(rec.call(), Some("db4reb"));
        assert_eq!(rec.band(), Some("20m"));
        assert_eq!(rec.mode(), Some("ft8"));
    }

    #[test]
    fn test_trailing_blank_segment_is_dropped() {
        let text = "<call:5>DL1AB<band:3>40m<eor>\n<call:5>OE3XY<band:3>20m<eor>\n  \n";
        let records = decode(text).unwrap();
        assert_eq!(records.len(), 2, "trailing whitespace must not become a record");
        assert_eq!(records[0].call(), Some("dl1ab"));
        assert_eq!(records[1].call(), Some("oe3xy"));
    }

    #[test]
    fn test_end_of_record_is_case_insensitive() {
        let records = decode("<call:4>K1AB<EOR><call:4>W2CD<EoR>").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_values_are_trimmed_and_length_suffix_ignored() {
        let records = decode("<NAME:4:S>  Hans  \n<GRIDSQUARE:6>jn47fd\r\n<eor>").unwrap();
        assert_eq!(records[0].name(), Some("hans"));
        assert_eq!(records[0].gridsquare(), Some("jn47fd"));
    }

    #[test]
    fn test_duplicate_field_last_value_wins() {
        let records = decode("<band>20m<band>40m<eor>").unwrap();
        assert_eq!(records[0].band(), Some("40m"));
    }

    #[test]
    fn test_header_fields_do_not_leak_into_first_record() {
        let text = "Exported by some logger\n<adif_ver:5>3.1.4<programid:4>TEST<eoh>\n\
                    <call:5>DL1AB<eor>";
        let records = decode(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("adif_ver"), None);
        assert_eq!(records[0].get("programid"), None);
        assert_eq!(records[0].call(), Some("dl1ab"));
    }

    #[test]
    fn test_malformed_tags_are_skipped() {
        // `<>` has no name, `<broken` has no closing bracket.
        let records = decode("<>x<broken value<call>DL1AB<eor>").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), 1);
        assert_eq!(records[0].call(), Some("dl1ab"));
    }

    #[test]
    fn test_text_before_first_tag_is_not_a_field() {
        let records = decode("junk>text<call>DL1AB<eor>").unwrap();
        assert_eq!(records[0].get("junk"), None);
    }

    #[test]
    fn test_no_usable_records_is_empty_not_error() {
        let records = decode("just some notes\n<eor>\n<eor>").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_blank_input_is_fatal() {
        assert!(matches!(decode(""), Err(DecodeError::EmptyInput)));
        assert!(matches!(decode("  \n\t"), Err(DecodeError::EmptyInput)));
    }

    #[test]
    fn test_decode_bytes_utf8_with_bom() {
        let text = decode_bytes(b"\xEF\xBB\xBF<name>J\xC3\xBCrgen<eor>").unwrap();
        assert_eq!(text, "<name>Jürgen<eor>");
    }

    #[test]
    fn test_decode_bytes_falls_back_to_windows_1252() {
        // 0xFC is 'ü' in Latin-1 and invalid as a lone UTF-8 byte.
        let text = decode_bytes(b"<name>J\xFCrgen<eor>").unwrap();
        assert_eq!(text, "<name>Jürgen<eor>");

        let records = decode(&text).unwrap();
        assert_eq!(records[0].name(), Some("jürgen"));
    }
}
