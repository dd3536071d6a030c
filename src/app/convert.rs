// QSOMap - app/convert.rs
//
// Conversion pipeline: contact log on disk -> records -> KML on disk.
//
// Fatal conditions (unreadable/empty log, failed write) propagate to the
// caller. Everything else is absorbed: malformed records are dropped by the
// decoder and contacts without a locator are simply left off the map.

use crate::core::export::{self, ExportOptions};
use crate::core::model::ContactRecord;
use crate::core::parser;
use crate::platform::fs;
use crate::util::error::Result;
use std::path::{Path, PathBuf};

/// Outcome of one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub output: PathBuf,
    /// Records handed to the generator.
    pub records: usize,
    /// Contacts placed on the map.
    pub markers: usize,
    /// Own-location to contact lines.
    pub lines: usize,
    /// Contacts without a valid locator.
    pub skipped: usize,
    pub bands: usize,
    pub bytes: usize,
}

/// Read and decode a contact log.
///
/// An empty result is not an error; it is logged so the caller can tell
/// the user the file held no contacts.
pub fn load_contacts(path: &Path) -> Result<Vec<ContactRecord>> {
    let text = fs::read_log_file(path)?;
    let records = parser::decode(&text)?;

    if records.is_empty() {
        tracing::warn!(path = %path.display(), "No contacts found in log file");
    } else {
        tracing::info!(path = %path.display(), qsos = records.len(), "Contact log loaded");
    }
    Ok(records)
}

/// Generate the KML document for `records` and write it to `dest`.
///
/// The document is fully built in memory first and then written
/// atomically, so `dest` either holds the complete new document or is left
/// as it was.
pub fn export_kml<F>(
    records: &[ContactRecord],
    options: &ExportOptions,
    dest: &Path,
    on_progress: F,
) -> Result<ExportSummary>
where
    F: FnMut(usize, usize),
{
    let document = export::generate(records, options, on_progress);
    let text = document.to_text();
    fs::write_atomic(dest, &text)?;

    let summary = ExportSummary {
        output: dest.to_path_buf(),
        records: records.len(),
        markers: document.marker_count(),
        lines: document.line_count(),
        skipped: document.skipped_count(),
        bands: document.band_folder_count(),
        bytes: text.len(),
    };

    tracing::info!(
        path = %dest.display(),
        markers = summary.markers,
        lines = summary.lines,
        skipped = summary.skipped,
        bytes = summary.bytes,
        "KML export written"
    );
    Ok(summary)
}

/// Load `input` and export it to `output` in one go.
pub fn convert<F>(
    input: &Path,
    output: &Path,
    options: &ExportOptions,
    on_progress: F,
) -> Result<ExportSummary>
where
    F: FnMut(usize, usize),
{
    let records = load_contacts(input)?;
    export_kml(&records, options, output, on_progress)
}

/// Default output path: the input path with a `.kml` extension.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(crate::util::constants::KML_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::error::{DecodeError, QsoMapError};
    use tempfile::TempDir;

    fn stamp() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_default_output_path_replaces_extension() {
        assert_eq!(
            default_output_path(Path::new("/logs/2024.adi")),
            PathBuf::from("/logs/2024.kml")
        );
    }

    #[test]
    fn test_load_contacts_empty_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.adi");
        std::fs::write(&path, "   \n").unwrap();

        let result = load_contacts(&path);
        assert!(matches!(
            result,
            Err(QsoMapError::Decode(DecodeError::EmptyInput))
        ));
    }

    #[test]
    fn test_convert_writes_summary() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("log.adi");
        let output = dir.path().join("log.kml");
        std::fs::write(
            &input,
            "<call:5>DL1AB<band:3>20m<gridsquare:4>JO62<eor>\n<call:5>OE3XY<band:3>40m<eor>\n",
        )
        .unwrap();

        let mut options = ExportOptions::new(stamp());
        options.own_locator = Some("JN47".to_string());

        let summary = convert(&input, &output, &options, |_, _| {}).unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.markers, 1);
        assert_eq!(summary.lines, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.bands, 2);

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written.len(), summary.bytes);
        assert!(written.ends_with("</kml>"));
    }
}
