// QSOMap - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "QSOMap";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "QSOMap";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Input limits
// =============================================================================

/// Maximum size of a contact log file accepted for decoding.
///
/// ADIF is a compact text format; even a lifetime log of several hundred
/// thousand contacts stays well below this.
pub const MAX_INPUT_FILE_SIZE: u64 = 256 * 1024 * 1024; // 256 MB

/// ADIF end-of-record token (input is lower-cased before matching).
pub const ADIF_END_OF_RECORD: &str = "<eor>";

/// ADIF end-of-header token (input is lower-cased before matching).
pub const ADIF_END_OF_HEADER: &str = "<eoh>";

// =============================================================================
// KML output
// =============================================================================

/// KML 2.2 namespace.
pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// KML colour used for any band/mode missing from its colour mapping
/// (opaque white, `aabbggrr`).
pub const DEFAULT_KML_COLOR: &str = "ffffffff";

/// Alpha channel written for every configured colour (fully opaque).
pub const KML_OPAQUE_ALPHA: &str = "ff";

/// Width of the connecting lines in pixels.
pub const KML_LINE_WIDTH: u32 = 2;

/// Scale factor of contact marker icons.
pub const KML_ICON_SCALE: &str = "1.2";

/// Icon used for contact markers; tinted by the mode colour.
pub const KML_ICON_HREF: &str = "http://maps.google.com/mapfiles/kml/paddle/wht-blank.png";

/// Camera distance in metres for the initial view over the own location.
pub const KML_LOOKAT_RANGE_M: u32 = 2_000_000;

/// Style id shared by lines whose band has no configured colour.
pub const DEFAULT_LINE_STYLE_ID: &str = "default_line";

/// Style id shared by markers whose mode has no configured colour.
pub const DEFAULT_MARKER_STYLE_ID: &str = "default_marker";

/// Bucket name for contacts without a band field.
pub const UNKNOWN_BAND: &str = "Unknown";

/// Placeholder for a missing call sign or mode in marker names.
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

/// Document name prefix; the export timestamp is appended.
pub const EXPORT_TITLE_PREFIX: &str = "QSOMap Export";

/// Number of records processed between two progress notifications.
pub const PROGRESS_INTERVAL: usize = 100;

// =============================================================================
// Configuration & logging
// =============================================================================

/// Default log level when neither RUST_LOG, --debug, nor config specifies one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings file written by the earlier desktop application (JSON).
pub const LEGACY_SETTINGS_FILE_NAME: &str = "settings.json";

/// Extension given to exported documents when no output path is specified.
pub const KML_EXTENSION: &str = "kml";

/// Example configuration, embedded for `--print-config`.
pub const EXAMPLE_CONFIG_TOML: &str = include_str!("../../config.example.toml");
