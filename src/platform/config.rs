// QSOMap - platform/config.rs
//
// Platform-specific configuration, directory resolution, and config file
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.
//
// Two file formats are understood:
//   - config.toml    (primary, see config.example.toml)
//   - settings.json  (flat JSON written by the earlier desktop application)
// The core never reads configuration itself: `AppConfig::export_options`
// hands it an explicit `ExportOptions` value.

use crate::core::export::ExportOptions;
use crate::core::locator;
use crate::core::model::{ColorMap, Locale};
use crate::util::constants;
use crate::util::error::ConfigError;
use chrono::NaiveDateTime;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for QSOMap configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/qsomap/ or %APPDATA%\QSOMap\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }

    pub fn legacy_settings_file(&self) -> PathBuf {
        self.config_dir.join(constants::LEGACY_SETTINGS_FILE_NAME)
    }
}

// =============================================================================
// Raw file shapes
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[station]` section.
    pub station: StationSection,
    /// `[display]` section.
    pub display: DisplaySection,
    /// `[colors]` section with `bands` and `modes` sub-tables.
    pub colors: ColorsSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[station]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StationSection {
    /// Own Maidenhead locator.
    pub locator: Option<String>,
    /// Own display name.
    pub name: Option<String>,
}

/// `[display]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// Output language code.
    pub language: Option<String>,
}

/// `[colors]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ColorsSection {
    pub bands: ColorMap,
    pub modes: ColorMap,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Flat settings.json written by the earlier desktop application.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LegacySettings {
    pub language: Option<String>,
    pub my_grid: Option<String>,
    pub my_name: Option<String>,
    pub log_level: Option<String>,
    pub bands_colors: ColorMap,
    pub modes_colors: ColorMap,
}

impl From<LegacySettings> for RawConfig {
    fn from(s: LegacySettings) -> Self {
        RawConfig {
            station: StationSection {
                locator: s.my_grid,
                name: s.my_name,
            },
            display: DisplaySection {
                language: s.language,
            },
            colors: ColorsSection {
                bands: s.bands_colors,
                modes: s.modes_colors,
            },
            logging: LoggingSection {
                level: s.log_level,
                file: None,
            },
        }
    }
}

// =============================================================================
// Validated configuration
// =============================================================================

/// Validated application configuration.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    // -- Station --
    /// Own locator, upper-cased; only kept when it resolves.
    pub own_locator: Option<String>,
    pub own_name: Option<String>,

    // -- Display --
    pub locale: Locale,
    pub band_colors: ColorMap,
    pub mode_colors: ColorMap,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl AppConfig {
    /// Export options for one export run.
    pub fn export_options(&self, generated_at: NaiveDateTime) -> ExportOptions {
        ExportOptions {
            own_locator: self.own_locator.clone(),
            own_name: self.own_name.clone(),
            band_colors: self.band_colors.clone(),
            mode_colors: self.mode_colors.clone(),
            locale: self.locale,
            generated_at,
        }
    }
}

/// Read and parse a config file without validation.
///
/// `.json` files are read as legacy settings, everything else as TOML.
pub fn read_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let legacy: LegacySettings =
            serde_json::from_str(&content).map_err(|source| ConfigError::JsonParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(legacy.into())
    } else {
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load and validate configuration.
///
/// With `explicit` set, only that file is used. Otherwise config.toml in the
/// platform config directory is preferred over a legacy settings.json.
/// A missing file yields defaults with no warnings (first run). An
/// unreadable or unparseable file yields defaults plus a warning: the
/// export still runs, but the user is told.
pub fn load_config(paths: &PlatformPaths, explicit: Option<&Path>) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let candidate = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => [paths.config_file(), paths.legacy_settings_file()]
            .into_iter()
            .find(|p| p.exists()),
    };

    let Some(config_path) = candidate else {
        tracing::debug!(dir = %paths.config_dir.display(), "No config file found; using defaults");
        return (AppConfig::default(), warnings);
    };

    let raw = match read_config_file(&config_path) {
        Ok(raw) => raw,
        Err(ConfigError::Io { source, .. })
            if explicit.is_none() && source.kind() == std::io::ErrorKind::NotFound =>
        {
            return (AppConfig::default(), warnings);
        }
        Err(e) => {
            let msg = format!(
                "{e}. Using defaults. See config.example.toml for the expected format."
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded configuration");
    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Validate each field, accumulating all problems as warnings.
pub fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Station: locator --
    if let Some(loc) = raw.station.locator.as_deref().map(str::trim) {
        if loc.is_empty() {
            // Unset; no QTH pin.
        } else if locator::is_valid(loc) {
            config.own_locator = Some(loc.to_ascii_uppercase());
        } else {
            warnings.push(format!(
                "[station] locator = \"{loc}\" is not a valid Maidenhead locator \
                 (expected e.g. JN47 or JN47FD). QTH pin and lines are disabled.",
            ));
        }
    }

    // -- Station: name --
    config.own_name = raw
        .station
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    // -- Display: language --
    if let Some(ref lang) = raw.display.language {
        match Locale::try_from_code(lang) {
            Some(locale) => config.locale = locale,
            None => warnings.push(format!(
                "[display] language = \"{lang}\" is not recognised. \
                 Expected \"en\" or \"de\". Using default (en).",
            )),
        }
    }

    // -- Colors --
    config.band_colors = validated_colors(raw.colors.bands, "colors.bands", warnings);
    config.mode_colors = validated_colors(raw.colors.modes, "colors.modes", warnings);

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let lower = level.to_lowercase();
        if constants::VALID_LOG_LEVELS.contains(&lower.as_str()) {
            config.log_level = Some(lower);
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: file --
    config.log_file = raw.logging.file.filter(|f| !f.is_empty());

    config
}

/// Drop entries that are not `#RRGGBB`, with one warning each.
fn validated_colors(mut colors: ColorMap, section: &str, warnings: &mut Vec<String>) -> ColorMap {
    colors.retain(|label, color| {
        let ok = is_hex_color(color);
        if !ok {
            warnings.push(format!(
                "[{section}] \"{label}\" = \"{color}\" is not a #RRGGBB colour. Entry ignored.",
            ));
        }
        ok
    });
    colors
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s.bytes().skip(1).all(|b| b.is_ascii_hexdigit())
}
