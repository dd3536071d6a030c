// QSOMap - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading (config.toml or legacy settings.json)
// 3. Logging initialisation (debug mode support)
// 4. Running the ADIF -> KML conversion and reporting the outcome

use clap::Parser;
use qsomap::app::convert;
use qsomap::core::i18n::{fill, I18n};
use qsomap::core::locator;
use qsomap::core::model::Locale;
use qsomap::platform::config::{self, PlatformPaths};
use qsomap::util::{self, constants};
use std::error::Error;
use std::path::PathBuf;

/// QSOMap - plot an amateur-radio contact log on a map.
///
/// Reads an ADIF log and writes a KML file for Google Earth and other
/// viewers: one marker per contact grouped by band, coloured by mode, with
/// lines from your own location to every contact.
#[derive(Parser, Debug)]
#[command(name = "qsomap", version, about)]
struct Cli {
    /// ADIF contact log to read (.adi / .adif).
    #[arg(required_unless_present = "print_config")]
    input: Option<PathBuf>,

    /// KML file to write (defaults to the input path with .kml).
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Config file (config.toml or legacy settings.json).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Own Maidenhead locator, overrides the config.
    #[arg(long = "locator")]
    locator: Option<String>,

    /// Own display name, overrides the config.
    #[arg(long = "name")]
    name: Option<String>,

    /// Output language: en | de.
    #[arg(long = "lang")]
    lang: Option<String>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Print an example config.toml and exit.
    #[arg(long = "print-config")]
    print_config: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", constants::EXAMPLE_CONFIG_TOML);
        return;
    }

    // Config is loaded before logging so its level and file can apply;
    // warnings are replayed once the subscriber is up.
    let platform_paths = PlatformPaths::resolve();
    let (mut app_config, config_warnings) =
        config::load_config(&platform_paths, cli.config.as_deref());

    util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "QSOMap starting"
    );
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
        eprintln!("Warning: {warning}");
    }

    apply_overrides(&cli, &mut app_config);

    let Some(input) = cli.input.clone() else {
        return;
    };
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| convert::default_output_path(&input));

    let i18n = I18n::new(app_config.locale);
    let options = app_config.export_options(chrono::Local::now().naive_local());

    let records = match convert::load_contacts(&input) {
        Ok(records) => records,
        Err(e) => fail(&e),
    };
    let input_display = input.display().to_string();
    if records.is_empty() {
        eprintln!(
            "{}",
            fill(i18n.t("status_no_qsos"), &[("path", input_display.as_str())])
        );
    } else {
        println!(
            "{}",
            fill(
                i18n.t("status_loaded"),
                &[
                    ("count", records.len().to_string().as_str()),
                    ("path", input_display.as_str()),
                ],
            )
        );
    }

    let summary = match convert::export_kml(&records, &options, &output, |done, total| {
        tracing::debug!(done, total, "Export progress");
    }) {
        Ok(summary) => summary,
        Err(e) => fail(&e),
    };

    let output_display = summary.output.display().to_string();
    println!(
        "{}",
        fill(
            i18n.t("status_exported"),
            &[
                ("placemarks", summary.markers.to_string().as_str()),
                ("lines", summary.lines.to_string().as_str()),
                ("path", output_display.as_str()),
            ],
        )
    );
    if summary.skipped > 0 {
        println!(
            "{}",
            fill(
                i18n.t("status_skipped"),
                &[("count", summary.skipped.to_string().as_str())],
            )
        );
    }
}

/// CLI values take precedence over the config file.
fn apply_overrides(cli: &Cli, app_config: &mut config::AppConfig) {
    if let Some(ref loc) = cli.locator {
        if locator::is_valid(loc) {
            app_config.own_locator = Some(loc.trim().to_ascii_uppercase());
        } else {
            tracing::warn!(locator = %loc, "Ignoring invalid --locator");
            eprintln!("Warning: '{loc}' is not a valid Maidenhead locator; ignored.");
        }
    }
    if let Some(ref name) = cli.name {
        app_config.own_name = Some(name.trim().to_string()).filter(|n| !n.is_empty());
    }
    if let Some(ref lang) = cli.lang {
        app_config.locale = Locale::from_code(lang);
    }
}

fn fail(err: &qsomap::util::error::QsoMapError) -> ! {
    let mut source = err.source();
    while let Some(cause) = source {
        tracing::debug!(cause = %cause, "Error cause");
        source = cause.source();
    }
    tracing::error!(error = %err, "Conversion failed");
    eprintln!("Error: {err}");
    std::process::exit(1);
}
