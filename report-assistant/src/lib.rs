// SCADA Report Assistant
// Main library entry point

pub mod backend;
pub mod config;
pub mod data;
pub mod models;
pub mod navigation;
pub mod panels;
mod tui;
pub mod utils;
pub mod wizard;

use crate::config::AppConfig;
use crate::models::responses::{ApiResponse, WizardTranscript};
use log::{error, info};
use std::path::Path;

/// One human-readable line with the `[PHASE:] [STEP:]` tags lifted out of the message.
fn text_line(message: &std::fmt::Arguments, record: &log::Record) -> String {
    let timestamp_local = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let (phase, step, cleaned_message) = utils::logging::parse_log_metadata(&message.to_string());
    utils::logging::format_human_readable_log(
        &timestamp_local.to_string(),
        record.level(),
        record.target(),
        &cleaned_message,
        phase.as_deref(),
        step.as_deref(),
    )
}

fn json_line(message: &std::fmt::Arguments, record: &log::Record) -> String {
    let timestamp_utc = chrono::Utc::now().to_rfc3339();
    let (phase, step, cleaned_message) = utils::logging::parse_log_metadata(&message.to_string());
    utils::logging::format_json_log(
        &timestamp_utc,
        record.level(),
        record.target(),
        &cleaned_message,
        phase.as_deref(),
        step.as_deref(),
    )
}

/// Initialize logging with dual file output (JSON `.log` + human-readable `.txt`) and an
/// optional human-readable stderr stream. The TUI runs without the console stream.
fn init_logging(with_console: bool, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = utils::path_resolver::resolve_log_folder(config.log_dir.as_deref())?;
    std::fs::create_dir_all(&log_dir)?;

    let timestamp = chrono::Utc::now().format("%Y-%m-%d-%H%M%S");
    let json_log_file = log_dir.join(format!("report-assistant-{}.log", timestamp));
    let txt_log_file = log_dir.join(format!("report-assistant-{}.txt", timestamp));

    let mut dispatch = fern::Dispatch::new()
        .level(config.log_level_filter()?)
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!("{}", json_line(message, record)))
                })
                .chain(fern::log_file(json_log_file)?),
        )
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!("{}", text_line(message, record)))
                })
                .chain(fern::log_file(txt_log_file)?),
        );

    if with_console {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!("{}", text_line(message, record)))
                })
                .chain(std::io::stderr()),
        );
    }

    dispatch.apply()?;

    log::info!(
        "[PHASE: initialization] Logging initialized, log directory: {:?}",
        log_dir
    );
    Ok(())
}

fn load_config(config_path: Option<&Path>) -> AppConfig {
    match AppConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

pub fn run_tui(config_path: Option<&Path>) {
    let config = load_config(config_path);

    // Initialize logging (no stdout to avoid corrupting the TUI)
    if let Err(e) = init_logging(false, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!(
        "[PHASE: initialization] Report assistant starting at {}",
        chrono::Utc::now()
    );

    if let Err(e) = tui::run(&config) {
        error!("[PHASE: tui] [STEP: exit] TUI exited with error: {:?}", e);
        eprintln!("Report assistant error: {}", e);
        std::process::exit(1);
    }
}

/// Non-interactive TUI smoke test: renders one frame of `target` and exits 0/1.
pub fn run_tui_smoke(target: Option<String>, config_path: Option<&Path>) {
    let config = load_config(config_path);

    // Initialize logging (no stdout to avoid corrupting the terminal)
    if let Err(e) = init_logging(false, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!(
        "[PHASE: initialization] TUI smoke starting at {}",
        chrono::Utc::now()
    );

    let target = target.as_deref().unwrap_or("login");
    if let Err(e) = tui::smoke(&config, target) {
        error!(
            "[PHASE: tui] [STEP: smoke] TUI smoke exited with error: {:?}",
            e
        );
        eprintln!("Report assistant error: {}", e);
        std::process::exit(1);
    }
}

/// Deterministic wizard run through the stub reporting service.
/// Prints the JSON transcript to stdout and exits 0/1.
pub fn run_wizard_smoke(config_path: Option<&Path>) {
    let config = load_config(config_path);

    // Console log lines go to stderr; stdout carries only the JSON transcript.
    if let Err(e) = init_logging(true, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!(
        "[PHASE: initialization] Wizard smoke starting at {}",
        chrono::Utc::now()
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build();
    let result = match rt {
        Ok(rt) => rt.block_on(backend::smoke::wizard_smoke(&config)),
        Err(e) => Err(anyhow::anyhow!(
            "Failed to create async runtime for wizard smoke: {}",
            e
        )),
    };

    let (response, ok) = match result {
        Ok(transcript) => (ApiResponse::ok(transcript), true),
        Err(e) => {
            error!(
                "[PHASE: report] [STEP: wizard_smoke] Smoke exited with error: {:?}",
                e
            );
            (ApiResponse::<WizardTranscript>::fail(e.to_string()), false)
        }
    };

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize wizard transcript: {}", e);
            std::process::exit(1);
        }
    }

    if !ok {
        std::process::exit(1);
    }
}

/// Print the effective configuration (defaults, file, environment) as TOML.
pub fn print_config(config_path: Option<&Path>) {
    let config = load_config(config_path);
    match config.to_toml() {
        Ok(text) => print!("{}", text),
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}
