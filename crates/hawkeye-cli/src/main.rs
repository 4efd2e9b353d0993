//! `hawkeye-cli` – interactive front-end for the HawkEye mapping engine.
//!
//! This binary:
//!
//! 1. Initialises logging (and optional OTLP export) via [`telemetry`].
//! 2. Loads `~/.hawkeye/config.toml`, writing the defaults on first run.
//! 3. Builds one [`HawkEye`][hawkeye_mapping::HawkEye] engine from the config.
//! 4. Drops the user into an **interactive REPL** that casts shapes, moves the
//!    robot and prints the maps.
//! 5. Intercepts **Ctrl-C** to leave the REPL cleanly.

mod config;
mod repl;
mod telemetry;

use colored::Colorize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

fn main() {
    let _telemetry = telemetry::init_tracing("hawkeye");

    print_banner();

    // ── Shared shutdown flag ──────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – leaving HawkEye …".yellow().bold());
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; exit with /quit instead");
    }

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => first_run(),
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };

    let session = match repl::Session::new(&cfg) {
        Ok(session) => session,
        Err(e) => {
            println!("{}: {}", "Cannot build map".red(), e);
            std::process::exit(1);
        }
    };

    println!(
        "  Global map {}x{}, local map {}x{}, base cell '{}'",
        cfg.map.global_width,
        cfg.map.global_height,
        cfg.map.local_width,
        cfg.map.local_height,
        cfg.base_state
    );
    println!();
    println!("  Type {} for a list of commands.\n", "/help".bold().cyan());

    // ── Interactive REPL ──────────────────────────────────────────────────
    repl::run(session, shutdown);
}

/// Write the default config (with env overrides applied) and return it.
fn first_run() -> config::Config {
    let mut cfg = config::Config::default();
    config::apply_env_overrides(&mut cfg);
    match config::save(&cfg) {
        Ok(()) => println!(
            "  {} Default config written to {}",
            "✓".green().bold(),
            config::config_path().display().to_string().bold()
        ),
        Err(e) => println!("{}: {}", "Error saving config".red(), e),
    }
    cfg
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#"  _   _               _    _____           "#.bold().cyan());
    println!("{}", r#" | | | | __ ___      _| | _| ____|   _  ___  "#.bold().cyan());
    println!("{}", r#" | |_| |/ _` \ \ /\ / / |/ /  _|| | | |/ _ \ "#.bold().cyan());
    println!("{}", r#" |  _  | (_| |\ V  V /|   <| |__| |_| |  __/ "#.bold().cyan());
    println!("{}", r#" |_| |_|\__,_| \_/\_/ |_|\_\_____\__, |\___| "#.bold().cyan());
    println!("{}", r#"                                 |___/       "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "HawkEye".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Robot occupancy mapping console");
    println!();
}
