//! NoteDeck desktop client library entry point.
//!
//! Exposes a `run` helper so the workspace root can launch the desktop UI
//! without duplicating initialization logic.

mod app;
/// Backend worker + protocol types used by the GUI and headless tests.
pub mod backend;

use app::NoteDeckApp;
use eframe::egui;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "notedeck=warn,notedeck_gui=info";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init();
}

/// Start the desktop UI with tracing enabled.
///
/// # Returns
/// The result of `eframe::run_native`.
///
/// # Errors
/// Propagates any `eframe` initialization or runtime error (including app
/// creation failures when the configured API URL is unusable).
pub fn run() -> eframe::Result<()> {
    init_tracing();

    let app = NoteDeckApp::new().map_err(|err| eframe::Error::AppCreation(Box::new(err)))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(app::DEFAULT_WINDOW_SIZE)
            .with_min_inner_size(app::MIN_WINDOW_SIZE)
            .with_title("NoteDeck"),
        ..Default::default()
    };

    eframe::run_native("NoteDeck", options, Box::new(|_cc| Ok(Box::new(app))))
}
