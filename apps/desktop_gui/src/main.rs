use std::{path::PathBuf, sync::Arc, time::Duration};

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use clap::Parser;
use client_core::BookSource;
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;
use ui::{BookBrowserApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(about = "Desktop book browser")]
struct Args {
    /// Catalog file (.json or .toml); the built-in sample is used when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Simulated search latency in milliseconds.
    #[arg(long, default_value_t = 800)]
    latency_ms: u64,
}

impl From<Args> for StartupConfig {
    fn from(args: Args) -> Self {
        Self {
            catalog_path: args.catalog,
            search_latency: Duration::from_millis(args.latency_ms),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let startup = StartupConfig::from(Args::parse());
    let catalog = Arc::new(startup.load_catalog()?);
    tracing::info!(
        authors = catalog.list_authors().len(),
        latency_ms = startup.search_latency.as_millis() as u64,
        "starting book browser"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Book Browser")
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Book Browser",
        options,
        Box::new(move |cc| {
            let repaint_ctx = cc.egui_ctx.clone();
            let source: Arc<dyn BookSource> = catalog.clone();
            backend_bridge::runtime::launch(
                cmd_rx,
                ui_tx,
                source,
                startup.search_latency,
                move || repaint_ctx.request_repaint(),
            );
            Ok(Box::new(BookBrowserApp::new(catalog, cmd_tx, ui_rx)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to run desktop UI: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_map_to_startup_config() {
        let args = Args::parse_from(["desktop_gui", "--latency-ms", "0"]);
        let startup = StartupConfig::from(args);
        assert_eq!(startup.search_latency, Duration::ZERO);
        assert!(startup.catalog_path.is_none());
        assert_eq!(
            startup.load_catalog().expect("sample").list_authors().len(),
            3
        );
    }

    #[test]
    fn default_latency_matches_simulated_delay() {
        let startup = StartupConfig::from(Args::parse_from(["desktop_gui"]));
        assert_eq!(startup.search_latency, client_core::DEFAULT_SEARCH_LATENCY);
    }
}
