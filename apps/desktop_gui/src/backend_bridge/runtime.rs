//! Backend worker: owns the tokio runtime and answers queued searches and cover fetches.

use std::{sync::Arc, thread, time::Duration};

use client_core::{run_search, BookSource};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::backend_bridge::covers::fetch_cover;
use crate::controller::events::UiEvent;

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    source: Arc<dyn BookSource>,
    latency: Duration,
    repaint: impl Fn() + Send + Sync + 'static,
) {
    let repaint = Arc::new(repaint);
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: {err}"
                )));
                return;
            }
        };

        let http = reqwest::Client::new();
        runtime.block_on(async move {
            tracing::debug!(latency_ms = latency.as_millis() as u64, "backend worker ready");
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Search { ticket } => {
                        // Each search runs on its own task; the UI drops superseded results.
                        let source = Arc::clone(&source);
                        let ui_tx = ui_tx.clone();
                        let repaint = Arc::clone(&repaint);
                        tokio::spawn(async move {
                            let outcome = run_search(source.as_ref(), ticket, latency).await;
                            if ui_tx.send(UiEvent::SearchFinished(outcome)).is_ok() {
                                repaint();
                            }
                        });
                    }
                    BackendCommand::FetchCover { book_id, url } => {
                        let http = http.clone();
                        let ui_tx = ui_tx.clone();
                        let repaint = Arc::clone(&repaint);
                        tokio::spawn(async move {
                            let event = match fetch_cover(&http, &url).await {
                                Ok(image) => UiEvent::CoverLoaded { book_id, image },
                                Err(reason) => {
                                    tracing::warn!(%book_id, %reason, "cover fetch failed");
                                    UiEvent::CoverFailed { book_id, reason }
                                }
                            };
                            if ui_tx.send(event).is_ok() {
                                repaint();
                            }
                        });
                    }
                }
            }
            tracing::debug!("command queue closed; backend worker stopping");
        });
    });
}
