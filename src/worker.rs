//! Background worker for snapshot loading and quote history fetches
//!
//! Keeps the UI responsive while the CSV parses or the quote service answers.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread::{self, JoinHandle};

use crate::data::{HistoryProvider, HistoryWindow, PriceHistory, Universe};
use crate::error::{DashboardError, Result};

/// Requests that can be sent to the background worker
pub enum WorkerRequest {
    /// Load a snapshot CSV
    LoadFile { path: PathBuf },
    /// Fetch closes for `ticker` over `window`
    FetchHistory { ticker: String, window: HistoryWindow },
    /// Shutdown the worker
    Shutdown,
}

/// Results returned from the background worker
pub enum WorkerResult {
    /// Snapshot loaded and validated
    FileLoaded { path: PathBuf, universe: Universe },
    /// Snapshot could not be loaded
    LoadFailed { path: PathBuf, error: DashboardError },
    /// Price history ready; `window` echoes the request
    HistoryReady {
        history: PriceHistory,
        window: HistoryWindow,
    },
    /// Price history fetch failed
    HistoryFailed {
        ticker: String,
        window: HistoryWindow,
        error: DashboardError,
    },
}

/// Background worker that processes requests off the main thread
pub struct BackgroundWorker {
    tx: Sender<WorkerRequest>,
    rx: Receiver<WorkerResult>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundWorker {
    /// Spawn the worker thread; the provider is built on that thread
    pub fn spawn<P, F>(make_provider: F) -> Self
    where
        P: HistoryProvider + 'static,
        F: FnOnce() -> Result<P> + Send + 'static,
    {
        let (req_tx, req_rx) = channel::<WorkerRequest>();
        let (res_tx, res_rx) = channel::<WorkerResult>();

        let handle = thread::Builder::new()
            .name("dashboard-worker".to_string())
            .spawn(move || {
                let provider = make_provider();
                if let Err(e) = &provider {
                    tracing::warn!(error = %e, "quote history provider unavailable");
                }
                Self::worker_loop(provider, req_rx, res_tx);
            })
            .ok();

        if handle.is_none() {
            tracing::error!("failed to spawn background worker thread");
        }

        Self {
            tx: req_tx,
            rx: res_rx,
            handle,
        }
    }

    fn worker_loop<P: HistoryProvider>(
        provider: Result<P>,
        rx: Receiver<WorkerRequest>,
        tx: Sender<WorkerResult>,
    ) {
        while let Ok(request) = rx.recv() {
            let result = match request {
                WorkerRequest::LoadFile { path } => match Universe::load(&path) {
                    Ok(universe) => WorkerResult::FileLoaded { path, universe },
                    Err(error) => {
                        tracing::warn!(path = %path.display(), error = %error, "snapshot load failed");
                        WorkerResult::LoadFailed { path, error }
                    }
                },
                WorkerRequest::FetchHistory { ticker, window } => {
                    let fetched = match &provider {
                        Ok(p) => p.fetch(&ticker, &window),
                        Err(e) => Err(DashboardError::YahooApi(e.to_string())),
                    };
                    match fetched {
                        Ok(history) => WorkerResult::HistoryReady { history, window },
                        Err(error) => {
                            tracing::warn!(ticker = %ticker, error = %error, "history fetch failed");
                            WorkerResult::HistoryFailed {
                                ticker,
                                window,
                                error,
                            }
                        }
                    }
                }
                WorkerRequest::Shutdown => break,
            };

            if tx.send(result).is_err() {
                break;
            }
        }
    }

    /// Send a request to the worker (non-blocking)
    pub fn request(&self, req: WorkerRequest) -> Result<()> {
        self.tx.send(req).map_err(|_| DashboardError::WorkerGone)
    }

    /// Poll for completed work (non-blocking)
    pub fn poll(&self) -> Option<WorkerResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until a result arrives or the timeout passes
    #[cfg(test)]
    pub fn wait(&self, timeout: std::time::Duration) -> Option<WorkerResult> {
        self.rx.recv_timeout(timeout).ok()
    }
}

impl Drop for BackgroundWorker {
    fn drop(&mut self) {
        let _ = self.tx.send(WorkerRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
