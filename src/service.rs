use anyhow::{Context, Result};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

/// Background keep-alive started once permissions are granted.
///
/// The worker thread does no work of its own: it parks until the service is
/// stopped or dropped. Front ends use [`ForegroundService::is_running`] as the
/// user-visible indication.
#[derive(Debug, Default)]
pub struct ForegroundService {
    worker: Option<Worker>,
}

#[derive(Debug)]
struct Worker {
    shutdown: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl ForegroundService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the service. Starting a running service is a no-op.
    pub fn start(&mut self) -> Result<()> {
        if self.worker.is_some() {
            log::debug!("Foreground service already running");
            return Ok(());
        }

        let (shutdown, rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("foreground-service".into())
            .spawn(move || {
                // Returns on an explicit shutdown or when the sender is dropped
                let _ = rx.recv();
                log::debug!("Foreground service worker exiting");
            })
            .context("Failed to spawn foreground service thread")?;

        self.worker = Some(Worker { shutdown, handle });
        log::info!("Foreground service started");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.shutdown.send(());
            if worker.handle.join().is_err() {
                log::warn!("Foreground service thread panicked");
            }
            log::info!("Foreground service stopped");
        }
    }
}

impl Drop for ForegroundService {
    fn drop(&mut self) {
        self.stop();
    }
}
