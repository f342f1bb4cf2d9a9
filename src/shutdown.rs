use crate::{Error, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::warn;

/// Drive `future` to completion on a new multi-thread runtime.
///
/// Blocking jobs still running afterwards, such as a stdin read abandoned at
/// a prompt, are left behind instead of being waited for.
pub fn block_on_detached<F: Future>(future: F) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    Ok(output)
}

/// Cooperative cancellation token shared by the fetch and mutation loops
#[derive(Clone, Default)]
pub struct Shutdown {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    requested: AtomicBool,
    notify: Notify,
}

impl std::fmt::Debug for Shutdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shutdown")
            .field("requested", &self.is_requested())
            .finish()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if shutdown has been requested.
    #[inline]
    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::Acquire)
    }

    /// Request shutdown and wake every waiter.
    pub fn request(&self) {
        self.inner.requested.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    /// Resolve once shutdown has been requested.
    pub async fn requested(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_requested() {
                return;
            }
            notified.await;
        }
    }

    /// Sleep for `duration`, returning early with `false` if shutdown was requested.
    pub async fn sleep(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return !self.is_requested();
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => !self.is_requested(),
            _ = self.requested() => false,
        }
    }

    /// Run `job` on the blocking pool, giving up with `Error::Interrupted`
    /// once shutdown is requested. The abandoned job keeps its thread until
    /// it returns.
    pub async fn run_blocking<T, F>(&self, job: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let task = tokio::task::spawn_blocking(job);
        tokio::select! {
            joined = task => {
                joined.map_err(|e| Error::Internal(format!("Blocking task failed: {e}")))
            }
            _ = self.requested() => Err(Error::Interrupted),
        }
    }

    /// Set up the Ctrl+C handler for graceful shutdown.
    ///
    /// The first interrupt lets the current request finish; a second one
    /// exits immediately.
    pub fn install_ctrl_c_handler(&self) {
        let shutdown = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                warn!("Could not install Ctrl+C handler");
                return;
            }

            eprintln!("\n\nShutdown requested, finishing the current request...");
            eprintln!("Press Ctrl+C again to force quit.");
            warn!("Shutdown requested by user");
            shutdown.request();

            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Force quit!");
                std::process::exit(130);
            }
        });
    }
}
