//! Tokio runtime for the server with a shared shutdown token.
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

pub use tokio_util::sync::CancellationToken;

pub struct ServerRuntime {
    runtime: Runtime,
    cancel: Arc<CancellationToken>,
}

impl ServerRuntime {
    /// Build a multi-threaded runtime. `worker_threads` defaults to the core count.
    ///
    /// ```
    /// use pricewatch_runtime::ServerRuntime;
    /// use std::time::Duration;
    ///
    /// let runtime = ServerRuntime::build("doctest-runtime", Some(1))
    ///     .expect("runtime builds");
    /// let value = runtime.block_on(async { 2 + 2 });
    /// assert_eq!(value, 4);
    /// runtime.shutdown(Duration::from_millis(10));
    /// ```
    pub fn build(thread_name: &str, worker_threads: Option<usize>) -> Result<Self> {
        let mut builder = Builder::new_multi_thread();
        builder.enable_all().thread_name(thread_name);

        if let Some(workers) = worker_threads {
            builder.worker_threads(workers.max(1));
        }

        let runtime = builder.build()?;
        let cancel = Arc::new(CancellationToken::new());
        Ok(Self { runtime, cancel })
    }

    /// Token cancelled on Ctrl-C (see [`ServerRuntime::cancel_on_ctrl_c`]) or
    /// at [`ServerRuntime::shutdown`].
    ///
    /// ```
    /// use pricewatch_runtime::ServerRuntime;
    ///
    /// let runtime = ServerRuntime::build("token-example", Some(1)).unwrap();
    /// assert!(!runtime.cancellation().is_cancelled());
    /// ```
    pub fn cancellation(&self) -> Arc<CancellationToken> {
        self.cancel.clone()
    }

    /// Spawn a watcher that cancels the shared token on Ctrl-C.
    pub fn cancel_on_ctrl_c(&self) {
        let cancel = self.cancel.clone();
        self.runtime.spawn(async move {
            tokio::select! {
                res = tokio::signal::ctrl_c() => {
                    if let Err(e) = res {
                        tracing::warn!(error = %e, "runtime.ctrl_c.listen_failed");
                        return;
                    }
                    tracing::info!("runtime.shutdown.requested");
                    cancel.cancel();
                }
                _ = cancel.cancelled() => {}
            }
        });
    }

    pub fn block_on<F: std::future::Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }

    /// Cancel outstanding work and shut the runtime down.
    ///
    /// ```
    /// use pricewatch_runtime::ServerRuntime;
    /// use std::time::Duration;
    ///
    /// let runtime = ServerRuntime::build("shutdown-example", Some(1)).unwrap();
    /// let token = runtime.cancellation();
    /// runtime.shutdown(Duration::from_millis(5));
    /// assert!(token.is_cancelled());
    /// ```
    pub fn shutdown(self, graceful: Duration) {
        self.cancel.cancel();
        self.runtime.shutdown_timeout(graceful);
    }
}
