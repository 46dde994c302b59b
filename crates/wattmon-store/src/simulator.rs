//! Background power perturbation task.
//!
//! Simulates sensor noise: every tick applies a bounded random walk to the
//! power draw of each active device. The task is owned by its handle;
//! construction spawns it and [`Simulator::stop`] (or drop) cancels it, so
//! the tick cannot outlive the store's lifecycle.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::store::EnergyStore;

/// Default tick period.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(30);

/// Cancelable recurring tick over a shared store.
///
/// Ticks run to completion under the store lock, so they can never
/// overlap with each other or with foreground mutations.
#[derive(Debug)]
pub struct Simulator {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Simulator {
    /// Spawn the tick task with the given period.
    ///
    /// The first perturbation lands one full period after start.
    pub fn start(store: Arc<Mutex<EnergyStore>>, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            // interval's first tick completes immediately; consume it.
            ticker.tick().await;
            let mut rng = StdRng::from_os_rng();
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let mut store = store.lock().await;
                        store.perturb_active(&mut rng);
                        debug!("Applied background power perturbation");
                    }
                }
            }
            debug!("Simulator tick task stopped");
        });
        Self { cancel, handle }
    }

    /// Spawn with the default 30-second period.
    pub fn start_default(store: Arc<Mutex<EnergyStore>>) -> Self {
        Self::start(store, DEFAULT_TICK_PERIOD)
    }

    /// Whether the tick task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the tick task and wait for it to exit.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        let _ = (&mut self.handle).await;
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
