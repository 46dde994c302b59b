//! Watch command: run the background simulator until interrupted.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::info;

use wattmon_store::{EnergyStore, Simulator};

use crate::format;

pub async fn cmd_watch(store: EnergyStore, period: Duration) -> Result<()> {
    println!(
        "Watching {} devices (tick every {}s, Ctrl-C to stop)",
        store.devices().len(),
        period.as_secs()
    );

    let store = Arc::new(Mutex::new(store));
    let simulator = Simulator::start(Arc::clone(&store), period);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(period) => {
                let store = store.lock().await;
                println!("{}", format::stats_line(&store.stats()));
            }
        }
    }

    info!("Stopping simulator");
    simulator.stop().await;
    Ok(())
}
