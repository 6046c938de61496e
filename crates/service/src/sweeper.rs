//! Background task that periodically completes overdue pickups.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::pickup::{repository::PickupRepository, PickupService};

/// Handle to a running sweep loop. Dropping it also ends the loop, without
/// waiting; [`Sweeper::shutdown`] stops it and waits.
pub struct Sweeper {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawn the loop on the current runtime. The first sweep runs immediately,
    /// then once per `period`.
    pub fn spawn<R>(service: PickupService<R>, period: Duration) -> Self
    where
        R: PickupRepository + 'static,
    {
        let (shutdown, mut stop) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_secs = period.as_secs_f64(), "sweeper started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => sweep_once(&service).await,
                    changed = stop.changed() => {
                        if changed.is_err() || *stop.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("sweeper stopped");
        });
        Self { shutdown, handle }
    }

    /// Signal the loop to stop and wait for an in-flight sweep to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            error!(error = %e, "sweeper task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

async fn sweep_once<R: PickupRepository>(service: &PickupService<R>) {
    match service.sweep_completed().await {
        Ok(0) => debug!("sweep found nothing overdue"),
        Ok(n) => info!(completed = n, "sweep completed overdue pickups"),
        // the next tick retries
        Err(e) => error!(error = %e, "sweep failed"),
    }
}
