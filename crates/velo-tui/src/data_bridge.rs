//! Background tasks that feed backend and store data into the action loop.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use velo_core::{BikeService, BookedBike};

use crate::action::{Action, Notification};

/// Forward booking store snapshots to the TUI until cancelled.
pub async fn spawn_store_bridge(
    mut bookings: watch::Receiver<Arc<Vec<Arc<BookedBike>>>>,
    action_tx: UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let _ = action_tx.send(Action::BookingsUpdated(bookings.borrow_and_update().clone()));

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = bookings.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = bookings.borrow_and_update().clone();
                if action_tx.send(Action::BookingsUpdated(snapshot)).is_err() {
                    break;
                }
            }
        }
    }

    debug!("store bridge stopped");
}

/// Fetch the station listing once and report the outcome.
pub async fn load_stations<S: BikeService>(service: Arc<S>, action_tx: UnboundedSender<Action>) {
    let action = match service.list_stations().await {
        Ok(stations) => {
            info!(count = stations.len(), "stations loaded");
            Action::StationsLoaded(Arc::new(stations))
        }
        Err(e) => {
            warn!(error = %e, "station listing failed");
            Action::Notify(Notification::error(format!("Could not load stations: {e}")))
        }
    };
    let _ = action_tx.send(action);
}
