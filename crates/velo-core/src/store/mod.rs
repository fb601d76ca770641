// ── Booking store ──
//
// Reducer-style owner of the bikes the user booked. Screens never mutate
// it directly: they send a typed `StoreEvent` through a `StoreHandle`, and
// a single reducer task applies events in order.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{BikeId, BikeRecord, BookedBike, BookingId};

/// Default capacity of the store event channel.
pub const STORE_CHANNEL_SIZE: usize = 64;

/// Mutations the store understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A booking request succeeded with a booking id.
    BikeBooked {
        bike: BikeRecord,
        booking_id: BookingId,
    },
}

/// Sending half of the store event channel.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<StoreEvent>,
}

impl StoreHandle {
    /// Create a handle and the receiver the reducer consumes.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<StoreEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Record that `bike` was booked under `booking_id`.
    pub async fn publish_bike_booked(
        &self,
        bike: BikeRecord,
        booking_id: BookingId,
    ) -> Result<(), CoreError> {
        debug!(bike_id = %bike.id, %booking_id, "publishing bike booked");
        self.tx
            .send(StoreEvent::BikeBooked { bike, booking_id })
            .await
            .map_err(|_| CoreError::Internal("booking store is not running".into()))
    }
}

/// Booked bikes keyed by booking id, with a snapshot for subscribers.
pub struct BookingStore {
    bookings: DashMap<BookingId, Arc<BookedBike>>,
    /// Oldest booking first.
    snapshot: watch::Sender<Arc<Vec<Arc<BookedBike>>>>,
}

impl BookingStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            bookings: DashMap::new(),
            snapshot,
        }
    }

    /// Apply one event.
    pub fn apply(&self, event: StoreEvent) {
        match event {
            StoreEvent::BikeBooked { bike, booking_id } => {
                let entry = BookedBike {
                    bike,
                    booking_id: booking_id.clone(),
                    booked_at: Utc::now(),
                };
                if self.bookings.insert(booking_id, Arc::new(entry)).is_some() {
                    warn!("booking id delivered twice, keeping the latest");
                }
                self.rebuild_snapshot();
            }
        }
    }

    /// Current bookings (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Arc<BookedBike>>> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<BookedBike>>>> {
        self.snapshot.subscribe()
    }

    pub fn get(&self, booking_id: &BookingId) -> Option<Arc<BookedBike>> {
        self.bookings.get(booking_id).map(|r| Arc::clone(r.value()))
    }

    /// Whether any booking refers to `bike_id`.
    pub fn is_booked(&self, bike_id: &BikeId) -> bool {
        self.bookings.iter().any(|r| &r.value().bike.id == bike_id)
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    fn rebuild_snapshot(&self) {
        let mut values: Vec<Arc<BookedBike>> =
            self.bookings.iter().map(|r| Arc::clone(r.value())).collect();
        values.sort_by(|a, b| {
            a.booked_at
                .cmp(&b.booked_at)
                .then_with(|| a.booking_id.cmp(&b.booking_id))
        });
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the reducer until the channel closes or `cancel` fires.
pub fn spawn_reducer(
    store: Arc<BookingStore>,
    mut rx: mpsc::Receiver<StoreEvent>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                event = rx.recv() => {
                    let Some(event) = event else { break };
                    store.apply(event);
                }
            }
        }
        debug!("booking store reducer stopped");
    })
}
