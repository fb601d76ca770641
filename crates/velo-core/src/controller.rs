// ── Station detail controller ──
//
// Headless state machine behind the station detail screen. It owns the
// `ViewState`, drives the details and booking request lifecycles on the
// tokio runtime, and reports outcomes to the host and the booking store.
//
// Every spawned lifecycle carries a child token of the mount token.
// Completions re-check their token inside `send_if_modified`, so a
// superseded or unmounted lifecycle never touches state or collaborators.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::host::ScreenHost;
use crate::lifecycle::{LifecycleSlot, RequestPhase};
use crate::model::{BikeRecord, BookingResult, StationDetails, StationId};
use crate::service::BikeService;
use crate::store::StoreHandle;
use crate::view::ViewState;

/// Alert title for a failed details fetch.
pub const DETAILS_ERROR_TITLE: &str = "Error fetching stations";
/// Alert title for a failed booking.
pub const BOOKING_ERROR_TITLE: &str = "Error booking bike";

/// Controller for one mounted station detail screen.
///
/// Dropping the controller (or calling [`unmount`](Self::unmount)) cancels
/// every pending request; late completions are discarded.
pub struct StationDetailController<S: BikeService, H: ScreenHost> {
    inner: Arc<Inner<S, H>>,
}

struct Inner<S, H> {
    service: Arc<S>,
    host: Arc<H>,
    store: StoreHandle,
    state: watch::Sender<ViewState>,
    /// Parent of every lifecycle token. Cancelled on unmount.
    cancel: CancellationToken,
    details: Mutex<LifecycleSlot>,
}

impl<S: BikeService, H: ScreenHost> StationDetailController<S, H> {
    /// Mount the screen for `station_id`.
    ///
    /// Sets the screen title to `station_name` and issues exactly one
    /// details request. Must be called from within a tokio runtime.
    pub fn mount(
        service: Arc<S>,
        host: Arc<H>,
        store: StoreHandle,
        station_id: StationId,
        station_name: impl Into<String>,
    ) -> Self {
        let station_name = station_name.into();
        let (state, _) = watch::channel(ViewState::new(station_id.clone(), station_name.clone()));

        let inner = Arc::new(Inner {
            service,
            host,
            store,
            state,
            cancel: CancellationToken::new(),
            details: Mutex::new(LifecycleSlot::default()),
        });

        debug!(%station_id, "mounting station detail");
        inner.host.set_screen_title(&station_name);
        let token = inner.details_slot().begin(&inner.cancel);
        inner.state.send_modify(|s| s.details_phase = RequestPhase::Loading);
        Inner::spawn_details_fetch(&inner, station_id, token);

        Self { inner }
    }

    /// Point the screen at a (possibly) different station.
    ///
    /// A new details request is issued only when `station_id` differs from
    /// the current one; the in-flight request for the old station is
    /// cancelled and the old details are cleared. The title is re-set only
    /// when `station_name` changes.
    pub fn set_station(&self, station_id: StationId, station_name: impl Into<String>) {
        let station_name = station_name.into();
        let mut name_changed = false;
        let mut fresh = None;

        let mut slot = self.inner.details_slot();
        self.inner.state.send_if_modified(|s| {
            if s.station_name != station_name {
                s.station_name.clone_from(&station_name);
                name_changed = true;
            }
            if s.station_id != station_id {
                // The old fetch must be cancelled before it can observe the
                // new station id.
                fresh = Some(slot.begin(&self.inner.cancel));
                s.station_id = station_id.clone();
                s.details = None;
                s.details_phase = RequestPhase::Loading;
            }
            name_changed || fresh.is_some()
        });
        drop(slot);

        if name_changed {
            self.inner.host.set_screen_title(&station_name);
        }
        if let Some(token) = fresh {
            debug!(%station_id, "station changed, refetching details");
            Inner::spawn_details_fetch(&self.inner, station_id, token);
        }
    }

    /// Book `bike`.
    ///
    /// Issues exactly one booking request for the bike's id. The bike's
    /// status is not re-checked here: the backend decides. While a booking
    /// is in flight further calls are rejected with
    /// [`CoreError::BookingInProgress`].
    pub fn request_booking(&self, bike: &BikeRecord) -> Result<(), CoreError> {
        let mut in_flight = None;
        let accepted = self.inner.state.send_if_modified(|s| {
            if s.booking_loading() {
                in_flight.clone_from(&s.booking_bike);
                return false;
            }
            s.booking_phase = RequestPhase::Loading;
            s.booking_bike = Some(bike.id.clone());
            true
        });

        if !accepted {
            let bike_id = in_flight.map_or_else(|| bike.id.to_string(), |id| id.to_string());
            return Err(CoreError::BookingInProgress { bike_id });
        }

        debug!(bike_id = %bike.id, "booking bike");
        Inner::spawn_booking(&self.inner, bike.clone());
        Ok(())
    }

    /// Current view state (cloned snapshot).
    pub fn view_state(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to view state changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    pub fn station_id(&self) -> StationId {
        self.inner.state.borrow().station_id.clone()
    }

    /// Tear the screen down. Pending completions are discarded.
    pub fn unmount(self) {
        debug!(station_id = %self.station_id(), "unmounting station detail");
        // Drop does the cancellation.
    }
}

impl<S: BikeService, H: ScreenHost> Drop for StationDetailController<S, H> {
    fn drop(&mut self) {
        self.inner.details_slot().cancel();
        self.inner.cancel.cancel();
    }
}

impl<S: BikeService, H: ScreenHost> Inner<S, H> {
    fn details_slot(&self) -> MutexGuard<'_, LifecycleSlot> {
        self.details.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Details lifecycle ────────────────────────────────────────────

    fn spawn_details_fetch(this: &Arc<Self>, station_id: StationId, token: CancellationToken) {
        let this = Arc::clone(this);
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(%station_id, "details request cancelled");
                    return;
                }
                result = this.service.fetch_station_details(&station_id) => result,
            };
            this.complete_details(&token, &station_id, result);
        });
    }

    fn complete_details(
        &self,
        token: &CancellationToken,
        station_id: &StationId,
        result: Result<Option<StationDetails>, CoreError>,
    ) {
        match result {
            Ok(Some(details)) => {
                self.settle(token, |s| {
                    s.details = Some(Arc::new(details));
                    s.details_phase = RequestPhase::Succeeded;
                });
            }
            Ok(None) => {
                if self.settle(token, |s| s.details_phase = RequestPhase::Succeeded) {
                    debug!(%station_id, "no station details returned");
                }
            }
            Err(e) => {
                if self.settle(token, |s| s.details_phase = RequestPhase::Failed) {
                    debug!(%station_id, error = %e, "station details request failed");
                    self.host.alert(DETAILS_ERROR_TITLE, &e.to_string());
                }
            }
        }
    }

    // ── Booking lifecycle ────────────────────────────────────────────

    fn spawn_booking(this: &Arc<Self>, bike: BikeRecord) {
        let token = this.cancel.child_token();

        let this = Arc::clone(this);
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(bike_id = %bike.id, "booking request cancelled");
                    return;
                }
                result = this.service.book_bike(&bike.id) => result,
            };
            this.complete_booking(&token, bike, result).await;
        });
    }

    async fn complete_booking(
        &self,
        token: &CancellationToken,
        bike: BikeRecord,
        result: Result<Option<BookingResult>, CoreError>,
    ) {
        match result {
            Ok(Some(BookingResult {
                booking_id: Some(booking_id),
            })) => {
                if !self.settle(token, |s| s.booking_phase = RequestPhase::Succeeded) {
                    return;
                }
                debug!(bike_id = %bike.id, %booking_id, "bike booked");
                if let Err(e) = self.store.publish_bike_booked(bike, booking_id).await {
                    warn!(error = %e, "could not record booking");
                }
                self.host.navigate_back();
            }
            Ok(_) => {
                if self.settle(token, |s| s.booking_phase = RequestPhase::Succeeded) {
                    debug!(bike_id = %bike.id, "booking returned no booking id");
                }
            }
            Err(e) => {
                if self.settle(token, |s| s.booking_phase = RequestPhase::Failed) {
                    debug!(bike_id = %bike.id, error = %e, "booking request failed");
                    self.host.alert(BOOKING_ERROR_TITLE, &e.to_string());
                }
            }
        }
    }

    /// Apply a completion unless its lifecycle was cancelled. Returns
    /// whether it was applied.
    fn settle(&self, token: &CancellationToken, apply: impl FnOnce(&mut ViewState)) -> bool {
        self.state.send_if_modified(|s| {
            if token.is_cancelled() {
                return false;
            }
            apply(s);
            true
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use pretty_assertions::assert_eq;
    use tokio::sync::{Semaphore, mpsc};
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::model::{BikeId, BikeStatus, BookingId, StationSummary};
    use crate::store::StoreEvent;
    use crate::view::{BikeRow, Content};

    type DetailsReply =
        Box<dyn Fn(&StationId) -> Result<Option<StationDetails>, CoreError> + Send + Sync>;
    type BookingReply = Box<dyn Fn(&BikeId) -> Result<Option<BookingResult>, CoreError> + Send + Sync>;

    // ── Fakes ────────────────────────────────────────────────────────

    struct FakeService {
        details: DetailsReply,
        booking: BookingReply,
        /// When set, every call waits for a permit before answering.
        gate: Option<Semaphore>,
        details_calls: Mutex<Vec<StationId>>,
        booking_calls: Mutex<Vec<BikeId>>,
        finished: AtomicUsize,
    }

    impl FakeService {
        fn new() -> Self {
            Self {
                details: Box::new(|_| Ok(Some(station_s1()))),
                booking: Box::new(|_| {
                    Ok(Some(BookingResult {
                        booking_id: Some(BookingId::from("B9")),
                    }))
                }),
                gate: None,
                details_calls: Mutex::new(Vec::new()),
                booking_calls: Mutex::new(Vec::new()),
                finished: AtomicUsize::new(0),
            }
        }

        fn gated(mut self) -> Self {
            self.gate = Some(Semaphore::new(0));
            self
        }

        fn with_details(
            mut self,
            reply: impl Fn(&StationId) -> Result<Option<StationDetails>, CoreError>
            + Send
            + Sync
            + 'static,
        ) -> Self {
            self.details = Box::new(reply);
            self
        }

        fn with_booking(
            mut self,
            reply: impl Fn(&BikeId) -> Result<Option<BookingResult>, CoreError> + Send + Sync + 'static,
        ) -> Self {
            self.booking = Box::new(reply);
            self
        }

        fn release(&self, n: usize) {
            if let Some(gate) = &self.gate {
                gate.add_permits(n);
            }
        }

        async fn pass_gate(&self) {
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
        }

        fn details_calls(&self) -> Vec<StationId> {
            self.details_calls.lock().unwrap().clone()
        }

        fn booking_calls(&self) -> Vec<BikeId> {
            self.booking_calls.lock().unwrap().clone()
        }
    }

    impl BikeService for FakeService {
        async fn list_stations(&self) -> Result<Vec<StationSummary>, CoreError> {
            Ok(Vec::new())
        }

        async fn fetch_station_details(
            &self,
            station_id: &StationId,
        ) -> Result<Option<StationDetails>, CoreError> {
            self.details_calls.lock().unwrap().push(station_id.clone());
            self.pass_gate().await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            (self.details)(station_id)
        }

        async fn book_bike(&self, bike_id: &BikeId) -> Result<Option<BookingResult>, CoreError> {
            self.booking_calls.lock().unwrap().push(bike_id.clone());
            self.pass_gate().await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            (self.booking)(bike_id)
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum HostCall {
        Title(String),
        Back,
        Alert { title: String, message: String },
    }

    type TitleHook = Box<dyn FnMut(&str) + Send>;

    #[derive(Default)]
    struct FakeHost {
        calls: Mutex<Vec<HostCall>>,
        on_title: Mutex<Option<TitleHook>>,
        /// Store receiver drained at each back navigation.
        store_rx: Mutex<Option<mpsc::Receiver<StoreEvent>>>,
        published_before_back: Mutex<Vec<StoreEvent>>,
    }

    impl FakeHost {
        fn on_title(&self, hook: impl FnMut(&str) + Send + 'static) {
            *self.on_title.lock().unwrap() = Some(Box::new(hook));
        }

        fn watch_store(&self, rx: mpsc::Receiver<StoreEvent>) {
            *self.store_rx.lock().unwrap() = Some(rx);
        }

        fn published_before_back(&self) -> Vec<StoreEvent> {
            self.published_before_back.lock().unwrap().clone()
        }

        fn calls(&self) -> Vec<HostCall> {
            self.calls.lock().unwrap().clone()
        }

        fn alerts(&self) -> Vec<HostCall> {
            self.calls()
                .into_iter()
                .filter(|c| matches!(c, HostCall::Alert { .. }))
                .collect()
        }

        fn backs(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, HostCall::Back))
                .count()
        }
    }

    impl ScreenHost for FakeHost {
        fn set_screen_title(&self, title: &str) {
            self.calls.lock().unwrap().push(HostCall::Title(title.into()));
            if let Some(hook) = self.on_title.lock().unwrap().as_mut() {
                hook(title);
            }
        }

        fn navigate_back(&self) {
            if let Some(rx) = self.store_rx.lock().unwrap().as_mut() {
                let mut published = self.published_before_back.lock().unwrap();
                while let Ok(event) = rx.try_recv() {
                    published.push(event);
                }
            }
            self.calls.lock().unwrap().push(HostCall::Back);
        }

        fn alert(&self, title: &str, message: &str) {
            self.calls.lock().unwrap().push(HostCall::Alert {
                title: title.into(),
                message: message.into(),
            });
        }
    }

    // ── Fixtures ─────────────────────────────────────────────────────

    fn bike1() -> BikeRecord {
        BikeRecord {
            id: BikeId::Numeric(1),
            model: "M1".into(),
            battery: 10,
            status: BikeStatus::Available,
        }
    }

    fn station_s1() -> StationDetails {
        StationDetails {
            id: None,
            name: None,
            bikes: vec![bike1()],
        }
    }

    struct Harness {
        service: Arc<FakeService>,
        host: Arc<FakeHost>,
        store_rx: mpsc::Receiver<StoreEvent>,
        controller: StationDetailController<FakeService, FakeHost>,
    }

    fn mount(service: FakeService) -> Harness {
        let service = Arc::new(service);
        let host = Arc::new(FakeHost::default());
        let (store, store_rx) = StoreHandle::channel(8);
        let controller = StationDetailController::mount(
            Arc::clone(&service),
            Arc::clone(&host),
            store,
            StationId::from("S1"),
            "Central",
        );
        Harness {
            service,
            host,
            store_rx,
            controller,
        }
    }

    async fn details_settled(controller: &StationDetailController<FakeService, FakeHost>) {
        controller
            .subscribe()
            .wait_for(|s| s.details_phase.is_settled())
            .await
            .unwrap();
    }

    async fn booking_settled(controller: &StationDetailController<FakeService, FakeHost>) {
        controller
            .subscribe()
            .wait_for(|s| s.booking_phase.is_settled())
            .await
            .unwrap();
    }

    /// Let spawned tasks run to completion under paused time.
    async fn quiesce() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    // ── Details lifecycle ────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn mount_issues_one_request_and_loads_until_settled() {
        let h = mount(FakeService::new().gated());

        assert!(h.controller.view_state().details_loading());
        assert_eq!(h.controller.view_state().content(25), Content::Hidden);
        quiesce().await;
        assert_eq!(h.service.details_calls(), vec![StationId::from("S1")]);
        assert!(h.controller.view_state().details_loading());

        h.service.release(1);
        details_settled(&h.controller).await;

        let state = h.controller.view_state();
        assert!(!state.details_loading());
        assert_eq!(h.service.details_calls().len(), 1);
        assert_eq!(h.host.calls(), vec![HostCall::Title("Central".into())]);
    }

    #[tokio::test]
    async fn stored_details_equal_response() {
        let h = mount(FakeService::new());
        details_settled(&h.controller).await;

        let state = h.controller.view_state();
        assert_eq!(state.details.as_deref(), Some(&station_s1()));
        assert_eq!(state.details_phase, RequestPhase::Succeeded);
    }

    #[tokio::test]
    async fn scenario_one_bike_row_flagged_and_bookable() {
        let h = mount(FakeService::new());
        details_settled(&h.controller).await;

        let Content::Bikes(rows) = h.controller.view_state().content(25) else {
            panic!("list should be visible once details settle");
        };
        assert_eq!(
            rows,
            vec![BikeRow {
                id: BikeId::Numeric(1),
                model: "M1".into(),
                battery: 10,
                battery_low: true,
                status: BikeStatus::Available,
                status_flagged: false,
                can_book: true,
            }]
        );
    }

    #[tokio::test]
    async fn details_failure_alerts_and_leaves_details_unset() {
        let h = mount(FakeService::new().with_details(|_| {
            Err(CoreError::Api {
                message: "boom".into(),
                status: Some(500),
            })
        }));
        details_settled(&h.controller).await;

        let state = h.controller.view_state();
        assert!(!state.details_loading());
        assert_eq!(state.details_phase, RequestPhase::Failed);
        assert!(state.details.is_none());
        assert_eq!(
            h.host.alerts(),
            vec![HostCall::Alert {
                title: DETAILS_ERROR_TITLE.into(),
                message: "API error: boom".into(),
            }]
        );
    }

    #[tokio::test]
    async fn empty_details_is_silent() {
        let h = mount(FakeService::new().with_details(|_| Ok(None)));
        details_settled(&h.controller).await;

        let state = h.controller.view_state();
        assert!(!state.details_loading());
        assert!(state.details.is_none());
        assert!(h.host.alerts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn same_station_issues_no_new_request() {
        let h = mount(FakeService::new());
        details_settled(&h.controller).await;

        h.controller.set_station(StationId::from("S1"), "Central");
        quiesce().await;

        assert_eq!(h.service.details_calls().len(), 1);
        assert_eq!(h.host.calls(), vec![HostCall::Title("Central".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn name_change_only_resets_title() {
        let h = mount(FakeService::new());
        details_settled(&h.controller).await;

        h.controller.set_station(StationId::from("S1"), "Central Square");
        quiesce().await;

        assert_eq!(h.service.details_calls().len(), 1);
        assert_eq!(
            h.host.calls(),
            vec![
                HostCall::Title("Central".into()),
                HostCall::Title("Central Square".into()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn station_change_cancels_stale_request() {
        let h = mount(
            FakeService::new()
                .gated()
                .with_details(|id| {
                    let mut details = station_s1();
                    details.name = Some(id.to_string());
                    Ok(Some(details))
                }),
        );
        quiesce().await;

        h.controller.set_station(StationId::from("S2"), "Harbour");
        h.service.release(2);
        details_settled(&h.controller).await;
        quiesce().await;

        let state = h.controller.view_state();
        assert_eq!(state.station_id, StationId::from("S2"));
        assert_eq!(
            state.details.as_ref().and_then(|d| d.name.clone()),
            Some("S2".into())
        );
        assert_eq!(
            h.service.details_calls(),
            vec![StationId::from("S1"), StationId::from("S2")]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn old_fetch_settling_during_station_change_is_discarded() {
        let service = Arc::new(FakeService::new().gated().with_details(|id| {
            if id.as_str() == "S1" {
                let mut details = station_s1();
                details.name = Some("S1".into());
                Ok(Some(details))
            } else {
                Ok(None)
            }
        }));
        let host = Arc::new(FakeHost::default());
        let (store, _store_rx) = StoreHandle::channel(8);
        let controller = StationDetailController::mount(
            Arc::clone(&service),
            Arc::clone(&host),
            store,
            StationId::from("S1"),
            "Central",
        );
        while service.details_calls().is_empty() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        // Open the gate while the controller is still inside set_station and
        // give the S1 fetch time to land on the other worker.
        let gate = Arc::clone(&service);
        host.on_title(move |title| {
            if title != "Harbour" {
                return;
            }
            gate.release(2);
            let deadline = Instant::now() + Duration::from_millis(200);
            while gate.finished.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(5));
            }
        });
        controller.set_station(StationId::from("S2"), "Harbour");

        controller
            .subscribe()
            .wait_for(|s| s.details_phase.is_settled())
            .await
            .unwrap();

        let state = controller.view_state();
        assert_eq!(state.station_id, StationId::from("S2"));
        assert_eq!(state.details, None);
        assert_eq!(state.content(25), Content::Bikes(Vec::new()));
        assert!(host.alerts().is_empty());
        assert_eq!(
            service.details_calls(),
            vec![StationId::from("S1"), StationId::from("S2")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_discards_pending_completions() {
        let h = mount(FakeService::new().gated().with_details(|_| {
            Err(CoreError::Timeout)
        }));
        let service = Arc::clone(&h.service);
        let host = Arc::clone(&h.host);
        let mut state_rx = h.controller.subscribe();
        quiesce().await;

        h.controller.unmount();
        service.release(1);
        quiesce().await;

        assert!(state_rx.borrow_and_update().details_loading());
        assert!(host.alerts().is_empty());
        assert_eq!(service.finished.load(Ordering::SeqCst), 0);
    }

    // ── Booking lifecycle ────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn booking_publishes_then_navigates_back() {
        let h = mount(FakeService::new());
        details_settled(&h.controller).await;
        h.host.watch_store(h.store_rx);

        h.controller.request_booking(&bike1()).unwrap();
        booking_settled(&h.controller).await;
        quiesce().await;

        // The event was already in the store channel when back navigation ran.
        assert_eq!(
            h.host.published_before_back(),
            vec![StoreEvent::BikeBooked {
                bike: bike1(),
                booking_id: BookingId::from("B9"),
            }]
        );
        assert_eq!(h.host.backs(), 1);
        assert_eq!(h.service.booking_calls(), vec![BikeId::Numeric(1)]);
        assert!(!h.controller.view_state().booking_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn booking_without_id_is_silent() {
        let mut h = mount(
            FakeService::new().with_booking(|_| Ok(Some(BookingResult { booking_id: None }))),
        );
        details_settled(&h.controller).await;

        h.controller.request_booking(&bike1()).unwrap();
        booking_settled(&h.controller).await;
        quiesce().await;

        assert!(h.store_rx.try_recv().is_err());
        assert_eq!(h.host.backs(), 0);
        assert!(h.host.alerts().is_empty());
        assert_eq!(h.controller.view_state().booking_phase, RequestPhase::Succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn booking_failure_alerts_without_publish() {
        let mut h = mount(FakeService::new().with_booking(|_| {
            Err(CoreError::Api {
                message: "bike already booked".into(),
                status: Some(409),
            })
        }));
        details_settled(&h.controller).await;

        h.controller.request_booking(&bike1()).unwrap();
        booking_settled(&h.controller).await;
        quiesce().await;

        assert!(h.store_rx.try_recv().is_err());
        assert_eq!(h.host.backs(), 0);
        assert_eq!(
            h.host.alerts(),
            vec![HostCall::Alert {
                title: BOOKING_ERROR_TITLE.into(),
                message: "API error: bike already booked".into(),
            }]
        );
        assert!(!h.controller.view_state().booking_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn second_booking_rejected_while_in_flight() {
        let h = mount(FakeService::new().gated());
        h.service.release(1);
        details_settled(&h.controller).await;

        assert_ok!(h.controller.request_booking(&bike1()));
        let err = assert_err!(h.controller.request_booking(&bike1()));
        assert!(matches!(err, CoreError::BookingInProgress { ref bike_id } if bike_id == "1"));
        assert!(h.controller.view_state().shows_loading_indicator());

        h.service.release(1);
        booking_settled(&h.controller).await;
        quiesce().await;

        assert_eq!(h.service.booking_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn booking_does_not_recheck_status() {
        let h = mount(FakeService::new());
        details_settled(&h.controller).await;

        let mut booked = bike1();
        booked.status = BikeStatus::from("BOOKED");
        assert_ok!(h.controller.request_booking(&booked));
        booking_settled(&h.controller).await;

        assert_eq!(h.service.booking_calls(), vec![BikeId::Numeric(1)]);
    }
}
