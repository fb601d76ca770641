//! Station detail screen: hosts one `StationDetailController` per opened
//! station and renders its view state every frame.

use std::sync::Arc;

use color_eyre::eyre::{Result, eyre};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use velo_core::{
    BikeRow, BikeService, Content, StationDetailController, StationId, StoreHandle, ViewState,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::host::TuiHost;
use crate::screens::step_selection;
use crate::theme;
use crate::widgets::battery;

pub struct StationDetailScreen<S: BikeService> {
    focused: bool,
    service: Arc<S>,
    store: StoreHandle,
    battery_threshold: u8,
    action_tx: Option<UnboundedSender<Action>>,
    controller: Option<StationDetailController<S, TuiHost>>,
    /// Header title, set by the controller through the host.
    title: String,
    table_state: TableState,
    throbber_state: ThrobberState,
}

impl<S: BikeService> StationDetailScreen<S> {
    pub fn new(service: Arc<S>, store: StoreHandle, battery_threshold: u8) -> Self {
        Self {
            focused: false,
            service,
            store,
            battery_threshold,
            action_tx: None,
            controller: None,
            title: String::new(),
            table_state: TableState::default(),
            throbber_state: ThrobberState::default(),
        }
    }

    fn rows(&self) -> Vec<BikeRow> {
        match self.controller.as_ref().map(|c| c.view_state().content(self.battery_threshold)) {
            Some(Content::Bikes(rows)) => rows,
            Some(Content::Hidden) | None => Vec::new(),
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let next = step_selection(self.table_state.selected(), delta, self.rows().len());
        self.table_state.select(next);
    }

    /// Book the selected bike. Rows that cannot be booked ignore the key.
    fn book_selected(&self) -> Option<Action> {
        let controller = self.controller.as_ref()?;
        let view = controller.view_state();
        let Content::Bikes(rows) = view.content(self.battery_threshold) else {
            return None;
        };
        let row = rows.get(self.table_state.selected().unwrap_or(0))?;
        if !row.can_book {
            debug!(bike_id = %row.id, status = %row.status, "book key ignored");
            return None;
        }
        let bike = view.bike(&row.id)?;

        match controller.request_booking(bike) {
            Ok(()) => None,
            Err(e) => Some(Action::Notify(Notification::info(e.to_string()))),
        }
    }

    fn open(&mut self, id: &StationId, name: &str) -> Result<()> {
        if let Some(controller) = &self.controller {
            controller.set_station(id.clone(), name);
            return Ok(());
        }
        let action_tx = self
            .action_tx
            .clone()
            .ok_or_else(|| eyre!("station detail screen used before init"))?;

        self.table_state = TableState::default();
        self.controller = Some(StationDetailController::mount(
            Arc::clone(&self.service),
            Arc::new(TuiHost::new(action_tx)),
            self.store.clone(),
            id.clone(),
            name,
        ));
        Ok(())
    }

    fn close(&mut self) {
        if let Some(controller) = self.controller.take() {
            controller.unmount();
        }
        self.title.clear();
    }

    /// Render one view state snapshot.
    fn render_view(&self, frame: &mut Frame, area: Rect, view: &ViewState) {
        let block = theme::panel(format!(" {} ", self.title), self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [status_area, list_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(inner);

        if view.shows_loading_indicator() {
            let label = if view.booking_loading() {
                " Booking bike…"
            } else {
                " Loading bikes…"
            };
            let throbber = Throbber::default()
                .label(label)
                .style(Style::default().fg(theme::TEAL))
                .throbber_style(Style::default().fg(theme::AMBER));
            frame.render_stateful_widget(throbber, status_area, &mut self.throbber_state.clone());
        } else if let Some(details) = view.details.as_deref() {
            let summary = format!(
                " {} bikes, {} available",
                details.bikes.len(),
                details.available_count()
            );
            frame.render_widget(Paragraph::new(Span::styled(summary, theme::hint())), status_area);
        }

        match view.content(self.battery_threshold) {
            Content::Hidden => {}
            Content::Bikes(rows) if rows.is_empty() => {
                frame.render_widget(
                    Paragraph::new(Span::styled(" No bikes at this station", theme::hint())),
                    list_area,
                );
            }
            Content::Bikes(rows) => self.render_table(frame, list_area, &rows),
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, rows: &[BikeRow]) {
        let header =
            Row::new(["Bike", "Model", "Battery", "Status", ""]).style(theme::column_header());
        let body = rows.iter().map(|row| {
            let action = if row.can_book {
                Span::styled("book", theme::hint_key())
            } else {
                Span::styled("book", theme::disabled())
            };
            Row::new([
                Cell::from(row.id.to_string()),
                Cell::from(row.model.clone()),
                Cell::from(battery::battery_span(row.battery, row.battery_low)),
                Cell::from(battery::status_span(&row.status, row.status_flagged)),
                Cell::from(Line::from(action)),
            ])
            .style(theme::row())
        });

        let table = Table::new(
            body,
            [
                Constraint::Length(8),
                Constraint::Min(10),
                Constraint::Length(11),
                Constraint::Length(12),
                Constraint::Length(5),
            ],
        )
        .header(header)
        .row_highlight_style(theme::row_selected());

        let mut state = self.table_state.clone();
        state.select(step_selection(state.selected(), 0, rows.len()));
        frame.render_stateful_widget(table, area, &mut state);
    }
}

impl<S: BikeService> Component for StationDetailScreen<S> {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Enter | KeyCode::Char('b') => return Ok(self.book_selected()),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::OpenStation { id, name } => self.open(id, name)?,
            Action::GoBack => self.close(),
            Action::SetTitle(title) => self.title.clone_from(title),
            Action::Tick => {
                let loading = self
                    .controller
                    .as_ref()
                    .is_some_and(|c| c.view_state().shows_loading_indicator());
                if loading {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(controller) = &self.controller {
            self.render_view(frame, area, &controller.view_state());
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn key_hints(&self) -> &'static str {
        "↑↓ select  Enter/b book  Esc back"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use ratatui::{Terminal, backend::TestBackend};
    use tokio::sync::mpsc;
    use velo_core::{
        BikeId, BikeRecord, BikeStatus, BookingId, BookingResult, CoreError, RequestPhase,
        StationDetails, StationSummary, StoreEvent,
    };

    use super::*;

    /// Answers every request immediately with one available bike.
    struct OneBikeService;

    impl BikeService for OneBikeService {
        async fn list_stations(&self) -> Result<Vec<StationSummary>, CoreError> {
            Ok(Vec::new())
        }

        async fn fetch_station_details(
            &self,
            _station_id: &StationId,
        ) -> Result<Option<StationDetails>, CoreError> {
            Ok(Some(details(vec![bike(1, 10, "AVAILABLE")])))
        }

        async fn book_bike(&self, _bike_id: &BikeId) -> Result<Option<BookingResult>, CoreError> {
            Ok(Some(BookingResult {
                booking_id: Some(BookingId::from("B9")),
            }))
        }
    }

    fn bike(id: u64, battery: u8, status: &str) -> BikeRecord {
        BikeRecord {
            id: BikeId::Numeric(id),
            model: format!("M{id}"),
            battery,
            status: BikeStatus::from(status),
        }
    }

    fn details(bikes: Vec<BikeRecord>) -> StationDetails {
        StationDetails {
            bikes,
            ..StationDetails::default()
        }
    }

    fn screen() -> (
        StationDetailScreen<OneBikeService>,
        mpsc::Receiver<StoreEvent>,
        mpsc::UnboundedReceiver<Action>,
    ) {
        let (store, store_rx) = StoreHandle::channel(8);
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let mut screen = StationDetailScreen::new(Arc::new(OneBikeService), store, 25);
        screen.init(action_tx).unwrap();
        (screen, store_rx, action_rx)
    }

    fn draw_view(screen: &StationDetailScreen<OneBikeService>, view: &ViewState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal
            .draw(|frame| screen.render_view(frame, frame.area(), view))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    fn settled_view(bikes: Vec<BikeRecord>) -> ViewState {
        let mut view = ViewState::new(StationId::from("S1"), "Central");
        view.details = Some(Arc::new(details(bikes)));
        view.details_phase = RequestPhase::Succeeded;
        view
    }

    #[test]
    fn renders_rows_with_title() {
        let (mut screen, _store_rx, _action_rx) = screen();
        screen.title = "Central".into();

        let text = draw_view(
            &screen,
            &settled_view(vec![bike(1, 10, "AVAILABLE"), bike(2, 90, "BOOKED")]),
        );

        assert!(text.contains("Central"));
        assert!(text.contains("M1"));
        assert!(text.contains("BOOKED"));
        assert!(text.contains("2 bikes, 1 available"));
    }

    #[test]
    fn hides_list_while_details_load() {
        let (screen, _store_rx, _action_rx) = screen();
        let mut view = settled_view(vec![bike(1, 10, "AVAILABLE")]);
        view.details_phase = RequestPhase::Loading;

        let text = draw_view(&screen, &view);

        assert!(text.contains("Loading bikes"));
        assert!(!text.contains("M1"));
    }

    #[test]
    fn booking_keeps_list_and_shows_indicator() {
        let (screen, _store_rx, _action_rx) = screen();
        let mut view = settled_view(vec![bike(1, 10, "AVAILABLE")]);
        view.booking_phase = RequestPhase::Loading;

        let text = draw_view(&screen, &view);

        assert!(text.contains("Booking bike"));
        assert!(text.contains("M1"));
    }

    #[test]
    fn empty_station_says_so() {
        let (screen, _store_rx, _action_rx) = screen();
        let text = draw_view(&screen, &settled_view(Vec::new()));
        assert!(text.contains("No bikes at this station"));
    }

    #[tokio::test]
    async fn open_book_and_go_back() {
        let (mut screen, mut store_rx, mut action_rx) = screen();

        screen
            .update(&Action::OpenStation {
                id: StationId::from("S1"),
                name: "Central".into(),
            })
            .unwrap();
        assert!(matches!(action_rx.recv().await, Some(Action::SetTitle(ref t)) if t == "Central"));

        let mut view_rx = screen.controller.as_ref().unwrap().subscribe();
        view_rx.wait_for(|v| v.details_phase.is_settled()).await.unwrap();

        let follow_up = screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('b')))
            .unwrap();
        assert!(follow_up.is_none());

        assert_eq!(
            store_rx.recv().await,
            Some(StoreEvent::BikeBooked {
                bike: bike(1, 10, "AVAILABLE"),
                booking_id: BookingId::from("B9"),
            })
        );
        assert!(matches!(action_rx.recv().await, Some(Action::GoBack)));

        screen.update(&Action::GoBack).unwrap();
        assert!(screen.controller.is_none());
        assert!(screen.title.is_empty());
    }

    #[tokio::test]
    async fn out_of_range_selection_books_nothing() {
        let (mut screen, mut store_rx, _action_rx) = screen();
        screen
            .update(&Action::OpenStation {
                id: StationId::from("S1"),
                name: "Central".into(),
            })
            .unwrap();
        screen
            .controller
            .as_ref()
            .unwrap()
            .subscribe()
            .wait_for(|v| v.details_phase.is_settled())
            .await
            .unwrap();
        screen.table_state.select(Some(5));

        let follow_up = screen.handle_key_event(KeyEvent::from(KeyCode::Enter)).unwrap();

        assert!(follow_up.is_none());
        assert!(store_rx.try_recv().is_err());
    }
}
