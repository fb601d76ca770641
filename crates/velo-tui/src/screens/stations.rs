//! Stations screen: station listing on top, booked bikes below.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use velo_core::{BookedBike, StationSummary};

use crate::action::Action;
use crate::component::Component;
use crate::screens::step_selection;
use crate::theme;

#[derive(Default)]
pub struct StationsScreen {
    focused: bool,
    stations: Arc<Vec<StationSummary>>,
    bookings: Arc<Vec<Arc<BookedBike>>>,
    loaded: bool,
    table_state: TableState,
}

impl StationsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn move_selection(&mut self, delta: isize) {
        let next = step_selection(self.table_state.selected(), delta, self.stations.len());
        self.table_state.select(next);
    }

    fn selected_station(&self) -> Option<&StationSummary> {
        self.table_state
            .selected()
            .and_then(|idx| self.stations.get(idx))
    }

    fn render_stations(&self, frame: &mut Frame, area: Rect) {
        let block = theme::panel(format!(" Stations ({}) ", self.stations.len()), self.focused);

        if self.stations.is_empty() {
            let text = if self.loaded {
                "No stations"
            } else {
                "Loading stations…"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(text, theme::hint())).block(block),
                area,
            );
            return;
        }

        let header = Row::new(["Station", "Available"]).style(theme::column_header());
        let rows = self.stations.iter().map(|s| {
            let available = s
                .available_bikes
                .map_or_else(|| "—".to_owned(), |n| n.to_string());
            Row::new([Cell::from(s.name.clone()), Cell::from(available)])
                .style(theme::row())
        });

        let table = Table::new(rows, [Constraint::Min(20), Constraint::Length(10)])
            .header(header)
            .block(block)
            .row_highlight_style(theme::row_selected());

        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }

    fn render_bookings(&self, frame: &mut Frame, area: Rect) {
        let block = theme::panel(format!(" Booked bikes ({}) ", self.bookings.len()), false);

        let lines: Vec<Line> = if self.bookings.is_empty() {
            vec![Line::from(Span::styled("Nothing booked yet", theme::hint()))]
        } else {
            self.bookings
                .iter()
                .map(|b| {
                    Line::from(vec![
                        Span::styled(
                            b.booked_at.format("%H:%M:%S ").to_string(),
                            theme::hint(),
                        ),
                        Span::styled(format!("bike {} ", b.bike.id), theme::row()),
                        Span::styled(format!("({}) ", b.bike.model), theme::hint()),
                        Span::styled(format!("booking {}", b.booking_id), theme::heading()),
                    ])
                })
                .collect()
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Component for StationsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Char('r') => return Ok(Some(Action::RefreshStations)),
            KeyCode::Enter => {
                return Ok(self.selected_station().map(|s| Action::OpenStation {
                    id: s.id.clone(),
                    name: s.name.clone(),
                }));
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::StationsLoaded(stations) => {
                self.stations = Arc::clone(stations);
                self.loaded = true;
                let selected = self.table_state.selected().unwrap_or(0);
                self.table_state
                    .select(step_selection(Some(selected), 0, self.stations.len()));
            }
            Action::BookingsUpdated(bookings) => {
                self.bookings = Arc::clone(bookings);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let booked_height = u16::try_from(self.bookings.len().max(1))
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.height / 2);
        let [stations_area, bookings_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(booked_height)]).areas(area);

        self.render_stations(frame, stations_area);
        self.render_bookings(frame, bookings_area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn key_hints(&self) -> &'static str {
        "↑↓ select  Enter open  r refresh"
    }
}
