//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use velo_core::{
    BikeService, BookingStore, STORE_CHANNEL_SIZE, StationId, StoreEvent, StoreHandle,
    spawn_reducer,
};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::station_detail::StationDetailScreen;
use crate::screens::stations::StationsScreen;
use crate::theme;
use crate::tui::Tui;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App<S: BikeService> {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    service: Arc<S>,
    store: Arc<BookingStore>,
    /// Consumed by the reducer task on start.
    store_rx: Option<mpsc::Receiver<StoreEvent>>,
    /// Station whose detail screen opens on start.
    initial_station: Option<StationId>,
    /// Cancels the reducer and bridge tasks.
    cancel: CancellationToken,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
    /// Bookings seen in the last store snapshot.
    known_bookings: usize,
}

impl<S: BikeService> App<S> {
    pub fn new(service: Arc<S>, battery_threshold: u8, initial_station: Option<StationId>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (store_handle, store_rx) = StoreHandle::channel(STORE_CHANNEL_SIZE);

        let mut screens: HashMap<ScreenId, Box<dyn Component>> = HashMap::new();
        screens.insert(ScreenId::Stations, Box::new(StationsScreen::new()));
        screens.insert(
            ScreenId::StationDetail,
            Box::new(StationDetailScreen::new(
                Arc::clone(&service),
                store_handle,
                battery_threshold,
            )),
        );

        Self {
            active_screen: ScreenId::Stations,
            screens,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            service,
            store: Arc::new(BookingStore::new()),
            store_rx: Some(store_rx),
            initial_station,
            cancel: CancellationToken::new(),
            notification: None,
            known_bookings: 0,
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Start the store reducer, the store bridge, and the station listing.
    fn start_background(&mut self) -> Result<()> {
        if let Some(store_rx) = self.store_rx.take() {
            spawn_reducer(Arc::clone(&self.store), store_rx, self.cancel.clone());
        }

        tokio::spawn(data_bridge::spawn_store_bridge(
            self.store.subscribe(),
            self.action_tx.clone(),
            self.cancel.clone(),
        ));
        self.refresh_stations();

        if let Some(id) = self.initial_station.take() {
            let name = id.to_string();
            self.action_tx.send(Action::OpenStation { id, name })?;
        }
        Ok(())
    }

    fn refresh_stations(&self) {
        tokio::spawn(data_bridge::load_stations(
            Arc::clone(&self.service),
            self.action_tx.clone(),
        ));
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::start()?;
        self.init_screens()?;
        self.start_background()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize => self.action_tx.send(Action::Resize)?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        // Unmount any open detail screen before tearing the tasks down
        self.forward(ScreenId::StationDetail, &Action::GoBack)?;
        self.cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            // Esc clears a visible toast before it leaves the screen.
            (KeyModifiers::NONE, KeyCode::Esc) if self.notification.is_some() => {
                return Ok(Some(Action::DismissNotification));
            }
            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),
            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    /// Process a single action: update app state and propagate to screens.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            // ratatui picks up the new size on the next draw
            Action::Render | Action::Resize => {}

            Action::Tick => {
                if let Some((_, shown)) = &self.notification {
                    if shown.elapsed() > NOTIFICATION_TTL {
                        self.notification = None;
                    }
                }
                self.forward(self.active_screen, action)?;
            }

            Action::OpenStation { id, .. } => {
                debug!(station_id = %id, "opening station");
                self.forward(ScreenId::StationDetail, action)?;
                self.switch_screen(ScreenId::StationDetail);
            }

            Action::GoBack => {
                if self.active_screen == ScreenId::StationDetail {
                    self.forward(ScreenId::StationDetail, action)?;
                    self.switch_screen(ScreenId::Stations);
                }
            }

            Action::SetTitle(_) => self.forward(ScreenId::StationDetail, action)?,

            Action::StationsLoaded(_) => self.forward(ScreenId::Stations, action)?,

            Action::BookingsUpdated(bookings) => {
                if bookings.len() > self.known_bookings {
                    if let Some(latest) = bookings.last() {
                        self.notification = Some((
                            Notification::success(format!(
                                "Booked bike {} (booking {})",
                                latest.bike.id, latest.booking_id
                            )),
                            Instant::now(),
                        ));
                    }
                }
                self.known_bookings = bookings.len();
                self.forward(ScreenId::Stations, action)?;
            }

            Action::RefreshStations => self.refresh_stations(),

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),

            Action::DismissNotification => self.notification = None,
        }
        Ok(())
    }

    /// Hand `action` to one screen and queue its follow-up, if any.
    fn forward(&mut self, id: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&id) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn switch_screen(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content_area);
        }
        self.render_status_bar(frame, status_area);

        // Overlays on top (last = topmost)
        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, area, notif);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let hints = self
            .screens
            .get(&self.active_screen)
            .map(|s| s.key_hints())
            .unwrap_or_default();

        let line = Line::from(vec![
            Span::styled(format!(" {} ", self.active_screen), theme::hint_key()),
            Span::styled(format!("│ {hints}  ? help  q quit"), theme::hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        const KEYS: [(&str, &str); 7] = [
            ("↑/k ↓/j", "move selection"),
            ("Enter", "open station / book bike"),
            ("b", "book selected bike"),
            ("r", "reload stations"),
            ("Esc", "dismiss toast / back"),
            ("?", "toggle help"),
            ("q", "quit"),
        ];

        let [popup] = Layout::horizontal([Constraint::Length(44)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::vertical([Constraint::Length(11)])
            .flex(Flex::Center)
            .areas(popup);

        let block = theme::panel(" Keys ", true);

        let lines: Vec<Line> = KEYS
            .iter()
            .map(|(key, what)| {
                Line::from(vec![
                    Span::styled(format!(" {key:<9}"), theme::hint_key()),
                    Span::styled(*what, theme::row()),
                ])
            })
            .collect();

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }

    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 72).min(area.width);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2); // above status bar
        let toast_area = Rect::new(area.x + x, area.y + y, width, height.min(area.height));

        let border_color = match notif.level {
            NotificationLevel::Success => theme::GREEN,
            NotificationLevel::Error => theme::RED,
            NotificationLevel::Info => theme::AMBER,
        };

        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BASE)),
            toast_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {} ", notif.level.icon()), Style::default().fg(border_color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::TEXT)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}
