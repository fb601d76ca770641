//! Messages flowing through the app loop.
//!
//! Key handlers, background tasks and the detail screen's [`TuiHost`]
//! all talk to the app by sending an [`Action`]; nothing else mutates UI
//! state.
//!
//! [`TuiHost`]: crate::host::TuiHost

use std::sync::Arc;

use velo_core::{BookedBike, StationId, StationSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

impl NotificationLevel {
    /// Glyph drawn in front of the toast message.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Info => "·",
            Self::Success => "✓",
            Self::Error => "✗",
        }
    }
}

/// Transient toast in the bottom-right corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Tick,
    Render,
    Resize,
    ToggleHelp,

    /// Show the detail screen for a station, mounting its controller.
    OpenStation { id: StationId, name: String },
    /// Back to the station list; unmounts the detail controller.
    GoBack,
    /// Header text pushed by the detail controller.
    SetTitle(String),

    RefreshStations,
    StationsLoaded(Arc<Vec<StationSummary>>),
    /// Fresh snapshot of the booking store, oldest booking first.
    BookingsUpdated(Arc<Vec<Arc<BookedBike>>>),

    Notify(Notification),
    DismissNotification,
}
