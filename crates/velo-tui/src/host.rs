//! `ScreenHost` implementation that turns controller calls into actions.

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use velo_core::ScreenHost;

use crate::action::{Action, Notification};

/// Forwards controller requests to the app loop.
///
/// Every call is fire-and-forget: a closed channel means the app is
/// shutting down, so the action is dropped.
#[derive(Debug, Clone)]
pub struct TuiHost {
    action_tx: UnboundedSender<Action>,
}

impl TuiHost {
    pub fn new(action_tx: UnboundedSender<Action>) -> Self {
        Self { action_tx }
    }

    fn send(&self, action: Action) {
        if self.action_tx.send(action).is_err() {
            debug!("action channel closed, dropping host call");
        }
    }
}

impl ScreenHost for TuiHost {
    fn set_screen_title(&self, title: &str) {
        self.send(Action::SetTitle(title.to_owned()));
    }

    fn navigate_back(&self) {
        self.send(Action::GoBack);
    }

    fn alert(&self, title: &str, message: &str) {
        self.send(Action::Notify(Notification::error(format!(
            "{title}: {message}"
        ))));
    }
}
