// ── Request lifecycle ──
//
// Each trigger (mount, station change, booking) runs one lifecycle
// instance: Idle → Loading → {Succeeded, Failed}. Instances are scoped by
// a child token of the controller's mount token, so a superseded or
// unmounted instance can be recognised and its completion dropped.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Phase of one request lifecycle instance.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumIs,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl RequestPhase {
    /// `true` once the request has either succeeded or failed.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Holds the token of the current instance of a replaceable lifecycle.
///
/// Starting a new instance cancels the previous one.
#[derive(Debug, Default)]
pub(crate) struct LifecycleSlot {
    current: Option<CancellationToken>,
}

impl LifecycleSlot {
    /// Cancel the running instance (if any) and start a new one under
    /// `parent`.
    pub(crate) fn begin(&mut self, parent: &CancellationToken) -> CancellationToken {
        self.cancel();
        let token = parent.child_token();
        self.current = Some(token.clone());
        token
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}
