// ── Screen host ──
//
// The UI shell the controller drives. Every call is fire-and-forget: the
// controller never waits on, or reads anything back from, the host.

/// Title, alert, and navigation surface of the screen hosting a
/// controller.
pub trait ScreenHost: Send + Sync + 'static {
    /// Set the header title of the hosting screen.
    fn set_screen_title(&self, title: &str);

    /// Return to the previous screen.
    fn navigate_back(&self);

    /// Show a user-visible alert.
    fn alert(&self, title: &str, message: &str);
}
