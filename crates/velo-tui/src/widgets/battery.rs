//! Battery gauge and bike status spans.

use ratatui::style::Style;
use ratatui::text::Span;

use velo_core::BikeStatus;

use crate::theme;

const GAUGE_CELLS: u8 = 5;

/// Five-cell gauge followed by the percentage, e.g. `▮▮▯▯▯  40%`.
pub fn gauge_text(battery: u8) -> String {
    let battery = battery.min(100);
    // Round up so any charge lights at least one cell.
    let filled = battery.div_ceil(100 / GAUGE_CELLS);
    let gauge: String = (0..GAUGE_CELLS)
        .map(|i| if i < filled { '▮' } else { '▯' })
        .collect();
    format!("{gauge} {battery:>3}%")
}

/// Battery gauge, red when `low`.
pub fn battery_span(battery: u8, low: bool) -> Span<'static> {
    let style = if low {
        theme::flagged()
    } else {
        Style::default().fg(theme::GREEN)
    };
    Span::styled(gauge_text(battery), style)
}

/// Status text, red when `flagged`.
pub fn status_span(status: &BikeStatus, flagged: bool) -> Span<'static> {
    let style = if flagged {
        theme::flagged()
    } else {
        theme::row()
    };
    Span::styled(status.as_str().to_owned(), style)
}
