//! Screen implementations. Each screen is a top-level Component.

pub mod station_detail;
pub mod stations;

/// Move a table selection by `delta`, clamped to `len` rows.
pub(crate) fn step_selection(current: Option<usize>, delta: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = current.unwrap_or(0);
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta.unsigned_abs())
    };
    Some(next.min(len - 1))
}
