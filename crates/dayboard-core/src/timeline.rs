//! Hour lanes of the daily timeline.

use crate::item::ClockTime;

/// First lane shown on the timeline.
pub const FIRST_HOUR: u8 = 4;

/// The 24 hour lanes in display order: 04:00 through 03:00 the next morning.
pub fn timeline_hours() -> impl Iterator<Item = u8> {
    (0..24u8).map(|i| (i + FIRST_HOUR) % 24)
}

/// Whether a block starting at `start` and lasting `duration` minutes
/// occupies `hour`.
///
/// A block covers `ceil(duration / 60)` lanes from its start hour and does
/// not wrap past midnight.
pub fn covers_hour(start: ClockTime, duration: u32, hour: u8) -> bool {
    let first = u32::from(start.hour());
    let lanes = duration.div_ceil(60);
    (first..first + lanes).contains(&u32::from(hour))
}
