//! Rendering of engine projections into the strings the dial face shows.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the dial should show, projected from the engine state.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DisplayValue {
    /// The current wall-clock time; internal counters are ignored.
    Wallclock(DateTime<Utc>),
    /// A counter value in whole seconds.
    HoursMinutesSeconds(u64),
    /// A counter value in centiseconds.
    MinutesSecondsCentis(u64),
}

/// Formats whole seconds as "HH:MM:SS". The hours field runs to 99.
pub fn hours_minutes_seconds(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Formats centiseconds as "MM:SS.CC". The minutes field runs to 59.
pub fn minutes_seconds_centis(total_centis: u64) -> String {
    let minutes = total_centis / 6000;
    let seconds = (total_centis % 6000) / 100;
    let centis = total_centis % 100;
    format!("{:02}:{:02}.{:02}", minutes, seconds, centis)
}

/// Formats a wall-clock reading as "HH:MM:SS" in UTC. Presenting it in the
/// viewer's timezone is the host's concern.
pub fn wallclock(at: DateTime<Utc>) -> String {
    at.format("%H:%M:%S").to_string()
}

pub fn render(value: &DisplayValue) -> String {
    match value {
        DisplayValue::Wallclock(at) => wallclock(*at),
        DisplayValue::HoursMinutesSeconds(secs) => hours_minutes_seconds(*secs),
        DisplayValue::MinutesSecondsCentis(centis) => minutes_seconds_centis(*centis),
    }
}
