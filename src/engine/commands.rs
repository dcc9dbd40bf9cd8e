//! The inbound command boundary between a host UI and the engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::state::FieldUnit;

/// Recommended repeat cadence for hosts that auto-repeat `IncrementField`
/// while a press is held. The engine keeps no repeat state of its own; the
/// host owns the repeat timer and clears it when the press is released.
pub const HOLD_REPEAT_INTERVAL: Duration = Duration::from_millis(200);

/// Everything a host can ask the dial to do.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    /// Start, pause, or resume, depending on mode and status.
    StartOrToggle,
    /// Flip between timer and stopwatch.
    SwitchMode,
    /// Swap the stopwatch display format.
    ToggleFormat,
    /// Bump the countdown target by one field.
    IncrementField { unit: FieldUnit },
    /// Freeze the current stopwatch run into the session log.
    LogSession,
    /// Back to the clock face, everything cleared.
    Reset,
}
