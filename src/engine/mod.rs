pub mod commands;
pub mod controller;
pub mod state;

pub use commands::{Command, HOLD_REPEAT_INTERVAL};
pub use controller::{EngineController, EngineSnapshot, WidgetEvent};
pub use state::{
    EngineState, EngineStatus, FieldUnit, Mode, StopwatchFormat, FLASH_WINDOW_MS, MAX_COARSE_SECS,
    MAX_FINE_CENTIS,
};
