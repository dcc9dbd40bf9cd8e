pub mod clock;
pub mod engine;
pub mod format;
pub mod models;
pub mod session_log;
pub mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{
    Command, EngineController, EngineSnapshot, EngineState, EngineStatus, FieldUnit, Mode,
    StopwatchFormat, WidgetEvent, HOLD_REPEAT_INTERVAL,
};
pub use format::DisplayValue;
pub use models::LogEntry;
pub use session_log::{LogStats, SessionLog};
pub use settings::{DisplaySettings, SettingsStore};

/// Initializes logging for embedding hosts (reads `RUST_LOG`).
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}

/// The assembled widget backend: engine driver, session history, and
/// settings, wired together for a rendering host.
///
/// The session log is handed to consumers as an explicit handle via
/// [`Widget::sessions`]; nothing in the crate reaches for it through
/// shared ambient state.
pub struct Widget {
    controller: EngineController,
    sessions: SessionLog,
    settings: Arc<SettingsStore>,
}

impl Widget {
    /// Builds a widget on the system clock.
    pub fn new(settings_path: PathBuf) -> Result<Self> {
        Self::with_clock(Arc::new(SystemClock), settings_path)
    }

    /// Builds a widget on an injected clock; tests and replays use this.
    pub fn with_clock(clock: Arc<dyn Clock>, settings_path: PathBuf) -> Result<Self> {
        let settings = Arc::new(SettingsStore::new(settings_path)?);
        let sessions = SessionLog::new();
        let controller =
            EngineController::new(clock, sessions.clone(), Arc::clone(&settings));

        Ok(Self {
            controller,
            sessions,
            settings,
        })
    }

    pub fn controller(&self) -> &EngineController {
        &self.controller
    }

    /// Handle for the history and statistics views.
    pub fn sessions(&self) -> SessionLog {
        self.sessions.clone()
    }

    pub fn settings(&self) -> Arc<SettingsStore> {
        Arc::clone(&self.settings)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.controller.subscribe()
    }
}
