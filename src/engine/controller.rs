use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time,
};

use crate::{
    clock::Clock,
    format,
    models::LogEntry,
    session_log::SessionLog,
    settings::{DisplaySettings, SettingsStore},
};

use super::{Command, EngineState, FieldUnit};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// What the host renders from: the state record plus its projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub state: EngineState,
    /// The rendered display string for the dial face.
    pub display: String,
    pub running: bool,
    pub flashing: bool,
}

/// Everything the driver pushes out to subscribed hosts.
#[derive(Debug, Clone)]
pub enum WidgetEvent {
    /// A command or an internal transition changed the state.
    StateChanged(EngineSnapshot),
    /// A regular ticker firing; refresh the face.
    Tick(EngineSnapshot),
    /// A stopwatch run was frozen into the session log.
    SessionLogged(LogEntry),
}

/// Async driver around the engine state: applies commands under one lock,
/// keeps exactly one recurring ticker alive at the cadence the state wants,
/// and broadcasts snapshots to the host.
#[derive(Clone)]
pub struct EngineController {
    state: Arc<Mutex<EngineState>>,
    clock: Arc<dyn Clock>,
    sessions: SessionLog,
    settings: Arc<SettingsStore>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    events: broadcast::Sender<WidgetEvent>,
}

impl EngineController {
    pub fn new(clock: Arc<dyn Clock>, sessions: SessionLog, settings: Arc<SettingsStore>) -> Self {
        let state = EngineState {
            format: settings.display().stopwatch_format,
            ..EngineState::default()
        };
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            state: Arc::new(Mutex::new(state)),
            clock,
            sessions,
            settings,
            ticker: Arc::new(Mutex::new(None)),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> EngineState {
        self.state.lock().await.clone()
    }

    pub async fn snapshot(&self) -> EngineSnapshot {
        let state = self.state.lock().await;
        snapshot_of(&state, self.clock.now())
    }

    /// Routes a host command to the matching operation.
    pub async fn dispatch(&self, command: Command) -> Result<EngineSnapshot> {
        match command {
            Command::StartOrToggle => Ok(self.start_or_toggle().await),
            Command::SwitchMode => Ok(self.switch_mode().await),
            Command::ToggleFormat => self.toggle_format().await,
            Command::IncrementField { unit } => Ok(self.increment_field(unit).await),
            Command::LogSession => {
                self.log_session().await;
                Ok(self.snapshot().await)
            }
            Command::Reset => Ok(self.reset().await),
        }
    }

    pub async fn start_or_toggle(&self) -> EngineSnapshot {
        let now = self.clock.now();
        let snapshot = {
            let mut state = self.state.lock().await;
            state.start_or_toggle(now);
            snapshot_of(&state, now)
        };
        self.after_command(&snapshot).await;
        snapshot
    }

    pub async fn switch_mode(&self) -> EngineSnapshot {
        let now = self.clock.now();
        let snapshot = {
            let mut state = self.state.lock().await;
            state.switch_mode();
            snapshot_of(&state, now)
        };
        self.after_command(&snapshot).await;
        snapshot
    }

    /// Swaps the stopwatch display format and persists the preference.
    pub async fn toggle_format(&self) -> Result<EngineSnapshot> {
        let now = self.clock.now();
        let (snapshot, changed_to) = {
            let mut state = self.state.lock().await;
            let before = state.format;
            state.toggle_format();
            let changed_to = (state.format != before).then_some(state.format);
            (snapshot_of(&state, now), changed_to)
        };
        if let Some(format) = changed_to {
            self.settings.update_display(DisplaySettings {
                stopwatch_format: format,
            })?;
        }
        self.after_command(&snapshot).await;
        Ok(snapshot)
    }

    pub async fn increment_field(&self, unit: FieldUnit) -> EngineSnapshot {
        let now = self.clock.now();
        let snapshot = {
            let mut state = self.state.lock().await;
            state.increment_field(unit);
            snapshot_of(&state, now)
        };
        self.after_command(&snapshot).await;
        snapshot
    }

    pub async fn reset(&self) -> EngineSnapshot {
        let now = self.clock.now();
        let snapshot = {
            let mut state = self.state.lock().await;
            state.reset();
            snapshot_of(&state, now)
        };
        self.after_command(&snapshot).await;
        snapshot
    }

    /// Freezes the current stopwatch run into the session log. Returns the
    /// new entry, or `None` when there was nothing to log.
    pub async fn log_session(&self) -> Option<LogEntry> {
        let now = self.clock.now();
        let (snapshot, entry) = {
            let mut state = self.state.lock().await;
            let entry = state.log_session(now);
            (snapshot_of(&state, now), entry)
        };
        self.after_command(&snapshot).await;
        if let Some(entry) = &entry {
            self.sessions.append(entry.clone());
            info!(
                "logged stopwatch session of {}s as {}",
                entry.duration_secs, entry.id
            );
            let _ = self.events.send(WidgetEvent::SessionLogged(entry.clone()));
        }
        entry
    }

    async fn after_command(&self, snapshot: &EngineSnapshot) {
        let _ = self.events.send(WidgetEvent::StateChanged(snapshot.clone()));
        self.reconcile_ticker().await;
    }

    /// Brings the recurring ticker in line with what the state needs:
    /// nothing when idle, one task at the state's cadence otherwise. Any
    /// existing ticker is replaced; the old task also notices a stale
    /// cadence on its own, but aborting avoids a stray firing in between.
    async fn reconcile_ticker(&self) {
        let wanted = {
            let state = self.state.lock().await;
            state.ticker_needed().then(|| state.tick_interval())
        };

        let mut guard = self.ticker.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }
        if let Some(period) = wanted {
            let controller = self.clone();
            *guard = Some(tokio::spawn(async move { controller.run_ticker(period).await }));
        }
    }

    async fn run_ticker(self, period: Duration) {
        let mut interval = time::interval(period);
        loop {
            interval.tick().await;

            let now = self.clock.now();
            let (snapshot, transitioned, keep_going) = {
                let mut state = self.state.lock().await;
                let before = (state.status, state.mode);
                state.tick(now);
                let transitioned = (state.status, state.mode) != before;
                let keep_going = state.ticker_needed() && state.tick_interval() == period;
                (snapshot_of(&state, now), transitioned, keep_going)
            };

            if transitioned {
                let _ = self.events.send(WidgetEvent::StateChanged(snapshot.clone()));
            }
            let _ = self.events.send(WidgetEvent::Tick(snapshot));

            if !keep_going {
                debug!("ticker retiring; mode or cadence changed");
                break;
            }
        }
    }
}

fn snapshot_of(state: &EngineState, now: DateTime<Utc>) -> EngineSnapshot {
    EngineSnapshot {
        display: format::render(&state.display_value(now)),
        running: state.is_running(),
        flashing: state.is_flashing(),
        state: state.clone(),
    }
}
