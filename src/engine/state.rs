use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration as TickPeriod;

use crate::format::{self, DisplayValue};
use crate::models::LogEntry;

/// 99:59:59 — the cap for countdown targets and the coarse counter, seconds.
pub const MAX_COARSE_SECS: u64 = 99 * 3600 + 59 * 60 + 59;

/// 59:59.99 — the cap for the fine counter, centiseconds.
pub const MAX_FINE_CENTIS: u64 = (59 * 60 + 59) * 100 + 99;

/// How long the dial blinks after a countdown reaches zero.
pub const FLASH_WINDOW_MS: i64 = 2_500;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EngineStatus {
    Stopped,
    Running,
    Paused,
    /// Countdown hit zero; the dial blinks until the flash window elapses.
    Expired,
}

impl Default for EngineStatus {
    fn default() -> Self {
        EngineStatus::Stopped
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Clock,
    Timer,
    Stopwatch,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Clock
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StopwatchFormat {
    HoursMinutesSeconds,
    MinutesSecondsCentis,
}

impl Default for StopwatchFormat {
    fn default() -> Self {
        StopwatchFormat::HoursMinutesSeconds
    }
}

/// Which countdown field a press on the dial bumps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FieldUnit {
    Hours,
    Minutes,
    Seconds,
}

impl FieldUnit {
    pub fn secs(self) -> u64 {
        match self {
            FieldUnit::Hours => 3600,
            FieldUnit::Minutes => 60,
            FieldUnit::Seconds => 1,
        }
    }
}

/// The dial's time-tracking state.
///
/// All operations are synchronous and take wall-clock readings as
/// parameters; nothing in here consults a clock on its own. Commands whose
/// preconditions are not met are silent no-ops — the dial has nobody to
/// report an error to, buttons simply go inert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub status: EngineStatus,
    pub mode: Mode,
    pub format: StopwatchFormat,
    /// Countdown length configured for timer mode, seconds.
    pub target_secs: u64,
    /// The display value in the active unit: remaining seconds in timer
    /// mode, elapsed seconds or centiseconds in stopwatch mode.
    pub elapsed: u64,
    /// When the current session originally began; survives pause/resume and
    /// seeds the log entry on a log command.
    pub started_at: Option<DateTime<Utc>>,
    /// Time banked from earlier run segments; combines with
    /// `segment_started_at` to compute the true total.
    #[serde(skip)]
    pub accumulated: u64,
    /// Wall-clock anchor of the open run segment; `Some` iff `Running`.
    #[serde(skip)]
    pub segment_started_at: Option<DateTime<Utc>>,
    /// End of the expiry flash window; `Some` iff `Expired`.
    #[serde(skip)]
    pub flash_until: Option<DateTime<Utc>>,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            status: EngineStatus::Stopped,
            mode: Mode::Clock,
            format: StopwatchFormat::HoursMinutesSeconds,
            target_secs: 0,
            elapsed: 0,
            started_at: None,
            accumulated: 0,
            segment_started_at: None,
            flash_until: None,
        }
    }
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.status == EngineStatus::Running
    }

    pub fn is_flashing(&self) -> bool {
        self.status == EngineStatus::Expired
    }

    /// Cadence the driver should tick this state at.
    pub fn tick_interval(&self) -> TickPeriod {
        match (self.mode, self.format) {
            (Mode::Stopwatch, StopwatchFormat::MinutesSecondsCentis) => TickPeriod::from_millis(10),
            _ => TickPeriod::from_secs(1),
        }
    }

    /// Whether the driver needs a recurring tick right now. The flash
    /// window is resolved by ticks, so an expired countdown still needs
    /// them.
    pub fn ticker_needed(&self) -> bool {
        self.is_running() || self.is_flashing()
    }

    fn display_max(&self) -> u64 {
        match (self.mode, self.format) {
            (Mode::Stopwatch, StopwatchFormat::MinutesSecondsCentis) => MAX_FINE_CENTIS,
            _ => MAX_COARSE_SECS,
        }
    }

    /// Length of the open run segment in the active unit. Zero when not
    /// running or when the clock stepped backwards.
    fn segment_delta(&self, now: DateTime<Utc>) -> u64 {
        let anchor = match self.segment_started_at {
            Some(anchor) => anchor,
            None => return 0,
        };
        let span = now.signed_duration_since(anchor);
        let raw = match (self.mode, self.format) {
            (Mode::Stopwatch, StopwatchFormat::MinutesSecondsCentis) => {
                span.num_milliseconds() / 10
            }
            _ => span.num_seconds(),
        };
        raw.max(0) as u64
    }

    /// Advances the state by one driver tick.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if self.status == EngineStatus::Expired {
            if let Some(deadline) = self.flash_until {
                if now >= deadline {
                    self.resolve_flash();
                }
            }
            return;
        }
        if self.status != EngineStatus::Running {
            return;
        }

        let delta = self.segment_delta(now);
        match self.mode {
            Mode::Timer => {
                let spent = self.accumulated.saturating_add(delta);
                self.elapsed = self.target_secs.saturating_sub(spent);
                if self.elapsed == 0 {
                    self.expire(now);
                }
            }
            Mode::Stopwatch => {
                let total = self.accumulated.saturating_add(delta);
                self.elapsed = total.min(self.display_max());
            }
            // The clock face never runs; it reads the wall clock directly
            // in `display_value`.
            Mode::Clock => {}
        }
    }

    /// The start/stop control: starts, pauses, or resumes depending on mode
    /// and status. In clock mode it flips the dial into a running
    /// stopwatch.
    pub fn start_or_toggle(&mut self, now: DateTime<Utc>) {
        match self.mode {
            Mode::Clock => {
                self.mode = Mode::Stopwatch;
                self.begin_run(now);
            }
            Mode::Timer => match self.status {
                EngineStatus::Running => self.pause_run(now),
                EngineStatus::Paused => self.resume_run(now),
                EngineStatus::Stopped => {
                    if self.target_secs == 0 {
                        debug!("start ignored: no countdown target configured");
                        return;
                    }
                    self.begin_run(now);
                }
                EngineStatus::Expired => {}
            },
            Mode::Stopwatch => match self.status {
                EngineStatus::Running => self.pause_run(now),
                EngineStatus::Paused => self.resume_run(now),
                EngineStatus::Stopped => self.begin_run(now),
                EngineStatus::Expired => {}
            },
        }
    }

    /// Swaps the stopwatch between its two display formats. Only a stopped
    /// stopwatch may toggle; the stored counters are converted so their
    /// unit always matches the format.
    pub fn toggle_format(&mut self) {
        if self.mode != Mode::Stopwatch || self.status != EngineStatus::Stopped {
            debug!("format toggle ignored: not a stopped stopwatch");
            return;
        }
        match self.format {
            StopwatchFormat::HoursMinutesSeconds => {
                self.format = StopwatchFormat::MinutesSecondsCentis;
                self.elapsed = self.elapsed.saturating_mul(100).min(MAX_FINE_CENTIS);
                self.accumulated = self.accumulated.saturating_mul(100).min(MAX_FINE_CENTIS);
            }
            StopwatchFormat::MinutesSecondsCentis => {
                self.format = StopwatchFormat::HoursMinutesSeconds;
                self.elapsed /= 100;
                self.accumulated /= 100;
            }
        }
    }

    /// Flips between timer and stopwatch, always landing stopped with the
    /// run progress cleared. From the clock face it enters timer mode, the
    /// counterpart of `start_or_toggle` entering the stopwatch.
    pub fn switch_mode(&mut self) {
        if self.status == EngineStatus::Expired {
            debug!("mode switch ignored: countdown flash in progress");
            return;
        }
        match self.mode {
            Mode::Timer => {
                self.mode = Mode::Stopwatch;
                self.halt_run();
                self.elapsed = 0;
            }
            Mode::Stopwatch | Mode::Clock => {
                self.mode = Mode::Timer;
                self.halt_run();
                self.elapsed = self.target_secs;
            }
        }
    }

    /// Bumps the countdown target by one field unit. Editable only in timer
    /// mode while not running; an increment that would push the target past
    /// 99:59:59 is rejected outright rather than clamped.
    pub fn increment_field(&mut self, unit: FieldUnit) {
        if self.mode != Mode::Timer
            || self.status == EngineStatus::Running
            || self.status == EngineStatus::Expired
        {
            debug!("increment ignored: countdown not editable right now");
            return;
        }
        let next = self.target_secs.saturating_add(unit.secs());
        if next > MAX_COARSE_SECS {
            debug!("increment ignored: countdown capped at 99:59:59");
            return;
        }
        self.target_secs = next;
        self.elapsed = next.saturating_sub(self.accumulated);
    }

    /// Unconditionally returns the dial to the clock face. The stopwatch
    /// display format is a sticky preference and survives.
    pub fn reset(&mut self) {
        *self = EngineState {
            format: self.format,
            ..EngineState::default()
        };
    }

    /// Freezes the current stopwatch session into a log entry and zeroes
    /// the live state back to a stopped stopwatch. Returns `None` without
    /// touching anything when there is nothing to log.
    pub fn log_session(&mut self, now: DateTime<Utc>) -> Option<LogEntry> {
        if self.mode != Mode::Stopwatch {
            debug!("log ignored: not in stopwatch mode");
            return None;
        }
        let started_at = match self.started_at {
            Some(at) => at,
            None => {
                debug!("log ignored: no session start recorded");
                return None;
            }
        };
        if self.status == EngineStatus::Running {
            // Fold the open segment in so the entry captures time up to now.
            self.tick(now);
        }
        if self.elapsed == 0 {
            debug!("log ignored: nothing on the stopwatch");
            return None;
        }

        let duration_secs = match self.format {
            StopwatchFormat::HoursMinutesSeconds => self.elapsed,
            StopwatchFormat::MinutesSecondsCentis => self.elapsed / 100,
        };
        let formatted = format::render(&self.counter_display());
        let entry = LogEntry::new(started_at, duration_secs, formatted);

        self.halt_run();
        self.elapsed = 0;
        Some(entry)
    }

    /// Pure projection of what the dial face should show.
    pub fn display_value(&self, now: DateTime<Utc>) -> DisplayValue {
        match self.mode {
            Mode::Clock => DisplayValue::Wallclock(now),
            Mode::Timer => DisplayValue::HoursMinutesSeconds(self.elapsed),
            Mode::Stopwatch => self.counter_display(),
        }
    }

    fn counter_display(&self) -> DisplayValue {
        match self.format {
            StopwatchFormat::HoursMinutesSeconds => DisplayValue::HoursMinutesSeconds(self.elapsed),
            StopwatchFormat::MinutesSecondsCentis => DisplayValue::MinutesSecondsCentis(self.elapsed),
        }
    }

    fn begin_run(&mut self, now: DateTime<Utc>) {
        self.status = EngineStatus::Running;
        self.accumulated = 0;
        self.elapsed = match self.mode {
            Mode::Timer => self.target_secs,
            _ => 0,
        };
        self.started_at = Some(now);
        self.segment_started_at = Some(now);
        self.flash_until = None;
    }

    fn pause_run(&mut self, now: DateTime<Utc>) {
        let delta = self.segment_delta(now);
        self.accumulated = self.accumulated.saturating_add(delta);
        self.status = EngineStatus::Paused;
        self.segment_started_at = None;
        self.elapsed = match self.mode {
            Mode::Timer => self.target_secs.saturating_sub(self.accumulated),
            _ => self.accumulated.min(self.display_max()),
        };
    }

    fn resume_run(&mut self, now: DateTime<Utc>) {
        self.status = EngineStatus::Running;
        self.segment_started_at = Some(now);
    }

    fn halt_run(&mut self) {
        self.status = EngineStatus::Stopped;
        self.accumulated = 0;
        self.segment_started_at = None;
        self.started_at = None;
        self.flash_until = None;
    }

    fn expire(&mut self, now: DateTime<Utc>) {
        self.status = EngineStatus::Expired;
        self.elapsed = 0;
        self.accumulated = 0;
        self.segment_started_at = None;
        self.started_at = None;
        self.flash_until = Some(now + Duration::milliseconds(FLASH_WINDOW_MS));
        debug!("countdown expired; flashing for {}ms", FLASH_WINDOW_MS);
    }

    /// The flash window elapsed: the countdown consumes its configuration
    /// and the dial falls back to the clock face.
    fn resolve_flash(&mut self) {
        self.status = EngineStatus::Stopped;
        self.mode = Mode::Clock;
        self.target_secs = 0;
        self.elapsed = 0;
        self.started_at = None;
        self.flash_until = None;
        debug!("flash window elapsed; dial back to the clock face");
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn at_ms(ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::milliseconds(ms)
    }

    fn timer_with_target(target_secs: u64) -> EngineState {
        let mut state = EngineState::new();
        state.switch_mode();
        assert_eq!(state.mode, Mode::Timer);
        for _ in 0..target_secs / 60 {
            state.increment_field(FieldUnit::Minutes);
        }
        for _ in 0..target_secs % 60 {
            state.increment_field(FieldUnit::Seconds);
        }
        assert_eq!(state.target_secs, target_secs);
        state
    }

    fn running_stopwatch(started: DateTime<Utc>) -> EngineState {
        let mut state = EngineState::new();
        state.start_or_toggle(started);
        assert_eq!(state.mode, Mode::Stopwatch);
        assert!(state.is_running());
        state
    }

    #[test]
    fn dial_starts_as_a_stopped_clock() {
        let state = EngineState::new();
        assert_eq!(state.mode, Mode::Clock);
        assert_eq!(state.status, EngineStatus::Stopped);
        assert_eq!(state.elapsed, 0);
        assert_eq!(state.target_secs, 0);
        assert!(!state.ticker_needed());
    }

    #[test]
    fn start_on_the_clock_face_begins_a_stopwatch() {
        let mut state = EngineState::new();
        state.start_or_toggle(at(0));

        assert_eq!(state.mode, Mode::Stopwatch);
        assert!(state.is_running());
        assert_eq!(state.elapsed, 0);
        assert_eq!(state.started_at, Some(at(0)));
        assert_eq!(state.segment_started_at, Some(at(0)));
    }

    #[test]
    fn stopwatch_elapsed_is_monotonic_under_ticks() {
        let mut state = running_stopwatch(at(0));
        let mut previous = 0;
        for secs in [1, 5, 5, 17, 120, 3600] {
            state.tick(at(secs));
            assert!(state.elapsed >= previous);
            previous = state.elapsed;
        }
        assert_eq!(state.elapsed, 3600);
    }

    #[test]
    fn stopwatch_elapsed_clamps_at_the_coarse_maximum() {
        let mut state = running_stopwatch(at(0));
        state.tick(at(500_000));
        assert_eq!(state.elapsed, MAX_COARSE_SECS);
        assert!(state.is_running());
    }

    #[test]
    fn backwards_clock_reading_counts_as_zero() {
        let mut state = running_stopwatch(at(100));
        state.tick(at(40));
        assert_eq!(state.elapsed, 0);
    }

    #[test]
    fn pause_and_resume_preserve_elapsed_continuity() {
        let mut state = running_stopwatch(at(0));
        state.tick(at(65));
        assert_eq!(state.elapsed, 65);

        state.start_or_toggle(at(65));
        assert_eq!(state.status, EngineStatus::Paused);
        assert_eq!(state.elapsed, 65);
        assert_eq!(state.segment_started_at, None);

        // A long break while paused adds nothing.
        state.start_or_toggle(at(1000));
        assert!(state.is_running());
        state.tick(at(1000));
        assert_eq!(state.elapsed, 65);

        state.tick(at(1010));
        assert_eq!(state.elapsed, 75);
    }

    #[test]
    fn log_while_paused_with_nothing_recorded_is_ignored() {
        let mut state = running_stopwatch(at(0));
        state.start_or_toggle(at(0)); // paused at zero
        assert!(state.log_session(at(5)).is_none());
        assert_eq!(state.status, EngineStatus::Paused);
    }

    #[test]
    fn timer_increments_build_the_target() {
        let mut state = EngineState::new();
        state.switch_mode();
        assert_eq!(state.mode, Mode::Timer);

        state.increment_field(FieldUnit::Minutes);
        state.increment_field(FieldUnit::Minutes);
        assert_eq!(state.target_secs, 120);
        assert_eq!(state.elapsed, 120);

        state.increment_field(FieldUnit::Hours);
        state.increment_field(FieldUnit::Seconds);
        assert_eq!(state.target_secs, 3721);
        assert_eq!(state.elapsed, 3721);
    }

    #[test]
    fn timer_increment_is_rejected_while_running() {
        let mut state = timer_with_target(120);
        state.start_or_toggle(at(0));
        assert!(state.is_running());

        state.increment_field(FieldUnit::Minutes);
        assert_eq!(state.target_secs, 120);
    }

    #[test]
    fn timer_increment_past_the_cap_is_rejected_not_wrapped() {
        let mut state = EngineState::new();
        state.switch_mode();
        state.target_secs = MAX_COARSE_SECS - 30;
        state.elapsed = state.target_secs;

        state.increment_field(FieldUnit::Hours);
        assert_eq!(state.target_secs, MAX_COARSE_SECS - 30);

        state.increment_field(FieldUnit::Seconds);
        assert_eq!(state.target_secs, MAX_COARSE_SECS - 29);
    }

    #[test]
    fn increment_outside_timer_mode_is_ignored() {
        let mut state = EngineState::new();
        state.increment_field(FieldUnit::Minutes);
        assert_eq!(state.target_secs, 0);

        state.start_or_toggle(at(0)); // now a running stopwatch
        state.increment_field(FieldUnit::Minutes);
        assert_eq!(state.target_secs, 0);
    }

    #[test]
    fn timer_with_no_target_refuses_to_start() {
        let mut state = EngineState::new();
        state.switch_mode();
        state.start_or_toggle(at(0));
        assert_eq!(state.status, EngineStatus::Stopped);
    }

    #[test]
    fn timer_counts_down_and_expires_into_the_flash_window() {
        let mut state = timer_with_target(120);
        state.start_or_toggle(at(0));
        assert!(state.is_running());
        assert_eq!(state.elapsed, 120);

        state.tick(at(60));
        assert_eq!(state.elapsed, 60);
        state.tick(at(119));
        assert_eq!(state.elapsed, 1);

        state.tick(at(120));
        assert_eq!(state.status, EngineStatus::Expired);
        assert!(state.is_flashing());
        assert_eq!(state.elapsed, 0);
        assert_eq!(state.segment_started_at, None);
        assert_eq!(state.accumulated, 0);
        // The configured target is still visible to the flash window.
        assert_eq!(state.target_secs, 120);

        // Within the window the dial keeps flashing.
        state.tick(at(121));
        assert!(state.is_flashing());

        // Once the window elapses the countdown has consumed its target and
        // the dial is a clock again.
        state.tick(at(123));
        assert_eq!(state.mode, Mode::Clock);
        assert_eq!(state.status, EngineStatus::Stopped);
        assert_eq!(state.target_secs, 0);
        assert_eq!(state.elapsed, 0);
    }

    #[test]
    fn timer_pause_banks_progress_and_shows_remaining() {
        let mut state = timer_with_target(120);
        state.start_or_toggle(at(0));

        state.start_or_toggle(at(30)); // pause
        assert_eq!(state.status, EngineStatus::Paused);
        assert_eq!(state.accumulated, 30);
        assert_eq!(state.elapsed, 90);

        state.start_or_toggle(at(50)); // resume
        state.tick(at(80));
        assert_eq!(state.elapsed, 60);
    }

    #[test]
    fn expired_countdown_ignores_everything_but_reset() {
        let mut state = timer_with_target(60);
        state.start_or_toggle(at(0));
        state.tick(at(60));
        assert!(state.is_flashing());

        state.start_or_toggle(at(61));
        assert!(state.is_flashing());
        state.switch_mode();
        assert_eq!(state.mode, Mode::Timer);
        state.increment_field(FieldUnit::Minutes);
        assert_eq!(state.target_secs, 60);

        state.reset();
        assert_eq!(state.mode, Mode::Clock);
        assert_eq!(state.status, EngineStatus::Stopped);
    }

    #[test]
    fn format_toggle_needs_a_stopped_stopwatch() {
        let mut state = EngineState::new();
        state.toggle_format(); // clock mode
        assert_eq!(state.format, StopwatchFormat::HoursMinutesSeconds);

        state.start_or_toggle(at(0)); // running stopwatch
        state.toggle_format();
        assert_eq!(state.format, StopwatchFormat::HoursMinutesSeconds);

        state.start_or_toggle(at(10)); // paused
        state.toggle_format();
        assert_eq!(state.format, StopwatchFormat::HoursMinutesSeconds);

        state.switch_mode(); // timer, stopped
        state.toggle_format();
        assert_eq!(state.format, StopwatchFormat::HoursMinutesSeconds);

        state.switch_mode(); // stopwatch, stopped
        state.toggle_format();
        assert_eq!(state.format, StopwatchFormat::MinutesSecondsCentis);
    }

    #[test]
    fn format_toggle_converts_stored_counters_between_units() {
        let mut state = EngineState::new();
        state.switch_mode();
        state.switch_mode(); // stopped stopwatch
        state.elapsed = 65;

        state.toggle_format();
        assert_eq!(state.format, StopwatchFormat::MinutesSecondsCentis);
        assert_eq!(state.elapsed, 6500);

        state.toggle_format();
        assert_eq!(state.format, StopwatchFormat::HoursMinutesSeconds);
        assert_eq!(state.elapsed, 65);
    }

    #[test]
    fn fine_stopwatch_ticks_in_centiseconds_and_clamps() {
        let mut state = EngineState::new();
        state.switch_mode();
        state.switch_mode(); // stopped stopwatch
        state.toggle_format();
        assert_eq!(state.format, StopwatchFormat::MinutesSecondsCentis);
        assert_eq!(state.tick_interval(), TickPeriod::from_millis(10));

        state.start_or_toggle(at_ms(0));
        state.tick(at_ms(1230));
        assert_eq!(state.elapsed, 123);

        state.tick(at_ms(10_000_000));
        assert_eq!(state.elapsed, MAX_FINE_CENTIS);
    }

    #[test]
    fn mode_switch_round_trip_keeps_the_target() {
        let mut state = timer_with_target(300);
        state.switch_mode();
        assert_eq!(state.mode, Mode::Stopwatch);
        assert_eq!(state.elapsed, 0);

        state.switch_mode();
        assert_eq!(state.mode, Mode::Timer);
        assert_eq!(state.target_secs, 300);
        assert_eq!(state.elapsed, 300);
    }

    #[test]
    fn mode_switch_stops_a_running_session() {
        let mut state = running_stopwatch(at(0));
        state.tick(at(30));

        state.switch_mode();
        assert_eq!(state.mode, Mode::Timer);
        assert_eq!(state.status, EngineStatus::Stopped);
        assert_eq!(state.accumulated, 0);
        assert_eq!(state.segment_started_at, None);
        assert_eq!(state.started_at, None);
    }

    #[test]
    fn reset_returns_to_the_clock_from_any_state() {
        let mut running = running_stopwatch(at(0));
        running.tick(at(30));
        running.reset();
        assert_eq!(running.mode, Mode::Clock);
        assert_eq!(running.status, EngineStatus::Stopped);
        assert_eq!(running.elapsed, 0);
        assert_eq!(running.target_secs, 0);

        let mut paused_timer = timer_with_target(120);
        paused_timer.start_or_toggle(at(0));
        paused_timer.start_or_toggle(at(30));
        paused_timer.reset();
        assert_eq!(paused_timer.mode, Mode::Clock);
        assert_eq!(paused_timer.status, EngineStatus::Stopped);
        assert_eq!(paused_timer.elapsed, 0);
        assert_eq!(paused_timer.target_secs, 0);
    }

    #[test]
    fn reset_keeps_the_stopwatch_format_preference() {
        let mut state = EngineState::new();
        state.switch_mode();
        state.switch_mode(); // stopped stopwatch
        state.toggle_format();
        state.reset();
        assert_eq!(state.format, StopwatchFormat::MinutesSecondsCentis);
    }

    #[test]
    fn log_session_freezes_the_run_and_zeroes_the_stopwatch() {
        let mut state = running_stopwatch(at(0));
        state.tick(at(65));

        let entry = state.log_session(at(65)).expect("expected a log entry");
        assert_eq!(entry.duration_secs, 65);
        assert_eq!(entry.formatted_duration, "00:01:05");
        assert_eq!(entry.started_at, at(0));

        assert_eq!(state.mode, Mode::Stopwatch);
        assert_eq!(state.status, EngineStatus::Stopped);
        assert_eq!(state.elapsed, 0);
        assert_eq!(state.started_at, None);
    }

    #[test]
    fn log_session_folds_the_open_segment_without_a_prior_tick() {
        let mut state = running_stopwatch(at(0));
        let entry = state.log_session(at(65)).expect("expected a log entry");
        assert_eq!(entry.duration_secs, 65);
    }

    #[test]
    fn log_session_keeps_the_original_start_across_pauses() {
        let mut state = running_stopwatch(at(0));
        state.start_or_toggle(at(20)); // pause
        state.start_or_toggle(at(100)); // resume

        let entry = state.log_session(at(130)).expect("expected a log entry");
        assert_eq!(entry.started_at, at(0));
        assert_eq!(entry.duration_secs, 50);
    }

    #[test]
    fn log_session_in_fine_format_records_whole_seconds() {
        let mut state = EngineState::new();
        state.switch_mode();
        state.switch_mode(); // stopped stopwatch
        state.toggle_format();

        state.start_or_toggle(at_ms(0));
        let entry = state.log_session(at_ms(6540)).expect("expected a log entry");
        assert_eq!(entry.duration_secs, 6);
        assert_eq!(entry.formatted_duration, "00:06.54");
    }

    #[test]
    fn log_session_with_nothing_on_the_stopwatch_is_ignored() {
        let mut state = EngineState::new();
        state.switch_mode();
        state.switch_mode(); // stopped stopwatch, never started
        assert!(state.log_session(at(10)).is_none());

        let mut fresh = running_stopwatch(at(0));
        assert!(fresh.log_session(at(0)).is_none());
        assert!(fresh.is_running());
    }

    #[test]
    fn log_session_outside_stopwatch_mode_is_ignored() {
        let mut state = timer_with_target(60);
        state.start_or_toggle(at(0));
        state.tick(at(10));

        let before = state.clone();
        assert!(state.log_session(at(10)).is_none());
        assert_eq!(state.status, before.status);
        assert_eq!(state.elapsed, before.elapsed);
        assert_eq!(state.target_secs, before.target_secs);
    }

    #[test]
    fn display_value_on_the_clock_face_is_the_wall_clock() {
        let state = EngineState::new();
        assert_eq!(state.display_value(at(7)), DisplayValue::Wallclock(at(7)));
    }

    #[test]
    fn display_value_follows_mode_and_format() {
        let mut state = timer_with_target(90);
        assert_eq!(
            state.display_value(at(0)),
            DisplayValue::HoursMinutesSeconds(90)
        );

        state.switch_mode();
        assert_eq!(
            state.display_value(at(0)),
            DisplayValue::HoursMinutesSeconds(0)
        );

        state.toggle_format();
        assert_eq!(
            state.display_value(at(0)),
            DisplayValue::MinutesSecondsCentis(0)
        );
    }

    #[test]
    fn tick_interval_follows_mode_and_format() {
        let mut state = EngineState::new();
        assert_eq!(state.tick_interval(), TickPeriod::from_secs(1));

        state.switch_mode(); // timer
        assert_eq!(state.tick_interval(), TickPeriod::from_secs(1));

        state.switch_mode(); // stopwatch, coarse
        assert_eq!(state.tick_interval(), TickPeriod::from_secs(1));

        state.toggle_format(); // stopwatch, fine
        assert_eq!(state.tick_interval(), TickPeriod::from_millis(10));
    }
}
