//! The day/night scheduler.
//!
//! [`DayNightScheduler`] owns everything a poll cycle needs: the active
//! configuration, the collaborators that fetch the location, compute solar
//! times, apply themes, raise notifications and persist one-shot flags, and
//! the last [`Period`] it applied. A cycle is plain sequential code:
//!
//! 1. Read the API key. Without one, greet the user once and stop there.
//! 2. Fetch the coordinates and compute today's sunrise and sunset.
//! 3. Classify `now` as day or night with the configured offset. Polar days
//!    and polar nights have no sunrise or sunset and map straight to a period.
//! 4. Only if that differs from the current period, wait a short delay and
//!    apply the matching theme pair.
//!
//! Only a failed location lookup counts as a failure. Failures never stop the scheduler. They are reported and the next poll
//! simply tries again. The thread that drives cycles on an interval lives in
//! [`runner`].

pub mod period;
pub mod runner;


use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::common::constants::THEME_APPLY_DELAY_MS;
use crate::config::Config;
use crate::geo::{Daylight, LocationError, LocationProvider, SolarTimeProvider};
use crate::notification::{Notification, NotificationSink};
use crate::state::{Flag, FlagStore};
use crate::theme::ThemeApplier;
use crate::time_source::Clock;

pub use period::{Period, is_day, next_switch};
pub use runner::{SchedulerHandle, SchedulerMessage, stop};

/// Parameters for creating a [`DayNightScheduler`].
///
/// Bundles the injected collaborators so construction stays readable.
pub struct SchedulerParams {
    pub config: Config,
    pub location: Box<dyn LocationProvider + Send>,
    pub solar: Box<dyn SolarTimeProvider + Send>,
    pub applier: Box<dyn ThemeApplier + Send>,
    pub notifier: Box<dyn NotificationSink + Send>,
    pub flags: Box<dyn FlagStore + Send>,
    pub clock: Box<dyn Clock + Send>,
    pub debug_enabled: bool,
}

/// What a single poll cycle did.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// No API key is configured; `welcomed` is true if the welcome message
    /// was shown during this cycle.
    MissingApiKey { welcomed: bool },
    /// The computed period matched the current one
    Unchanged(Period),
    /// A new theme pair was applied
    Switched { from: Period, to: Period },
    /// The target theme pair could not be applied; the period is unchanged
    ApplyFailed { target: Period },
    /// The location lookup failed; the period is unchanged
    Failed(LocationError),
    /// The scheduler was stopped while the cycle was running
    Cancelled,
}

/// Decides between the day and night theme pair and applies transitions.
pub struct DayNightScheduler {
    config: Config,
    location: Box<dyn LocationProvider + Send>,
    solar: Box<dyn SolarTimeProvider + Send>,
    applier: Box<dyn ThemeApplier + Send>,
    notifier: Box<dyn NotificationSink + Send>,
    flags: Box<dyn FlagStore + Send>,
    clock: Box<dyn Clock + Send>,
    debug_enabled: bool,
    state: Period,
    active: Arc<AtomicBool>,
    apply_delay: Duration,
}

impl DayNightScheduler {
    pub fn new(params: SchedulerParams) -> Self {
        Self {
            config: params.config,
            location: params.location,
            solar: params.solar,
            applier: params.applier,
            notifier: params.notifier,
            flags: params.flags,
            clock: params.clock,
            debug_enabled: params.debug_enabled,
            state: Period::Unknown,
            active: Arc::new(AtomicBool::new(true)),
            apply_delay: Duration::from_millis(THEME_APPLY_DELAY_MS),
        }
    }

    /// The last period whose theme pair was applied.
    pub fn state(&self) -> Period {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the active configuration.
    ///
    /// Does not poll by itself; callers follow up with [`Self::force_refresh`].
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Replace the theme applier, e.g. after the configured applier changed.
    pub fn set_applier(&mut self, applier: Box<dyn ThemeApplier + Send>) {
        self.applier = applier;
    }

    /// Whether side effects are still allowed.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Shared flag that suppresses side effects once cleared.
    pub(crate) fn active_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.active)
    }

    /// Forget the current period and poll immediately.
    ///
    /// The next successful poll always applies a theme pair, even if it is
    /// the one already in place.
    pub fn force_refresh(&mut self) -> PollOutcome {
        if self.debug_enabled {
            log_pipe!();
            log_debug!("Forcing theme refresh (was {})", self.state);
        }
        self.state = Period::Unknown;
        self.poll()
    }

    /// Run one poll cycle.
    pub fn poll(&mut self) -> PollOutcome {
        if !self.is_active() {
            return PollOutcome::Cancelled;
        }

        let api_key = self.config.api_key();
        if api_key.is_empty() {
            return self.handle_missing_api_key();
        }

        let coordinates = match self.location.locate(&api_key) {
            Ok(coordinates) => coordinates,
            Err(e) => return self.handle_failure(e),
        };

        if !self.is_active() {
            return PollOutcome::Cancelled;
        }

        let now = self.clock.now();
        let daylight = self.solar.daylight(now, coordinates);
        let target = match &daylight {
            Daylight::Cycle(solar) => {
                Period::from_is_day(is_day(now, solar, self.config.transition_offset()))
            }
            Daylight::PolarDay => Period::Day,
            Daylight::PolarNight => Period::Night,
        };

        if self.debug_enabled {
            log_pipe!();
            log_debug!("Location: {coordinates}");
            match &daylight {
                Daylight::Cycle(solar) => {
                    log_indented!("Sunrise: {}", solar.sunrise.format("%Y-%m-%d %H:%M:%S UTC"));
                    log_indented!("Sunset:  {}", solar.sunset.format("%Y-%m-%d %H:%M:%S UTC"));
                }
                Daylight::PolarDay => log_indented!("Polar day: the sun does not set today"),
                Daylight::PolarNight => log_indented!("Polar night: the sun does not rise today"),
            }
            log_indented!("Now:     {}", now.format("%Y-%m-%d %H:%M:%S UTC"));
            log_indented!("Target period: {target}");
        }

        let outcome = if target == self.state {
            PollOutcome::Unchanged(target)
        } else {
            self.switch_to(target)
        };

        if matches!(outcome, PollOutcome::Cancelled) {
            return outcome;
        }

        if !self.flags.is_set(Flag::FirstFetch) {
            self.notify(&Notification::location_retrieved(coordinates));
            self.set_flag(Flag::FirstFetch);
        }

        outcome
    }

    fn handle_missing_api_key(&mut self) -> PollOutcome {
        if self.flags.is_set(Flag::Welcome) {
            return PollOutcome::MissingApiKey { welcomed: false };
        }

        log_pipe!();
        log_info!("No API key configured");
        log_indented!("Set api_key in the configuration file to enable theme switching");

        self.notify(&Notification::api_key_required());
        self.set_flag(Flag::Welcome);
        PollOutcome::MissingApiKey { welcomed: true }
    }

    fn handle_failure(&mut self, error: LocationError) -> PollOutcome {
        if !self.is_active() {
            return PollOutcome::Cancelled;
        }

        log_pipe!();
        log_error!("Could not retrieve geolocation: {error}");
        log_indented!(
            "Keeping the {} theme, retrying in {} minutes",
            self.state.as_str(),
            self.config.poll_interval().as_secs() / 60
        );

        self.clear_flag(Flag::FirstFetch);
        self.notify(&Notification::location_failed(&error.to_string()));
        PollOutcome::Failed(error)
    }

    fn switch_to(&mut self, target: Period) -> PollOutcome {
        self.clock.sleep(self.apply_delay);

        if !self.is_active() {
            return PollOutcome::Cancelled;
        }

        let pair = self.config.theme_pair(target);
        match self.applier.apply(target, &pair) {
            Ok(()) => {
                let from = self.state;
                self.state = target;
                log_pipe!();
                log_info!("Switched to {} theme: {pair}", target.as_str());
                if self.debug_enabled {
                    log_indented!("Applied via {}", self.applier.applier_name());
                }
                PollOutcome::Switched { from, to: target }
            }
            Err(e) => {
                log_pipe!();
                log_warning!("Failed to apply {} theme: {e:#}", target.as_str());
                self.notify(&Notification::theme_not_applied(target, &format!("{e:#}")));
                PollOutcome::ApplyFailed { target }
            }
        }
    }

    fn notify(&self, notification: &Notification) {
        if !self.is_active() {
            return;
        }
        if let Err(e) = self.notifier.notify(notification) {
            log_warning!(
                "Failed to show notification via {}: {e}",
                self.notifier.sink_name()
            );
        }
    }

    fn set_flag(&mut self, flag: Flag) {
        if !self.is_active() {
            return;
        }
        if let Err(e) = self.flags.set(flag) {
            log_warning!("Failed to persist {flag} flag: {e}");
        }
    }

    fn clear_flag(&mut self, flag: Flag) {
        if !self.is_active() {
            return;
        }
        if let Err(e) = self.flags.clear(flag) {
            log_warning!("Failed to clear {flag} flag: {e}");
        }
    }
}
