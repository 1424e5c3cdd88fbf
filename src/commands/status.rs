//! Status command: show what themeflux would do right now.
//!
//! Works without a running daemon. Loads the configuration, looks up the
//! location, computes today's sunrise and sunset and reports which theme pair
//! belongs to the current moment. Nothing is applied.

use anyhow::{Result, bail};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use crate::config::{ApplierKind, Config};
use crate::core::{Period, is_day, next_switch};
use crate::geo::solar::solar_date;
use crate::geo::{
    Daylight, GeolocationClient, LocationProvider, SolarTimeProvider, SunriseCalculator,
};
use crate::io::lock;
use crate::theme::{SettingsFileApplier, ThemePair, theme_title};

/// Everything the status command reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub period: Period,
    pub latitude: f64,
    pub longitude: f64,
    pub date: NaiveDate,
    /// `cycle`, `polar_day` or `polar_night`
    pub daylight: &'static str,
    /// Absent on polar days and nights
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    /// Instants at which the day and night themes take over
    pub day_switch: Option<DateTime<Utc>>,
    pub night_switch: Option<DateTime<Utc>>,
    pub next_switch: Option<DateTime<Utc>>,
    /// The pair that belongs to `period`
    pub theme: ThemePair,
    /// The pair currently in the settings file, when that applier is used
    pub applied: Option<ThemePair>,
    pub running_pid: Option<u32>,
}

/// Compute the report for `now` with the given collaborators.
pub fn build_report(
    config: &Config,
    location: &dyn LocationProvider,
    solar: &dyn SolarTimeProvider,
    now: DateTime<Utc>,
) -> Result<StatusReport> {
    let api_key = config.api_key();
    if api_key.is_empty() {
        bail!("No API key configured; set api_key in themeflux.toml");
    }

    let coordinates = location.locate(&api_key)?;
    let daylight = solar.daylight(now, coordinates);
    let offset = config.transition_offset();
    let theme = |period| config.theme_pair(period);

    let report = match daylight {
        Daylight::Cycle(times) => {
            let period = Period::from_is_day(is_day(now, &times, offset));
            StatusReport {
                period,
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
                date: times.date,
                daylight: "cycle",
                sunrise: Some(times.sunrise),
                sunset: Some(times.sunset),
                day_switch: Some(times.sunrise - offset),
                night_switch: Some(times.sunset - offset),
                next_switch: next_switch(now, &times, offset),
                theme: theme(period),
                applied: None,
                running_pid: None,
            }
        }
        Daylight::PolarDay | Daylight::PolarNight => {
            let (period, label) = if daylight == Daylight::PolarDay {
                (Period::Day, "polar_day")
            } else {
                (Period::Night, "polar_night")
            };
            StatusReport {
                period,
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
                date: solar_date(now, coordinates.longitude),
                daylight: label,
                sunrise: None,
                sunset: None,
                day_switch: None,
                night_switch: None,
                next_switch: None,
                theme: theme(period),
                applied: None,
                running_pid: None,
            }
        }
    };
    Ok(report)
}

/// Handle the status command.
pub fn handle_status_command(json: bool) -> Result<()> {
    let config = crate::config::load()?;
    let client = GeolocationClient::new(config.request_timeout());
    let mut report = build_report(&config, &client, &SunriseCalculator, Utc::now())?;

    report.running_pid = lock::running_instance(&lock::lock_path());
    if config.applier() == ApplierKind::SettingsFile {
        report.applied = config
            .settings_file_path()
            .and_then(|path| SettingsFileApplier::new(path, config.settings_key()))
            .and_then(|applier| applier.read_applied())
            .ok()
            .flatten();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_human_readable(&report);
    }
    Ok(())
}

fn local(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%H:%M").to_string()
}

fn display_human_readable(report: &StatusReport) {
    log_version!();
    log_block_start!("Current period: {}", report.period);
    log_indented!(
        "Theme: {} ({} + {})",
        theme_title(&report.theme.ui),
        report.theme.ui,
        report.theme.syntax
    );
    if let Some(applied) = &report.applied
        && applied != &report.theme
    {
        log_indented!("Settings file currently holds {applied}");
    }

    log_block_start!("Solar times for {}", report.date);
    match (report.sunrise, report.sunset, report.day_switch, report.night_switch) {
        (Some(sunrise), Some(sunset), Some(day_switch), Some(night_switch)) => {
            log_indented!("Sunrise: {} (day theme from {})", local(sunrise), local(day_switch));
            log_indented!("Sunset:  {} (night theme from {})", local(sunset), local(night_switch));
            match report.next_switch {
                Some(next) => log_indented!("Next switch: {}", local(next)),
                None => log_indented!("Next switch: after tomorrow's recalculation"),
            }
        }
        _ if report.daylight == "polar_day" => {
            log_indented!("Polar day: the sun does not set today");
        }
        _ => log_indented!("Polar night: the sun does not rise today"),
    }

    match report.running_pid {
        Some(pid) => log_block_start!("Daemon running (PID: {pid})"),
        None => log_block_start!("Daemon not running"),
    }
    log_end!();
}

/// Display detailed help for the status command
pub fn display_help() {
    log_version!();
    log_block_start!("status - Show the theme for the current time");
    log_block_start!("Usage: themeflux status [--json]");
    log_block_start!("Description:");
    log_indented!("Looks up your location, computes today's sunrise and sunset and");
    log_indented!("shows which theme pair belongs to this moment. Nothing is applied.");
    log_block_start!("Options:");
    log_indented!("--json  Print the report as JSON");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::location::MockLocationProvider;
    use crate::geo::solar::MockSolarTimeProvider;
    use crate::geo::{Coordinates, LocationError, SolarTimes};
    use chrono::TimeZone;

    fn config_with_key() -> Config {
        Config {
            api_key: Some("KEY".to_string()),
            ..Default::default()
        }
    }

    fn fixed_solar() -> MockSolarTimeProvider {
        let mut solar = MockSolarTimeProvider::new();
        solar.expect_daylight().returning(|now, coordinates| {
            Daylight::Cycle(SolarTimes {
                date: now.date_naive(),
                coordinates,
                sunrise: Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap(),
                sunset: Utc.with_ymd_and_hms(2024, 5, 10, 20, 0, 0).unwrap(),
            })
        });
        solar
    }

    #[test]
    fn test_report_for_morning() {
        let mut location = MockLocationProvider::new();
        location
            .expect_locate()
            .withf(|key| key == "KEY")
            .returning(|_| Ok(Coordinates::new(40.0, -74.0).unwrap()));

        let now = Utc.with_ymd_and_hms(2024, 5, 10, 7, 52, 0).unwrap();
        let report = build_report(&config_with_key(), &location, &fixed_solar(), now).unwrap();

        assert_eq!(report.period, Period::Day);
        assert_eq!(report.theme, ThemePair::new("one-light-ui", "one-light-syntax"));
        assert_eq!(
            report.next_switch,
            Some(Utc.with_ymd_and_hms(2024, 5, 10, 19, 50, 0).unwrap())
        );
        assert_eq!(
            report.day_switch,
            Some(Utc.with_ymd_and_hms(2024, 5, 10, 7, 50, 0).unwrap())
        );
        assert_eq!(report.daylight, "cycle");
    }

    #[test]
    fn test_report_requires_api_key() {
        let location = MockLocationProvider::new();
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        assert!(build_report(&Config::default(), &location, &fixed_solar(), now).is_err());
    }

    #[test]
    fn test_report_propagates_location_error() {
        let mut location = MockLocationProvider::new();
        location
            .expect_locate()
            .returning(|_| Err(LocationError::Transport("offline".to_string())));
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();

        let error = build_report(&config_with_key(), &location, &fixed_solar(), now).unwrap_err();
        assert!(error.to_string().contains("offline"));
    }

    #[test]
    fn test_report_serializes() {
        let mut location = MockLocationProvider::new();
        location
            .expect_locate()
            .returning(|_| Ok(Coordinates::new(40.0, -74.0).unwrap()));
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 21, 0, 0).unwrap();
        let report = build_report(&config_with_key(), &location, &fixed_solar(), now).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["period"], "night");
        assert_eq!(json["next_switch"], serde_json::Value::Null);
        assert_eq!(json["theme"]["ui"], "one-dark-ui");
    }

    #[test]
    fn test_report_for_polar_night() {
        let mut location = MockLocationProvider::new();
        location
            .expect_locate()
            .returning(|_| Ok(Coordinates::new(78.22, 15.65).unwrap()));
        let mut solar = MockSolarTimeProvider::new();
        solar
            .expect_daylight()
            .returning(|_, _| Daylight::PolarNight);
        let now = Utc.with_ymd_and_hms(2024, 12, 21, 12, 0, 0).unwrap();

        let report = build_report(&config_with_key(), &location, &solar, now).unwrap();
        assert_eq!(report.period, Period::Night);
        assert_eq!(report.daylight, "polar_night");
        assert_eq!(report.theme, ThemePair::new("one-dark-ui", "one-dark-syntax"));
        assert_eq!(report.sunrise, None);
        assert_eq!(report.next_switch, None);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["daylight"], "polar_night");
        assert_eq!(json["sunrise"], serde_json::Value::Null);
    }
}
