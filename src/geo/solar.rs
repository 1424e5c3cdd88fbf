//! Sunrise and sunset instants for a location.
//!
//! The astronomy itself is delegated to the `sunrise` crate. This module
//! decides which calendar day to ask about and packages the answer.
//!
//! ## Extreme latitudes
//!
//! Above the polar circles the sun may stay up or down for the whole day, and
//! there is no sunrise or sunset to compute. Those days are classified from the
//! sun's hour angle at the horizon and reported as [`Daylight::PolarDay`] or
//! [`Daylight::PolarNight`], so callers can still pick a theme.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use sunrise::{SolarDay, SolarEvent};

use super::Coordinates;

/// Sunrise and sunset for one date at one location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarTimes {
    pub date: NaiveDate,
    pub coordinates: Coordinates,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// How the sun behaves on one day at one location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Daylight {
    /// The sun rises and sets
    Cycle(SolarTimes),
    /// The sun stays above the horizon all day
    PolarDay,
    /// The sun stays below the horizon all day
    PolarNight,
}

impl Daylight {
    pub fn solar_times(&self) -> Option<&SolarTimes> {
        match self {
            Daylight::Cycle(times) => Some(times),
            Daylight::PolarDay | Daylight::PolarNight => None,
        }
    }
}

/// Source of sunrise/sunset instants.
#[cfg_attr(test, mockall::automock)]
pub trait SolarTimeProvider {
    /// Describe the day containing `now` at `coordinates`.
    fn daylight(&self, now: DateTime<Utc>, coordinates: Coordinates) -> Daylight;
}

/// The calendar date at the coordinates in mean solar time.
///
/// Shifting UTC by `longitude / 15` hours approximates the local date without a
/// timezone database, which is all that is needed to pick the right solar day.
pub fn solar_date(now: DateTime<Utc>, longitude: f64) -> NaiveDate {
    let shift = Duration::seconds((longitude / 15.0 * 3600.0).round() as i64);
    (now + shift).date_naive()
}

/// Apparent altitude of the sun's upper limb at sunrise, with refraction.
const HORIZON_ALTITUDE_DEG: f64 = -0.833;
/// Axial tilt of the earth.
const OBLIQUITY_DEG: f64 = 23.44;

/// Approximate solar declination in degrees for `date`.
fn declination(date: NaiveDate) -> f64 {
    let day_of_year = f64::from(date.ordinal());
    -OBLIQUITY_DEG * (360.0 / 365.0 * (day_of_year + 10.0)).to_radians().cos()
}

/// Cosine of the hour angle at which the sun crosses the horizon.
///
/// Below -1 the sun never sets, above 1 it never rises.
fn horizon_hour_angle_cos(date: NaiveDate, latitude: f64) -> f64 {
    let lat = latitude.to_radians();
    let dec = declination(date).to_radians();
    (HORIZON_ALTITUDE_DEG.to_radians().sin() - lat.sin() * dec.sin()) / (lat.cos() * dec.cos())
}

/// Whether the sun is above the horizon at local solar noon.
fn sun_up_at_noon(date: NaiveDate, latitude: f64) -> bool {
    90.0 - (latitude - declination(date)).abs() > HORIZON_ALTITUDE_DEG
}

/// Polar day or night for `date` at `latitude`, if it is one.
pub fn polar_daylight(date: NaiveDate, latitude: f64) -> Option<Daylight> {
    let cos = horizon_hour_angle_cos(date, latitude);
    if cos < -1.0 {
        Some(Daylight::PolarDay)
    } else if cos > 1.0 {
        Some(Daylight::PolarNight)
    } else {
        None
    }
}

/// [`SolarTimeProvider`] backed by the `sunrise` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SunriseCalculator;

impl SolarTimeProvider for SunriseCalculator {
    fn daylight(&self, now: DateTime<Utc>, coordinates: Coordinates) -> Daylight {
        let date = solar_date(now, coordinates.longitude);
        if let Some(polar) = polar_daylight(date, coordinates.latitude) {
            return polar;
        }

        let polar_fallback = || {
            if sun_up_at_noon(date, coordinates.latitude) {
                Daylight::PolarDay
            } else {
                Daylight::PolarNight
            }
        };

        let Some(location) = sunrise::Coordinates::new(coordinates.latitude, coordinates.longitude)
        else {
            return polar_fallback();
        };
        let day = SolarDay::new(location, date);
        let sunrise = day.event_time(SolarEvent::Sunrise);
        let sunset = day.event_time(SolarEvent::Sunset);

        // Near the polar circles the approximation and the crate can disagree
        if sunset <= sunrise {
            return polar_fallback();
        }

        Daylight::Cycle(SolarTimes {
            date,
            coordinates,
            sunrise,
            sunset,
        })
    }
}
