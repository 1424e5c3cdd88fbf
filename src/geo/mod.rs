//! Geographic location and sunrise/sunset calculations.
//!
//! ## Module Structure
//!
//! - [`location`]: Retrieves the current coordinates from the Google Geolocation API
//! - [`solar`]: Sunrise and sunset instants for a date and location
//!
//! Both concerns sit behind traits ([`LocationProvider`], [`SolarTimeProvider`])
//! so the scheduler can be exercised without network access or astronomy.

pub mod location;
pub mod solar;

pub use location::{GeolocationClient, LocationError, LocationProvider};
pub use solar::{Daylight, SolarTimeProvider, SolarTimes, SunriseCalculator};

#[cfg(test)]
mod tests;

/// A latitude/longitude pair in degrees.
///
/// Produced fresh on every poll and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting values outside the valid ranges.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude)
        {
            Some(Self {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lat_dir = if self.latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if self.longitude >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.3}°{}, {:.3}°{}",
            self.latitude.abs(),
            lat_dir,
            self.longitude.abs(),
            lon_dir
        )
    }
}
