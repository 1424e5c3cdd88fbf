use super::solar::solar_date;
use super::*;
use chrono::{NaiveDate, TimeZone, Timelike, Utc};

#[test]
fn test_coordinate_validation() {
    assert!(Coordinates::new(40.7128, -74.0060).is_some());
    assert!(Coordinates::new(90.0, 180.0).is_some());
    assert!(Coordinates::new(-90.0, -180.0).is_some());

    assert!(Coordinates::new(91.0, 0.0).is_none());
    assert!(Coordinates::new(-91.0, 0.0).is_none());
    assert!(Coordinates::new(0.0, 181.0).is_none());
    assert!(Coordinates::new(0.0, -360.0).is_none());
    assert!(Coordinates::new(f64::NAN, 0.0).is_none());
}

#[test]
fn test_coordinate_display() {
    let nyc = Coordinates::new(40.7128, -74.0060).unwrap();
    assert_eq!(nyc.to_string(), "40.713°N, 74.006°W");

    let sydney = Coordinates::new(-33.8688, 151.2093).unwrap();
    assert_eq!(sydney.to_string(), "33.869°S, 151.209°E");
}

#[test]
fn test_solar_date_follows_longitude() {
    // 02:00 UTC is still the previous evening in New York
    let now = Utc.with_ymd_and_hms(2024, 6, 22, 2, 0, 0).unwrap();
    assert_eq!(
        solar_date(now, -74.0),
        NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()
    );

    // ...and already the next morning in Tokyo at 20:00 UTC
    let now = Utc.with_ymd_and_hms(2024, 6, 21, 20, 0, 0).unwrap();
    assert_eq!(
        solar_date(now, 139.7),
        NaiveDate::from_ymd_opt(2024, 6, 22).unwrap()
    );

    // Greenwich is unshifted
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
    assert_eq!(
        solar_date(now, 0.0),
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    );
}

#[test]
fn test_new_york_summer_solstice() {
    let coords = Coordinates::new(40.7128, -74.0060).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 21, 16, 0, 0).unwrap();

    let times = *SunriseCalculator.daylight(now, coords).solar_times().unwrap();
    assert_eq!(times.date, NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());
    assert_eq!(times.coordinates, coords);

    // Sunrise is around 05:25 EDT (09:25 UTC)
    assert_eq!(times.sunrise.date_naive(), times.date);
    assert!((9..=10).contains(&times.sunrise.hour()));

    // A midsummer day in New York lasts about 15 hours
    let day_length = times.sunset - times.sunrise;
    assert!(day_length.num_minutes() > 14 * 60 + 30);
    assert!(day_length.num_minutes() < 15 * 60 + 30);
}

#[test]
fn test_london_winter_solstice() {
    let coords = Coordinates::new(51.5074, -0.1278).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 12, 21, 12, 0, 0).unwrap();

    let times = *SunriseCalculator.daylight(now, coords).solar_times().unwrap();

    // Sunrise ~08:04 UTC, sunset ~15:53 UTC
    assert_eq!(times.sunrise.hour(), 8);
    assert_eq!(times.sunset.hour(), 15);
    let day_length = times.sunset - times.sunrise;
    assert!(day_length.num_minutes() > 7 * 60 + 30);
    assert!(day_length.num_minutes() < 8 * 60 + 15);
}

#[test]
fn test_equator_has_twelve_hour_days() {
    let coords = Coordinates::new(1.3521, 103.8198).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 20, 4, 0, 0).unwrap();

    let times = *SunriseCalculator.daylight(now, coords).solar_times().unwrap();
    let day_length = times.sunset - times.sunrise;
    assert!((day_length.num_minutes() - 12 * 60).abs() < 20);
}

#[test]
fn test_svalbard_midnight_sun_is_polar_day() {
    let coords = Coordinates::new(78.22, 15.65).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 21, 23, 0, 0).unwrap();
    assert_eq!(SunriseCalculator.daylight(now, coords), Daylight::PolarDay);
}

#[test]
fn test_svalbard_winter_is_polar_night() {
    let coords = Coordinates::new(78.22, 15.65).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 12, 21, 12, 0, 0).unwrap();
    assert_eq!(SunriseCalculator.daylight(now, coords), Daylight::PolarNight);
}

#[test]
fn test_southern_polar_seasons_are_reversed() {
    let coords = Coordinates::new(-77.85, 166.67).unwrap();
    let june = Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
    let december = Utc.with_ymd_and_hms(2024, 12, 21, 0, 0, 0).unwrap();
    assert_eq!(SunriseCalculator.daylight(june, coords), Daylight::PolarNight);
    assert_eq!(SunriseCalculator.daylight(december, coords), Daylight::PolarDay);
}

#[test]
fn test_polar_classification_leaves_temperate_days_alone() {
    let midsummer = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
    assert_eq!(solar::polar_daylight(midsummer, 51.5), None);
    assert_eq!(solar::polar_daylight(midsummer, 0.0), None);
    assert_eq!(solar::polar_daylight(midsummer, 89.0), Some(Daylight::PolarDay));
    assert_eq!(solar::polar_daylight(midsummer, -89.0), Some(Daylight::PolarNight));
}
