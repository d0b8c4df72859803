//! Record normalization
//!
//! Turns a partially-missing raw flight record into a fully-populated
//! `NormalizedFlight`: parses the departure timestamp, derives the calendar
//! and schedule fields, converts units, and fills missing optional
//! weather/geo values from the canonical default table.

use crate::error::PredictError;
use crate::models::{FlightRecord, NormalizedFlight};
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};

/// Kilometers to statute miles. The classifier was trained on miles; this
/// constant is the only conversion path.
pub const KM_TO_MILES: f64 = 0.621_371;

/// Defaults applied to absent optional fields. Centralized here so no call
/// site can diverge.
#[derive(Debug, Clone, Copy)]
pub struct WeatherDefaults {
    pub temperature: f64,
    pub wind_speed: f64,
    pub precipitation: f64,
    pub climate_severity: f64,
    pub station_distance_km: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Canonical default table.
pub const WEATHER_DEFAULTS: WeatherDefaults = WeatherDefaults {
    temperature: 20.0,
    wind_speed: 5.0,
    precipitation: 0.0,
    climate_severity: 0.0,
    station_distance_km: 10.0,
    latitude: 40.0,
    longitude: -74.0,
};

/// Parse an ISO-8601 departure timestamp.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS` with optional fractional seconds, and
/// RFC 3339 with an offset or `Z`. Wall-clock fields are used as written.
fn parse_departure(raw: &str) -> Result<NaiveDateTime, PredictError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map_err(|e| {
        PredictError::Validation(format!("unparseable departure timestamp {raw:?}: {e}"))
    })
}

/// Normalize a raw flight record.
///
/// Pure function of the record and the fixed default table.
pub fn normalize(record: &FlightRecord) -> Result<NormalizedFlight, PredictError> {
    let departure = parse_departure(&record.departure)?;

    let dep_hour = departure.hour();
    let minute = departure.minute();

    Ok(NormalizedFlight {
        carrier: record.carrier.to_uppercase(),
        origin: record.origin.to_uppercase(),
        dest: record.dest.to_uppercase(),
        year: departure.year(),
        month: departure.month(),
        day_of_month: departure.day(),
        day_of_week: departure.weekday().number_from_monday(),
        dep_hour,
        sched_minute_of_day: dep_hour * 60 + minute,
        crs_dep_time: dep_hour * 100 + minute,
        distance_miles: record.distance_km * KM_TO_MILES,
        temp: record.temperature.unwrap_or(WEATHER_DEFAULTS.temperature),
        wind_spd: record.wind_speed.unwrap_or(WEATHER_DEFAULTS.wind_speed),
        precip_1h: record
            .precipitation
            .unwrap_or(WEATHER_DEFAULTS.precipitation)
            .max(0.0),
        climate_severity_idx: record
            .climate_severity
            .unwrap_or(WEATHER_DEFAULTS.climate_severity),
        dist_met_km: record
            .station_distance_km
            .unwrap_or(WEATHER_DEFAULTS.station_distance_km),
        latitude: record.latitude.unwrap_or(WEATHER_DEFAULTS.latitude),
        longitude: record.longitude.unwrap_or(WEATHER_DEFAULTS.longitude),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_record() -> FlightRecord {
        FlightRecord {
            carrier: "AA".to_string(),
            origin: "JFK".to_string(),
            dest: "LAX".to_string(),
            departure: "2025-11-10T14:30:00".to_string(),
            distance_km: 3983.0,
            temperature: None,
            wind_speed: None,
            precipitation: None,
            climate_severity: None,
            station_distance_km: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn test_calendar_and_schedule_derivations() {
        let n = normalize(&base_record()).unwrap();
        assert_eq!(n.year, 2025);
        assert_eq!(n.month, 11);
        assert_eq!(n.day_of_month, 10);
        // 2025-11-10 is a Monday
        assert_eq!(n.day_of_week, 1);
        assert_eq!(n.dep_hour, 14);
        assert_eq!(n.sched_minute_of_day, 14 * 60 + 30);
        assert_eq!(n.crs_dep_time, 1430);
    }

    #[test]
    fn test_sunday_is_seven() {
        let mut record = base_record();
        record.departure = "2025-11-16T08:05:00".to_string();
        let n = normalize(&record).unwrap();
        assert_eq!(n.day_of_week, 7);
        assert_eq!(n.crs_dep_time, 805);
    }

    #[test]
    fn test_distance_converted_to_miles() {
        let n = normalize(&base_record()).unwrap();
        assert!((n.distance_miles - 3983.0 * KM_TO_MILES).abs() < 1e-9);
        assert!((n.distance_miles - 2474.9).abs() < 0.1);
    }

    #[test]
    fn test_defaults_applied_when_absent() {
        let n = normalize(&base_record()).unwrap();
        assert_eq!(n.temp, WEATHER_DEFAULTS.temperature);
        assert_eq!(n.wind_spd, WEATHER_DEFAULTS.wind_speed);
        assert_eq!(n.precip_1h, WEATHER_DEFAULTS.precipitation);
        assert_eq!(n.climate_severity_idx, WEATHER_DEFAULTS.climate_severity);
        assert_eq!(n.dist_met_km, WEATHER_DEFAULTS.station_distance_km);
        assert_eq!(n.latitude, WEATHER_DEFAULTS.latitude);
        assert_eq!(n.longitude, WEATHER_DEFAULTS.longitude);
    }

    #[test]
    fn test_explicit_defaults_match_omitted() {
        let mut explicit = base_record();
        explicit.temperature = Some(WEATHER_DEFAULTS.temperature);
        explicit.wind_speed = Some(WEATHER_DEFAULTS.wind_speed);
        explicit.precipitation = Some(WEATHER_DEFAULTS.precipitation);
        explicit.climate_severity = Some(WEATHER_DEFAULTS.climate_severity);
        explicit.station_distance_km = Some(WEATHER_DEFAULTS.station_distance_km);
        explicit.latitude = Some(WEATHER_DEFAULTS.latitude);
        explicit.longitude = Some(WEATHER_DEFAULTS.longitude);

        assert_eq!(
            normalize(&explicit).unwrap(),
            normalize(&base_record()).unwrap()
        );
    }

    #[test]
    fn test_supplied_weather_kept() {
        let mut record = base_record();
        record.temperature = Some(25.5);
        record.wind_speed = Some(15.3);
        record.precipitation = Some(0.0);
        let n = normalize(&record).unwrap();
        assert_eq!(n.temp, 25.5);
        assert_eq!(n.wind_spd, 15.3);
        assert_eq!(n.precip_1h, 0.0);
    }

    #[test]
    fn test_precipitation_clipped_to_non_negative() {
        let mut record = base_record();
        record.precipitation = Some(-3.2);
        let n = normalize(&record).unwrap();
        assert_eq!(n.precip_1h, 0.0);
    }

    #[test]
    fn test_codes_uppercased() {
        let mut record = base_record();
        record.carrier = "aa".to_string();
        record.origin = "jfk".to_string();
        let n = normalize(&record).unwrap();
        assert_eq!(n.carrier, "AA");
        assert_eq!(n.origin, "JFK");
    }

    #[test]
    fn test_rfc3339_with_zulu_offset() {
        let mut record = base_record();
        record.departure = "2025-11-10T14:30:00Z".to_string();
        let n = normalize(&record).unwrap();
        assert_eq!(n.dep_hour, 14);
        assert_eq!(n.crs_dep_time, 1430);
    }

    #[test]
    fn test_malformed_timestamp_is_validation_error() {
        let mut record = base_record();
        record.departure = "not-a-date".to_string();
        match normalize(&record) {
            Err(PredictError::Validation(msg)) => assert!(msg.contains("not-a-date")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
