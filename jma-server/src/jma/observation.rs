//! Shaping raw AMeDAS elements into labelled observations.

use serde::Serialize;

use super::types::{RawObservation, RawValue};

/// Compass points for wind direction codes 1-16 (code 16 is north).
pub const WIND_DIRECTIONS: [&str; 16] = [
    "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
    "N",
];

/// Japanese compass points for wind direction codes 1-16.
pub const WIND_DIRECTIONS_JA: [&str; 16] = [
    "北北東", "北東", "東北東", "東", "東南東", "南東", "南南東", "南", "南南西", "南西", "西南西",
    "西", "西北西", "北西", "北北西", "北",
];

/// Usable value of a `[value, quality]` pair.
///
/// A value counts only when both elements are present.
pub fn parse_observation_value(raw: &[Option<f64>]) -> Option<f64> {
    match raw {
        [Some(value), Some(_quality), ..] => Some(*value),
        _ => None,
    }
}

/// English and Japanese names for a wind direction code.
///
/// Code 0 (calm) and out-of-range codes have no direction.
pub fn wind_direction(code: u8) -> Option<(&'static str, &'static str)> {
    let idx = usize::from(code).checked_sub(1)?;
    Some((*WIND_DIRECTIONS.get(idx)?, *WIND_DIRECTIONS_JA.get(idx)?))
}

/// A single value with its unit. `value` is null when the element was
/// published without a usable reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measured {
    pub value: Option<f64>,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wind {
    pub speed: Option<f64>,
    pub speed_unit: &'static str,
    pub direction: Option<&'static str>,
    pub direction_ja: Option<&'static str>,
    pub direction_code: Option<u8>,
}

// Outer `None` means the element was not published; inner `None` renders as null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Precipitation {
    #[serde(rename = "10min", skip_serializing_if = "Option::is_none")]
    pub ten_minutes: Option<Option<f64>>,
    #[serde(rename = "1h", skip_serializing_if = "Option::is_none")]
    pub one_hour: Option<Option<f64>>,
    #[serde(rename = "3h", skip_serializing_if = "Option::is_none")]
    pub three_hours: Option<Option<f64>>,
    #[serde(rename = "24h", skip_serializing_if = "Option::is_none")]
    pub day: Option<Option<f64>>,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sunshine {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<Option<f64>>,
    #[serde(rename = "1h", skip_serializing_if = "Option::is_none")]
    pub one_hour: Option<Option<f64>>,
    #[serde(rename = "6h", skip_serializing_if = "Option::is_none")]
    pub six_hours: Option<Option<f64>>,
    #[serde(rename = "12h", skip_serializing_if = "Option::is_none")]
    pub twelve_hours: Option<Option<f64>>,
    #[serde(rename = "24h", skip_serializing_if = "Option::is_none")]
    pub day: Option<Option<f64>>,
    pub unit: &'static str,
}

/// One station's observation at one time, grouped by quantity.
///
/// Groups the station did not publish are left out entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Observation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sea_level_pressure: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind: Option<Wind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<Precipitation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunshine: Option<Sunshine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow: Option<Snow>,
}

fn measured(raw: &Option<RawValue>, unit: &'static str) -> Option<Measured> {
    raw.as_deref().map(|v| Measured {
        value: parse_observation_value(v),
        unit,
    })
}

fn element(raw: &Option<RawValue>) -> Option<Option<f64>> {
    raw.as_deref().map(parse_observation_value)
}

impl From<&RawObservation> for Observation {
    fn from(raw: &RawObservation) -> Self {
        let wind = raw.wind.as_deref().map(|speed| {
            let code = raw
                .wind_direction
                .as_deref()
                .and_then(parse_observation_value)
                .filter(|c| (0.0..=16.0).contains(c))
                .map(|c| c as u8);
            let names = code.and_then(wind_direction);
            Wind {
                speed: parse_observation_value(speed),
                speed_unit: "m/s",
                direction: names.map(|(en, _)| en),
                direction_ja: names.map(|(_, ja)| ja),
                direction_code: code,
            }
        });

        let precipitation = Precipitation {
            ten_minutes: element(&raw.precipitation_10m),
            one_hour: element(&raw.precipitation_1h),
            three_hours: element(&raw.precipitation_3h),
            day: element(&raw.precipitation_24h),
            unit: "mm",
        };
        let has_precipitation = precipitation.ten_minutes.is_some()
            || precipitation.one_hour.is_some()
            || precipitation.three_hours.is_some()
            || precipitation.day.is_some();

        let snow = Snow {
            depth: element(&raw.snow),
            one_hour: element(&raw.snow_1h),
            six_hours: element(&raw.snow_6h),
            twelve_hours: element(&raw.snow_12h),
            day: element(&raw.snow_24h),
            unit: "cm",
        };
        let has_snow = snow.depth.is_some()
            || snow.one_hour.is_some()
            || snow.six_hours.is_some()
            || snow.twelve_hours.is_some()
            || snow.day.is_some();

        Observation {
            temperature: measured(&raw.temp, "℃"),
            humidity: measured(&raw.humidity, "%"),
            pressure: measured(&raw.pressure, "hPa"),
            sea_level_pressure: measured(&raw.normal_pressure, "hPa"),
            wind,
            precipitation: has_precipitation.then_some(precipitation),
            sunshine: element(&raw.sun_1h).map(|one_hour| Sunshine {
                one_hour,
                unit: "hours",
            }),
            snow: has_snow.then_some(snow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(json: serde_json::Value) -> RawObservation {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn value_requires_both_elements() {
        assert_eq!(parse_observation_value(&[Some(12.3), Some(0.0)]), Some(12.3));
        assert_eq!(parse_observation_value(&[None, Some(0.0)]), None);
        assert_eq!(parse_observation_value(&[Some(12.3), None]), None);
        assert_eq!(parse_observation_value(&[Some(12.3)]), None);
        assert_eq!(parse_observation_value(&[]), None);
    }

    #[test]
    fn wind_direction_table() {
        assert_eq!(wind_direction(1), Some(("NNE", "北北東")));
        assert_eq!(wind_direction(8), Some(("S", "南")));
        assert_eq!(wind_direction(16), Some(("N", "北")));
        assert_eq!(wind_direction(0), None);
        assert_eq!(wind_direction(17), None);
    }

    #[test]
    fn shapes_full_observation() {
        let obs = Observation::from(&raw(json!({
            "temp": [12.3, 0],
            "humidity": [55, 0],
            "pressure": [1012.5, 0],
            "normalPressure": [1015.1, 0],
            "wind": [3.2, 0],
            "windDirection": [12, 0],
            "precipitation10m": [0.0, 0],
            "precipitation1h": [0.5, 0],
            "sun1h": [0.8, 0]
        })));

        assert_eq!(
            obs.temperature,
            Some(Measured {
                value: Some(12.3),
                unit: "℃"
            })
        );
        assert_eq!(obs.sea_level_pressure.as_ref().unwrap().value, Some(1015.1));

        let wind = obs.wind.as_ref().unwrap();
        assert_eq!(wind.speed, Some(3.2));
        assert_eq!(wind.direction, Some("W"));
        assert_eq!(wind.direction_ja, Some("西"));
        assert_eq!(wind.direction_code, Some(12));

        let precipitation = obs.precipitation.as_ref().unwrap();
        assert_eq!(precipitation.one_hour, Some(Some(0.5)));
        assert_eq!(precipitation.three_hours, None);

        assert!(obs.snow.is_none());
    }

    #[test]
    fn calm_wind_has_no_direction() {
        let obs = Observation::from(&raw(json!({
            "wind": [0.0, 0],
            "windDirection": [0, 0]
        })));
        let wind = obs.wind.unwrap();
        assert_eq!(wind.direction, None);
        assert_eq!(wind.direction_code, Some(0));
    }

    #[test]
    fn rain_gauge_only_has_precipitation() {
        let obs = Observation::from(&raw(json!({"precipitation1h": [0.0, 0]})));
        let value = serde_json::to_value(&obs).unwrap();
        assert_eq!(value, json!({"precipitation": {"1h": 0.0, "unit": "mm"}}));
    }

    #[test]
    fn unusable_values_render_as_null() {
        let obs = Observation::from(&raw(json!({
            "temp": [null, 5],
            "snow": [12, null]
        })));
        let value = serde_json::to_value(&obs).unwrap();
        assert_eq!(
            value,
            json!({
                "temperature": {"value": null, "unit": "℃"},
                "snow": {"depth": null, "unit": "cm"}
            })
        );
    }

    #[test]
    fn empty_payload_is_empty_object() {
        let obs = Observation::from(&RawObservation::default());
        assert_eq!(serde_json::to_value(&obs).unwrap(), json!({}));
    }
}
