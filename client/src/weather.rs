use crate::parse::ParsePolicy;
use shared::{Horizon, TimestepReading, WEATHER_FEATURES, WeatherFeature, WeatherSeries};
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// Build one weather window from raw form fields. Each of the eleven
/// features is read from the `{feature}_{horizon}` field, parsed to exactly
/// `horizon.steps()` values, and the columns are transposed into one
/// [`TimestepReading`] per step. The two horizons are built independently
/// and never merged.
pub fn build_weather_series(
    horizon: Horizon,
    fields: &HashMap<String, String>,
    policy: ParsePolicy,
) -> WeatherSeries {
    let steps = horizon.steps();
    let columns: Vec<Vec<f32>> = WeatherFeature::iter()
        .map(|feature| {
            let key = format!("{feature}_{horizon}");
            let raw = fields.get(&key).map(String::as_str).unwrap_or("");
            policy.series(raw, steps)
        })
        .collect();

    let readings = (0..steps)
        .map(|step| {
            let mut reading = [0.0f32; WEATHER_FEATURES];
            for (slot, column) in reading.iter_mut().zip(&columns) {
                *slot = column[step];
            }
            TimestepReading(reading)
        })
        .collect();

    WeatherSeries(readings)
}
