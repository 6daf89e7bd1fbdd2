use rand::Rng;
use shared::{Horizon, SoilField, WeatherFeature};
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// Plausible sensor range for one weather feature.
fn weather_range(feature: WeatherFeature) -> (f32, f32) {
    match feature {
        WeatherFeature::AirTemp => (15.0, 30.0),
        WeatherFeature::RelHumidity => (40.0, 90.0),
        WeatherFeature::LeafWetness => (0.0, 24.0),
        WeatherFeature::Precip => (0.0, 5.0),
        WeatherFeature::SoilMoisture => (0.15, 0.35),
        WeatherFeature::DewPoint => (10.0, 20.0),
        WeatherFeature::Vpd => (0.5, 2.5),
        WeatherFeature::WindSpeed => (0.0, 8.0),
        WeatherFeature::Solar => (0.0, 1000.0),
        WeatherFeature::SoilTemp => (15.0, 25.0),
        WeatherFeature::FrostFlag => (0.0, 1.0),
    }
}

fn soil_range(field: SoilField) -> (f32, f32) {
    match field {
        SoilField::Ph => (5.5, 7.5),
        SoilField::Nitrogen => (20.0, 60.0),
        SoilField::Phosphorus => (20.0, 60.0),
        SoilField::Potassium => (100.0, 300.0),
        SoilField::Temperature => (15.0, 30.0),
        SoilField::Humidity => (40.0, 90.0),
    }
}

/// Generate a full set of sample form fields: every soil scalar and every
/// weather series for both horizons, as the comma-separated text the
/// builders consume. Lets the pipeline be exercised without real sensor
/// exports.
pub fn sample_fields() -> HashMap<String, String> {
    let mut rng = rand::rng();
    let mut fields = HashMap::new();

    for field in SoilField::iter() {
        let (lo, hi) = soil_range(field);
        fields.insert(field.to_string(), format!("{:.2}", rng.random_range(lo..=hi)));
    }

    for horizon in Horizon::iter() {
        for feature in WeatherFeature::iter() {
            let (lo, hi) = weather_range(feature);
            let series: Vec<String> = (0..horizon.steps())
                .map(|_| {
                    let value = rng.random_range(lo..=hi);
                    if feature == WeatherFeature::FrostFlag {
                        format!("{}", value.round() as i32)
                    } else {
                        format!("{value:.2}")
                    }
                })
                .collect();
            fields.insert(format!("{feature}_{horizon}"), series.join(","));
        }
    }

    fields
}
