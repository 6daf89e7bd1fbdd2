use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Number of scalar soil readings in one profile.
pub const SOIL_FEATURES: usize = 6;
/// Number of weather features recorded per timestep.
pub const WEATHER_FEATURES: usize = 11;
/// Number of disease classes the fusion model emits.
pub const NUM_CLASSES: usize = 38;

/// Length of a weather window in timesteps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum Horizon {
    /// 48 timesteps, the two-day window.
    #[strum(serialize = "short")]
    Short,
    /// 168 timesteps, the seven-day window.
    #[strum(serialize = "full")]
    Full,
}

impl Horizon {
    pub fn steps(self) -> usize {
        match self {
            Horizon::Short => 48,
            Horizon::Full => 168,
        }
    }

    /// Multipart form field the window is submitted under.
    pub fn form_field(self) -> &'static str {
        match self {
            Horizon::Short => "weather_short",
            Horizon::Full => "weather_full",
        }
    }
}

/// Soil inputs in submission order. The Display string is the form
/// field name the value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum SoilField {
    #[strum(serialize = "soil_ph")]
    Ph,
    #[strum(serialize = "soil_nitrogen")]
    Nitrogen,
    #[strum(serialize = "soil_phosphorus")]
    Phosphorus,
    #[strum(serialize = "soil_potassium")]
    Potassium,
    #[strum(serialize = "soil_temperature")]
    Temperature,
    #[strum(serialize = "soil_humidity")]
    Humidity,
}

/// Weather features in per-timestep order. The Display string is the
/// form field prefix; the horizon suffix is appended when reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum WeatherFeature {
    #[strum(serialize = "air_temp")]
    AirTemp,
    #[strum(serialize = "rel_humidity")]
    RelHumidity,
    #[strum(serialize = "leaf_wetness")]
    LeafWetness,
    #[strum(serialize = "precip")]
    Precip,
    #[strum(serialize = "soil_moisture")]
    SoilMoisture,
    #[strum(serialize = "dew_point")]
    DewPoint,
    #[strum(serialize = "vpd")]
    Vpd,
    #[strum(serialize = "wind_speed")]
    WindSpeed,
    #[strum(serialize = "solar")]
    Solar,
    #[strum(serialize = "soil_temp")]
    SoilTemp,
    #[strum(serialize = "frost_flag")]
    FrostFlag,
}

/// Raw image bytes as handed over by the file picker or drop target.
/// Replaced wholesale when a new image is selected, never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageAsset {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Six soil readings in [`SoilField`] order. Serializes as a flat
/// JSON array, the wire shape the service expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoilProfile(pub [f32; SOIL_FEATURES]);

/// One observation instant: eleven readings in [`WeatherFeature`] order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimestepReading(pub [f32; WEATHER_FEATURES]);

/// One weather window: exactly `horizon.steps()` timestep readings.
/// Serializes as a JSON array of 11-element arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherSeries(pub Vec<TimestepReading>);

impl WeatherSeries {
    pub fn steps(&self) -> usize {
        self.0.len()
    }
}

/// Body of a `/predict` response. The service returns either a
/// `predictions` vector or an `error` string, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub predictions: Option<Vec<f32>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One display-ready entry of the ranked result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPrediction {
    pub label: String,
    pub probability: f32,
    /// 1-based position in the ranked list.
    pub rank: usize,
    /// Probability as a percentage with one decimal, e.g. `"87.3%"`.
    pub percentage: String,
}

impl RankedPrediction {
    /// Label with the dataset's underscore separators swapped for spaces.
    pub fn display_name(&self) -> String {
        self.label.replace('_', " ")
    }
}
