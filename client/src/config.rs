use crate::parse::ParsePolicy;
use shared::NUM_CLASSES;
use std::time::Duration;

/// PlantVillage class labels, index-aligned to the probability vector
/// the fusion model emits.
pub const CLASS_LABELS: [&str; NUM_CLASSES] = [
    "Apple___Apple_scab",
    "Apple___Black_rot",
    "Apple___Cedar_apple_rust",
    "Apple___healthy",
    "Blueberry___healthy",
    "Cherry_(including_sour)___Powdery_mildew",
    "Cherry_(including_sour)___healthy",
    "Corn_(maize)___Cercospora_leaf_spot Gray_leaf_spot",
    "Corn_(maize)___Common_rust_",
    "Corn_(maize)___Northern_Leaf_Blight",
    "Corn_(maize)___healthy",
    "Grape___Black_rot",
    "Grape___Esca_(Black_Measles)",
    "Grape___Leaf_blight_(Isariopsis_Leaf_Spot)",
    "Grape___healthy",
    "Orange___Haunglongbing_(Citrus_greening)",
    "Peach___Bacterial_spot",
    "Peach___healthy",
    "Pepper,_bell___Bacterial_spot",
    "Pepper,_bell___healthy",
    "Potato___Early_blight",
    "Potato___Late_blight",
    "Potato___healthy",
    "Raspberry___healthy",
    "Soybean___healthy",
    "Squash___Powdery_mildew",
    "Strawberry___Leaf_scorch",
    "Strawberry___healthy",
    "Tomato___Bacterial_spot",
    "Tomato___Early_blight",
    "Tomato___Late_blight",
    "Tomato___Leaf_Mold",
    "Tomato___Septoria_leaf_spot",
    "Tomato___Spider_mites Two-spotted_spider_mite",
    "Tomato___Target_Spot",
    "Tomato___Tomato_Yellow_Leaf_Curl_Virus",
    "Tomato___Tomato_mosaic_virus",
    "Tomato___healthy",
];

/// Static client configuration. The label table is injected here rather
/// than baked into the ranker, so a differently trained service only
/// needs a different config.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the inference service, without a trailing path.
    pub base_endpoint: String,
    /// Index -> label table for ranked output.
    pub class_labels: Vec<String>,
    /// Total health-check attempts before reporting Unreachable.
    pub probe_attempts: u32,
    /// Fixed delay between health-check attempts.
    pub probe_retry_delay: Duration,
    /// How malformed numeric form input is handled.
    pub parse_policy: ParsePolicy,
    /// Ranked entries at or below this probability are dropped.
    pub min_probability: f32,
    /// Ranked output is capped at this many entries.
    pub max_results: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_endpoint: "http://127.0.0.1:5000".to_string(),
            class_labels: CLASS_LABELS.iter().map(|s| s.to_string()).collect(),
            probe_attempts: 3,
            probe_retry_delay: Duration::from_secs(1),
            parse_policy: ParsePolicy::Permissive,
            min_probability: 0.01,
            max_results: 10,
        }
    }
}

impl ClientConfig {
    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_endpoint.trim_end_matches('/'))
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_endpoint.trim_end_matches('/'))
    }
}
