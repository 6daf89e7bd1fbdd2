use crate::config::ClientConfig;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use shared::{Horizon, ImageAsset, PredictResponse, SoilProfile, WeatherSeries};
use thiserror::Error;

/// Everything that can go wrong between "submit pressed" and a usable
/// probability vector. Submissions are attempted exactly once; retry is
/// the caller's decision.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("could not reach inference service at {endpoint}: {source}")]
    Unreachable {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("inference service rejected the request (HTTP {status}): {body}")]
    ServerRejected { status: u16, body: String },
    #[error("inference service returned a response that could not be interpreted")]
    MalformedResponse,
    #[error("inference service reported an error: {0}")]
    ServiceReported(String),
}

/// Submits one assembled request to `POST /predict` and classifies the
/// outcome.
pub struct InferenceClient {
    http: reqwest::Client,
    predict_url: String,
}

impl InferenceClient {
    pub fn new(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            predict_url: config.predict_url(),
        }
    }

    /// Package image + soil + both weather windows into one multipart POST
    /// and await the full response. On success the probability vector is
    /// returned exactly as the service sent it; length checks are left to
    /// the ranker, which tolerates mismatches.
    pub async fn submit(
        &self,
        image: &ImageAsset,
        soil: &SoilProfile,
        weather_short: &WeatherSeries,
        weather_full: &WeatherSeries,
    ) -> Result<Vec<f32>, RequestError> {
        let form = build_form(image, soil, weather_short, weather_full);
        log::info!(
            "POST {} ({} image bytes, {}+{} timesteps)",
            self.predict_url,
            image.bytes.len(),
            weather_short.steps(),
            weather_full.steps()
        );

        let response = self
            .http
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| RequestError::Unreachable {
                endpoint: self.predict_url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("inference request rejected: HTTP {status}: {body}");
            return Err(RequestError::ServerRejected {
                status: status.as_u16(),
                body,
            });
        }

        // The error field wins over the predictions shape: a body that
        // carries both a service message and garbage elsewhere is still a
        // service-reported failure, not a malformed response.
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|_| RequestError::MalformedResponse)?;
        match body.get("error") {
            None | Some(serde_json::Value::Null) => {}
            Some(serde_json::Value::String(message)) => {
                return Err(RequestError::ServiceReported(message.clone()));
            }
            Some(other) => {
                return Err(RequestError::ServiceReported(other.to_string()));
            }
        }
        let body: PredictResponse =
            serde_json::from_value(body).map_err(|_| RequestError::MalformedResponse)?;
        body.predictions.ok_or(RequestError::MalformedResponse)
    }
}

fn build_form(
    image: &ImageAsset,
    soil: &SoilProfile,
    weather_short: &WeatherSeries,
    weather_full: &WeatherSeries,
) -> Form {
    Form::new()
        .part("image", image_part(image))
        .text("soil_data", to_json(soil))
        .text(Horizon::Short.form_field(), to_json(weather_short))
        .text(Horizon::Full.form_field(), to_json(weather_full))
}

fn image_part(image: &ImageAsset) -> Part {
    let part = Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
    // An unparsable mime type falls back to the part's octet-stream default.
    match part.mime_str(&image.mime_type) {
        Ok(part) => part,
        Err(_) => Part::bytes(image.bytes.clone()).file_name(image.file_name.clone()),
    }
}

// The payloads are plain float arrays; serialization cannot fail.
fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).expect("numeric payload serializes")
}
