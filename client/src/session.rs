use crate::api::{InferenceClient, RequestError};
use crate::config::ClientConfig;
use crate::probe::{Connectivity, ConnectivityProbe};
use crate::rank::rank;
use crate::soil::build_soil_profile;
use crate::weather::build_weather_series;
use shared::{Horizon, ImageAsset, RankedPrediction};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Why a submission was not accepted or did not produce a result.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("connectivity check has not resolved yet; call connect() first")]
    Locked,
    #[error("no image selected")]
    NoImage,
    #[error("another classification request is still in flight")]
    Busy,
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Result of one submission: the vector exactly as the service returned
/// it, plus the ranked view derived from it. Discarded on the next
/// submission, never persisted.
#[derive(Debug, Clone)]
pub struct Classification {
    pub probabilities: Vec<f32>,
    pub ranked: Vec<RankedPrediction>,
}

impl Classification {
    /// The highest-ranked prediction, if anything cleared the threshold.
    pub fn top(&self) -> Option<&RankedPrediction> {
        self.ranked.first()
    }
}

/// One user session: the single-slot selected image, the connectivity
/// state, and the at-most-one-in-flight submission gate.
///
/// `connect()` must resolve (connected or not) before `classify()` will
/// accept a submission; an unreachable service still unlocks the session,
/// it just means submissions surface their own request errors. Soil and
/// weather snapshots are rebuilt from the raw fields on every submission.
pub struct Session {
    config: ClientConfig,
    probe: ConnectivityProbe,
    client: InferenceClient,
    image: Option<ImageAsset>,
    connectivity: Option<Connectivity>,
    in_flight: tokio::sync::Mutex<()>,
}

impl Session {
    pub fn new(config: ClientConfig) -> Self {
        let http = reqwest::Client::new();
        let probe = ConnectivityProbe::new(http.clone(), &config);
        let client = InferenceClient::new(http, &config);
        Self {
            config,
            probe,
            client,
            image: None,
            connectivity: None,
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Run the startup health check and unlock the session. Status text is
    /// forwarded to `on_status` as the probe progresses.
    pub async fn connect(&mut self, on_status: impl FnMut(&str)) -> Connectivity {
        let outcome = self.probe.probe(on_status).await;
        self.connectivity = Some(outcome);
        outcome
    }

    /// Replace the selected image wholesale. No merging with any previous
    /// selection.
    pub fn select_image(&mut self, image: ImageAsset) {
        log::info!(
            "image selected: {} ({} bytes, {})",
            image.file_name,
            image.bytes.len(),
            image.mime_type
        );
        self.image = Some(image);
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn selected_image(&self) -> Option<&ImageAsset> {
        self.image.as_ref()
    }

    pub fn connectivity(&self) -> Option<Connectivity> {
        self.connectivity
    }

    /// Assemble and submit one classification request from the raw form
    /// fields. At most one request is in flight at a time; a second call
    /// while one is outstanding returns [`SubmitError::Busy`] immediately.
    pub async fn classify(
        &self,
        fields: &HashMap<String, String>,
    ) -> Result<Classification, SubmitError> {
        if self.connectivity.is_none() {
            return Err(SubmitError::Locked);
        }
        let image = self.image.as_ref().ok_or(SubmitError::NoImage)?;
        let _guard = self.in_flight.try_lock().map_err(|_| SubmitError::Busy)?;

        let request_id = Uuid::new_v4();
        let policy = self.config.parse_policy;
        let soil = build_soil_profile(fields, policy);
        let weather_short = build_weather_series(Horizon::Short, fields, policy);
        let weather_full = build_weather_series(Horizon::Full, fields, policy);
        log::info!("[{request_id}] submitting {}", image.file_name);

        match self
            .client
            .submit(image, &soil, &weather_short, &weather_full)
            .await
        {
            Ok(probabilities) => {
                let ranked = rank(
                    &probabilities,
                    &self.config.class_labels,
                    self.config.min_probability,
                    self.config.max_results,
                );
                log::info!(
                    "[{request_id}] {} classes returned, {} above threshold",
                    probabilities.len(),
                    ranked.len()
                );
                Ok(Classification {
                    probabilities,
                    ranked,
                })
            }
            Err(err) => {
                log::error!("[{request_id}] classification failed: {err}");
                Err(err.into())
            }
        }
    }
}
