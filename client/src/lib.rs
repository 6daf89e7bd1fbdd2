//! Client pipeline for the plant-disease inference service.
//!
//! Raw form text and image bytes go in one end; a ranked, display-ready
//! prediction list comes out the other. In between: permissive numeric
//! parsing, fixed-shape soil/weather assembly, a bounded-retry health
//! probe, and a single multipart `POST /predict` per user action.

pub mod api;
pub mod config;
pub mod demo;
pub mod parse;
pub mod probe;
pub mod rank;
pub mod session;
pub mod soil;
pub mod weather;

pub use api::{InferenceClient, RequestError};
pub use config::ClientConfig;
pub use parse::ParsePolicy;
pub use probe::{Connectivity, ConnectivityProbe};
pub use rank::rank;
pub use session::{Classification, Session, SubmitError};
pub use soil::build_soil_profile;
pub use weather::build_weather_series;
