use crate::parse::ParsePolicy;
use shared::{SOIL_FEATURES, SoilField, SoilProfile};
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// Build the six-value soil vector from raw form fields, in [`SoilField`]
/// order. Missing or malformed fields fall back to 0.0 under the given
/// policy. There is no range validation; out-of-range readings are
/// forwarded to the service as-is.
pub fn build_soil_profile(fields: &HashMap<String, String>, policy: ParsePolicy) -> SoilProfile {
    let mut values = [0.0f32; SOIL_FEATURES];
    for (slot, field) in values.iter_mut().zip(SoilField::iter()) {
        if let Some(raw) = fields.get(&field.to_string()) {
            *slot = policy.scalar(raw);
        }
    }
    SoilProfile(values)
}
