/// How malformed numeric text is turned into numbers.
///
/// The service tolerates sparse sensor exports, so the shipped policy is
/// zero-fill rather than rejection: a missing or unparsable value is a
/// tolerable input defect, not an error. The policy is named and injected
/// (see [`crate::config::ClientConfig`]) so a strict variant can be added
/// without touching the builders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Unparsable or missing values become 0.0; parsing never fails.
    #[default]
    Permissive,
}

impl ParsePolicy {
    /// Parse a single numeric field. Non-finite parses ("nan", "inf") are
    /// zero-filled like any other bad token: serde_json would turn them
    /// into JSON `null`, which the service cannot read as a float.
    pub fn scalar(self, raw: &str) -> f32 {
        match self {
            ParsePolicy::Permissive => raw
                .trim()
                .parse()
                .ok()
                .filter(|value: &f32| value.is_finite())
                .unwrap_or(0.0),
        }
    }

    /// Parse a comma-separated series to exactly `expected_len` values:
    /// right-padded with zeros when short, truncated when long.
    pub fn series(self, raw: &str, expected_len: usize) -> Vec<f32> {
        let mut values: Vec<f32> = raw.split(',').map(|token| self.scalar(token)).collect();
        values.truncate(expected_len);
        values.resize(expected_len, 0.0);
        values
    }
}
