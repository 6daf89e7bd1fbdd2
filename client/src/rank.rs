use shared::RankedPrediction;

/// Turn a raw probability vector into the display-ready ranked list.
///
/// Labels come from the injected table, with a synthetic `"Class {i}"`
/// fallback for indices past its end. Entries are ordered by descending
/// probability; equal probabilities keep ascending class-index order, so
/// the result is identical on every platform. Entries at or below
/// `min_probability` are dropped and the list is capped at `max_results`.
/// The input vector itself is left untouched.
pub fn rank(
    probabilities: &[f32],
    labels: &[String],
    min_probability: f32,
    max_results: usize,
) -> Vec<RankedPrediction> {
    let mut indexed: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    indexed
        .into_iter()
        .filter(|&(_, probability)| probability > min_probability)
        .take(max_results)
        .enumerate()
        .map(|(position, (index, probability))| RankedPrediction {
            label: labels
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("Class {index}")),
            probability,
            rank: position + 1,
            percentage: format!("{:.1}%", probability * 100.0),
        })
        .collect()
}
