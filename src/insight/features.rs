use serde::{Deserialize, Serialize};

use crate::catalog::AudioFeatures;

/// Per-field mean of [`AudioFeatures`] across a set of tracks.
///
/// Every field is `0.0` when nothing was averaged; that is the documented
/// result for an empty input, not an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedFeatures {
    /// Number of present entries that went into the means.
    pub sample_count: usize,
    pub danceability: f64,
    pub energy: f64,
    pub valence: f64,
    pub tempo: f64,
    pub key: f64,
    pub mode: f64,
    pub loudness: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub time_signature: f64,
}

/// Average every scalar across the present entries of `features`.
///
/// Absent entries are skipped entirely: they add nothing to the sums and do
/// not count towards the divisor.
pub fn average_features(features: &[Option<AudioFeatures>]) -> AggregatedFeatures {
    let present: Vec<&AudioFeatures> = features.iter().flatten().collect();
    if present.is_empty() {
        return AggregatedFeatures::default();
    }

    let count = present.len() as f64;
    let mean = |field: fn(&AudioFeatures) -> f64| -> f64 {
        present.iter().map(|f| field(f)).sum::<f64>() / count
    };

    AggregatedFeatures {
        sample_count: present.len(),
        danceability: mean(|f| f.danceability),
        energy: mean(|f| f.energy),
        valence: mean(|f| f.valence),
        tempo: mean(|f| f.tempo),
        key: mean(|f| f.key as f64),
        mode: mean(|f| f.mode as f64),
        loudness: mean(|f| f.loudness),
        speechiness: mean(|f| f.speechiness),
        acousticness: mean(|f| f.acousticness),
        instrumentalness: mean(|f| f.instrumentalness),
        liveness: mean(|f| f.liveness),
        time_signature: mean(|f| f.time_signature as f64),
    }
}
