use serde::{Deserialize, Serialize};

use crate::catalog::{Segment, SEGMENT_VECTOR_LEN};

/// Default window for segment statistics, in seconds from the track start.
pub const DEFAULT_SEGMENT_CUTOFF_SECS: f64 = 30.0;

/// Min, max and mean of a per-segment scalar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

impl Spread {
    /// `None` for an empty iterator.
    fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        if count == 0 {
            return None;
        }
        Some(Self {
            min,
            max,
            average: sum / count as f64,
        })
    }
}

/// Statistics over the segments that start before a cutoff.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentAggregate {
    pub segment_count: usize,
    /// Peak loudness across segments, in dB.
    pub loudness: Spread,
    pub average_pitches: [f64; SEGMENT_VECTOR_LEN],
    pub average_timbre: [f64; SEGMENT_VECTOR_LEN],
    /// Spread of the per-segment sum of pitch components.
    ///
    /// Summing the vector is a coarse variety indicator, not a perceptual
    /// measure.
    pub pitch_variety: Spread,
    /// Spread of the per-segment sum of timbre components.
    pub timbre_variety: Spread,
}

impl SegmentAggregate {
    pub fn average_loudness(&self) -> f64 {
        self.loudness.average
    }
}

/// Summarize the segments starting strictly before `cutoff_seconds`.
///
/// Returns `None` when no segment qualifies.
pub fn summarize_segments(segments: &[Segment], cutoff_seconds: f64) -> Option<SegmentAggregate> {
    let window: Vec<&Segment> = segments.iter().filter(|s| s.start < cutoff_seconds).collect();

    let loudness = Spread::of(window.iter().map(|s| s.loudness_max))?;
    let pitch_variety = Spread::of(window.iter().map(|s| s.pitches.iter().sum::<f64>()))?;
    let timbre_variety = Spread::of(window.iter().map(|s| s.timbre.iter().sum::<f64>()))?;

    let count = window.len() as f64;
    let mut average_pitches = [0.0; SEGMENT_VECTOR_LEN];
    let mut average_timbre = [0.0; SEGMENT_VECTOR_LEN];
    for segment in &window {
        for i in 0..SEGMENT_VECTOR_LEN {
            average_pitches[i] += segment.pitches[i];
            average_timbre[i] += segment.timbre[i];
        }
    }
    for i in 0..SEGMENT_VECTOR_LEN {
        average_pitches[i] /= count;
        average_timbre[i] /= count;
    }

    Some(SegmentAggregate {
        segment_count: window.len(),
        loudness,
        average_pitches,
        average_timbre,
        pitch_variety,
        timbre_variety,
    })
}
