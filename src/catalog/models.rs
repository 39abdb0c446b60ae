//! Normalized catalog records.
//!
//! Provider payloads are decoded into private wire types in `spotify` and
//! `lastfm`, then converted into these plain values. Nothing here is cached:
//! every lookup produces fresh records owned by the caller.

use serde::{Deserialize, Serialize};

/// Number of dimensions in a segment's pitch and timbre vectors.
pub const SEGMENT_VECTOR_LEN: usize = 12;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtistProfile {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    /// Provider popularity score, 0 to 100.
    pub popularity: u32,
    pub followers: u64,
    pub image_url: Option<String>,
    pub profile_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    /// Name of the first credited artist.
    pub artist: String,
    pub artist_id: Option<String>,
    pub popularity: u32,
    /// 30 second preview clip, when the provider offers one.
    pub preview_url: Option<String>,
    pub url: String,
    pub album: Option<String>,
    pub release_date: Option<String>,
    pub duration_ms: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub release_date: Option<String>,
    /// `album`, `single`, `compilation` or `appears_on`.
    pub album_group: Option<String>,
    pub total_tracks: u32,
    pub url: String,
}

/// Provider-computed descriptors of a track's sonic character.
///
/// Most scalars are normalized to `0.0..=1.0`. `tempo` is in BPM, `loudness`
/// in dB, `key` is a pitch class (`0..=11`, `-1` when undetected) and `mode`
/// is `1` for major and `0` for minor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub danceability: f64,
    #[serde(default)]
    pub energy: f64,
    #[serde(default)]
    pub valence: f64,
    #[serde(default)]
    pub tempo: f64,
    #[serde(default = "default_key")]
    pub key: i32,
    #[serde(default)]
    pub mode: i32,
    #[serde(default)]
    pub loudness: f64,
    #[serde(default)]
    pub speechiness: f64,
    #[serde(default)]
    pub acousticness: f64,
    #[serde(default)]
    pub instrumentalness: f64,
    #[serde(default)]
    pub liveness: f64,
    #[serde(default = "default_time_signature")]
    pub time_signature: i32,
}

fn default_key() -> i32 {
    -1
}

fn default_time_signature() -> i32 {
    4
}

/// A short time slice of a track's audio analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Offset from the start of the track, in seconds.
    pub start: f64,
    /// Peak loudness within the segment, in dB.
    pub loudness_max: f64,
    pub pitches: [f64; SEGMENT_VECTOR_LEN],
    pub timbre: [f64; SEGMENT_VECTOR_LEN],
}

impl Segment {
    /// Build a segment from provider vectors of arbitrary length.
    ///
    /// Short vectors are zero-padded and long ones truncated.
    pub fn from_raw(start: f64, loudness_max: f64, pitches: &[f64], timbre: &[f64]) -> Self {
        Self {
            start,
            loudness_max,
            pitches: fixed_vector(pitches),
            timbre: fixed_vector(timbre),
        }
    }
}

fn fixed_vector(values: &[f64]) -> [f64; SEGMENT_VECTOR_LEN] {
    let mut out = [0.0; SEGMENT_VECTOR_LEN];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = *value;
    }
    out
}

/// Crowd-sourced context about an artist.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityInsights {
    /// At most five names, in provider order.
    pub similar: Vec<String>,
    pub tags: Vec<String>,
    pub bio: String,
}

impl CommunityInsights {
    /// The biography cut down to `budget` characters.
    ///
    /// Returns `None` when there is no biography. A truncated excerpt ends in
    /// `...`.
    pub fn bio_excerpt(&self, budget: usize) -> Option<String> {
        let bio = self.bio.trim();
        if bio.is_empty() {
            return None;
        }
        if bio.chars().count() <= budget {
            return Some(bio.to_string());
        }
        let cut: String = bio.chars().take(budget).collect();
        Some(format!("{}...", cut.trim_end()))
    }
}
