//! Composite records assembled from several catalog lookups.

use serde::{Deserialize, Serialize};

use super::features::AggregatedFeatures;
use super::segments::SegmentAggregate;
use crate::catalog::{Album, ArtistProfile, AudioFeatures, CommunityInsights, Track};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscographySummary {
    pub total_albums: usize,
    /// First entry as returned by the provider, which lists newest first.
    pub latest_release: Option<Album>,
    pub earliest_release: Option<Album>,
}

pub fn summarize_discography(albums: &[Album]) -> DiscographySummary {
    DiscographySummary {
        total_albums: albums.len(),
        latest_release: albums.first().cloned(),
        earliest_release: albums.last().cloned(),
    }
}

/// Everything known about an artist for one report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtistDossier {
    pub profile: ArtistProfile,
    pub top_tracks: Vec<Track>,
    pub related_artists: Vec<ArtistProfile>,
    pub albums: Vec<Album>,
    pub community: Option<CommunityInsights>,
    pub top_track_features: AggregatedFeatures,
    pub discography: DiscographySummary,
}

/// A single track with its owning artist's context and audio descriptors.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackAnalysis {
    pub track: Track,
    pub artist_genres: Vec<String>,
    pub artist_popularity: Option<u32>,
    pub features: Option<AudioFeatures>,
    /// Statistics over the opening segments, when analysis is available.
    pub opening: Option<SegmentAggregate>,
}

/// One track of a listening-taste sample.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TasteEntry {
    pub track: Track,
    pub genres: Vec<String>,
    pub features: Option<AudioFeatures>,
}
