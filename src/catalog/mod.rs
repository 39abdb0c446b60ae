//! Catalog and community-metadata access.
//!
//! [`CatalogClient`] is the only entry point the rest of the crate uses. It
//! wraps the provider clients and applies one uniform policy: a failed fetch
//! is logged with the operation name and collapses to an absent or empty
//! value. Callers treat missing data as a normal state.

mod error;
pub mod identifier;
pub mod lastfm;
pub mod models;
pub mod spotify;

pub use error::{FetchError, FetchResult};
pub use identifier::{resolve_identifier, ReferenceKind};
pub use lastfm::LastFmClient;
pub use models::{
    Album, ArtistProfile, AudioFeatures, CommunityInsights, Segment, Track, SEGMENT_VECTOR_LEN,
};
pub use spotify::{SpotifyClient, SpotifySettings};

use std::time::Duration;
use tracing::warn;

/// Album groups requested when no explicit filter is given.
pub const DEFAULT_INCLUDE_GROUPS: &str = "album,single";

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub spotify: SpotifySettings,
    pub lastfm_api_key: String,
    pub lastfm_api_base: String,
    pub market: String,
    pub timeout: Duration,
}

pub struct CatalogClient {
    spotify: SpotifyClient,
    lastfm: LastFmClient,
    market: String,
}

impl CatalogClient {
    pub fn new(settings: CatalogSettings) -> FetchResult<Self> {
        Ok(Self {
            spotify: SpotifyClient::new(settings.spotify)?,
            lastfm: LastFmClient::new(
                &settings.lastfm_api_key,
                &settings.lastfm_api_base,
                settings.timeout,
            )?,
            market: settings.market,
        })
    }

    /// Market used for top-track lookups when the caller has no preference.
    pub fn market(&self) -> &str {
        &self.market
    }

    pub async fn get_artist_profile(&self, id: &str) -> Option<ArtistProfile> {
        soften("get_artist_profile", self.spotify.artist(id).await)
    }

    pub async fn get_artist_top_tracks(&self, id: &str, market: &str) -> Vec<Track> {
        soften(
            "get_artist_top_tracks",
            self.spotify.artist_top_tracks(id, market).await,
        )
        .unwrap_or_default()
    }

    pub async fn get_related_artists(&self, id: &str) -> Vec<ArtistProfile> {
        soften(
            "get_related_artists",
            self.spotify.artist_related_artists(id).await,
        )
        .unwrap_or_default()
    }

    pub async fn get_albums(&self, id: &str, include_groups: &str) -> Vec<Album> {
        soften(
            "get_albums",
            self.spotify.artist_albums(id, include_groups).await,
        )
        .unwrap_or_default()
    }

    pub async fn get_track(&self, id: &str) -> Option<Track> {
        soften("get_track", self.spotify.track(id).await)
    }

    pub async fn get_track_audio_features(&self, id: &str) -> Option<AudioFeatures> {
        soften(
            "get_track_audio_features",
            self.spotify.audio_features(id).await,
        )
    }

    /// Features for each id, in order. A failed request yields all `None`.
    pub async fn get_audio_features_batch(&self, ids: &[String]) -> Vec<Option<AudioFeatures>> {
        if ids.is_empty() {
            return Vec::new();
        }
        soften(
            "get_audio_features_batch",
            self.spotify.audio_features_batch(ids).await,
        )
        .unwrap_or_else(|| vec![None; ids.len()])
    }

    pub async fn get_track_segments(&self, id: &str) -> Vec<Segment> {
        soften("get_track_segments", self.spotify.audio_segments(id).await).unwrap_or_default()
    }

    pub async fn get_community_insights(&self, artist_name: &str) -> Option<CommunityInsights> {
        soften(
            "get_community_insights",
            self.lastfm.artist_info(artist_name).await,
        )
    }
}

/// Log a failed fetch and turn it into an absent value.
fn soften<T>(operation: &str, result: FetchResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_not_found() => {
            warn!(operation, error = %e, "Catalog resource not found");
            None
        }
        Err(e) => {
            warn!(operation, error = %e, "Catalog fetch failed");
            None
        }
    }
}
