//! Spotify Web API client.
//!
//! Uses the client credentials flow, so only public catalog data is
//! reachable. Every method returns the failure reason; the soft-fail policy is
//! applied one level up, in [`CatalogClient`](super::CatalogClient).

use base64::Engine;
use std::borrow::Cow;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

use super::error::{FetchError, FetchResult};
use super::models::{Album, ArtistProfile, AudioFeatures, Segment, Track};

pub const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Tokens are refreshed this long before the provider says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// The audio-features endpoint accepts at most this many ids per call.
const AUDIO_FEATURES_BATCH_LIMIT: usize = 100;

const ALBUMS_PAGE_LIMIT: u32 = 50;

#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub api_base: String,
    pub token_url: String,
    pub timeout: Duration,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

pub struct SpotifyClient {
    client: Client,
    client_id: String,
    client_secret: String,
    api_base: String,
    token_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    pub fn new(settings: SpotifySettings) -> FetchResult<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            client_id: settings.client_id,
            client_secret: settings.client_secret,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            token_url: settings.token_url,
            token: Mutex::new(None),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Return a valid access token, requesting a new one when needed.
    async fn access_token(&self) -> FetchResult<String> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.access_token.clone());
            }
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *guard = Some(token);
        Ok(access_token)
    }

    async fn request_token(&self) -> FetchResult<CachedToken> {
        debug!(url = %self.token_url, "Requesting client credentials token");

        let auth = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.client_id, self.client_secret));

        let response = self
            .client
            .post(&self.token_url)
            .header("Authorization", format!("Basic {}", auth))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Token(format!("status {}: {}", status, body)));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Token(format!("unreadable token response: {}", e)))?;

        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        Ok(CachedToken {
            access_token: body.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }

    /// GET `path` relative to the API base and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> FetchResult<T> {
        let token = self.access_token().await?;
        let url = format!("{}{}", self.api_base, path);

        debug!(url = %url, "Fetching from catalog API");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(format!("{}: {}", path, e)))
    }

    pub async fn artist(&self, id: &str) -> FetchResult<ArtistProfile> {
        let path = format!("/artists/{}", path_segment(id));
        let artist: SpotifyArtist = self.get_json(&path, &[]).await?;
        Ok(artist.into())
    }

    pub async fn artist_top_tracks(&self, id: &str, market: &str) -> FetchResult<Vec<Track>> {
        let path = format!("/artists/{}/top-tracks", path_segment(id));
        let body: TopTracksResponse = self.get_json(&path, &[("market", market)]).await?;
        Ok(body.tracks.into_iter().map(Track::from).collect())
    }

    pub async fn artist_related_artists(&self, id: &str) -> FetchResult<Vec<ArtistProfile>> {
        let path = format!("/artists/{}/related-artists", path_segment(id));
        let body: RelatedArtistsResponse = self.get_json(&path, &[]).await?;
        Ok(body.artists.into_iter().map(ArtistProfile::from).collect())
    }

    pub async fn artist_albums(&self, id: &str, include_groups: &str) -> FetchResult<Vec<Album>> {
        let limit = ALBUMS_PAGE_LIMIT.to_string();
        let body: AlbumsPage = self
            .get_json(
                &format!("/artists/{}/albums", path_segment(id)),
                &[("include_groups", include_groups), ("limit", limit.as_str())],
            )
            .await?;
        Ok(body.items.into_iter().map(Album::from).collect())
    }

    pub async fn track(&self, id: &str) -> FetchResult<Track> {
        let path = format!("/tracks/{}", path_segment(id));
        let track: SpotifyTrack = self.get_json(&path, &[]).await?;
        Ok(track.into())
    }

    pub async fn audio_features(&self, id: &str) -> FetchResult<AudioFeatures> {
        let path = format!("/audio-features/{}", path_segment(id));
        self.get_json(&path, &[]).await
    }

    /// Audio features for several tracks, positionally aligned with `ids`.
    ///
    /// Tracks the provider has no analysis for come back as `None`.
    pub async fn audio_features_batch(
        &self,
        ids: &[String],
    ) -> FetchResult<Vec<Option<AudioFeatures>>> {
        let mut features = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(AUDIO_FEATURES_BATCH_LIMIT) {
            let joined = chunk.join(",");
            let body: AudioFeaturesResponse = self
                .get_json("/audio-features", &[("ids", joined.as_str())])
                .await?;
            let mut batch = body.audio_features;
            batch.resize(chunk.len(), None);
            features.extend(batch);
        }
        Ok(features)
    }

    pub async fn audio_segments(&self, id: &str) -> FetchResult<Vec<Segment>> {
        let path = format!("/audio-analysis/{}", path_segment(id));
        let body: AudioAnalysisResponse = self.get_json(&path, &[]).await?;
        Ok(body
            .segments
            .into_iter()
            .map(|s| Segment::from_raw(s.start, s.loudness_max, &s.pitches, &s.timbre))
            .collect())
    }
}

/// Ids come from user input and must stay inside a single path segment.
fn path_segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

// Spotify API types

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpotifyImage {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct Followers {
    #[serde(default)]
    total: u64,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    id: String,
    name: String,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    popularity: u32,
    #[serde(default)]
    followers: Followers,
    #[serde(default)]
    images: Vec<SpotifyImage>,
    #[serde(default)]
    external_urls: ExternalUrls,
}

impl From<SpotifyArtist> for ArtistProfile {
    fn from(artist: SpotifyArtist) -> Self {
        let profile_url = artist
            .external_urls
            .spotify
            .unwrap_or_else(|| format!("https://open.spotify.com/artist/{}", artist.id));
        ArtistProfile {
            image_url: artist.images.into_iter().next().map(|i| i.url),
            id: artist.id,
            name: artist.name,
            genres: artist.genres,
            popularity: artist.popularity,
            followers: artist.followers.total,
            profile_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SimplifiedArtist {
    id: Option<String>,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SimplifiedAlbum {
    name: String,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrack {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<SimplifiedArtist>,
    #[serde(default)]
    popularity: u32,
    preview_url: Option<String>,
    #[serde(default)]
    external_urls: ExternalUrls,
    album: Option<SimplifiedAlbum>,
    duration_ms: Option<u64>,
}

impl From<SpotifyTrack> for Track {
    fn from(track: SpotifyTrack) -> Self {
        let url = track
            .external_urls
            .spotify
            .unwrap_or_else(|| format!("https://open.spotify.com/track/{}", track.id));
        let (artist, artist_id) = match track.artists.into_iter().next() {
            Some(a) => (a.name, a.id),
            None => (String::new(), None),
        };
        let (album, release_date) = match track.album {
            Some(a) => (Some(a.name), a.release_date),
            None => (None, None),
        };
        Track {
            id: track.id,
            name: track.name,
            artist,
            artist_id,
            popularity: track.popularity,
            preview_url: track.preview_url,
            url,
            album,
            release_date,
            duration_ms: track.duration_ms,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    id: String,
    name: String,
    release_date: Option<String>,
    album_group: Option<String>,
    album_type: Option<String>,
    #[serde(default)]
    total_tracks: u32,
    #[serde(default)]
    external_urls: ExternalUrls,
}

impl From<SpotifyAlbum> for Album {
    fn from(album: SpotifyAlbum) -> Self {
        let url = album
            .external_urls
            .spotify
            .unwrap_or_else(|| format!("https://open.spotify.com/album/{}", album.id));
        Album {
            id: album.id,
            name: album.name,
            release_date: album.release_date,
            album_group: album.album_group.or(album.album_type),
            total_tracks: album.total_tracks,
            url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TopTracksResponse {
    tracks: Vec<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
struct RelatedArtistsResponse {
    artists: Vec<SpotifyArtist>,
}

#[derive(Debug, Deserialize)]
struct AlbumsPage {
    items: Vec<SpotifyAlbum>,
}

#[derive(Debug, Deserialize)]
struct AudioFeaturesResponse {
    audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Deserialize)]
struct AudioAnalysisResponse {
    #[serde(default)]
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    start: f64,
    #[serde(default)]
    loudness_max: f64,
    #[serde(default)]
    pitches: Vec<f64>,
    #[serde(default)]
    timbre: Vec<f64>,
}
