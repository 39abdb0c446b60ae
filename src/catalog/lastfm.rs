//! Last.fm API client for artist context.
//!
//! Only `artist.getinfo` is used: it returns similar artists, tags and a
//! biography in a single call.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::error::{FetchError, FetchResult};
use super::models::CommunityInsights;

pub const LASTFM_API_BASE: &str = "https://ws.audioscrobbler.com/2.0/";

/// Last.fm returns more similar artists than the report needs.
const SIMILAR_ARTISTS_LIMIT: usize = 5;

pub struct LastFmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Deserialize)]
struct ArtistInfoResponse {
    artist: LastFmArtist,
}

#[derive(Deserialize)]
struct LastFmArtist {
    similar: Option<SimilarContainer>,
    tags: Option<TagContainer>,
    bio: Option<LastFmBio>,
}

#[derive(Deserialize)]
struct SimilarContainer {
    #[serde(default)]
    artist: OneOrMany<NamedEntry>,
}

#[derive(Deserialize)]
struct TagContainer {
    #[serde(default)]
    tag: OneOrMany<NamedEntry>,
}

#[derive(Deserialize)]
struct NamedEntry {
    name: Option<String>,
}

/// Last.fm collapses one-element lists into a bare object.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Names of the entries that carry one, in order.
fn entry_names(entries: Option<OneOrMany<NamedEntry>>) -> impl Iterator<Item = String> {
    entries
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|e| e.name.filter(|n| !n.trim().is_empty()))
}

#[derive(Deserialize)]
struct LastFmBio {
    summary: Option<String>,
}

impl LastFmClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> FetchResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
        })
    }

    /// Fetch similar artists, tags and biography for an artist by exact name.
    pub async fn artist_info(&self, artist_name: &str) -> FetchResult<CommunityInsights> {
        let url = format!(
            "{}?method=artist.getinfo&artist={}&api_key={}&format=json",
            self.base_url,
            urlencoding::encode(artist_name),
            self.api_key
        );

        debug!(artist = %artist_name, "Fetching artist info from Last.fm");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_artist_info(&body)
    }
}

/// Decode an `artist.getinfo` body, honoring Last.fm's in-band error payloads.
fn parse_artist_info(body: &str) -> FetchResult<CommunityInsights> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    if let Some(code) = value.get("error").and_then(Value::as_i64) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown Last.fm error")
            .to_string();
        return Err(FetchError::Api { code, message });
    }

    let response: ArtistInfoResponse =
        serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))?;
    let artist = response.artist;

    let similar = entry_names(artist.similar.map(|s| s.artist))
        .take(SIMILAR_ARTISTS_LIMIT)
        .collect();
    let tags = entry_names(artist.tags.map(|t| t.tag)).collect();

    let bio = artist
        .bio
        .and_then(|b| b.summary)
        .map(|s| strip_read_more(&s))
        .unwrap_or_default();

    Ok(CommunityInsights { similar, tags, bio })
}

/// Drop the "Read more on Last.fm" anchor appended to every summary.
fn strip_read_more(summary: &str) -> String {
    match summary.find("<a href") {
        Some(idx) => summary[..idx].trim().to_string(),
        None => summary.trim().to_string(),
    }
}
