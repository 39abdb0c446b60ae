//! Prompt templates for the language model.
//!
//! Section order and headings are deliberate: response quality depends on
//! the prompt keeping this exact shape. Every builder is deterministic and
//! renders missing data as a fixed phrase rather than an empty join.

use super::records::{TasteEntry, TrackAnalysis};
use crate::catalog::{ArtistProfile, AudioFeatures, CommunityInsights, Track};

/// Rendered for any community-derived field that has no data.
pub const MISSING_MARKER: &str = "N/A";

pub const NO_GENRES: &str = "No genres available";
pub const NO_TOP_TRACKS: &str = "No top tracks available";
pub const NO_SIMILAR_ARTISTS: &str = "No similar artists available";

pub const AR_SPECIALIST_SYSTEM_PROMPT: &str = "You are an experienced A&R specialist with deep knowledge of the music industry, artist development, and market trends.";

pub const MUSIC_ANALYST_SYSTEM_PROMPT: &str =
    "You are an expert music analyst specializing in user behavior and music trends.";

pub const MUSIC_STRATEGIST_SYSTEM_PROMPT: &str = r#"You are an AI-powered Music Strategist and A&R specialist focused on African music.
Analyze the provided information including Spotify metrics and audio features to give insights about:
1. Musical elements and production quality
2. Market potential and target audience
3. Cultural relevance and authenticity
4. Recommendations for growth and development"#;

pub const TALENT_SCOUT_SYSTEM_PROMPT: &str = r#"You are an AI-powered A&R specialist focused on discovering emerging African talent.
Search for and analyze:
1. Emerging artists in the specified region/genre
2. Streaming and social media metrics
3. Recent breakthrough moments
4. Market potential and unique selling points
5. Recommendations for artist development"#;

const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

fn join_or(items: impl IntoIterator<Item = impl AsRef<str>>, fallback: &str) -> String {
    let joined = items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        fallback.to_string()
    } else {
        joined
    }
}

/// The three community fields as they appear in prompts and report files.
pub(crate) struct CommunityFields {
    pub similar: String,
    pub tags: String,
    pub bio: String,
}

impl CommunityFields {
    pub(crate) fn render(insights: Option<&CommunityInsights>, bio_budget: usize) -> Self {
        match insights {
            Some(c) => Self {
                similar: join_or(&c.similar, MISSING_MARKER),
                tags: join_or(&c.tags, MISSING_MARKER),
                bio: c
                    .bio_excerpt(bio_budget)
                    .unwrap_or_else(|| MISSING_MARKER.to_string()),
            },
            None => Self {
                similar: MISSING_MARKER.to_string(),
                tags: MISSING_MARKER.to_string(),
                bio: MISSING_MARKER.to_string(),
            },
        }
    }
}

/// Build the A&R report request for one artist.
///
/// The community block is always present; each of its fields falls back to
/// [`MISSING_MARKER`] when `community` is absent or that field is empty.
pub fn build_artist_report_prompt(
    profile: &ArtistProfile,
    top_tracks: &[Track],
    related_artists: &[ArtistProfile],
    community: Option<&CommunityInsights>,
    bio_budget: usize,
) -> String {
    let community = CommunityFields::render(community, bio_budget);

    format!(
        "As an AI-powered A&R specialist, analyze this artist's potential:

Artist: {name}
Genres: {genres}
Popularity: {popularity}/100
Followers: {followers}

-- Last.fm Data --
Similar Artists: {similar}
Top Tags: {tags}
Bio Summary: {bio}

Spotify Analysis:
Top Tracks: {top_tracks}
Similar Artists: {related}

Please provide a detailed A&R report covering:
1. Market Position & Potential
2. Genre Analysis
3. Artist Development
4. Strategic Recommendations

Format the analysis in clear sections with bullet points where appropriate.",
        name = profile.name,
        genres = join_or(&profile.genres, NO_GENRES),
        popularity = profile.popularity,
        followers = profile.followers,
        similar = community.similar,
        tags = community.tags,
        bio = community.bio,
        top_tracks = join_or(top_tracks.iter().map(|t| &t.name), NO_TOP_TRACKS),
        related = join_or(related_artists.iter().map(|a| &a.name), NO_SIMILAR_ARTISTS),
    )
}

/// One block per track, separated by blank lines.
pub fn build_taste_prompt(entries: &[TasteEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let features = match &entry.features {
                Some(f) => format!(
                    "Energy={:.2}, Danceability={:.2}, Valence={:.2}",
                    f.energy, f.danceability, f.valence
                ),
                None => MISSING_MARKER.to_string(),
            };
            format!(
                "Track: {} by {}\nGenres: {}\nPopularity: {}\nFeatures: {}\n",
                entry.track.name,
                entry.track.artist,
                join_or(&entry.genres, NO_GENRES),
                entry.track.popularity,
                features
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Human-readable key such as `"A minor"`.
pub fn key_name(key: i32, mode: i32) -> String {
    let Some(pitch) = usize::try_from(key).ok().and_then(|k| PITCH_CLASSES.get(k)) else {
        return "unknown".to_string();
    };
    let mode = if mode == 1 { "major" } else { "minor" };
    format!("{} {}", pitch, mode)
}

fn describe_features(f: &AudioFeatures) -> String {
    format!(
        "Danceability={:.2}, Energy={:.2}, Valence={:.2}, Tempo={:.1} BPM, Key={}, \
         Time Signature={}/4, Loudness={:.1} dB, Speechiness={:.2}, Acousticness={:.2}, \
         Instrumentalness={:.2}, Liveness={:.2}",
        f.danceability,
        f.energy,
        f.valence,
        f.tempo,
        key_name(f.key, f.mode),
        f.time_signature,
        f.loudness,
        f.speechiness,
        f.acousticness,
        f.instrumentalness,
        f.liveness
    )
}

/// Plain-text rendering of a track analysis, used inside prompts.
pub fn describe_track_analysis(analysis: &TrackAnalysis) -> String {
    let track = &analysis.track;
    let mut lines = vec![format!("Track: {} by {}", track.name, track.artist)];

    if let Some(album) = &track.album {
        lines.push(match &track.release_date {
            Some(date) => format!("Album: {} ({})", album, date),
            None => format!("Album: {}", album),
        });
    }
    lines.push(format!("Popularity: {}/100", track.popularity));
    if let Some(ms) = track.duration_ms {
        lines.push(format!("Duration: {:.0}s", ms as f64 / 1000.0));
    }
    lines.push(format!(
        "Artist Genres: {}",
        join_or(&analysis.artist_genres, NO_GENRES)
    ));
    if let Some(popularity) = analysis.artist_popularity {
        lines.push(format!("Artist Popularity: {}/100", popularity));
    }

    let features = analysis
        .features
        .as_ref()
        .map(describe_features)
        .unwrap_or_else(|| MISSING_MARKER.to_string());
    lines.push(format!("Audio Features: {}", features));

    let opening = match &analysis.opening {
        Some(agg) => format!(
            "{} segments, average loudness {:.1} dB (min {:.1}, max {:.1}), \
             pitch variety {:.2}..{:.2} (avg {:.2}), timbre variety {:.1}..{:.1} (avg {:.1})",
            agg.segment_count,
            agg.loudness.average,
            agg.loudness.min,
            agg.loudness.max,
            agg.pitch_variety.min,
            agg.pitch_variety.max,
            agg.pitch_variety.average,
            agg.timbre_variety.min,
            agg.timbre_variety.max,
            agg.timbre_variety.average
        ),
        None => MISSING_MARKER.to_string(),
    };
    lines.push(format!("First 30s: {}", opening));

    lines.join("\n")
}

/// Free-form analysis request for an artist and/or song.
pub fn build_track_analysis_prompt(
    artist: Option<&str>,
    genre: Option<&str>,
    song_url: Option<&str>,
    analysis: Option<&TrackAnalysis>,
) -> String {
    let spotify = analysis
        .map(describe_track_analysis)
        .unwrap_or_else(|| "No Spotify data available".to_string());

    format!(
        "Please analyze the following artist/song:
Artist: {}
Genre: {}
Song URL: {}

Spotify Analysis:
{}",
        artist.unwrap_or(MISSING_MARKER),
        genre.unwrap_or(MISSING_MARKER),
        song_url.unwrap_or(MISSING_MARKER),
        spotify
    )
}

pub fn build_scout_prompt(region: &str, genre: &str) -> String {
    format!(
        "Scout for emerging talent in:\nRegion: {}\nGenre: {}\nProvide a detailed report on the top 3 promising artists.",
        region, genre
    )
}
