//! Orchestration of catalog lookups, composition and model calls.
//!
//! Every catalog fetch made here fails soft through [`CatalogClient`]; the
//! only errors a caller sees are [`LlmError`]s from the model call.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{
    resolve_identifier, AudioFeatures, CatalogClient, ReferenceKind, Track, DEFAULT_INCLUDE_GROUPS,
};
use crate::insight::{
    average_features, build_artist_report_prompt, build_scout_prompt, build_taste_prompt,
    build_track_analysis_prompt, render_report_file, summarize_discography, summarize_segments,
    AggregatedFeatures, ArtistDossier, TasteEntry, TrackAnalysis, AR_SPECIALIST_SYSTEM_PROMPT,
    DEFAULT_SEGMENT_CUTOFF_SECS, MUSIC_ANALYST_SYSTEM_PROMPT, MUSIC_STRATEGIST_SYSTEM_PROMPT,
    TALENT_SCOUT_SYSTEM_PROMPT,
};
use crate::llm::{CompletionOptions, FinishReason, LlmError, LlmProvider, Message};

#[derive(Debug, Clone)]
pub struct HubSettings {
    /// Bio characters quoted in the report prompt.
    pub bio_prompt_chars: usize,
    /// Bio characters written to the report file.
    pub bio_display_chars: usize,
    pub segment_cutoff_secs: f64,
    pub completion: CompletionOptions,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            bio_prompt_chars: 300,
            bio_display_chars: 600,
            segment_cutoff_secs: DEFAULT_SEGMENT_CUTOFF_SECS,
            completion: CompletionOptions::default(),
        }
    }
}

/// A listening-taste sample and its averaged audio profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasteAnalysis {
    pub entries: Vec<TasteEntry>,
    pub average: AggregatedFeatures,
    /// References that could not be resolved or fetched.
    pub skipped: Vec<String>,
}

pub struct Hub {
    catalog: CatalogClient,
    llm: Arc<dyn LlmProvider>,
    settings: HubSettings,
}

impl Hub {
    pub fn new(catalog: CatalogClient, llm: Arc<dyn LlmProvider>, settings: HubSettings) -> Self {
        Self {
            catalog,
            llm,
            settings,
        }
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub fn settings(&self) -> &HubSettings {
        &self.settings
    }

    /// Gather everything known about an artist.
    ///
    /// `None` when the reference does not resolve or the profile is missing;
    /// every other part degrades to empty on its own.
    pub async fn artist_dossier(&self, reference: &str) -> Option<ArtistDossier> {
        let Some(id) = resolve_identifier(reference, ReferenceKind::Artist) else {
            warn!(reference, "Could not resolve artist reference");
            return None;
        };

        let profile = self.catalog.get_artist_profile(&id).await?;
        info!(artist = %profile.name, id = %id, "Building artist dossier");

        let market = self.catalog.market().to_string();
        let (top_tracks, related_artists, albums, community) = tokio::join!(
            self.catalog.get_artist_top_tracks(&id, &market),
            self.catalog.get_related_artists(&id),
            self.catalog.get_albums(&id, DEFAULT_INCLUDE_GROUPS),
            self.catalog.get_community_insights(&profile.name),
        );

        let track_ids: Vec<String> = top_tracks.iter().map(|t| t.id.clone()).collect();
        let features = self.catalog.get_audio_features_batch(&track_ids).await;
        let top_track_features = average_features(&features);

        debug!(
            top_tracks = top_tracks.len(),
            related = related_artists.len(),
            albums = albums.len(),
            has_community = community.is_some(),
            feature_samples = top_track_features.sample_count,
            "Dossier assembled"
        );

        Some(ArtistDossier {
            discography: summarize_discography(&albums),
            profile,
            top_tracks,
            related_artists,
            albums,
            community,
            top_track_features,
        })
    }

    pub async fn generate_ar_report(&self, dossier: &ArtistDossier) -> Result<String, LlmError> {
        let prompt = build_artist_report_prompt(
            &dossier.profile,
            &dossier.top_tracks,
            &dossier.related_artists,
            dossier.community.as_ref(),
            self.settings.bio_prompt_chars,
        );
        self.ask(AR_SPECIALIST_SYSTEM_PROMPT, prompt).await
    }

    /// Text of the downloadable report for a dossier.
    pub fn report_file(&self, dossier: &ArtistDossier, report: &str, date: NaiveDate) -> String {
        render_report_file(
            &dossier.profile.name,
            date,
            dossier.community.as_ref(),
            report,
            self.settings.bio_display_chars,
        )
    }

    pub async fn track_analysis(&self, reference: &str) -> Option<TrackAnalysis> {
        let Some(id) = resolve_identifier(reference, ReferenceKind::Track) else {
            warn!(reference, "Could not resolve track reference");
            return None;
        };

        let track = self.catalog.get_track(&id).await?;
        let artist_id = track.artist_id.clone();

        let (features, segments, artist) = tokio::join!(
            self.catalog.get_track_audio_features(&id),
            self.catalog.get_track_segments(&id),
            async {
                match artist_id.as_deref() {
                    Some(artist_id) => self.catalog.get_artist_profile(artist_id).await,
                    None => None,
                }
            },
        );

        let opening = summarize_segments(&segments, self.settings.segment_cutoff_secs);
        let (artist_genres, artist_popularity) = match artist {
            Some(profile) => (profile.genres, Some(profile.popularity)),
            None => (Vec::new(), None),
        };

        Some(TrackAnalysis {
            track,
            artist_genres,
            artist_popularity,
            features,
            opening,
        })
    }

    /// Fetch each referenced track with its artist genres and audio features.
    pub async fn taste_analysis(&self, references: &[String]) -> TasteAnalysis {
        let mut tracks: Vec<Track> = Vec::new();
        let mut skipped = Vec::new();

        for reference in references {
            let track = match resolve_identifier(reference, ReferenceKind::Track) {
                Some(id) => self.catalog.get_track(&id).await,
                None => None,
            };
            match track {
                Some(track) => tracks.push(track),
                None => skipped.push(reference.clone()),
            }
        }

        let track_ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
        let features = self.catalog.get_audio_features_batch(&track_ids).await;

        let mut genres_by_artist: HashMap<String, Vec<String>> = HashMap::new();
        for artist_id in tracks.iter().filter_map(|t| t.artist_id.as_ref()) {
            if genres_by_artist.contains_key(artist_id) {
                continue;
            }
            let genres = self
                .catalog
                .get_artist_profile(artist_id)
                .await
                .map(|p| p.genres)
                .unwrap_or_default();
            genres_by_artist.insert(artist_id.clone(), genres);
        }

        let entries: Vec<TasteEntry> = tracks
            .into_iter()
            .zip(features)
            .map(|(track, features)| {
                let genres = track
                    .artist_id
                    .as_ref()
                    .and_then(|id| genres_by_artist.get(id))
                    .cloned()
                    .unwrap_or_default();
                TasteEntry {
                    track,
                    genres,
                    features,
                }
            })
            .collect();

        let sampled: Vec<Option<AudioFeatures>> =
            entries.iter().map(|e| e.features.clone()).collect();

        info!(
            tracks = entries.len(),
            skipped = skipped.len(),
            "Taste sample collected"
        );

        TasteAnalysis {
            average: average_features(&sampled),
            entries,
            skipped,
        }
    }

    /// Ask the model to interpret a taste sample.
    ///
    /// Callers are expected to skip this for an empty sample.
    pub async fn taste_insights(&self, analysis: &TasteAnalysis) -> Result<String, LlmError> {
        let prompt = build_taste_prompt(&analysis.entries);
        self.ask(MUSIC_ANALYST_SYSTEM_PROMPT, prompt).await
    }

    /// Free-form analysis; track data is included when `song_url` resolves.
    pub async fn analyze_music(
        &self,
        artist: Option<&str>,
        song_url: Option<&str>,
        genre: Option<&str>,
    ) -> Result<String, LlmError> {
        let analysis = match song_url {
            Some(reference) => self.track_analysis(reference).await,
            None => None,
        };
        let prompt = build_track_analysis_prompt(artist, genre, song_url, analysis.as_ref());
        self.ask(MUSIC_STRATEGIST_SYSTEM_PROMPT, prompt).await
    }

    pub async fn scout_talent(&self, region: &str, genre: &str) -> Result<String, LlmError> {
        self.ask(TALENT_SCOUT_SYSTEM_PROMPT, build_scout_prompt(region, genre))
            .await
    }

    async fn ask(&self, system: &str, prompt: String) -> Result<String, LlmError> {
        let messages = [Message::system(system), Message::user(prompt)];

        info!(
            provider = self.llm.name(),
            model = self.llm.model(),
            "Requesting completion"
        );
        let response = self
            .llm
            .complete(&messages, &self.settings.completion)
            .await?;

        if response.finish_reason == FinishReason::MaxTokens {
            warn!("Completion was cut at the token limit");
        }
        if let Some(usage) = response.usage {
            info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion received"
            );
        }

        Ok(response.message.content)
    }
}
