//! Pure aggregation and prompt composition over catalog records.
//!
//! Nothing in here performs I/O or fails: missing inputs render as fixed
//! placeholder text or zeroed statistics.

mod features;
pub mod prompts;
mod records;
mod report;
mod segments;

pub use features::{average_features, AggregatedFeatures};
pub use prompts::{
    build_artist_report_prompt, build_scout_prompt, build_taste_prompt,
    build_track_analysis_prompt, describe_track_analysis, key_name,
    AR_SPECIALIST_SYSTEM_PROMPT, MUSIC_ANALYST_SYSTEM_PROMPT, MUSIC_STRATEGIST_SYSTEM_PROMPT,
    TALENT_SCOUT_SYSTEM_PROMPT,
};
pub use records::{
    summarize_discography, ArtistDossier, DiscographySummary, TasteEntry, TrackAnalysis,
};
pub use report::{render_report_file, report_file_name};
pub use segments::{summarize_segments, SegmentAggregate, Spread, DEFAULT_SEGMENT_CUTOFF_SECS};
