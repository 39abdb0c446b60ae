use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use cli_style::{
    get_styles, print_empty_list, print_error, print_key_value, print_list_item, print_report,
    print_section_footer, print_section_header, print_success, print_warning, TableBuilder,
};
use insight_hub::catalog::CatalogClient;
use insight_hub::config::{AppConfig, EnvConfig, FileConfig};
use insight_hub::hub::{Hub, TasteAnalysis};
use insight_hub::insight::{key_name, report_file_name, ArtistDossier, TrackAnalysis};
use insight_hub::llm::{LlmError, LlmProvider, OpenAIProvider};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles(), version, about = "Artist and track insight reports")]
struct CliArgs {
    /// Optional TOML file with non-secret settings.
    #[clap(long, global = true, value_parser = parse_path)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show everything known about an artist.
    Artist {
        /// Artist id, profile URL or URI.
        reference: String,
        /// Print the dossier as JSON instead of formatted text.
        #[clap(long)]
        json: bool,
    },

    /// Generate an A&R report for an artist.
    Report {
        reference: String,
        /// Write the downloadable report here. A directory gets the default file name.
        #[clap(long, short, value_parser = parse_path)]
        output: Option<PathBuf>,
    },

    /// Show audio features and opening-segment statistics for a track.
    Track {
        reference: String,
        #[clap(long)]
        json: bool,
    },

    /// Profile the listening taste of a set of tracks.
    Taste {
        #[clap(required = true)]
        references: Vec<String>,
        /// Skip the model call and only show the collected data.
        #[clap(long)]
        no_insights: bool,
    },

    /// Ask for a strategist's take on an artist, song or genre.
    #[command(group(ArgGroup::new("subject").required(true).multiple(true).args(["artist", "song", "genre"])))]
    Analyze {
        #[clap(long)]
        artist: Option<String>,
        /// Track URL, URI or id. Adds catalog data to the request when it resolves.
        #[clap(long)]
        song: Option<String>,
        #[clap(long)]
        genre: Option<String>,
    },

    /// Scout emerging talent in a region and genre.
    Scout {
        #[clap(long)]
        region: String,
        #[clap(long)]
        genre: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli_args = CliArgs::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let env = EnvConfig::from_env()?;
    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(env, file_config)?;
    debug!(market = %config.market, model = %config.llm_model, "Configuration resolved");

    let catalog =
        CatalogClient::new(config.catalog_settings()).context("Failed to build catalog client")?;
    let llm: Arc<dyn LlmProvider> = Arc::new(OpenAIProvider::new(
        &config.env.llm_base_url,
        &config.llm_model,
        &config.env.llm_api_key,
    ));
    let hub = Hub::new(catalog, llm, config.hub_settings());

    run(&hub, cli_args.command).await
}

async fn run(hub: &Hub, command: Command) -> Result<ExitCode> {
    match command {
        Command::Artist { reference, json } => {
            let Some(dossier) = hub.artist_dossier(&reference).await else {
                return Ok(missing_artist());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&dossier)?);
            } else {
                show_dossier(&dossier, hub.settings().bio_display_chars);
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Report { reference, output } => {
            let Some(dossier) = hub.artist_dossier(&reference).await else {
                return Ok(missing_artist());
            };
            let report = match hub.generate_ar_report(&dossier).await {
                Ok(report) => report,
                Err(e) => return Ok(llm_failure(&e)),
            };

            print_section_header("A&R Analysis Report");
            print_report(&report);
            print_section_footer();

            if let Some(output) = output {
                let path = if output.is_dir() {
                    output.join(report_file_name(&dossier.profile.name))
                } else {
                    output
                };
                let today = chrono::Local::now().date_naive();
                let contents = hub.report_file(&dossier, &report, today);
                std::fs::write(&path, contents)
                    .with_context(|| format!("Failed to write report to {:?}", path))?;
                info!(path = ?path, "Report written");
                print_success(&format!("Report saved to {}", path.display()));
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Track { reference, json } => {
            let Some(analysis) = hub.track_analysis(&reference).await else {
                print_error("Unable to fetch track data. Please check the track ID or URL.");
                return Ok(ExitCode::FAILURE);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                show_track(&analysis);
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Taste {
            references,
            no_insights,
        } => {
            let analysis = hub.taste_analysis(&references).await;
            for skipped in &analysis.skipped {
                print_warning(&format!("Skipped {}", skipped));
            }
            if analysis.entries.is_empty() {
                print_error("None of the given tracks could be fetched.");
                return Ok(ExitCode::FAILURE);
            }
            show_taste(&analysis);

            if no_insights {
                return Ok(ExitCode::SUCCESS);
            }
            match hub.taste_insights(&analysis).await {
                Ok(text) => {
                    print_section_header("Music Taste Analysis");
                    print_report(&text);
                    print_section_footer();
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(llm_failure(&e)),
            }
        }

        Command::Analyze {
            artist,
            song,
            genre,
        } => {
            let result = hub
                .analyze_music(artist.as_deref(), song.as_deref(), genre.as_deref())
                .await;
            print_llm_result("Analysis", result)
        }

        Command::Scout { region, genre } => {
            let result = hub.scout_talent(&region, &genre).await;
            print_llm_result("Talent Scouting Report", result)
        }
    }
}

fn print_llm_result(title: &str, result: Result<String, LlmError>) -> Result<ExitCode> {
    match result {
        Ok(text) => {
            print_section_header(title);
            print_report(&text);
            print_section_footer();
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(llm_failure(&e)),
    }
}

fn llm_failure(error: &LlmError) -> ExitCode {
    print_error(&error.to_string());
    ExitCode::FAILURE
}

fn missing_artist() -> ExitCode {
    print_error("Unable to fetch artist data. Please check the artist ID or URL.");
    ExitCode::FAILURE
}

fn show_dossier(dossier: &ArtistDossier, bio_budget: usize) {
    let profile = &dossier.profile;

    print_section_header(&profile.name);
    print_key_value("Genres", &join_or_none(&profile.genres));
    print_key_value("Popularity", &format!("{}/100", profile.popularity));
    print_key_value("Followers", &profile.followers.to_string());
    print_key_value("Profile", &profile.profile_url);
    if let Some(image) = &profile.image_url {
        print_key_value("Image", image);
    }
    print_section_footer();

    print_section_header("Top Tracks");
    if dossier.top_tracks.is_empty() {
        print_empty_list("No top tracks available");
    } else {
        let mut table = TableBuilder::new(&["Track", "Album", "Popularity"]);
        for track in &dossier.top_tracks {
            table.add_row(vec![
                track.name.clone(),
                track.album.clone().unwrap_or_default(),
                track.popularity.to_string(),
            ]);
        }
        table.print();
    }
    let features = &dossier.top_track_features;
    if features.sample_count > 0 {
        print_key_value(
            "Average features",
            &format!(
                "danceability {:.2}, energy {:.2}, valence {:.2}, tempo {:.1} BPM over {} tracks",
                features.danceability,
                features.energy,
                features.valence,
                features.tempo,
                features.sample_count
            ),
        );
    }
    print_section_footer();

    print_section_header("Related Artists");
    if dossier.related_artists.is_empty() {
        print_empty_list("No similar artists available");
    }
    for artist in &dossier.related_artists {
        print_list_item(&format!("{} (popularity {})", artist.name, artist.popularity));
    }
    print_section_footer();

    print_section_header("Discography");
    let discography = &dossier.discography;
    print_key_value("Releases", &discography.total_albums.to_string());
    for (label, album) in [
        ("Latest", &discography.latest_release),
        ("Earliest", &discography.earliest_release),
    ] {
        if let Some(album) = album {
            print_key_value(
                label,
                &format!(
                    "{} ({})",
                    album.name,
                    album.release_date.as_deref().unwrap_or("unknown date")
                ),
            );
        }
    }
    print_section_footer();

    print_section_header("Last.fm Insights");
    match &dossier.community {
        Some(community) => {
            print_key_value("Similar artists", &join_or_none(&community.similar));
            print_key_value("Tags", &join_or_none(&community.tags));
            if let Some(bio) = community.bio_excerpt(bio_budget) {
                print_key_value("Bio", &bio);
            }
        }
        None => print_empty_list("No community data available"),
    }
    print_section_footer();
}

fn show_track(analysis: &TrackAnalysis) {
    let track = &analysis.track;
    print_section_header(&format!("{} by {}", track.name, track.artist));
    if let Some(album) = &track.album {
        print_key_value("Album", album);
    }
    print_key_value("Popularity", &format!("{}/100", track.popularity));
    print_key_value("Artist genres", &join_or_none(&analysis.artist_genres));
    print_key_value("Link", &track.url);
    print_section_footer();

    print_section_header("Audio Features");
    match &analysis.features {
        Some(f) => {
            let mut table = TableBuilder::new(&["Feature", "Value"]);
            for (name, value) in [
                ("Danceability", format!("{:.3}", f.danceability)),
                ("Energy", format!("{:.3}", f.energy)),
                ("Valence", format!("{:.3}", f.valence)),
                ("Tempo", format!("{:.1} BPM", f.tempo)),
                ("Key", key_name(f.key, f.mode)),
                ("Loudness", format!("{:.1} dB", f.loudness)),
                ("Speechiness", format!("{:.3}", f.speechiness)),
                ("Acousticness", format!("{:.3}", f.acousticness)),
                ("Instrumentalness", format!("{:.3}", f.instrumentalness)),
                ("Liveness", format!("{:.3}", f.liveness)),
                ("Time signature", format!("{}/4", f.time_signature)),
            ] {
                table.add_row(vec![name.to_string(), value]);
            }
            table.print();
        }
        None => print_empty_list("No audio features available"),
    }
    print_section_footer();

    print_section_header("Opening Segments");
    match &analysis.opening {
        Some(agg) => {
            print_key_value("Segments", &agg.segment_count.to_string());
            print_key_value(
                "Loudness",
                &format!(
                    "avg {:.1} dB, min {:.1}, max {:.1}",
                    agg.loudness.average, agg.loudness.min, agg.loudness.max
                ),
            );
            print_key_value(
                "Pitch variety",
                &format!(
                    "avg {:.2}, min {:.2}, max {:.2}",
                    agg.pitch_variety.average, agg.pitch_variety.min, agg.pitch_variety.max
                ),
            );
            print_key_value(
                "Timbre variety",
                &format!(
                    "avg {:.1}, min {:.1}, max {:.1}",
                    agg.timbre_variety.average, agg.timbre_variety.min, agg.timbre_variety.max
                ),
            );
        }
        None => print_empty_list("No segment analysis available"),
    }
    print_section_footer();
}

fn show_taste(analysis: &TasteAnalysis) {
    print_section_header("Listening Sample");
    let mut table = TableBuilder::new(&["Track", "Artist", "Energy", "Dance", "Valence"]);
    for entry in &analysis.entries {
        let cell = |value: Option<f64>| value.map(|v| format!("{:.2}", v)).unwrap_or_default();
        table.add_row(vec![
            entry.track.name.clone(),
            entry.track.artist.clone(),
            cell(entry.features.as_ref().map(|f| f.energy)),
            cell(entry.features.as_ref().map(|f| f.danceability)),
            cell(entry.features.as_ref().map(|f| f.valence)),
        ]);
    }
    table.print();

    let average = &analysis.average;
    if average.sample_count > 0 {
        print_key_value(
            "Average",
            &format!(
                "energy {:.2}, danceability {:.2}, valence {:.2}, tempo {:.1} BPM",
                average.energy, average.danceability, average.valence, average.tempo
            ),
        );
    }
    print_section_footer();
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
