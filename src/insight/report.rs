use chrono::NaiveDate;

use super::prompts::CommunityFields;
use crate::catalog::CommunityInsights;

/// Download name for an artist's report, e.g. `ar_report_burna_boy.txt`.
pub fn report_file_name(artist_name: &str) -> String {
    format!("ar_report_{}.txt", artist_name.to_lowercase().replace(' ', "_"))
}

/// Contents of the downloadable report file.
///
/// The insights block is only written when community data exists; its bio is
/// cut to `bio_budget` characters.
pub fn render_report_file(
    artist_name: &str,
    date: NaiveDate,
    community: Option<&CommunityInsights>,
    report: &str,
    bio_budget: usize,
) -> String {
    let mut out = format!(
        "A&R Report for {}\nGenerated on {}\n\n",
        artist_name,
        date.format("%Y-%m-%d")
    );

    if community.is_some() {
        let fields = CommunityFields::render(community, bio_budget);
        out.push_str("-- Last.fm Insights --\n");
        out.push_str(&format!("Similar Artists: {}\n", fields.similar));
        out.push_str(&format!("Top Tags: {}\n", fields.tags));
        out.push_str(&format!("Bio: {}\n\n", fields.bio));
    }

    out.push_str(report);
    out
}
