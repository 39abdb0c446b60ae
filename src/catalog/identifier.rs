//! Resolution of user-supplied catalog references.
//!
//! Accepts canonical URLs (`https://open.spotify.com/artist/<id>?si=...`),
//! URIs (`spotify:artist:<id>`) and bare identifiers. Parsing is best effort:
//! nothing is validated against the provider's identifier alphabet.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of catalog entity a reference points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceKind {
    Artist,
    Track,
    Album,
}

impl ReferenceKind {
    fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Artist => "artist",
            ReferenceKind::Track => "track",
            ReferenceKind::Album => "album",
        }
    }

    /// Marker preceding the identifier in a canonical URL path.
    pub fn path_marker(&self) -> String {
        format!("{}/", self.as_str())
    }

    /// Marker preceding the identifier in a provider URI.
    pub fn uri_marker(&self) -> String {
        format!("spotify:{}:", self.as_str())
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract a provider identifier from `reference`.
///
/// Returns `None` only when there is nothing to extract.
pub fn resolve_identifier(reference: &str, kind: ReferenceKind) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    let path_marker = kind.path_marker();
    let uri_marker = kind.uri_marker();

    let id = if let Some((_, rest)) = reference.split_once(path_marker.as_str()) {
        rest.split('?').next().unwrap_or_default()
    } else if let Some((_, rest)) = reference.split_once(uri_marker.as_str()) {
        rest
    } else {
        reference
    };

    let id = id.trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
