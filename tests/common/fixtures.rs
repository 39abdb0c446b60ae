//! Canned upstream payloads in the providers' wire format.

use super::constants::*;
use serde_json::{json, Value};

fn artist(id: &str, name: &str, genres: &[&str], popularity: u32, followers: u64) -> Value {
    json!({
        "id": id,
        "name": name,
        "genres": genres,
        "popularity": popularity,
        "followers": {"href": null, "total": followers},
        "images": [{"url": format!("https://i.scdn.co/image/{}", id), "height": 640, "width": 640}],
        "external_urls": {"spotify": format!("https://open.spotify.com/artist/{}", id)},
        "type": "artist"
    })
}

pub fn artist_json(id: &str) -> Option<Value> {
    match id {
        REMA_ID => Some(artist(
            REMA_ID,
            REMA_NAME,
            &["afrobeats", "nigerian pop"],
            80,
            1_000_000,
        )),
        QUIET_ARTIST_ID => Some(json!({
            "id": QUIET_ARTIST_ID,
            "name": QUIET_ARTIST_NAME,
            "genres": [],
            "popularity": 3,
            "followers": {"href": null, "total": 12},
            "images": []
        })),
        _ => None,
    }
}

fn track(id: &str, name: &str, popularity: u32, duration_ms: u64) -> Value {
    json!({
        "id": id,
        "name": name,
        "artists": [{"id": REMA_ID, "name": REMA_NAME}],
        "album": {"name": "Rave & Roses", "release_date": "2022-03-25"},
        "popularity": popularity,
        "preview_url": null,
        "duration_ms": duration_ms,
        "external_urls": {"spotify": format!("https://open.spotify.com/track/{}", id)}
    })
}

pub fn track_json(id: &str) -> Option<Value> {
    match id {
        CALM_DOWN_ID => Some(track(CALM_DOWN_ID, "Calm Down", 88, 239_318)),
        CHARM_ID => Some(track(CHARM_ID, "Charm", 70, 181_000)),
        _ => None,
    }
}

pub fn top_tracks_json(artist_id: &str) -> Option<Value> {
    match artist_id {
        REMA_ID => Some(json!({"tracks": [track_json(CALM_DOWN_ID), track_json(CHARM_ID)]})),
        QUIET_ARTIST_ID => Some(json!({"tracks": []})),
        _ => None,
    }
}

pub fn related_artists_json(artist_id: &str) -> Option<Value> {
    match artist_id {
        REMA_ID => {
            let names = [
                "Ayra Starr",
                "Asake",
                "Fireboy DML",
                "Omah Lay",
                "Ruger",
                "Victony",
            ];
            let artists: Vec<Value> = names
                .iter()
                .enumerate()
                .map(|(i, name)| artist(&format!("related{}", i), name, &["afrobeats"], 70, 5000))
                .collect();
            Some(json!({ "artists": artists }))
        }
        QUIET_ARTIST_ID => Some(json!({"artists": []})),
        _ => None,
    }
}

pub fn albums_json(artist_id: &str) -> Option<Value> {
    match artist_id {
        REMA_ID => Some(json!({
            "items": [
                {"id": "album-heis", "name": "HEIS", "release_date": "2024-07-11",
                 "album_group": "album", "album_type": "album", "total_tracks": 11},
                {"id": "album-rave", "name": "Rave & Roses", "release_date": "2022-03-25",
                 "album_group": "album", "album_type": "album", "total_tracks": 16},
                {"id": "album-dumebi", "name": "Dumebi", "release_date": "2019-05-10",
                 "album_type": "single", "total_tracks": 1}
            ],
            "total": 3
        })),
        QUIET_ARTIST_ID => Some(json!({"items": [], "total": 0})),
        _ => None,
    }
}

pub fn audio_features_json(track_id: &str) -> Option<Value> {
    let (danceability, energy, valence, tempo, key, mode) = match track_id {
        CALM_DOWN_ID => (0.75, 0.8, 0.75, 107.0, 11, 0),
        CHARM_ID => (0.25, 0.4, 0.25, 93.0, 1, 1),
        _ => return None,
    };
    Some(json!({
        "id": track_id,
        "danceability": danceability,
        "energy": energy,
        "valence": valence,
        "tempo": tempo,
        "key": key,
        "mode": mode,
        "loudness": -5.0,
        "speechiness": 0.05,
        "acousticness": 0.25,
        "instrumentalness": 0.0,
        "liveness": 0.125,
        "time_signature": 4,
        "type": "audio_features"
    }))
}

/// Segments at 0s, 10s and 29.5s fall inside the default window; 31s does not.
pub fn audio_analysis_json(track_id: &str) -> Option<Value> {
    if track_id != CALM_DOWN_ID {
        return None;
    }
    let pitches = vec![0.5f64; 12];
    let timbre = vec![1.0f64; 12];
    let segment = |start: f64, loudness_max: f64| {
        json!({
            "start": start,
            "duration": 0.25,
            "loudness_start": -30.0,
            "loudness_max": loudness_max,
            "pitches": pitches.clone(),
            "timbre": timbre.clone()
        })
    };
    Some(json!({
        "track": {"duration": 239.3},
        "segments": [
            segment(0.0, -10.0),
            segment(10.0, -6.0),
            segment(29.5, -8.0),
            segment(31.0, 0.0)
        ]
    }))
}

pub fn lastfm_artist_json(name: &str) -> Value {
    if name != REMA_NAME {
        return json!({"error": 6, "message": "The artist you supplied could not be found"});
    }
    json!({
        "artist": {
            "name": REMA_NAME,
            "similar": {"artist": [
                {"name": "Ayra Starr"}, {"name": "Asake"}, {"name": "Crayon"},
                {"name": "Omah Lay"}, {"name": "Ruger"}, {"name": "Magixx"}
            ]},
            "tags": {"tag": [{"name": "afrobeats"}, {"name": "nigerian"}, {"name": "afropop"}]},
            "bio": {"summary": "Divine Ikubor, known professionally as Rema, is a Nigerian singer and rapper. <a href=\"https://www.last.fm/music/Rema\">Read more on Last.fm</a>"}
        }
    })
}

pub fn chat_completion_json(model: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": CHAT_REPLY},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 321, "completion_tokens": 45, "total_tokens": 366}
    })
}
