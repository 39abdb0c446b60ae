//! Common test infrastructure
//!
//! End-to-end tests run the real clients against [`FakeUpstream`], an axum
//! server that plays the catalog, Last.fm and chat-completion APIs on one
//! random local port. Tests should only import from this module.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{FakeUpstream, REMA_ID};
//!
//! #[tokio::test]
//! async fn test_dossier() {
//!     let upstream = FakeUpstream::spawn().await;
//!     let hub = upstream.hub();
//!
//!     let dossier = hub.artist_dossier(REMA_ID).await.unwrap();
//!     assert_eq!(dossier.profile.name, "Rema");
//! }
//! ```

#![allow(dead_code)]

mod constants;
mod fixtures;
mod server;

pub use constants::*;
pub use server::{FakeUpstream, RecordedChat, UpstreamOptions};
