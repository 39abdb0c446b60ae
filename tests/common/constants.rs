//! Shared constants for end-to-end tests
//!
//! Fixture ids, credentials and canned replies live here so the fake
//! upstream and the tests agree on them.

// ============================================================================
// Credentials
// ============================================================================

pub const TEST_CLIENT_ID: &str = "test-client-id";
pub const TEST_CLIENT_SECRET: &str = "test-client-secret";

/// Token handed out by the fake token endpoint
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

pub const TEST_LASTFM_KEY: &str = "test-lastfm-key";
pub const TEST_LLM_KEY: &str = "test-llm-key";
pub const TEST_LLM_MODEL: &str = "test-model";

// ============================================================================
// Catalog IDs
// ============================================================================

/// "Rema": full profile, tracks, albums and community data
pub const REMA_ID: &str = "46pWGuE3dSwY3bMMXGBvVS";
pub const REMA_NAME: &str = "Rema";

/// "Quiet Artist": a profile with nothing else attached
pub const QUIET_ARTIST_ID: &str = "0quietartist00000000000";
pub const QUIET_ARTIST_NAME: &str = "Quiet Artist";

/// Artist the catalog has never heard of
pub const UNKNOWN_ARTIST_ID: &str = "0unknownartist000000000";

pub const CALM_DOWN_ID: &str = "0WtM2NBVQNNJLh6scP13H8";
pub const CHARM_ID: &str = "1charm000000000000000";

/// Track with no catalog entry at all
pub const MISSING_TRACK_ID: &str = "0missingtrack0000000000";

// ============================================================================
// Model
// ============================================================================

/// Content of every successful chat completion
pub const CHAT_REPLY: &str = "## Market Position & Potential\n- Global crossover reach";

// ============================================================================
// Server timing
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;
