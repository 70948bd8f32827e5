//! Test constants
//!
//! Credentials and catalog values seeded by the fixtures. Ids are generated
//! by the store, so tests read them from [`super::CatalogFixture`].

// ============================================================================
// Admin Credentials
// ============================================================================

/// Admin seeded into every test server
pub const ADMIN_NAME: &str = "Test Admin";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASS: &str = "admin-pass";

/// Secret used to sign tokens in tests
pub const TEST_JWT_SECRET: &str = "test-secret-0123456789";

/// Token lifetime used by the test server
pub const TEST_TOKEN_TTL_SEC: u64 = 3600;

// ============================================================================
// Seeded Catalog
// ============================================================================

pub const ARTIST_1_NAME: &str = "The Test Band";
pub const ARTIST_2_NAME: &str = "Jazz Ensemble";

pub const GENRE_ROCK_NAME: &str = "Rock";
pub const GENRE_JAZZ_NAME: &str = "Jazz";

/// Album of artist 1, genre Rock, featuring artist 2
pub const ALBUM_1_TITLE: &str = "First Album";
pub const ALBUM_1_SONGS: &[&str] = &["Opening", "Closing"];

/// Single of artist 2, genre Jazz
pub const SINGLE_1_TITLE: &str = "Smooth Night";

pub const MERCH_1_LINK: &str = "https://shop.example.com/test-band-shirt";

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for the server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness checks (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Default timeout for HTTP requests in tests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
