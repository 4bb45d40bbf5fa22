//! Centralized default constants for the Foundry service.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates should reference these constants instead of defining
//! their own magic numbers.

// =============================================================================
// MATCHING
// =============================================================================

/// Similarity score above which a found-item match triggers notification
/// of both parties.
pub const MATCH_SCORE_THRESHOLD: f32 = 0.7;

/// Number of candidates requested from the matching service per similarity
/// query.
pub const MATCH_TOP_K: usize = 5;

/// Score at or above which a candidate is labeled "High" confidence.
pub const CONFIDENCE_HIGH: f32 = 0.75;

/// Score at or above which a candidate is labeled "Medium" confidence.
pub const CONFIDENCE_MEDIUM: f32 = 0.5;

/// Default matching service base URL.
pub const MATCH_SERVICE_URL: &str = "http://127.0.0.1:8000";

/// Timeout for matching service requests in seconds.
pub const MATCH_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// NOTIFICATIONS
// =============================================================================

/// Default mail relay base URL.
pub const MAIL_RELAY_URL: &str = "http://127.0.0.1:8025";

/// Timeout for mail relay requests in seconds.
pub const MAIL_TIMEOUT_SECS: u64 = 10;

/// Default sender address for match notifications.
pub const MAIL_FROM: &str = "no-reply@foundry.campus";

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 5000;

/// Default rate limit: max requests per period.
pub const RATE_LIMIT_REQUESTS: u64 = 100;

/// Default rate limit: period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;

/// Maximum request body size in bytes (image uploads dominate).
pub const MAX_BODY_SIZE_BYTES: usize = 8 * 1024 * 1024;

// =============================================================================
// UPLOADS
// =============================================================================

/// Maximum accepted image upload size in bytes (5 MiB).
pub const UPLOAD_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Default upload folder when the client does not supply one.
pub const UPLOAD_FOLDER: &str = "foundry";

/// Default filesystem path for stored images.
pub const IMAGE_STORAGE_PATH: &str = "/var/lib/foundry/images";

/// Default public base URL prefix for stored images.
pub const IMAGE_BASE_URL: &str = "http://localhost:5000/images";

// =============================================================================
// DATABASE
// =============================================================================

/// Default database connection URL.
pub const DATABASE_URL: &str = "postgres://localhost/foundry";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_threshold_below_high_confidence() {
        // Notifications fire on scores the matcher still labels "Medium".
        assert!(MATCH_SCORE_THRESHOLD < CONFIDENCE_HIGH);
        assert!(MATCH_SCORE_THRESHOLD > CONFIDENCE_MEDIUM);
    }

    #[test]
    fn test_upload_cap_within_body_limit() {
        assert!(UPLOAD_MAX_BYTES < MAX_BODY_SIZE_BYTES);
    }
}
