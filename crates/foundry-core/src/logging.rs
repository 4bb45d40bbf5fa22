//! Structured logging schema and field name constants.
//!
//! All crates use these constants for consistent structured logging
//! fields, so log aggregation tools can query by standardized names
//! across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across request → downstream calls.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db", "matching", "notify"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "report_service", "pool", "mail_relay", "image_storage"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "submit_report", "discover", "report", "find_similar", "send"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Store-assigned item UUID being operated on.
pub const ITEM_ID: &str = "item_id";

/// Matching-service external identifier.
pub const EXTERNAL_ID: &str = "external_id";

/// Report kind ("lost" or "found").
pub const REPORT_KIND: &str = "report_kind";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a listing or query.
pub const RESULT_COUNT: &str = "result_count";

/// Similarity score for a candidate match.
pub const SCORE: &str = "score";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
