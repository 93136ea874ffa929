//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_SESSION_ID: &str = "session_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Tree positions
pub const FIELD_PARENT: &str = "parent";
pub const FIELD_LIVE_ID: &str = "live_id";
pub const FIELD_OLD_NODE: &str = "old_node";
pub const FIELD_NEW_NODE: &str = "new_node";
pub const FIELD_KEY: &str = "key";

// Effect queue sizes
pub const FIELD_DELETIONS: &str = "deletions";
pub const FIELD_EFFECTS: &str = "effects";
pub const FIELD_SKIPPED: &str = "skipped";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_RECOVERED: &str = "recovered";
pub const EVENT_INCONSISTENT: &str = "inconsistent";
