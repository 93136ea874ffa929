//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! ```rust
//! use twig_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Every event emitted by `diff` and `commit_root` carries the
//! `session_id` of the session it ran under.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
