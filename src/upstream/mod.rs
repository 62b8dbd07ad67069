//! Repository inspector (upstream) subsystem.
//!
//! # Data Flow
//! ```text
//! handler (validated parameters)
//!     → client.rs (one GET with timeout, bearer auth)
//!     → classify status/body
//!     → UpstreamResult (types.rs)
//!     → normalize layer
//! ```
//!
//! # Design Decisions
//! - No retries: a slow or flaky upstream surfaces as Unavailable
//! - Transport errors are values, never panics or propagated faults
//! - Failure details are kept for logs only

pub mod client;
pub mod types;

pub use client::InspectorClient;
pub use types::{ClientInitError, UpstreamFailure, UpstreamResult};
