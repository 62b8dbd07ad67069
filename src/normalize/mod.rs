//! Normalization layer.
//!
//! # Data Flow
//! ```text
//! query string
//!     → types.rs (SnapshotQuery/FileQuery → validated request)
//!     → [upstream call]
//!     → snapshot.rs / file.rs (UpstreamResult → response body)
//!     → error.rs (RelayError, one per client-visible failure)
//! ```
//!
//! # Design Decisions
//! - Pure functions of (request, upstream outcome); no I/O, no state
//! - Upstream order is preserved; nothing is re-sorted
//! - Client messages never include upstream status codes or bodies

pub mod error;
pub mod file;
pub mod snapshot;
pub mod types;

pub use error::RelayError;
pub use file::normalize_file;
pub use snapshot::normalize_snapshot;
pub use types::{
    EntryKind, FileContent, FileEntry, FileQuery, FileRequest, RepoSnapshot, RepoSnapshotRequest,
    SnapshotQuery,
};
