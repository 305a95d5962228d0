//! Session metadata resolution
//!
//! Resolves and memoizes the runtime identifiers that correlate a
//! screenshot request with an existing automation session: page, frame,
//! and browser guids plus the remote session id fetched through the
//! vendor backend.

pub mod cache;
pub mod metadata;

pub use cache::SessionCache;
pub use metadata::PageMetadata;
