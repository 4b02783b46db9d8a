//! Storage abstractions for service layer
//!
//! - `record_store`: in-memory staging of file content with a dirty flag.
//! - `disk`: the `FileStorage` seam and its directory-backed implementation.

pub mod disk;
pub mod record_store;
