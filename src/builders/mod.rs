//! Builders
//!
//! Fluent builders for profiles.

pub mod profile;

pub use profile::{ProfileBuilder, OOB_REDIRECT_URI};
