//! Core Components
//!
//! HTTP transport shared by the token flows and the request executor.

pub mod transport;

pub use transport::*;
