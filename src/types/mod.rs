//! Types
//!
//! Core type definitions for profiles, tokens and execution configuration.

pub mod config;
pub mod profile;
pub mod token;

pub use config::*;
pub use profile::*;
pub use token::*;
