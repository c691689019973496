//! Token Management
//!
//! Per-profile token persistence and the load / refresh / acquire lifecycle.

pub mod manager;
pub mod store;

// Token Store
pub use store::{
    expand_home, FileTokenStore, InMemoryTokenStore, MockTokenStore, TokenStore,
    DEFAULT_TOKEN_DIR,
};

// Token Manager
pub use manager::{DefaultTokenManager, MockTokenManager, TokenManager, TokenManagerConfig};
