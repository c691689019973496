//! OAuth2 Grant Flows
//!
//! Token endpoint requests for each supported grant type.

pub mod authorization_code;
pub mod client_credentials;
pub mod credentials;
pub mod grant;
pub mod password;
pub mod refresh;
pub mod token_endpoint;

pub use authorization_code::{generate_state, AuthorizationCodeFlow};
pub use client_credentials::ClientCredentialsFlow;
pub use credentials::FlowCredentials;
pub use grant::{MockTokenFlows, OAuth2Flows, TokenFlows};
pub use password::PasswordFlow;
pub use refresh::RefreshFlow;
pub use token_endpoint::{basic_authorization, encode_form, TokenEndpoint, MAX_TOKEN_RESPONSE_SIZE};
