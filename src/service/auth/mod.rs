//! Credential lifecycle: short-lived bearer tokens and the long-lived API key built on them.

pub mod api_key;
pub mod token;

pub use api_key::ApiKeyManager;
pub use token::TokenManager;
