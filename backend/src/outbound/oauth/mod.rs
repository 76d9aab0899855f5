//! OAuth2 identity provider adapters.

mod dto;
mod http_client;

pub use http_client::HttpOAuthProviderClient;
