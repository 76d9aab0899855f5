//! DTOs for decoding token endpoint responses.

use serde::Deserialize;

/// Token endpoint body. Only `access_token` matters; providers add more.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    #[serde(default)]
    pub(super) access_token: Option<String>,
}

impl TokenResponseDto {
    /// The access token, when present and non-empty.
    pub(super) fn into_token(self) -> Option<String> {
        self.access_token.filter(|token| !token.is_empty())
    }
}
