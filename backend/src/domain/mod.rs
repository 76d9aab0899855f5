//! Domain primitives, services and ports.
//!
//! Purpose: define the travel map's entities and use-cases independently of
//! HTTP and storage. Adapters depend on this module; it depends on neither.
//!
//! Public surface:
//! - Error / ErrorCode: transport agnostic error payload.
//! - VisitedPlace, Link and their drafts and patches.
//! - Email, AllowList, AccessPolicy: the authorisation gate.
//! - OAuth2 provider descriptions and state tokens.
//! - finance: mortgages, bonuses, savings and the calculators.
//! - ports: driving and driven traits.

pub mod auth;
pub mod error;
pub mod finance;
pub mod finance_service;
pub mod links;
pub mod links_service;
pub mod oauth;
pub mod oauth_service;
pub mod ports;
pub mod trace_id;
pub mod visited;
pub mod visited_service;

pub use self::auth::{
    AccessPolicy, AllowList, AllowListPolicy, BypassPolicy, Email, EmailValidationError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::finance_service::{FinanceRepositories, FinanceService};
pub use self::links::{Link, LinkDraft, LinkPatch, LinkValidationError, next_position};
pub use self::links_service::TravelLinksService;
pub use self::oauth::{
    AccessToken, AppleEmail, EmailExtractor, GithubEmail, GoogleEmail, OAuthProvider,
    ProviderEndpoints, ProviderKind, ProviderTable, StateToken, UnknownProviderError,
};
pub use self::oauth_service::OAuthLoginService;
pub use self::trace_id::TraceId;
pub use self::visited::{
    UnknownMapError, VisitFlags, VisitedDraft, VisitedPatch, VisitedPlace,
    VisitedValidationError, WhichMap, names_match,
};
pub use self::visited_service::VisitedPlacesService;

