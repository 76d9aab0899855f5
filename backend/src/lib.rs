//! Travel map backend: visited places, travel links and household finance
//! behind an allow-listed OAuth2 login.
//!
//! Layout follows ports and adapters: [`domain`] holds entities, services and
//! ports; [`inbound`] adapts HTTP to the driving ports; [`outbound`]
//! implements the driven ports over JSON files, PostgreSQL and identity
//! providers.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
