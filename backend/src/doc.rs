//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the domain and DTO schemas they exchange. Swagger UI serves it at
//! `/docs` in debug builds; `openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::finance::{BonusPayment, BonusType, DaysLeft, Mortgage, Payout, Savings};
use crate::domain::{Error, ErrorCode, Link, VisitedPlace, WhichMap};
use crate::inbound::http::finance::{
    BonusPaymentCreated, BonusPaymentRequest, MortgageRequest, MortgageResponse, StatusMessage,
};
use crate::inbound::http::links::LinkRequest;
use crate::inbound::http::savings::SavingsRequest;
use crate::inbound::http::visited::VisitedRequest;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by GET /callback/{provider} for an allow-listed email.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Travel map API",
        description = "Visited places, travel links and household finance behind an OAuth2 login."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::visited::list_visited,
        crate::inbound::http::visited::get_visited,
        crate::inbound::http::visited::upsert_visited,
        crate::inbound::http::visited::update_visited,
        crate::inbound::http::visited::delete_visited,
        crate::inbound::http::links::list_links,
        crate::inbound::http::links::create_link,
        crate::inbound::http::links::update_link,
        crate::inbound::http::links::delete_link,
        crate::inbound::http::finance::list_mortgages,
        crate::inbound::http::finance::get_mortgage,
        crate::inbound::http::finance::create_mortgage,
        crate::inbound::http::finance::update_mortgage,
        crate::inbound::http::finance::delete_mortgage,
        crate::inbound::http::finance::reload_mortgages,
        crate::inbound::http::finance::create_bonus_payment,
        crate::inbound::http::finance::aggregated_rsu_payouts,
        crate::inbound::http::savings::list_savings,
        crate::inbound::http::savings::latest_savings,
        crate::inbound::http::savings::get_savings,
        crate::inbound::http::savings::create_savings,
        crate::inbound::http::savings::update_savings,
        crate::inbound::http::savings::delete_savings,
        crate::inbound::http::days_left::days_left,
        crate::inbound::http::oauth::authorize,
        crate::inbound::http::oauth::callback,
        crate::inbound::http::oauth::current_email,
        crate::inbound::http::oauth::logout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        VisitedPlace,
        VisitedRequest,
        WhichMap,
        Link,
        LinkRequest,
        Mortgage,
        MortgageRequest,
        MortgageResponse,
        BonusPayment,
        BonusPaymentRequest,
        BonusPaymentCreated,
        BonusType,
        Payout,
        Savings,
        SavingsRequest,
        StatusMessage,
        DaysLeft,
    )),
    tags(
        (name = "visited", description = "Places visited on the world and US states maps"),
        (name = "links", description = "Curated travel links"),
        (name = "finance", description = "Mortgages, bonus payments, savings and countdowns"),
        (name = "auth", description = "OAuth2 login round trip"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
