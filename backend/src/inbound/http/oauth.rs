//! OAuth2 login round trip and session inspection.
//!
//! ```text
//! GET /authorize/google        302 to the provider consent page
//! GET /callback/google?code=…  302 to / once signed in
//! GET /email                   signed-in address as text
//! GET /logout                  302 to / with the session cleared
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::IntoParams;

use crate::domain::Error;
use crate::domain::ports::{CallbackOutcome, CallbackParams};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body of `GET /email` when nobody is signed in.
pub const UNAUTHENTICATED: &str = "Unauthenticated";

/// Query string sent by the provider to the callback.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackQuery {
    /// Authorization code to exchange.
    pub code: Option<String>,
    /// State token echoed back by the provider.
    pub state: Option<String>,
    /// Provider error, e.g. `access_denied`.
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl From<CallbackQuery> for CallbackParams {
    fn from(query: CallbackQuery) -> Self {
        Self {
            code: query.code,
            state: query.state,
            error: query.error,
            error_description: query.error_description,
        }
    }
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Start a login with the named provider.
#[utoipa::path(
    get,
    path = "/authorize/{provider}",
    params(("provider" = String, Path, description = "google, github or apple")),
    responses(
        (status = 302, description = "Redirect to the provider", headers(("Location" = String))),
        (status = 404, description = "Unknown or unconfigured provider", body = Error)
    ),
    tags = ["auth"],
    operation_id = "authorize",
    security([])
)]
#[get("/authorize/{provider}")]
pub async fn authorize(
    state: web::Data<HttpState>,
    session: SessionContext,
    provider: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let request = state.oauth.authorize(&provider)?;
    session.store_oauth_state(&request.state)?;
    Ok(redirect(&request.location))
}

/// Finish a login and sign the user in.
///
/// The pending state token is removed from the session before the provider
/// is contacted, so a replayed callback always fails.
#[utoipa::path(
    get,
    path = "/callback/{provider}",
    params(
        ("provider" = String, Path, description = "google, github or apple"),
        CallbackQuery
    ),
    responses(
        (status = 302, description = "Signed in, or login declined; redirect to /"),
        (status = 401, description = "State mismatch or provider failure", body = Error),
        (status = 404, description = "Unknown or unconfigured provider", body = Error)
    ),
    tags = ["auth"],
    operation_id = "callback",
    security([])
)]
#[get("/callback/{provider}")]
pub async fn callback(
    state: web::Data<HttpState>,
    session: SessionContext,
    provider: web::Path<String>,
    query: web::Query<CallbackQuery>,
) -> ApiResult<HttpResponse> {
    let expected = session.take_oauth_state()?;
    let outcome = state
        .oauth
        .complete(&provider, query.into_inner().into(), expected)
        .await?;
    match outcome {
        CallbackOutcome::SignedIn(email) => {
            session.sign_in(&email)?;
            info!(provider = %provider, "user signed in");
        }
        CallbackOutcome::Declined { error } => {
            warn!(provider = %provider, %error, "login declined by provider");
        }
    }
    Ok(redirect("/"))
}

/// Report the signed-in address.
#[utoipa::path(
    get,
    path = "/email",
    responses((status = 200, description = "Email or `Unauthenticated`", body = String, content_type = "text/plain")),
    tags = ["auth"],
    operation_id = "currentEmail",
    security([])
)]
#[get("/email")]
pub async fn current_email(session: SessionContext) -> ApiResult<HttpResponse> {
    let body = session
        .email()?
        .map_or_else(|| UNAUTHENTICATED.to_owned(), |email| email.as_str().to_owned());
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(body))
}

/// Forget the signed-in user.
#[utoipa::path(
    get,
    path = "/logout",
    responses((status = 302, description = "Session cleared; redirect to /")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[get("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    redirect("/")
}
