//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};
pub use state_builders::StateBuildError;

use state_builders::build_http_state;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use travelmap::Trace;
#[cfg(debug_assertions)]
use travelmap::doc::ApiDoc;
use travelmap::domain::AccessPolicy;
use travelmap::inbound::http::access_gate::RequireAllowedEmail;
use travelmap::inbound::http::api_scope;
use travelmap::inbound::http::health::{HealthState, live, ready};
use travelmap::inbound::http::oauth::{authorize, callback, current_email, logout};
use travelmap::inbound::http::session_config::SessionSettings;
use travelmap::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: Arc<SessionSettings>,
    policy: Arc<dyn AccessPolicy>,
}

fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(settings.cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(settings.same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(settings.ttl))
        .build()
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
        policy,
    } = deps;

    let api = api_scope().wrap(RequireAllowedEmail::new(policy));

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session_middleware(&session))
        .wrap(Trace)
        .service(api)
        .service(authorize)
        .service(callback)
        .service(current_email)
        .service(logout)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from resolved configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when an adapter cannot be built or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config).map_err(std::io::Error::other)?;
    let bind_addr = config.settings.bind_addr();
    let ServerConfig { session, auth, .. } = config;
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        session: Arc::new(session),
        policy: auth.policy,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, "server listening");
    health_state.mark_ready();
    Ok(server)
}
