//! Login gate for protected scopes.
//!
//! [`RequireAllowedEmail`] reads the signed-in email from the session and asks
//! an [`AccessPolicy`] whether it may proceed. Requests that are not allowed
//! never reach the wrapped service; they are redirected to the login entry
//! point of the default identity provider. The session middleware must wrap
//! this one so the cookie is decoded first.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, warn};

use super::session::SessionContext;
use crate::domain::{AccessPolicy, ProviderKind};

/// Middleware factory guarding a scope with an [`AccessPolicy`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::{App, web};
/// use travelmap::domain::{AllowList, AllowListPolicy};
/// use travelmap::inbound::http::access_gate::RequireAllowedEmail;
///
/// let policy = Arc::new(AllowListPolicy::new(AllowList::parse("john@example.com")));
/// let _app = App::new().service(web::scope("/api").wrap(RequireAllowedEmail::new(policy)));
/// ```
#[derive(Clone)]
pub struct RequireAllowedEmail {
    policy: Arc<dyn AccessPolicy>,
    login_path: Arc<str>,
}

impl RequireAllowedEmail {
    /// Gate redirecting to the Google login when access is refused.
    pub fn new(policy: Arc<dyn AccessPolicy>) -> Self {
        Self::with_login_provider(policy, ProviderKind::Google)
    }

    /// Gate redirecting to `/authorize/{provider}` when access is refused.
    pub fn with_login_provider(policy: Arc<dyn AccessPolicy>, provider: ProviderKind) -> Self {
        Self {
            policy,
            login_path: Arc::from(format!("/authorize/{}", provider.as_str())),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAllowedEmail
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGateMiddleware {
            service,
            policy: self.policy.clone(),
            login_path: self.login_path.clone(),
        }))
    }
}

/// Service wrapper produced by [`RequireAllowedEmail`].
pub struct AccessGateMiddleware<S> {
    service: S,
    policy: Arc<dyn AccessPolicy>,
    login_path: Arc<str>,
}

impl<S, B> Service<ServiceRequest> for AccessGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let email = SessionContext::from_service_request(&req)
            .email()
            .unwrap_or_else(|error| {
                warn!(%error, "unreadable session; treating request as signed out");
                None
            });

        if self.policy.is_authorized(email.as_ref()) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        debug!(
            path = req.path(),
            signed_in = email.is_some(),
            "access refused; redirecting to login"
        );
        let response = HttpResponse::Found()
            .insert_header((header::LOCATION, self.login_path.as_ref()))
            .finish()
            .map_into_right_body();
        Box::pin(async move { Ok(req.into_response(response)) })
    }
}
