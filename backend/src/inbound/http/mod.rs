//! HTTP inbound adapter exposing the travel map endpoints.
//!
//! Handlers are grouped by resource. [`api_scope`] assembles everything
//! under `/api`; the login round trip and probes are mounted at the root.

pub mod access_gate;
pub mod auth_config;
pub mod days_left;
pub mod error;
pub mod finance;
pub mod health;
pub mod links;
pub mod oauth;
pub mod savings;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod visited;

use actix_web::web;

pub use error::ApiResult;

/// Every `/api` handler, unwrapped.
///
/// Callers add the access gate; keeping it out of here lets tests mount the
/// handlers without a session.
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .app_data(error::json_config())
        .app_data(error::query_config())
        .service(visited::list_visited)
        .service(visited::get_visited)
        .service(visited::upsert_visited)
        .service(visited::update_visited)
        .service(visited::delete_visited)
        .service(links::list_links)
        .service(links::create_link)
        .service(links::update_link)
        .service(links::delete_link)
        .service(finance::list_mortgages)
        .service(finance::reload_mortgages)
        .service(finance::get_mortgage)
        .service(finance::create_mortgage)
        .service(finance::update_mortgage)
        .service(finance::delete_mortgage)
        .service(finance::create_bonus_payment)
        .service(finance::aggregated_rsu_payouts)
        .service(savings::list_savings)
        .service(savings::latest_savings)
        .service(savings::get_savings)
        .service(savings::create_savings)
        .service(savings::update_savings)
        .service(savings::delete_savings)
        .service(days_left::days_left)
}
