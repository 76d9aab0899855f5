//! Weekday countdown handler.
//!
//! ```text
//! GET /api/days_left?end=2024-06-17&exclude=2024-03-25,2024-05-27
//! ```
//!
//! Without `end` the school-year countdown is used together with its holiday
//! list. An explicit `end` with no `exclude` counts every weekday.

use actix_web::{get, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::Error;
use crate::domain::finance::{DaysLeft, default_countdown_end, default_excluded_dates};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DaysLeftQuery {
    /// Countdown end date, exclusive.
    pub end: Option<NaiveDate>,
    /// Comma separated `YYYY-MM-DD` dates that do not count.
    pub exclude: Option<String>,
}

fn parse_excluded(raw: &str) -> Result<Vec<NaiveDate>, Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<NaiveDate>().map_err(|err| {
                Error::invalid_request(format!("invalid exclude date '{part}': {err}"))
                    .with_details(json!({ "field": "exclude", "value": part }))
            })
        })
        .collect()
}

impl DaysLeftQuery {
    fn resolve(self) -> Result<(NaiveDate, Vec<NaiveDate>), Error> {
        let excluded = match (&self.end, self.exclude.as_deref()) {
            (_, Some(raw)) => parse_excluded(raw)?,
            (None, None) => default_excluded_dates(),
            (Some(_), None) => Vec::new(),
        };
        Ok((self.end.unwrap_or_else(default_countdown_end), excluded))
    }
}

/// Weekdays and calendar time left until `end`.
#[utoipa::path(
    get,
    path = "/api/days_left",
    params(DaysLeftQuery),
    responses(
        (status = 200, description = "Countdown", body = DaysLeft),
        (status = 400, description = "Invalid date", body = Error)
    ),
    tags = ["finance"],
    operation_id = "daysLeft"
)]
#[get("/days_left")]
pub async fn days_left(
    state: web::Data<HttpState>,
    query: web::Query<DaysLeftQuery>,
) -> ApiResult<web::Json<DaysLeft>> {
    let (end, excluded) = query.into_inner().resolve()?;
    Ok(web::Json(state.countdown.days_left(end, &excluded)))
}
