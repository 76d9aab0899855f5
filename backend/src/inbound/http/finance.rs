//! Mortgage and bonus API handlers.
//!
//! ```text
//! GET    /api/mortgage
//! GET    /api/mortgage/{id}
//! POST   /api/mortgage {"principal":350000,"interest_rate":0.055,"start_date":"2021-08-01","loan_term":360}
//! PUT    /api/mortgage/{id} {"monthly_escrow":475}
//! DELETE /api/mortgage/{id}
//! POST   /api/mortgage/reload
//! POST   /api/bonus_payment {"bonus_type":"rsu","amount":6000,"payment_date":"2023-03-01","year_assigned":2023}
//! GET    /api/aggregated_rsu_payouts
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::finance::{
    BonusPaymentDraft, BonusType, BonusValidationError, Mortgage, MortgageDraft, MortgagePatch,
    MortgageValidationError, Payout,
};
use crate::domain::ports::MortgageSummary;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// `{status, message}` acknowledgement used by destructive finance calls.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusMessage {
    #[schema(example = "success")]
    pub status: String,
    pub message: String,
}

impl StatusMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_owned(),
            message: message.into(),
        }
    }
}

/// Mortgage with its derived monthly figures.
#[derive(Debug, Serialize, ToSchema)]
pub struct MortgageResponse {
    #[serde(flatten)]
    pub mortgage: Mortgage,
    /// Principal and interest per month.
    pub monthly_payment: f64,
    /// Payment plus escrow.
    pub monthly_total: f64,
}

impl From<MortgageSummary> for MortgageResponse {
    fn from(summary: MortgageSummary) -> Self {
        Self {
            mortgage: summary.mortgage,
            monthly_payment: summary.monthly_payment,
            monthly_total: summary.monthly_total,
        }
    }
}

/// Body for `POST` and `PUT /api/mortgage`.
///
/// Every field is required on create except `monthly_escrow`, which defaults
/// to zero.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct MortgageRequest {
    pub principal: Option<f64>,
    /// Annual rate as a fraction, `0.055` for 5.5%.
    pub interest_rate: Option<f64>,
    pub start_date: Option<NaiveDate>,
    /// Term in months.
    pub loan_term: Option<i32>,
    pub monthly_escrow: Option<f64>,
}

fn missing(field: &'static str) -> Error {
    Error::invalid_request(format!("Error creating mortgage: {field} is required"))
        .with_details(json!({ "field": field, "code": "missing_field" }))
}

fn map_mortgage_validation(prefix: &str, err: MortgageValidationError) -> Error {
    Error::invalid_request(format!("{prefix}: {err}"))
}

impl MortgageRequest {
    fn into_draft(self) -> Result<MortgageDraft, Error> {
        MortgageDraft::try_new(
            self.principal.ok_or_else(|| missing("principal"))?,
            self.interest_rate.ok_or_else(|| missing("interest_rate"))?,
            self.start_date.ok_or_else(|| missing("start_date"))?,
            self.loan_term.ok_or_else(|| missing("loan_term"))?,
            self.monthly_escrow.unwrap_or_default(),
        )
        .map_err(|err| map_mortgage_validation("Error creating mortgage", err))
    }

    fn into_patch(self) -> Result<MortgagePatch, Error> {
        MortgagePatch {
            principal: self.principal,
            interest_rate: self.interest_rate,
            start_date: self.start_date,
            loan_term: self.loan_term,
            monthly_escrow: self.monthly_escrow,
        }
        .validate()
        .map_err(|err| map_mortgage_validation("Error updating mortgage", err))
    }
}

/// Body for `POST /api/bonus_payment`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct BonusPaymentRequest {
    /// `cash` or `rsu`.
    pub bonus_type: Option<String>,
    pub amount: Option<f64>,
    pub payment_date: Option<NaiveDate>,
    pub year_assigned: Option<i32>,
}

/// Acknowledgement for `POST /api/bonus_payment`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BonusPaymentCreated {
    pub id: i32,
    pub message: String,
}

fn bonus_field(field: &'static str) -> Error {
    Error::invalid_request(format!("{field} is required"))
        .with_details(json!({ "field": field, "code": "missing_field" }))
}

impl BonusPaymentRequest {
    fn into_draft(self) -> Result<BonusPaymentDraft, Error> {
        let bonus_type: BonusType = self
            .bonus_type
            .as_deref()
            .ok_or_else(|| bonus_field("bonus_type"))?
            .parse()
            .map_err(|err| map_bonus_validation(BonusValidationError::UnknownType(err)))?;
        BonusPaymentDraft::try_new(
            bonus_type,
            self.amount.ok_or_else(|| bonus_field("amount"))?,
            self.payment_date.ok_or_else(|| bonus_field("payment_date"))?,
            self.year_assigned.ok_or_else(|| bonus_field("year_assigned"))?,
        )
        .map_err(map_bonus_validation)
    }
}

fn map_bonus_validation(err: BonusValidationError) -> Error {
    let field = match err {
        BonusValidationError::NonPositiveAmount => "amount",
        BonusValidationError::UnknownType(_) => "bonus_type",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// List mortgages.
#[utoipa::path(
    get,
    path = "/api/mortgage",
    responses(
        (status = 200, description = "Mortgages", body = [MortgageResponse]),
        (status = 503, description = "Database unavailable", body = Error)
    ),
    tags = ["finance"],
    operation_id = "listMortgages"
)]
#[get("/mortgage")]
pub async fn list_mortgages(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<MortgageResponse>>> {
    let mortgages = state.mortgages.list_mortgages().await?;
    Ok(web::Json(mortgages.into_iter().map(Into::into).collect()))
}

/// Fetch one mortgage.
#[utoipa::path(
    get,
    path = "/api/mortgage/{id}",
    params(("id" = i32, Path, description = "Mortgage identifier")),
    responses(
        (status = 200, description = "Mortgage", body = MortgageResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["finance"],
    operation_id = "getMortgage"
)]
#[get("/mortgage/{id}")]
pub async fn get_mortgage(
    state: web::Data<HttpState>,
    id: web::Path<i32>,
) -> ApiResult<web::Json<MortgageResponse>> {
    Ok(web::Json(state.mortgages.get_mortgage(id.into_inner()).await?.into()))
}

/// Record a mortgage.
#[utoipa::path(
    post,
    path = "/api/mortgage",
    request_body = MortgageRequest,
    responses(
        (status = 201, description = "Created", body = MortgageResponse),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["finance"],
    operation_id = "createMortgage"
)]
#[post("/mortgage")]
pub async fn create_mortgage(
    state: web::Data<HttpState>,
    payload: web::Json<MortgageRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let created = state.mortgages.create_mortgage(draft).await?;
    Ok(HttpResponse::Created().json(MortgageResponse::from(created)))
}

/// Merge fields into a mortgage.
#[utoipa::path(
    put,
    path = "/api/mortgage/{id}",
    params(("id" = i32, Path, description = "Mortgage identifier")),
    request_body = MortgageRequest,
    responses(
        (status = 200, description = "Updated", body = MortgageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["finance"],
    operation_id = "updateMortgage"
)]
#[put("/mortgage/{id}")]
pub async fn update_mortgage(
    state: web::Data<HttpState>,
    id: web::Path<i32>,
    payload: web::Json<MortgageRequest>,
) -> ApiResult<web::Json<MortgageResponse>> {
    let patch = payload.into_inner().into_patch()?;
    let updated = state.mortgages.update_mortgage(id.into_inner(), patch).await?;
    Ok(web::Json(updated.into()))
}

/// Remove a mortgage.
#[utoipa::path(
    delete,
    path = "/api/mortgage/{id}",
    params(("id" = i32, Path, description = "Mortgage identifier")),
    responses(
        (status = 200, description = "Deleted", body = StatusMessage),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["finance"],
    operation_id = "deleteMortgage"
)]
#[delete("/mortgage/{id}")]
pub async fn delete_mortgage(
    state: web::Data<HttpState>,
    id: web::Path<i32>,
) -> ApiResult<web::Json<StatusMessage>> {
    state.mortgages.delete_mortgage(id.into_inner()).await?;
    Ok(web::Json(StatusMessage::success("Mortgage details deleted.")))
}

/// Replace every mortgage with the one in the finance seed file.
#[utoipa::path(
    post,
    path = "/api/mortgage/reload",
    responses(
        (status = 200, description = "Reloaded", body = StatusMessage),
        (status = 503, description = "Seed file or database unavailable", body = Error)
    ),
    tags = ["finance"],
    operation_id = "reloadMortgages"
)]
#[post("/mortgage/reload")]
pub async fn reload_mortgages(state: web::Data<HttpState>) -> ApiResult<web::Json<StatusMessage>> {
    state.mortgages.reload_mortgages().await?;
    Ok(web::Json(StatusMessage::success(
        "Mortgage details have been reset.",
    )))
}

/// Record a cash bonus or RSU grant.
#[utoipa::path(
    post,
    path = "/api/bonus_payment",
    request_body = BonusPaymentRequest,
    responses(
        (status = 201, description = "Recorded", body = BonusPaymentCreated),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["finance"],
    operation_id = "createBonusPayment"
)]
#[post("/bonus_payment")]
pub async fn create_bonus_payment(
    state: web::Data<HttpState>,
    payload: web::Json<BonusPaymentRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let payment = state.bonuses.record_bonus(draft).await?;
    Ok(HttpResponse::Created().json(BonusPaymentCreated {
        id: payment.id,
        message: "Bonus payment added successfully".to_owned(),
    }))
}

/// Upcoming RSU payouts summed per month.
#[utoipa::path(
    get,
    path = "/api/aggregated_rsu_payouts",
    responses((status = 200, description = "Payouts in calendar order", body = [Payout])),
    tags = ["finance"],
    operation_id = "aggregatedRsuPayouts"
)]
#[get("/aggregated_rsu_payouts")]
pub async fn aggregated_rsu_payouts(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Payout>>> {
    Ok(web::Json(state.bonuses.aggregated_rsu_payouts().await?))
}

#[cfg(test)]
#[path = "finance_tests.rs"]
mod tests;
