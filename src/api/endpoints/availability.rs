//! Slot availability endpoint.

use std::str::FromStr;

use axum::extract::{Query, State};
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::models::LocationType;
use crate::scheduling::availability::{availability_for_date, DayAvailability};
use crate::scheduling::capacity::derive_age_group;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    /// ISO calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub location_type: String,
    /// Accepted for API symmetry with booking; availability itself is
    /// identical across outreach sites.
    #[allow(dead_code)]
    pub outreach_location_id: Option<String>,
}

/// `GET /api/appointments/availability` — per-slot availability for a date.
///
/// The caller's age group is resolved from their user record so the
/// Resource Center counts reflect the pool they would book into.
pub async fn read(
    State(ctx): State<ApiContext>,
    Extension(user_ctx): Extension<UserContext>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<DayAvailability>, ApiError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Invalid date '{}'", query.date)))?;
    let location_type = LocationType::from_str(&query.location_type).map_err(|_| {
        ApiError::BadRequest(format!("Invalid location type '{}'", query.location_type))
    })?;

    let user = &user_ctx.user;
    let age_group = derive_age_group(user.date_of_birth, user.age, Local::now().date_naive());

    let conn = ctx.state.open_db()?;
    let report = availability_for_date(&conn, date, location_type, age_group)?;

    Ok(Json(report))
}
