//! Appointment endpoints: list, create, reschedule, cancel.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::Extension;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::repository::appointments_for_user;
use crate::models::{Appointment, LocationType};
use crate::scheduling::{
    cancel_appointment, create_booking, reschedule_appointment, BookingRequest,
};

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<Appointment>,
}

#[derive(Serialize)]
pub struct AppointmentResponse {
    pub appointment: Appointment,
}

/// `GET /api/appointments` — the caller's appointments, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user_ctx): Extension<UserContext>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    let appointments = appointments_for_user(&conn, &user_ctx.user.id)?;

    Ok(Json(AppointmentsResponse { appointments }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub appointment_date: String,
    pub appointment_time: String,
    pub location_type: String,
    pub outreach_location_id: Option<String>,
    pub purpose: String,
    pub notes: Option<String>,
}

/// `POST /api/appointments` — create a booking.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(user_ctx): Extension<UserContext>,
    Json(body): Json<CreateAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let date = parse_date(&body.appointment_date)?;
    let location_type = LocationType::from_str(&body.location_type).map_err(|_| {
        ApiError::BadRequest(format!("Invalid location type '{}'", body.location_type))
    })?;
    let outreach_location_id = body
        .outreach_location_id
        .as_deref()
        .map(parse_id)
        .transpose()?;

    let request = BookingRequest {
        date,
        time: body.appointment_time,
        location_type,
        outreach_location_id,
        purpose: body.purpose,
        notes: body.notes,
    };

    let mut conn = ctx.state.open_db()?;
    let appointment = create_booking(
        &mut conn,
        ctx.state.notifier.as_ref(),
        &user_ctx.user,
        &request,
    )?;

    Ok(Json(AppointmentResponse { appointment }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    pub appointment_date: String,
    pub appointment_time: String,
}

/// `POST /api/appointments/:id/reschedule` — move an appointment.
pub async fn reschedule(
    State(ctx): State<ApiContext>,
    Extension(user_ctx): Extension<UserContext>,
    Path(appointment_id): Path<String>,
    Json(body): Json<RescheduleRequest>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let id = parse_id(&appointment_id)?;
    let date = parse_date(&body.appointment_date)?;

    let mut conn = ctx.state.open_db()?;
    let appointment = reschedule_appointment(
        &mut conn,
        ctx.state.notifier.as_ref(),
        &user_ctx.user,
        &id,
        date,
        &body.appointment_time,
    )?;

    Ok(Json(AppointmentResponse { appointment }))
}

/// `POST /api/appointments/:id/cancel` — cancel an appointment.
pub async fn cancel(
    State(ctx): State<ApiContext>,
    Extension(user_ctx): Extension<UserContext>,
    Path(appointment_id): Path<String>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let id = parse_id(&appointment_id)?;

    let conn = ctx.state.open_db()?;
    let appointment = cancel_appointment(
        &conn,
        ctx.state.notifier.as_ref(),
        &user_ctx.user,
        &id,
    )?;

    Ok(Json(AppointmentResponse { appointment }))
}

fn parse_date(s: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Invalid date '{s}'")))
}

fn parse_id(s: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(s).map_err(|_| ApiError::BadRequest(format!("Invalid id '{s}'")))
}
