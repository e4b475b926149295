//! Booking transaction.
//!
//! The read-only availability a client saw is advisory; the check here,
//! inside an IMMEDIATE transaction, is the admission decision. Two
//! citizens racing for the last unit in a pool serialize on the write
//! lock and the loser sees the refreshed count.

use chrono::{Local, NaiveDate};
use rusqlite::{Connection, TransactionBehavior};
use uuid::Uuid;

use crate::db::repository::{get_outreach_location, insert_appointment};
use crate::models::{Appointment, AppointmentStatus, LocationType, User};
use crate::notify::{best_effort, Notifier};
use crate::scheduling::availability::availability_for_date;
use crate::scheduling::calendar::is_valid_time_slot;
use crate::scheduling::capacity::{derive_age_group, RESOURCE_CENTER_FEE};
use crate::scheduling::{BookingError, RESOURCE_CENTER_NAME};

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub time: String,
    pub location_type: LocationType,
    pub outreach_location_id: Option<Uuid>,
    pub purpose: String,
    pub notes: Option<String>,
}

/// Create a PENDING appointment for `user`, or fail without side effects.
pub fn create_booking(
    conn: &mut Connection,
    notifier: &dyn Notifier,
    user: &User,
    request: &BookingRequest,
) -> Result<Appointment, BookingError> {
    if !is_valid_time_slot(&request.time) {
        return Err(BookingError::Validation(format!(
            "'{}' is not a bookable time",
            request.time
        )));
    }

    let today = Local::now().date_naive();
    let age_group = derive_age_group(user.date_of_birth, user.age, today);

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let location_name = match request.location_type {
        LocationType::Outreach => {
            let id = request.outreach_location_id.ok_or_else(|| {
                BookingError::Validation("An outreach location is required".into())
            })?;
            let location = get_outreach_location(&tx, &id)?
                .ok_or_else(|| BookingError::Validation("Unknown outreach location".into()))?;
            if !location.active {
                return Err(BookingError::Validation(format!(
                    "{} is no longer taking bookings",
                    location.name
                )));
            }
            location.name
        }
        LocationType::ResourceCenter => RESOURCE_CENTER_NAME.to_string(),
    };

    // Authoritative admission check, re-run at write time.
    let report = availability_for_date(&tx, request.date, request.location_type, age_group)?;
    let open = report
        .slot(&request.time)
        .map(|slot| slot.available)
        .unwrap_or(false);
    if !open {
        return Err(BookingError::SlotUnavailable(format!(
            "{} {} at {}",
            location_name, request.date, request.time
        )));
    }

    let (fee, stored_group) = match request.location_type {
        LocationType::ResourceCenter => (Some(RESOURCE_CENTER_FEE), age_group),
        LocationType::Outreach => (None, None),
    };

    let appointment = Appointment {
        id: Uuid::new_v4(),
        user_id: user.id,
        date: request.date,
        time: request.time.clone(),
        location_type: request.location_type,
        outreach_location_id: match request.location_type {
            LocationType::Outreach => request.outreach_location_id,
            LocationType::ResourceCenter => None,
        },
        age_group: stored_group,
        status: AppointmentStatus::Pending,
        purpose: request.purpose.clone(),
        notes: request.notes.clone(),
        service_fee: fee,
        created_at: Local::now().naive_local(),
    };

    insert_appointment(&tx, &appointment)?;
    tx.commit()?;

    tracing::info!(
        appointment_id = %appointment.id,
        user_id = %user.id,
        date = %appointment.date,
        time = %appointment.time,
        location_type = appointment.location_type.as_str(),
        "Appointment booked"
    );
    best_effort(
        notifier.booking_confirmed(&appointment, &location_name),
        "booking_confirmed",
    );

    Ok(appointment)
}
