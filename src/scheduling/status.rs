//! Cancellation — a status update, never a row removal, so the history of
//! a booking survives and its capacity unit is released by the exclusion
//! of CANCELLED rows from booked counts.

use rusqlite::Connection;
use uuid::Uuid;

use crate::db::repository::{
    get_appointment, get_outreach_location, update_appointment_status,
};
use crate::models::{Appointment, AppointmentStatus, LocationType, User};
use crate::notify::{best_effort, Notifier};
use crate::scheduling::{BookingError, RESOURCE_CENTER_NAME};

/// Cancel an owned, non-terminal appointment.
pub fn cancel_appointment(
    conn: &Connection,
    notifier: &dyn Notifier,
    user: &User,
    appointment_id: &Uuid,
) -> Result<Appointment, BookingError> {
    let current = get_appointment(conn, appointment_id)?
        .ok_or_else(|| BookingError::NotFound(appointment_id.to_string()))?;

    if current.user_id != user.id {
        return Err(BookingError::NotOwner);
    }
    if current.status.is_terminal() {
        return Err(BookingError::Validation(format!(
            "A {} appointment cannot be cancelled",
            current.status.as_str().to_lowercase()
        )));
    }

    update_appointment_status(conn, appointment_id, AppointmentStatus::Cancelled)?;

    let updated = Appointment {
        status: AppointmentStatus::Cancelled,
        ..current
    };

    let location_name = match updated.location_type {
        LocationType::ResourceCenter => RESOURCE_CENTER_NAME.to_string(),
        LocationType::Outreach => match updated.outreach_location_id {
            Some(id) => get_outreach_location(conn, &id)?
                .map(|l| l.name)
                .unwrap_or_else(|| "Outreach clinic".to_string()),
            None => "Outreach clinic".to_string(),
        },
    };

    tracing::info!(
        appointment_id = %updated.id,
        user_id = %user.id,
        "Appointment cancelled"
    );
    best_effort(notifier.status_changed(&updated, &location_name), "cancel");

    Ok(updated)
}
