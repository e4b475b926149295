//! Notification collaborator.
//!
//! Booking and reschedule outcomes are pushed to citizens over an external
//! SMS gateway. The gateway lives outside this service; the trait below is
//! its seam. Delivery is best-effort everywhere: a failed notification is
//! logged and swallowed, never surfaced as a booking failure.

use thiserror::Error;

use crate::models::Appointment;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification channel error: {0}")]
    Channel(String),
}

pub trait Notifier: Send + Sync {
    /// A new booking was created.
    fn booking_confirmed(
        &self,
        appointment: &Appointment,
        location_name: &str,
    ) -> Result<(), NotifyError>;

    /// An existing appointment changed status (reschedule, cancellation).
    fn status_changed(
        &self,
        appointment: &Appointment,
        location_name: &str,
    ) -> Result<(), NotifyError>;
}

/// Default production notifier: structured log lines the SMS relay tails.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn booking_confirmed(
        &self,
        appointment: &Appointment,
        location_name: &str,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            appointment_id = %appointment.id,
            user_id = %appointment.user_id,
            date = %appointment.date,
            time = %appointment.time,
            location = location_name,
            "Booking confirmed"
        );
        Ok(())
    }

    fn status_changed(
        &self,
        appointment: &Appointment,
        location_name: &str,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            appointment_id = %appointment.id,
            user_id = %appointment.user_id,
            status = appointment.status.as_str(),
            date = %appointment.date,
            time = %appointment.time,
            location = location_name,
            "Appointment status changed"
        );
        Ok(())
    }
}

/// Run a notification best-effort: log the failure, keep the outcome.
pub fn best_effort(result: Result<(), NotifyError>, context: &str) {
    if let Err(e) = result {
        tracing::warn!(error = %e, context, "Notification dispatch failed");
    }
}
