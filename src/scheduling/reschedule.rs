//! Reschedule transaction.
//!
//! Moves an owned, non-terminal appointment to a new slot. The new slot is
//! re-validated like a fresh booking with one exception: a reschedule to
//! the appointment's own current (date, time) always succeeds, since the
//! slot only "looks" full because the appointment itself occupies it.

use chrono::{Local, NaiveDate};
use rusqlite::{Connection, TransactionBehavior};
use uuid::Uuid;

use crate::db::repository::{
    get_appointment, get_outreach_location, update_appointment_slot,
};
use crate::models::{Appointment, AppointmentStatus, LocationType, User};
use crate::notify::{best_effort, Notifier};
use crate::scheduling::availability::availability_for_date;
use crate::scheduling::calendar::is_valid_time_slot;
use crate::scheduling::capacity::derive_age_group;
use crate::scheduling::{BookingError, RESOURCE_CENTER_NAME};

/// Move `appointment_id` to (`new_date`, `new_time`) on behalf of `user`.
/// On success the appointment is PENDING again, whatever it was before.
pub fn reschedule_appointment(
    conn: &mut Connection,
    notifier: &dyn Notifier,
    user: &User,
    appointment_id: &Uuid,
    new_date: NaiveDate,
    new_time: &str,
) -> Result<Appointment, BookingError> {
    if !is_valid_time_slot(new_time) {
        return Err(BookingError::Validation(format!(
            "'{new_time}' is not a bookable time"
        )));
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let current = get_appointment(&tx, appointment_id)?
        .ok_or_else(|| BookingError::NotFound(appointment_id.to_string()))?;

    if current.user_id != user.id {
        return Err(BookingError::NotOwner);
    }
    if current.status.is_terminal() {
        return Err(BookingError::Validation(format!(
            "A {} appointment cannot be rescheduled",
            current.status.as_str().to_lowercase()
        )));
    }

    // Self-reschedule escape hatch: the stored slot is trivially valid for
    // the appointment that already occupies it.
    let same_slot = current.date == new_date && current.time == new_time;
    if !same_slot {
        let today = Local::now().date_naive();
        let age_group = derive_age_group(user.date_of_birth, user.age, today);
        let report =
            availability_for_date(&tx, new_date, current.location_type, age_group)?;
        let open = report
            .slot(new_time)
            .map(|slot| slot.available)
            .unwrap_or(false);
        if !open {
            return Err(BookingError::SlotUnavailable(format!(
                "{new_date} at {new_time}"
            )));
        }
    }

    update_appointment_slot(
        &tx,
        appointment_id,
        new_date,
        new_time,
        AppointmentStatus::Pending,
    )?;

    let location_name = match current.location_type {
        LocationType::ResourceCenter => RESOURCE_CENTER_NAME.to_string(),
        LocationType::Outreach => match current.outreach_location_id {
            Some(id) => get_outreach_location(&tx, &id)?
                .map(|l| l.name)
                .unwrap_or_else(|| "Outreach clinic".to_string()),
            None => "Outreach clinic".to_string(),
        },
    };

    tx.commit()?;

    let updated = Appointment {
        date: new_date,
        time: new_time.to_string(),
        status: AppointmentStatus::Pending,
        ..current
    };

    tracing::info!(
        appointment_id = %updated.id,
        user_id = %user.id,
        date = %updated.date,
        time = %updated.time,
        "Appointment rescheduled"
    );
    best_effort(
        notifier.status_changed(&updated, &location_name),
        "reschedule",
    );

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::db::repository::{insert_user, update_appointment_status};
    use crate::db::sqlite::open_memory_database;
    use crate::models::AgeGroup;
    use crate::notify::testing::RecordingNotifier;
    use crate::scheduling::booking::{create_booking, BookingRequest};

    // 2030-07-02 and 2030-07-04 are Tuesday and Thursday.
    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 7, 2).unwrap()
    }
    fn thursday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 7, 4).unwrap()
    }

    fn seed_user(conn: &Connection, age: u32) -> User {
        let user = User {
            id: Uuid::new_v4(),
            full_name: "Test Citizen".into(),
            phone: None,
            date_of_birth: None,
            age: Some(age),
        };
        insert_user(conn, &user).unwrap();
        user
    }

    fn book_rc(conn: &mut Connection, user: &User, time: &str) -> Appointment {
        create_booking(
            conn,
            &RecordingNotifier::default(),
            user,
            &BookingRequest {
                date: tuesday(),
                time: time.into(),
                location_type: LocationType::ResourceCenter,
                outreach_location_id: None,
                purpose: "Assessment".into(),
                notes: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn reschedule_moves_slot_and_resets_status() {
        let mut conn = open_memory_database().unwrap();
        let user = seed_user(&conn, 30);
        let appt = book_rc(&mut conn, &user, "09:00");
        update_appointment_status(&conn, &appt.id, AppointmentStatus::Confirmed).unwrap();

        let notifier = RecordingNotifier::default();
        let updated = reschedule_appointment(
            &mut conn,
            &notifier,
            &user,
            &appt.id,
            thursday(),
            "14:00",
        )
        .unwrap();

        assert_eq!(updated.date, thursday());
        assert_eq!(updated.time, "14:00");
        assert_eq!(updated.status, AppointmentStatus::Pending);

        let stored = get_appointment(&conn, &appt.id).unwrap().unwrap();
        assert_eq!(stored.date, thursday());
        assert_eq!(stored.status, AppointmentStatus::Pending);

        let events = notifier.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].contains("PENDING"));
    }

    #[test]
    fn age_group_is_not_recalculated_on_reschedule() {
        let mut conn = open_memory_database().unwrap();
        let user = seed_user(&conn, 30);
        let appt = book_rc(&mut conn, &user, "09:00");
        assert_eq!(appt.age_group, Some(AgeGroup::Over15));

        let updated = reschedule_appointment(
            &mut conn,
            &RecordingNotifier::default(),
            &user,
            &appt.id,
            thursday(),
            "10:00",
        )
        .unwrap();
        assert_eq!(updated.age_group, Some(AgeGroup::Over15));

        let stored = get_appointment(&conn, &appt.id).unwrap().unwrap();
        assert_eq!(stored.age_group, Some(AgeGroup::Over15));
    }

    #[test]
    fn self_reschedule_succeeds_even_when_the_slot_reads_full() {
        let mut conn = open_memory_database().unwrap();
        let notifier = RecordingNotifier::default();

        // Fill the over-15 pool at 09:00 completely.
        let owner = seed_user(&conn, 30);
        let appt = book_rc(&mut conn, &owner, "09:00");
        for _ in 0..8 {
            let other = seed_user(&conn, 40);
            book_rc(&mut conn, &other, "09:00");
        }

        // A fresh booking into the slot is now rejected...
        let latecomer = seed_user(&conn, 25);
        let err = create_booking(
            &mut conn,
            &notifier,
            &latecomer,
            &BookingRequest {
                date: tuesday(),
                time: "09:00".into(),
                location_type: LocationType::ResourceCenter,
                outreach_location_id: None,
                purpose: "Assessment".into(),
                notes: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::SlotUnavailable(_)));

        // ...but rescheduling onto the own slot still works.
        let updated = reschedule_appointment(
            &mut conn,
            &notifier,
            &owner,
            &appt.id,
            tuesday(),
            "09:00",
        )
        .unwrap();
        assert_eq!(updated.status, AppointmentStatus::Pending);
    }

    #[test]
    fn full_target_slot_is_a_conflict() {
        let mut conn = open_memory_database().unwrap();
        let owner = seed_user(&conn, 30);
        let appt = book_rc(&mut conn, &owner, "09:00");

        for _ in 0..9 {
            let other = seed_user(&conn, 40);
            book_rc(&mut conn, &other, "10:00");
        }

        let err = reschedule_appointment(
            &mut conn,
            &RecordingNotifier::default(),
            &owner,
            &appt.id,
            tuesday(),
            "10:00",
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::SlotUnavailable(_)));

        // Unchanged on failure.
        let stored = get_appointment(&conn, &appt.id).unwrap().unwrap();
        assert_eq!(stored.time, "09:00");
    }

    #[test]
    fn terminal_states_cannot_be_rescheduled() {
        let mut conn = open_memory_database().unwrap();
        let user = seed_user(&conn, 30);

        for status in [AppointmentStatus::Completed, AppointmentStatus::Cancelled] {
            let appt = book_rc(&mut conn, &user, "09:00");
            update_appointment_status(&conn, &appt.id, status).unwrap();

            let err = reschedule_appointment(
                &mut conn,
                &RecordingNotifier::default(),
                &user,
                &appt.id,
                thursday(),
                "10:00",
            )
            .unwrap_err();
            assert!(matches!(err, BookingError::Validation(_)), "{status:?}");
        }
    }

    #[test]
    fn missing_appointment_is_not_found() {
        let mut conn = open_memory_database().unwrap();
        let user = seed_user(&conn, 30);

        let err = reschedule_appointment(
            &mut conn,
            &RecordingNotifier::default(),
            &user,
            &Uuid::new_v4(),
            thursday(),
            "10:00",
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::NotFound(_)));
    }

    #[test]
    fn foreign_appointment_is_rejected() {
        let mut conn = open_memory_database().unwrap();
        let owner = seed_user(&conn, 30);
        let stranger = seed_user(&conn, 30);
        let appt = book_rc(&mut conn, &owner, "09:00");

        let err = reschedule_appointment(
            &mut conn,
            &RecordingNotifier::default(),
            &stranger,
            &appt.id,
            thursday(),
            "10:00",
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::NotOwner));
    }

    #[test]
    fn closed_target_date_is_a_conflict() {
        let mut conn = open_memory_database().unwrap();
        let user = seed_user(&conn, 30);
        let appt = book_rc(&mut conn, &user, "09:00");

        // 2030-07-03 is a Wednesday — Resource Center closed.
        let wednesday = NaiveDate::from_ymd_opt(2030, 7, 3).unwrap();
        let err = reschedule_appointment(
            &mut conn,
            &RecordingNotifier::default(),
            &user,
            &appt.id,
            wednesday,
            "10:00",
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::SlotUnavailable(_)));
    }
}
