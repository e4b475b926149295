pub mod appointment;
pub mod enums;
pub mod outreach;
pub mod schedule;
pub mod user;

pub use appointment::Appointment;
pub use enums::*;
pub use outreach::OutreachLocation;
pub use schedule::AppointmentConfig;
pub use user::User;
