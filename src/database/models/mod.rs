pub mod academic;
pub mod communication;
pub mod user;

pub use academic::{Assignment, AttendanceRecord, Course, Department, Enrollment, Submission};
pub use communication::{Message, Notice};
pub use user::{Profile, UserCredentials};
