pub mod active_passes;
pub mod attendance;
pub mod enums;
pub mod groups;
pub mod iam;
pub mod purchases;
pub mod schedule;
pub mod students;
