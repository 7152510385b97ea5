pub mod attendance;
pub mod groups;
pub mod purchases;
pub mod students;
