pub mod attendance;
pub mod groups;
pub mod passes;
pub mod purchases;
pub mod students;
pub mod teachers;
