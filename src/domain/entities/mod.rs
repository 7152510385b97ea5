pub mod app_users;
pub mod groups;
pub mod passes;
pub mod purchases;
pub mod student_visits;
pub mod students;
pub mod teachers;
