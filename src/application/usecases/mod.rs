pub mod attendance;
pub mod errors;
pub mod groups;
pub mod identity;
pub mod pass_credits;
pub mod purchases;
pub mod students;
