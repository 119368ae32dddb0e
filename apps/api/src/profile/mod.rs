// Onboarding answers (skills, role) and the dashboard view over them.

pub mod handlers;
pub mod skills;
pub mod store;
