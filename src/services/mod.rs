pub mod admin_auth;
pub mod eligibility;
pub mod messaging;
pub mod reminders;
pub mod replies;
pub mod scheduler;
pub mod users;
