pub mod exercise;
pub mod user;

pub use exercise::ExercisePlan;
pub use user::User;
