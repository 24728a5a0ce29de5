use serde::Deserialize;

use crate::errors::AppError;
use crate::models::user::is_e164;
use crate::models::{ExercisePlan, User};
use crate::store::{find_by_phone, UserRepository};

/// Fields accepted when registering a family member.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    pub timezone: String,
    pub age: u32,
    pub preferred_hour: Option<u8>,
    pub cadence_days: Option<u32>,
    pub exercise_plan: Option<ExercisePlan>,
}

impl NewUser {
    fn validate(&self) -> Result<User, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }

        let phone = self.phone.trim();
        if !is_e164(phone) {
            return Err(AppError::Validation(format!(
                "phone must be in E.164 format, got {phone:?}"
            )));
        }

        let mut user = User::new(name, phone, self.timezone.trim(), self.age);
        if user.tz().is_none() {
            return Err(AppError::Validation(format!(
                "unknown timezone {:?}",
                self.timezone
            )));
        }

        if let Some(hour) = self.preferred_hour {
            if hour > 23 {
                return Err(AppError::Validation(format!(
                    "preferred_hour must be 0-23, got {hour}"
                )));
            }
            user.preferred_hour = hour;
        }

        if let Some(days) = self.cadence_days {
            if days == 0 {
                return Err(AppError::Validation(
                    "cadence_days must be at least 1".to_string(),
                ));
            }
            user.cadence_days = days;
        }

        if let Some(plan) = self.exercise_plan {
            user.exercise_plan = plan;
        }

        Ok(user)
    }
}

pub fn list_users(repo: &dyn UserRepository) -> Result<Vec<User>, AppError> {
    Ok(repo.load_all()?)
}

pub fn add_user(repo: &dyn UserRepository, new_user: &NewUser) -> Result<User, AppError> {
    let user = new_user.validate()?;

    let mut users = repo.load_all()?;
    if users.iter().any(|u| u.phone == user.phone) {
        return Err(AppError::Validation(format!(
            "a user with phone {} already exists",
            user.phone
        )));
    }

    users.push(user.clone());
    repo.save_all(&users)?;
    tracing::info!(name = %user.name, plan = user.exercise_plan.as_str(), "added user");
    Ok(user)
}

/// Flips `active` for the user and returns the new value.
pub fn toggle_active(repo: &dyn UserRepository, phone: &str) -> Result<bool, AppError> {
    let mut users = repo.load_all()?;
    let user = find_by_phone(&mut users, phone)
        .ok_or_else(|| AppError::NotFound(format!("user {phone}")))?;

    user.active = !user.active;
    let active = user.active;
    repo.save_all(&users)?;

    tracing::info!(phone = %phone, active, "toggled user");
    Ok(active)
}
