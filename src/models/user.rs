use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::ExercisePlan;

fn default_preferred_hour() -> u8 {
    9
}

fn default_cadence_days() -> u32 {
    2
}

fn default_active() -> bool {
    true
}

/// A family member receiving reminders. Identified by `phone`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub phone: String,
    pub timezone: String,
    pub age: u32,
    #[serde(default = "default_preferred_hour")]
    pub preferred_hour: u8,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "default_cadence_days")]
    pub cadence_days: u32,
    pub exercise_plan: ExercisePlan,
    #[serde(default)]
    pub last_sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reminders_sent: u32,
}

impl User {
    pub fn new(name: &str, phone: &str, timezone: &str, age: u32) -> Self {
        Self {
            name: name.to_string(),
            phone: phone.to_string(),
            timezone: timezone.to_string(),
            age,
            preferred_hour: default_preferred_hour(),
            active: true,
            cadence_days: default_cadence_days(),
            exercise_plan: ExercisePlan::for_age(age),
            last_sent_at: None,
            reminders_sent: 0,
        }
    }

    pub fn tz(&self) -> Option<Tz> {
        self.timezone.parse().ok()
    }

    /// Records a delivered reminder.
    pub fn mark_sent(&mut self, at: DateTime<Utc>) {
        self.last_sent_at = Some(at);
        self.reminders_sent = self.reminders_sent.saturating_add(1);
    }
}

/// Loose E.164 check: `+` followed by 8 to 15 digits, no leading zero.
pub fn is_e164(phone: &str) -> bool {
    let Some(digits) = phone.strip_prefix('+') else {
        return false;
    };
    (8..=15).contains(&digits.len())
        && !digits.starts_with('0')
        && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("Mom", "+12065551234", "America/Los_Angeles", 63);
        assert!(user.active);
        assert_eq!(user.cadence_days, 2);
        assert_eq!(user.preferred_hour, 9);
        assert_eq!(user.exercise_plan, ExercisePlan::SeniorBeginner);
        assert!(user.last_sent_at.is_none());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let json = r#"{
            "name": "Alfred",
            "phone": "+12065550000",
            "timezone": "UTC",
            "age": 40,
            "exercise_plan": "adult_intermediate"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.active);
        assert_eq!(user.cadence_days, 2);
        assert_eq!(user.reminders_sent, 0);
        assert_eq!(user.exercise_plan, ExercisePlan::AdultIntermediate);
    }

    #[test]
    fn test_legacy_default_plan_name() {
        let json = r#"{"name":"A","phone":"+12065550000","timezone":"UTC","age":70,"exercise_plan":"default"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.exercise_plan, ExercisePlan::SeniorBeginner);
    }

    #[test]
    fn test_tz_parsing() {
        let mut user = User::new("A", "+12065550000", "Asia/Shanghai", 40);
        assert_eq!(user.tz(), Some(chrono_tz::Asia::Shanghai));
        user.timezone = "Mars/Olympus".to_string();
        assert!(user.tz().is_none());
    }

    #[test]
    fn test_mark_sent() {
        let mut user = User::new("A", "+12065550000", "UTC", 40);
        let now = Utc::now();
        user.mark_sent(now);
        assert_eq!(user.last_sent_at, Some(now));
        assert_eq!(user.reminders_sent, 1);
    }

    #[test]
    fn test_is_e164() {
        assert!(is_e164("+12065551234"));
        assert!(is_e164("+8613800138000"));
        assert!(!is_e164("12065551234"));
        assert!(!is_e164("+1206555"));
        assert!(!is_e164("+0123456789"));
        assert!(!is_e164("+1206-555-1234"));
    }
}
