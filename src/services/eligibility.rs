use chrono::{DateTime, Timelike, Utc};

use crate::models::User;

const GREETINGS: &[&str] = &[
    "早上好！",
    "你好！",
    "新的一天，新的开始！",
    "今天也要加油哦！",
    "美好的一天从运动开始！",
];

const MOTIVATIONS: &[&str] = &[
    "坚持就是胜利！每一次锻炼都在让身体更强壮 💪",
    "运动是最好的投资，您的身体会感谢您的 ❤️",
    "慢慢来，比不做强！您做得很棒 👍",
    "健康是最大的财富，继续保持！🌟",
    "每一步都算数，您正在变得更健康 🎯",
];

pub const CONFIRMATION_FOOTER: &str =
    "✅ 做完了请回复 OK (reply OK when done)\n❌ 如需暂停提醒请回复 NO (reply NO to unsubscribe)";

/// Why a user is or isn't due for a reminder at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Due,
    Inactive,
    UnknownTimezone,
    /// Fewer than `cadence_days` local calendar days since the last send.
    TooSoon { days_since: i64 },
    /// The user's local hour doesn't match `preferred_hour`.
    WrongHour { local_hour: u32 },
}

pub fn check(user: &User, now: DateTime<Utc>) -> Eligibility {
    if !user.active {
        return Eligibility::Inactive;
    }

    let Some(tz) = user.tz() else {
        return Eligibility::UnknownTimezone;
    };
    let local_now = now.with_timezone(&tz);

    // Cadence counts calendar days in the user's zone, so a send that ran a few
    // minutes into the hour doesn't push the next one back a whole cycle.
    if let Some(last) = user.last_sent_at {
        let days_since = (local_now.date_naive() - last.with_timezone(&tz).date_naive()).num_days();
        if days_since < i64::from(user.cadence_days.max(1)) {
            return Eligibility::TooSoon { days_since };
        }
    }

    let local_hour = local_now.hour();
    if local_hour != u32::from(user.preferred_hour) {
        return Eligibility::WrongHour { local_hour };
    }

    Eligibility::Due
}

pub fn is_due(user: &User, now: DateTime<Utc>) -> bool {
    check(user, now) == Eligibility::Due
}

/// Renders the reminder text for the user's next routine.
pub fn build_message(user: &User) -> String {
    let index = user.reminders_sent as usize;
    let routine = user.exercise_plan.routine(user.reminders_sent);
    let greeting = GREETINGS[index % GREETINGS.len()];
    let motivation = MOTIVATIONS[index % MOTIVATIONS.len()];

    let mut lines = vec![
        format!("{greeting} {}，", user.name),
        String::new(),
        format!("📋 今天的锻炼计划 (Today's plan): {}", routine.title),
        String::new(),
    ];
    lines.extend(routine.exercises.iter().map(|e| format!("  {e}")));
    lines.extend([
        String::new(),
        routine.tips.to_string(),
        String::new(),
        motivation.to_string(),
        String::new(),
        CONFIRMATION_FOOTER.to_string(),
    ]);

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExercisePlan;
    use chrono::{Duration, TimeZone};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn pacific_user() -> User {
        let mut user = User::new("妈妈", "+12065551234", "America/Los_Angeles", 63);
        user.cadence_days = 2;
        user.preferred_hour = 9;
        user
    }

    // 2025-06-16 09:00 PDT
    fn nine_am_pacific() -> DateTime<Utc> {
        utc(2025, 6, 16, 16, 0)
    }

    #[test]
    fn test_never_sent_due_at_preferred_hour() {
        let user = pacific_user();
        assert!(is_due(&user, nine_am_pacific()));
    }

    #[test]
    fn test_not_due_thirty_hours_later() {
        let mut user = pacific_user();
        let sent = nine_am_pacific();
        user.mark_sent(sent);
        let later = sent + Duration::hours(30);
        assert!(!is_due(&user, later));
        assert_eq!(check(&user, later), Eligibility::TooSoon { days_since: 1 });
    }

    #[test]
    fn test_inactive_never_due() {
        let mut user = pacific_user();
        user.active = false;
        for hour in 0..24 {
            assert!(!is_due(&user, nine_am_pacific() + Duration::hours(hour)));
        }
        assert_eq!(check(&user, nine_am_pacific()), Eligibility::Inactive);
    }

    #[test]
    fn test_wrong_hour_not_due_even_when_cadence_elapsed() {
        let mut user = pacific_user();
        user.mark_sent(nine_am_pacific() - Duration::days(10));
        let ten_am = nine_am_pacific() + Duration::hours(1);
        assert_eq!(check(&user, ten_am), Eligibility::WrongHour { local_hour: 10 });
        assert!(is_due(&user, nine_am_pacific()));
    }

    #[test]
    fn test_cadence_uses_local_calendar_days() {
        let mut user = pacific_user();
        // Sent at 09:40 local two days ago; today's tick at 09:05 is under 48h later.
        user.mark_sent(utc(2025, 6, 14, 16, 40));
        assert!(is_due(&user, utc(2025, 6, 16, 16, 5)));
    }

    #[test]
    fn test_cadence_across_dst_change() {
        let mut user = pacific_user();
        // 2025-03-08 09:00 PST, then 2025-03-10 09:00 PDT: only 47 hours apart.
        user.mark_sent(utc(2025, 3, 8, 17, 0));
        assert!(is_due(&user, utc(2025, 3, 10, 16, 0)));
    }

    #[test]
    fn test_exact_cadence_boundary() {
        let mut user = pacific_user();
        user.cadence_days = 3;
        user.mark_sent(nine_am_pacific());
        assert!(!is_due(&user, nine_am_pacific() + Duration::days(2)));
        assert!(is_due(&user, nine_am_pacific() + Duration::days(3)));
    }

    #[test]
    fn test_future_last_sent_not_due() {
        let mut user = pacific_user();
        user.last_sent_at = Some(nine_am_pacific() + Duration::days(1));
        assert!(!is_due(&user, nine_am_pacific()));
    }

    #[test]
    fn test_unknown_timezone_not_due() {
        let mut user = pacific_user();
        user.timezone = "Pacific/Nowhere".to_string();
        assert_eq!(check(&user, nine_am_pacific()), Eligibility::UnknownTimezone);
    }

    #[test]
    fn test_hour_follows_user_timezone() {
        let mut user = User::new("Alfred", "+8613800138000", "Asia/Shanghai", 40);
        user.preferred_hour = 8;
        // 00:00 UTC is 08:00 in Shanghai.
        assert!(is_due(&user, utc(2025, 6, 16, 0, 0)));
        assert!(!is_due(&user, utc(2025, 6, 16, 8, 0)));
    }

    #[test]
    fn test_message_contains_routine_and_opt_out() {
        let user = pacific_user();
        let msg = build_message(&user);
        assert!(msg.contains("妈妈"));
        assert!(msg.contains("平板支撑"));
        assert!(msg.contains("Plank"));
        assert!(msg.contains("Day A"));
        assert!(msg.contains("reply NO to unsubscribe"));
    }

    #[test]
    fn test_message_rotates_with_sent_count() {
        let mut user = pacific_user();
        user.reminders_sent = 1;
        assert!(build_message(&user).contains("Day B"));
        user.reminders_sent = 2;
        assert!(build_message(&user).contains("Day C"));
    }

    #[test]
    fn test_message_follows_plan() {
        let mut user = pacific_user();
        user.exercise_plan = ExercisePlan::AdultIntermediate;
        let msg = build_message(&user);
        assert!(msg.contains("Push-ups"));
        assert!(!msg.contains("Wall Push-ups"));
    }

    #[test]
    fn test_message_is_deterministic() {
        let user = pacific_user();
        assert_eq!(build_message(&user), build_message(&user));
    }
}
