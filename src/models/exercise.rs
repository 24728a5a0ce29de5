use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExercisePlan {
    #[serde(alias = "default")]
    SeniorBeginner,
    AdultIntermediate,
}

pub struct Routine {
    pub title: &'static str,
    pub exercises: &'static [&'static str],
    pub tips: &'static str,
}

const SENIOR_BEGINNER: &[Routine] = &[
    Routine {
        title: "平板支撑 + 轻量训练 (Day A)",
        exercises: &[
            "🧘 平板支撑 (Plank): 从膝盖跪姿开始，保持20秒 x 3组，组间休息30秒",
            "💪 墙壁俯卧撑 (Wall Push-ups): 面对墙壁，双手撑墙，做10次 x 2组",
            "🦵 椅子辅助深蹲 (Chair Squats): 慢慢坐下再站起，10次 x 2组",
            "🏋️ 轻哑铃弯举 (Light Dumbbell Curls): 2-3磅，每侧10次 x 2组",
        ],
        tips: "⚠️ 注意：动作要慢，呼吸要稳。如果感到头晕或疼痛，请立即停止。",
    },
    Routine {
        title: "平衡 + 核心训练 (Day B)",
        exercises: &[
            "🧘 平板支撑 (Plank): 膝盖跪姿，保持25秒 x 3组",
            "🦶 单脚站立 (Single Leg Stand): 扶椅子，每侧15秒 x 3次",
            "🏋️ 轻哑铃侧举 (Lateral Raises): 2磅，每侧8次 x 2组",
            "🚶 原地踏步 (Marching in Place): 抬高膝盖，2分钟",
        ],
        tips: "⚠️ 确保周围有稳固的支撑物。慢慢来，安全第一！",
    },
    Routine {
        title: "上肢 + 柔韧性 (Day C)",
        exercises: &[
            "🧘 平板支撑 (Plank): 膝盖跪姿，保持30秒 x 3组",
            "💪 弹力带划船 (Resistance Band Rows): 10次 x 2组",
            "🏋️ 轻哑铃推举 (Overhead Press): 2磅，8次 x 2组",
            "🧘 坐姿拉伸 (Seated Stretches): 每个动作保持15秒",
        ],
        tips: "⚠️ 拉伸时不要弹跳，保持稳定的拉伸感即可。",
    },
];

const ADULT_INTERMEDIATE: &[Routine] = &[
    Routine {
        title: "核心 + 力量 (Day A)",
        exercises: &[
            "🧘 平板支撑 (Plank): 标准姿势 45秒 x 4组",
            "💪 俯卧撑 (Push-ups): 15次 x 3组",
            "🦵 深蹲 (Squats): 20次 x 3组",
            "🏋️ 哑铃弯举 (Dumbbell Curls): 15磅，12次 x 3组",
        ],
        tips: "💡 保持核心收紧，注意呼吸节奏。",
    },
    Routine {
        title: "全身训练 (Day B)",
        exercises: &[
            "🧘 侧平板支撑 (Side Plank): 每侧30秒 x 3组",
            "🏋️ 硬拉 (Deadlifts): 适当重量，10次 x 3组",
            "💪 引体向上或弹力带辅助 (Pull-ups): 8次 x 3组",
            "🚴 开合跳 (Jumping Jacks): 30秒 x 3组",
        ],
        tips: "💡 硬拉注意保持背部平直，不要弓背。",
    },
];

/// Age at which new users default to the gentler plan.
pub const SENIOR_AGE: u32 = 55;

impl ExercisePlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExercisePlan::SeniorBeginner => "senior_beginner",
            ExercisePlan::AdultIntermediate => "adult_intermediate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "senior_beginner" | "default" => Some(ExercisePlan::SeniorBeginner),
            "adult_intermediate" => Some(ExercisePlan::AdultIntermediate),
            _ => None,
        }
    }

    pub fn for_age(age: u32) -> Self {
        if age >= SENIOR_AGE {
            ExercisePlan::SeniorBeginner
        } else {
            ExercisePlan::AdultIntermediate
        }
    }

    pub fn routines(&self) -> &'static [Routine] {
        match self {
            ExercisePlan::SeniorBeginner => SENIOR_BEGINNER,
            ExercisePlan::AdultIntermediate => ADULT_INTERMEDIATE,
        }
    }

    /// Routines rotate so consecutive reminders differ.
    pub fn routine(&self, index: u32) -> &'static Routine {
        let routines = self.routines();
        &routines[index as usize % routines.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_age() {
        assert_eq!(ExercisePlan::for_age(63), ExercisePlan::SeniorBeginner);
        assert_eq!(ExercisePlan::for_age(55), ExercisePlan::SeniorBeginner);
        assert_eq!(ExercisePlan::for_age(40), ExercisePlan::AdultIntermediate);
    }

    #[test]
    fn test_parse_round_trips_names() {
        for plan in [ExercisePlan::SeniorBeginner, ExercisePlan::AdultIntermediate] {
            assert_eq!(ExercisePlan::parse(plan.as_str()), Some(plan));
        }
        assert_eq!(ExercisePlan::parse("marathon"), None);
    }

    #[test]
    fn test_all_routines_have_exercises() {
        for plan in [ExercisePlan::SeniorBeginner, ExercisePlan::AdultIntermediate] {
            assert!(!plan.routines().is_empty());
            for routine in plan.routines() {
                assert!(!routine.exercises.is_empty());
                assert!(!routine.tips.is_empty());
            }
        }
    }

    #[test]
    fn test_routine_rotation_wraps() {
        let plan = ExercisePlan::AdultIntermediate;
        assert!(plan.routine(0).title.contains("Day A"));
        assert!(plan.routine(1).title.contains("Day B"));
        assert!(plan.routine(2).title.contains("Day A"));
    }
}
