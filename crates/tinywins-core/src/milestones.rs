//! Streak milestones worth a bigger celebration.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakMilestone {
    pub days: u32,
    pub title: &'static str,
    pub emoji: &'static str,
    pub message: &'static str,
}

const fn milestone(
    days: u32,
    title: &'static str,
    emoji: &'static str,
    message: &'static str,
) -> StreakMilestone {
    StreakMilestone {
        days,
        title,
        emoji,
        message,
    }
}

/// Ordered by `days`, ascending.
pub const STREAK_MILESTONES: [StreakMilestone; 9] = [
    milestone(3, "First Steps!", "🌱", "You're building momentum!"),
    milestone(7, "One Week Strong!", "🔥", "You're on fire!"),
    milestone(14, "Two Weeks!", "⚡", "You're unstoppable!"),
    milestone(21, "Habit Former!", "🏆", "This is becoming who you are!"),
    milestone(30, "One Month!", "👑", "You're a habit champion!"),
    milestone(60, "Two Months!", "🌟", "Your identity is transforming!"),
    milestone(90, "Three Months!", "💎", "You're a diamond now!"),
    milestone(100, "Century Club!", "🎯", "100 days of showing up!"),
    milestone(365, "One Year!", "🎊", "You've become who you set out to be!"),
];

/// The milestone reached at exactly `streak` days, if any.
pub fn milestone_at(streak: u32) -> Option<&'static StreakMilestone> {
    STREAK_MILESTONES.iter().find(|m| m.days == streak)
}

/// The first milestone strictly beyond `streak`.
pub fn next_milestone(streak: u32) -> Option<&'static StreakMilestone> {
    STREAK_MILESTONES.iter().find(|m| m.days > streak)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_sorted() {
        assert!(STREAK_MILESTONES.windows(2).all(|w| w[0].days < w[1].days));
    }

    #[test]
    fn exact_match_only() {
        assert_eq!(milestone_at(7).map(|m| m.title), Some("One Week Strong!"));
        assert!(milestone_at(8).is_none());
        assert!(milestone_at(0).is_none());
    }

    #[test]
    fn next_after_streak() {
        assert_eq!(next_milestone(0).map(|m| m.days), Some(3));
        assert_eq!(next_milestone(3).map(|m| m.days), Some(7));
        assert_eq!(next_milestone(364).map(|m| m.days), Some(365));
        assert!(next_milestone(365).is_none());
    }
}
