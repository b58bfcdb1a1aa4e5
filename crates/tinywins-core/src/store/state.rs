//! Store state and its transitions.
//!
//! Every transition takes the current instant explicitly and returns the
//! events it produced; an empty list means nothing changed. No IO happens
//! here, which keeps persistence and notification in [`super::HabitStore`].

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::StoreEvent;
use crate::habit::{Habit, HabitCheckIn, HabitUpdate, NewHabit};
use crate::identity::Identity;
use crate::messages::{MessageContext, WhimsyLevel};
use crate::milestones::milestone_at;
use crate::progress::{ProgressSummary, RecoveryState, UserProgress};
use crate::storage::StreakAttribution;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Everything the store owns. The celebration queue and the last
/// celebration time are ephemeral and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    #[serde(default)]
    pub selected_identity: Option<Identity>,
    #[serde(default)]
    pub active_habits: Vec<Habit>,
    #[serde(default)]
    pub check_ins: Vec<HabitCheckIn>,
    pub user_progress: UserProgress,
    /// habit id -> milestone day counts already reached
    #[serde(default)]
    pub streak_milestones: BTreeMap<String, Vec<u32>>,
    #[serde(default)]
    pub whimsy_level: WhimsyLevel,
    #[serde(skip)]
    pub celebration_queue: Vec<String>,
    #[serde(skip)]
    pub last_celebration_time: Option<DateTime<Utc>>,
}

impl StoreState {
    /// Empty state as of `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selected_identity: None,
            active_habits: Vec::new(),
            check_ins: Vec::new(),
            user_progress: UserProgress::new(today),
            streak_milestones: BTreeMap::new(),
            whimsy_level: WhimsyLevel::default(),
            celebration_queue: Vec::new(),
            last_celebration_time: None,
        }
    }

    // ── Transitions ─────────────────────────────────────────────────

    pub fn select_identity(&mut self, identity: Identity, now: DateTime<Utc>) -> Vec<StoreEvent> {
        let identity_id = identity.id.clone();
        let changed = self.selected_identity.as_ref() != Some(&identity);
        let seeded = !self.user_progress.identity_streaks.contains_key(&identity_id);

        if seeded {
            self.user_progress
                .identity_streaks
                .insert(identity_id.clone(), 0);
        }
        self.selected_identity = Some(identity);

        if changed || seeded {
            vec![StoreEvent::IdentitySelected {
                identity_id,
                at: now,
            }]
        } else {
            Vec::new()
        }
    }

    pub fn create_habit(&mut self, data: NewHabit, now: DateTime<Utc>) -> (Habit, Vec<StoreEvent>) {
        let habit = Habit::from_new(data, now);
        let event = StoreEvent::HabitCreated {
            habit_id: habit.id.clone(),
            identity_id: habit.identity_id.clone(),
            at: now,
        };
        self.active_habits.push(habit.clone());
        (habit, vec![event])
    }

    pub fn update_habit(
        &mut self,
        habit_id: &str,
        updates: HabitUpdate,
        now: DateTime<Utc>,
    ) -> Vec<StoreEvent> {
        let Some(habit) = self.habit_mut(habit_id) else {
            debug!(habit_id, "update ignored: unknown habit");
            return Vec::new();
        };
        habit.apply(updates);
        vec![StoreEvent::HabitUpdated {
            habit_id: habit_id.to_string(),
            at: now,
        }]
    }

    pub fn deactivate_habit(&mut self, habit_id: &str, now: DateTime<Utc>) -> Vec<StoreEvent> {
        let Some(habit) = self.habit_mut(habit_id) else {
            debug!(habit_id, "deactivate ignored: unknown habit");
            return Vec::new();
        };
        habit.is_active = false;
        vec![StoreEvent::HabitDeactivated {
            habit_id: habit_id.to_string(),
            at: now,
        }]
    }

    pub fn mark_habit_complete(
        &mut self,
        habit_id: &str,
        now: DateTime<Utc>,
        attribution: StreakAttribution,
    ) -> Vec<StoreEvent> {
        let today = now.date_naive();
        if self.has_check_in_on(habit_id, today) {
            debug!(habit_id, %today, "completion ignored: already checked in today");
            return Vec::new();
        }

        self.check_ins.push(HabitCheckIn::completed(habit_id, now));

        let previous_state = self.user_progress.recovery_state;
        let credited = self.credited_identity(habit_id, attribution);
        let progress = &mut self.user_progress;
        progress.total_show_ups += 1;
        progress.last_active_date = today;
        progress.recovery_state = RecoveryState::Active;
        progress.paused_until = None;
        if let Some(identity_id) = &credited {
            *progress.identity_streaks.entry(identity_id.clone()).or_insert(0) += 1;
        }

        self.celebration_queue.push(habit_id.to_string());
        self.last_celebration_time = Some(now);

        let mut events = vec![StoreEvent::HabitCompleted {
            habit_id: habit_id.to_string(),
            date: today,
            identity_id: credited,
            total_show_ups: self.user_progress.total_show_ups,
            at: now,
        }];

        if previous_state != RecoveryState::Active {
            events.push(StoreEvent::RecoveryStateChanged {
                from: previous_state,
                to: RecoveryState::Active,
                at: now,
            });
        }

        let streak = self.habit_streak(habit_id, today);
        if let Some(milestone) = milestone_at(streak) {
            let reached = self
                .streak_milestones
                .entry(habit_id.to_string())
                .or_default();
            if !reached.contains(&milestone.days) {
                reached.push(milestone.days);
                events.push(StoreEvent::MilestoneReached {
                    habit_id: habit_id.to_string(),
                    days: milestone.days,
                    at: now,
                });
            }
        }

        events
    }

    pub fn mark_life_happened(&mut self, habit_id: &str, now: DateTime<Utc>) -> Vec<StoreEvent> {
        let today = now.date_naive();
        if self.has_check_in_on(habit_id, today) {
            debug!(habit_id, %today, "life-happened ignored: already checked in today");
            return Vec::new();
        }

        self.check_ins.push(HabitCheckIn::life_happened(habit_id, now));
        vec![StoreEvent::LifeHappened {
            habit_id: habit_id.to_string(),
            date: today,
            at: now,
        }]
    }

    pub fn clear_celebration(&mut self, habit_id: &str, now: DateTime<Utc>) -> Vec<StoreEvent> {
        let Some(pos) = self.celebration_queue.iter().position(|id| id == habit_id) else {
            return Vec::new();
        };
        self.celebration_queue.remove(pos);
        vec![StoreEvent::CelebrationCleared {
            habit_id: habit_id.to_string(),
            at: now,
        }]
    }

    pub fn mark_celebration_shown(&mut self, habit_id: &str, now: DateTime<Utc>) -> Vec<StoreEvent> {
        let today = now.date_naive();
        let Some(check_in) = self
            .check_ins
            .iter_mut()
            .find(|c| c.habit_id == habit_id && c.date == today && !c.celebration_shown)
        else {
            return Vec::new();
        };
        check_in.celebration_shown = true;
        vec![StoreEvent::CelebrationShown {
            habit_id: habit_id.to_string(),
            at: now,
        }]
    }

    pub fn pause_progress(&mut self, days: u32, now: DateTime<Utc>) -> Vec<StoreEvent> {
        let paused_until = now
            .checked_add_signed(Duration::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let previous_state = self.user_progress.recovery_state;
        self.user_progress.recovery_state = RecoveryState::Paused;
        self.user_progress.paused_until = Some(paused_until);

        let mut events = vec![StoreEvent::ProgressPaused {
            paused_until,
            at: now,
        }];
        if previous_state != RecoveryState::Paused {
            events.push(StoreEvent::RecoveryStateChanged {
                from: previous_state,
                to: RecoveryState::Paused,
                at: now,
            });
        }
        events
    }

    pub fn resume_progress(&mut self, now: DateTime<Utc>) -> Vec<StoreEvent> {
        let previous_state = self.user_progress.recovery_state;
        let was_paused = self.user_progress.paused_until.is_some();
        self.user_progress.recovery_state = RecoveryState::Active;
        self.user_progress.paused_until = None;

        let mut events = Vec::new();
        if was_paused || previous_state != RecoveryState::Active {
            events.push(StoreEvent::ProgressResumed { at: now });
        }
        if previous_state != RecoveryState::Active {
            events.push(StoreEvent::RecoveryStateChanged {
                from: previous_state,
                to: RecoveryState::Active,
                at: now,
            });
        }
        events
    }

    pub fn set_whimsy_level(&mut self, level: WhimsyLevel, now: DateTime<Utc>) -> Vec<StoreEvent> {
        if self.whimsy_level == level {
            return Vec::new();
        }
        self.whimsy_level = level;
        vec![StoreEvent::WhimsyLevelChanged { level, at: now }]
    }

    /// Move into the missed-day states based on the gap since the last
    /// show-up. A pause holds until `paused_until` has passed.
    pub fn refresh_recovery_state(&mut self, now: DateTime<Utc>) -> Vec<StoreEvent> {
        let current = self.user_progress.recovery_state;
        if self.user_progress.is_paused() {
            if self.user_progress.paused_until.is_some_and(|until| until > now) {
                return Vec::new();
            }
            self.user_progress.paused_until = None;
        }

        let gap = (now.date_naive() - self.user_progress.last_active_date).num_days();
        let next = RecoveryState::from_gap(gap);
        if next == current {
            return Vec::new();
        }

        self.user_progress.recovery_state = next;
        vec![StoreEvent::RecoveryStateChanged {
            from: current,
            to: next,
            at: now,
        }]
    }

    // ── Derived reads ───────────────────────────────────────────────

    pub fn habit(&self, habit_id: &str) -> Option<&Habit> {
        self.active_habits.iter().find(|h| h.id == habit_id)
    }

    fn habit_mut(&mut self, habit_id: &str) -> Option<&mut Habit> {
        self.active_habits.iter_mut().find(|h| h.id == habit_id)
    }

    fn has_check_in_on(&self, habit_id: &str, date: NaiveDate) -> bool {
        self.check_ins
            .iter()
            .any(|c| c.habit_id == habit_id && c.date == date)
    }

    fn credited_identity(&self, habit_id: &str, attribution: StreakAttribution) -> Option<String> {
        let selected = self.selected_identity.as_ref().map(|i| i.id.clone());
        match attribution {
            StreakAttribution::SelectedIdentity => selected,
            StreakAttribution::Habit => self
                .habit(habit_id)
                .map(|h| h.identity_id.clone())
                .or(selected),
        }
    }

    pub fn check_ins_on(&self, date: NaiveDate) -> Vec<HabitCheckIn> {
        self.check_ins
            .iter()
            .filter(|c| c.date == date)
            .cloned()
            .collect()
    }

    /// Consecutive days ending at `today` with a completed check-in.
    pub fn habit_streak(&self, habit_id: &str, today: NaiveDate) -> u32 {
        let completed: HashSet<NaiveDate> = self
            .check_ins
            .iter()
            .filter(|c| c.habit_id == habit_id && c.completed)
            .map(|c| c.date)
            .collect();

        let mut streak = 0;
        let mut day = Some(today);
        while let Some(d) = day.filter(|d| completed.contains(d)) {
            streak += 1;
            day = d.pred_opt();
        }
        streak
    }

    pub fn identity_streak(&self, identity_id: &str) -> u32 {
        self.user_progress.identity_streak(identity_id)
    }

    /// Whole days (rounded up) until the pause ends, never negative.
    pub fn days_until_recovery(&self, now: DateTime<Utc>) -> i64 {
        let Some(until) = self.user_progress.paused_until else {
            return 0;
        };
        let remaining_ms = (until - now).num_milliseconds();
        if remaining_ms <= 0 {
            0
        } else {
            (remaining_ms + DAY_MS - 1) / DAY_MS
        }
    }

    pub fn message_context(&self) -> MessageContext {
        if self.user_progress.recovery_state == RecoveryState::Active {
            MessageContext::Morning
        } else {
            MessageContext::Recovery
        }
    }

    /// Distinct dates with a completed check-in for any habit of the
    /// selected identity.
    pub fn identity_day_count(&self) -> usize {
        let Some(selected) = &self.selected_identity else {
            return 0;
        };
        let habit_ids: HashSet<&str> = self
            .active_habits
            .iter()
            .filter(|h| h.identity_id == selected.id)
            .map(|h| h.id.as_str())
            .collect();

        self.check_ins
            .iter()
            .filter(|c| c.completed && habit_ids.contains(c.habit_id.as_str()))
            .map(|c| c.date)
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn should_show_extra_encouragement(&self, now: DateTime<Utc>) -> bool {
        let last = self.last_celebration_time.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        now - last > self.whimsy_level.encouragement_cooldown()
    }

    pub fn summary(&self, now: DateTime<Utc>) -> ProgressSummary {
        let today = now.date_naive();
        ProgressSummary {
            identity_streak: self
                .selected_identity
                .as_ref()
                .map_or(0, |i| self.identity_streak(&i.id)),
            selected_identity: self.selected_identity.clone(),
            identity_day_count: self.identity_day_count(),
            active_habits: self.active_habits.iter().filter(|h| h.is_active).count(),
            total_show_ups: self.user_progress.total_show_ups,
            completed_today: self
                .check_ins
                .iter()
                .filter(|c| c.date == today && c.completed)
                .count(),
            recovery_state: self.user_progress.recovery_state,
            days_until_recovery: self.days_until_recovery(now),
            last_active_date: self.user_progress.last_active_date,
        }
    }
}
