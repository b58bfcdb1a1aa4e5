//! Habits and their daily check-ins.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A small, repeatable action tied to an identity.
///
/// Habits are never physically removed; `is_active = false` is the
/// only form of deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub identity_id: String,
    pub title: String,
    /// Text before the user shrank the habit down. Informational only.
    pub original_title: String,
    /// "After I ..., I will ..."
    pub implementation_intention: String,
    pub minimum_action: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Payload for creating a habit. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHabit {
    pub identity_id: String,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub implementation_intention: String,
    #[serde(default)]
    pub minimum_action: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl NewHabit {
    /// Active habit with only the required fields filled in.
    pub fn new(identity_id: impl Into<String>, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            identity_id: identity_id.into(),
            original_title: title.clone(),
            title,
            implementation_intention: String::new(),
            minimum_action: String::new(),
            is_active: true,
        }
    }

    pub fn with_original_title(mut self, original_title: impl Into<String>) -> Self {
        self.original_title = original_title.into();
        self
    }

    pub fn with_intention(mut self, intention: impl Into<String>) -> Self {
        self.implementation_intention = intention.into();
        self
    }

    pub fn with_minimum_action(mut self, minimum_action: impl Into<String>) -> Self {
        self.minimum_action = minimum_action.into();
        self
    }
}

/// Partial habit update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_intention: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl HabitUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Habit {
    pub(crate) fn from_new(data: NewHabit, created_at: DateTime<Utc>) -> Self {
        Self {
            id: generate_id("habit"),
            identity_id: data.identity_id,
            title: data.title,
            original_title: data.original_title,
            implementation_intention: data.implementation_intention,
            minimum_action: data.minimum_action,
            created_at,
            is_active: data.is_active,
        }
    }

    pub(crate) fn apply(&mut self, updates: HabitUpdate) {
        if let Some(identity_id) = updates.identity_id {
            self.identity_id = identity_id;
        }
        if let Some(title) = updates.title {
            self.title = title;
        }
        if let Some(original_title) = updates.original_title {
            self.original_title = original_title;
        }
        if let Some(intention) = updates.implementation_intention {
            self.implementation_intention = intention;
        }
        if let Some(minimum_action) = updates.minimum_action {
            self.minimum_action = minimum_action;
        }
        if let Some(is_active) = updates.is_active {
            self.is_active = is_active;
        }
    }
}

/// A daily record for one habit. At most one exists per (habit, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitCheckIn {
    pub id: String,
    pub habit_id: String,
    pub date: NaiveDate,
    pub completed: bool,
    /// Compassionate skip: the habit was not done, and that is fine.
    pub life_happened: bool,
    pub celebration_shown: bool,
    pub timestamp: DateTime<Utc>,
}

impl HabitCheckIn {
    pub(crate) fn completed(habit_id: &str, at: DateTime<Utc>) -> Self {
        Self::record(habit_id, at, true, false)
    }

    pub(crate) fn life_happened(habit_id: &str, at: DateTime<Utc>) -> Self {
        Self::record(habit_id, at, false, true)
    }

    fn record(habit_id: &str, at: DateTime<Utc>, completed: bool, life_happened: bool) -> Self {
        Self {
            id: generate_id("checkin"),
            habit_id: habit_id.to_string(),
            date: at.date_naive(),
            completed,
            life_happened,
            celebration_shown: false,
            timestamp: at,
        }
    }
}

fn generate_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}
