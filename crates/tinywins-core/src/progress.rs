//! Aggregate user progress and recovery state.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Whether the user is accumulating streaks or on an intentional break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecoveryState {
    #[default]
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "missed_1_day")]
    Missed1Day,
    #[serde(rename = "missed_2_days")]
    Missed2Days,
    #[serde(rename = "missed_3_plus")]
    Missed3Plus,
    #[serde(rename = "paused")]
    Paused,
}

impl RecoveryState {
    /// State implied by the number of calendar days since the last
    /// show-up. Yesterday still counts as active.
    pub fn from_gap(days_since_active: i64) -> Self {
        match days_since_active {
            i64::MIN..=1 => RecoveryState::Active,
            2 => RecoveryState::Missed1Day,
            3 => RecoveryState::Missed2Days,
            _ => RecoveryState::Missed3Plus,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryState::Active => "active",
            RecoveryState::Missed1Day => "missed_1_day",
            RecoveryState::Missed2Days => "missed_2_days",
            RecoveryState::Missed3Plus => "missed_3_plus",
            RecoveryState::Paused => "paused",
        }
    }
}

impl fmt::Display for RecoveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Singleton progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    /// Cumulative show-ups per identity. Never decremented.
    #[serde(default)]
    pub identity_streaks: BTreeMap<String, u32>,
    #[serde(default)]
    pub total_show_ups: u32,
    pub last_active_date: NaiveDate,
    #[serde(default)]
    pub recovery_state: RecoveryState,
    /// Present only while paused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_until: Option<DateTime<Utc>>,
}

impl UserProgress {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            identity_streaks: BTreeMap::new(),
            total_show_ups: 0,
            last_active_date: today,
            recovery_state: RecoveryState::Active,
            paused_until: None,
        }
    }

    pub fn identity_streak(&self, identity_id: &str) -> u32 {
        self.identity_streaks.get(identity_id).copied().unwrap_or(0)
    }

    pub fn is_paused(&self) -> bool {
        self.recovery_state == RecoveryState::Paused
    }
}

/// Read-only overview used by the stats view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub selected_identity: Option<Identity>,
    pub identity_streak: u32,
    pub identity_day_count: usize,
    pub active_habits: usize,
    pub total_show_ups: u32,
    pub completed_today: usize,
    pub recovery_state: RecoveryState,
    pub days_until_recovery: i64,
    pub last_active_date: NaiveDate,
}
