use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::messages::WhimsyLevel;
use crate::progress::RecoveryState;

/// Every state change in the store produces an Event.
/// Listeners registered on the store receive them synchronously.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    IdentitySelected {
        identity_id: String,
        at: DateTime<Utc>,
    },
    HabitCreated {
        habit_id: String,
        identity_id: String,
        at: DateTime<Utc>,
    },
    HabitUpdated {
        habit_id: String,
        at: DateTime<Utc>,
    },
    HabitDeactivated {
        habit_id: String,
        at: DateTime<Utc>,
    },
    HabitCompleted {
        habit_id: String,
        date: NaiveDate,
        /// Identity credited with the show-up, if any.
        identity_id: Option<String>,
        total_show_ups: u32,
        at: DateTime<Utc>,
    },
    LifeHappened {
        habit_id: String,
        date: NaiveDate,
        at: DateTime<Utc>,
    },
    CelebrationShown {
        habit_id: String,
        at: DateTime<Utc>,
    },
    CelebrationCleared {
        habit_id: String,
        at: DateTime<Utc>,
    },
    MilestoneReached {
        habit_id: String,
        days: u32,
        at: DateTime<Utc>,
    },
    ProgressPaused {
        paused_until: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    ProgressResumed {
        at: DateTime<Utc>,
    },
    RecoveryStateChanged {
        from: RecoveryState,
        to: RecoveryState,
        at: DateTime<Utc>,
    },
    WhimsyLevelChanged {
        level: WhimsyLevel,
        at: DateTime<Utc>,
    },
}

impl StoreEvent {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            StoreEvent::IdentitySelected { at, .. }
            | StoreEvent::HabitCreated { at, .. }
            | StoreEvent::HabitUpdated { at, .. }
            | StoreEvent::HabitDeactivated { at, .. }
            | StoreEvent::HabitCompleted { at, .. }
            | StoreEvent::LifeHappened { at, .. }
            | StoreEvent::CelebrationShown { at, .. }
            | StoreEvent::CelebrationCleared { at, .. }
            | StoreEvent::MilestoneReached { at, .. }
            | StoreEvent::ProgressPaused { at, .. }
            | StoreEvent::ProgressResumed { at }
            | StoreEvent::RecoveryStateChanged { at, .. }
            | StoreEvent::WhimsyLevelChanged { at, .. } => *at,
        }
    }
}
