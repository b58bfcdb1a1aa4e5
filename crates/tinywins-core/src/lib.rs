//! # Tiny Wins Core Library
//!
//! This library provides the core logic for Tiny Wins, an identity-based
//! habit tracker built around small actions, streaks and a compassionate
//! recovery flow. Front ends (the CLI, or any UI) are thin consumers of
//! the store's public interface.
//!
//! ## Architecture
//!
//! - **Store**: an explicit, single-threaded state container with
//!   synchronous listeners and write-back persistence
//! - **Storage**: versioned JSON snapshot under one key, backed by SQLite,
//!   a JSON file or memory; TOML-based configuration
//! - **Catalogs**: predefined identities, encouraging and celebration
//!   messages, streak milestones
//!
//! ## Key Components
//!
//! - [`HabitStore`]: the habit progress store
//! - [`StoreState`]: persisted state and its pure transitions
//! - [`StateStorage`]: persistence port
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod habit;
pub mod identity;
pub mod messages;
pub mod milestones;
pub mod progress;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError};
pub use events::StoreEvent;
pub use habit::{Habit, HabitCheckIn, HabitUpdate, NewHabit};
pub use identity::{find_identity, predefined_identities, Identity};
pub use messages::{EncouragingMessage, MessageContext, WhimsyLevel};
pub use milestones::{StreakMilestone, STREAK_MILESTONES};
pub use progress::{ProgressSummary, RecoveryState, UserProgress};
pub use storage::{
    Config, JsonFileStorage, MemoryStorage, SqliteStorage, StateStorage, StorageBackend,
    StreakAttribution,
};
pub use store::{HabitStore, HabitStoreBuilder, ListenerId, StoreState};
