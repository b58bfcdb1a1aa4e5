//! The habit progress store.
//!
//! [`HabitStore`] is the single source of truth for identity, habit and
//! progress state. It wraps a [`StoreState`] and adds the side effects
//! the state itself stays free of:
//!
//! - reading the wall clock through an injected [`Clock`]
//! - random message selection through an injected RNG
//! - write-back to a [`StateStorage`] after each change
//! - synchronous notification of subscribed listeners
//!
//! No operation returns an error. Duplicate check-ins and unknown ids are
//! silent no-ops, reported as `false`.

mod state;

pub use state::StoreState;

use std::collections::BTreeMap;

use rand::{RngCore, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::events::StoreEvent;
use crate::habit::{Habit, HabitCheckIn, HabitUpdate, NewHabit};
use crate::identity::Identity;
use crate::messages::{
    pick_celebration_message, pick_encouraging_message, EncouragingMessage, WhimsyLevel,
};
use crate::milestones::{next_milestone, StreakMilestone};
use crate::progress::{ProgressSummary, UserProgress};
use crate::storage::{
    decode_state, encode_state, open_storage, Config, LoadedState, StateStorage,
    StreakAttribution, STORAGE_KEY,
};

/// Handle returned by [`HabitStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Configures and opens a [`HabitStore`].
pub struct HabitStoreBuilder {
    storage: Box<dyn StateStorage>,
    clock: Box<dyn Clock>,
    rng: Option<Box<dyn RngCore>>,
    seed: Option<u64>,
    attribution: StreakAttribution,
    default_whimsy: WhimsyLevel,
}

impl HabitStoreBuilder {
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Use a specific random source. Takes precedence over [`Self::seed`].
    pub fn rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn attribution(mut self, attribution: StreakAttribution) -> Self {
        self.attribution = attribution;
        self
    }

    /// Whimsy level used when nothing has been persisted yet.
    pub fn default_whimsy(mut self, level: WhimsyLevel) -> Self {
        self.default_whimsy = level;
        self
    }

    /// Rehydrate from storage, or start empty when there is nothing
    /// usable to load.
    pub fn open(self) -> HabitStore {
        let now = self.clock.now();
        let state = match self.storage.read(STORAGE_KEY) {
            Ok(None) => None,
            Ok(Some(raw)) => match decode_state(&raw) {
                Ok(LoadedState::Loaded(state)) => Some(*state),
                Ok(LoadedState::VersionMismatch(found)) => {
                    warn!(found, "stored snapshot has another schema version, starting fresh");
                    None
                }
                Err(e) => {
                    warn!(error = %e, "stored snapshot is unreadable, starting fresh");
                    None
                }
            },
            Err(e) => {
                warn!(error = %e, "failed to read stored snapshot, starting fresh");
                None
            }
        };

        let state = state.unwrap_or_else(|| {
            let mut fresh = StoreState::new(now.date_naive());
            fresh.whimsy_level = self.default_whimsy;
            fresh
        });

        let rng: Box<dyn RngCore> = match (self.rng, self.seed) {
            (Some(rng), _) => rng,
            (None, Some(seed)) => Box::new(Mcg128Xsl64::seed_from_u64(seed)),
            (None, None) => Box::new(Mcg128Xsl64::from_entropy()),
        };

        HabitStore {
            state,
            storage: self.storage,
            clock: self.clock,
            rng,
            attribution: self.attribution,
            listeners: BTreeMap::new(),
            next_listener_id: 0,
        }
    }
}

/// Persisted, observable habit progress store.
pub struct HabitStore {
    state: StoreState,
    storage: Box<dyn StateStorage>,
    clock: Box<dyn Clock>,
    rng: Box<dyn RngCore>,
    attribution: StreakAttribution,
    listeners: BTreeMap<ListenerId, Listener>,
    next_listener_id: u64,
}

impl HabitStore {
    pub fn builder(storage: impl StateStorage + 'static) -> HabitStoreBuilder {
        Self::builder_boxed(Box::new(storage))
    }

    pub fn builder_boxed(storage: Box<dyn StateStorage>) -> HabitStoreBuilder {
        HabitStoreBuilder {
            storage,
            clock: Box::new(SystemClock),
            rng: None,
            seed: None,
            attribution: StreakAttribution::default(),
            default_whimsy: WhimsyLevel::default(),
        }
    }

    /// Open with system clock, entropy-seeded RNG and default attribution.
    pub fn open(storage: impl StateStorage + 'static) -> Self {
        Self::builder(storage).open()
    }

    /// Open the store the configuration describes.
    ///
    /// # Errors
    /// Returns an error if the configured storage backend cannot be opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = open_storage(config.store.backend)?;
        Ok(Self::builder_boxed(storage)
            .seed(config.celebration.seed)
            .attribution(config.store.streak_attribution)
            .default_whimsy(config.celebration.whimsy_level)
            .open())
    }

    // ── Observability ───────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.insert(id, Box::new(listener));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Write the current snapshot to storage.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be encoded or written.
    pub fn persist(&self) -> Result<()> {
        let raw = encode_state(&self.state)?;
        self.storage.write(STORAGE_KEY, &raw)?;
        Ok(())
    }

    /// Persist and notify after a transition. Returns whether anything
    /// changed.
    fn commit(&mut self, events: Vec<StoreEvent>) -> bool {
        if events.is_empty() {
            return false;
        }
        if let Err(e) = self.persist() {
            warn!(error = %e, "failed to persist store snapshot");
        }
        for event in &events {
            debug!(at = %event.at(), ?event, "store event");
            for listener in self.listeners.values_mut() {
                listener(event);
            }
        }
        true
    }

    // ── Mutations ───────────────────────────────────────────────────

    pub fn select_identity(&mut self, identity: Identity) -> bool {
        let events = self.state.select_identity(identity, self.clock.now());
        self.commit(events)
    }

    pub fn create_habit(&mut self, data: NewHabit) -> Habit {
        let (habit, events) = self.state.create_habit(data, self.clock.now());
        info!(habit_id = %habit.id, identity_id = %habit.identity_id, "habit created");
        self.commit(events);
        habit
    }

    pub fn update_habit(&mut self, habit_id: &str, updates: HabitUpdate) -> bool {
        let events = self.state.update_habit(habit_id, updates, self.clock.now());
        self.commit(events)
    }

    /// Soft delete. The habit and its history stay queryable.
    pub fn deactivate_habit(&mut self, habit_id: &str) -> bool {
        let events = self.state.deactivate_habit(habit_id, self.clock.now());
        self.commit(events)
    }

    /// Record today's completion. At most once per habit per day, counting
    /// a life-happened check-in as today's entry.
    pub fn mark_habit_complete(&mut self, habit_id: &str) -> bool {
        let events = self
            .state
            .mark_habit_complete(habit_id, self.clock.now(), self.attribution);
        if !events.is_empty() {
            info!(
                habit_id,
                total_show_ups = self.state.user_progress.total_show_ups,
                "habit completed"
            );
        }
        self.commit(events)
    }

    pub fn mark_life_happened(&mut self, habit_id: &str) -> bool {
        let events = self.state.mark_life_happened(habit_id, self.clock.now());
        self.commit(events)
    }

    pub fn clear_celebration(&mut self, habit_id: &str) -> bool {
        let events = self.state.clear_celebration(habit_id, self.clock.now());
        self.commit(events)
    }

    pub fn mark_celebration_shown(&mut self, habit_id: &str) -> bool {
        let events = self.state.mark_celebration_shown(habit_id, self.clock.now());
        self.commit(events)
    }

    pub fn pause_progress(&mut self, days: u32) -> bool {
        let events = self.state.pause_progress(days, self.clock.now());
        info!(days, "progress paused");
        self.commit(events)
    }

    pub fn resume_progress(&mut self) -> bool {
        let events = self.state.resume_progress(self.clock.now());
        self.commit(events)
    }

    pub fn set_whimsy_level(&mut self, level: WhimsyLevel) -> bool {
        let events = self.state.set_whimsy_level(level, self.clock.now());
        self.commit(events)
    }

    /// Re-derive missed-day recovery states from the last active date.
    pub fn refresh_recovery_state(&mut self) -> bool {
        let events = self.state.refresh_recovery_state(self.clock.now());
        self.commit(events)
    }

    // ── Derived reads ───────────────────────────────────────────────

    pub fn todays_check_ins(&self) -> Vec<HabitCheckIn> {
        self.state.check_ins_on(self.clock.today())
    }

    pub fn habit_streak(&self, habit_id: &str) -> u32 {
        self.state.habit_streak(habit_id, self.clock.today())
    }

    pub fn identity_streak(&self, identity_id: &str) -> u32 {
        self.state.identity_streak(identity_id)
    }

    pub fn days_until_recovery(&self) -> i64 {
        self.state.days_until_recovery(self.clock.now())
    }

    /// Random message for the current recovery context and identity.
    pub fn encouraging_message(&mut self) -> EncouragingMessage {
        let context = self.state.message_context();
        let identity_id = self.state.selected_identity.as_ref().map(|i| i.id.as_str());
        pick_encouraging_message(context, identity_id, &mut *self.rng)
    }

    pub fn identity_day_count(&self) -> usize {
        self.state.identity_day_count()
    }

    pub fn should_show_extra_encouragement(&self) -> bool {
        self.state.should_show_extra_encouragement(self.clock.now())
    }

    pub fn random_celebration_message(&mut self) -> &'static str {
        pick_celebration_message(self.state.whimsy_level, &mut *self.rng)
    }

    pub fn next_milestone(&self, habit_id: &str) -> Option<&'static StreakMilestone> {
        next_milestone(self.habit_streak(habit_id))
    }

    pub fn summary(&self) -> ProgressSummary {
        self.state.summary(self.clock.now())
    }

    // ── Read-only views ─────────────────────────────────────────────

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn selected_identity(&self) -> Option<&Identity> {
        self.state.selected_identity.as_ref()
    }

    pub fn habit(&self, habit_id: &str) -> Option<&Habit> {
        self.state.habit(habit_id)
    }

    pub fn habits(&self) -> &[Habit] {
        &self.state.active_habits
    }

    pub fn check_ins(&self) -> &[HabitCheckIn] {
        &self.state.check_ins
    }

    pub fn progress(&self) -> &UserProgress {
        &self.state.user_progress
    }

    pub fn celebration_queue(&self) -> &[String] {
        &self.state.celebration_queue
    }

    pub fn streak_milestones(&self) -> &BTreeMap<String, Vec<u32>> {
        &self.state.streak_milestones
    }

    pub fn whimsy_level(&self) -> WhimsyLevel {
        self.state.whimsy_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap())
    }

    #[test]
    fn listeners_receive_events_until_unsubscribed() {
        let mut store = HabitStore::builder(MemoryStorage::new())
            .clock(clock())
            .seed(Some(1))
            .open();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        let habit = store.create_habit(NewHabit::new("reader", "Read 1 page"));
        store.mark_habit_complete(&habit.id);
        assert_eq!(seen.borrow().len(), 2);
        assert!(matches!(seen.borrow()[1], StoreEvent::HabitCompleted { .. }));
        assert_eq!(seen.borrow()[1].at(), clock().now());

        assert!(store.unsubscribe(id));
        store.mark_life_happened("habit_other");
        assert_eq!(seen.borrow().len(), 2);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn noops_do_not_notify_or_write() {
        let storage = MemoryStorage::new();
        let mut store = HabitStore::builder(storage.clone()).clock(clock()).open();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        store.subscribe(move |_| *sink.borrow_mut() += 1);

        assert!(!store.update_habit("missing", HabitUpdate::default()));
        assert!(!store.deactivate_habit("missing"));
        assert!(!store.clear_celebration("missing"));
        assert_eq!(*count.borrow(), 0);
        assert!(storage.is_empty());
    }

    #[test]
    fn default_whimsy_applies_to_fresh_store_only() {
        let storage = MemoryStorage::new();
        let mut store = HabitStore::builder(storage.clone())
            .default_whimsy(WhimsyLevel::Maximum)
            .open();
        assert_eq!(store.whimsy_level(), WhimsyLevel::Maximum);
        store.set_whimsy_level(WhimsyLevel::Minimal);

        let reopened = HabitStore::builder(storage)
            .default_whimsy(WhimsyLevel::Maximum)
            .open();
        assert_eq!(reopened.whimsy_level(), WhimsyLevel::Minimal);
    }

    #[test]
    fn seeded_stores_pick_the_same_messages() {
        let mut a = HabitStore::builder(MemoryStorage::new()).seed(Some(9)).open();
        let mut b = HabitStore::builder(MemoryStorage::new()).seed(Some(9)).open();
        for _ in 0..5 {
            assert_eq!(a.encouraging_message(), b.encouraging_message());
            assert_eq!(a.random_celebration_message(), b.random_celebration_message());
        }
    }

    #[test]
    fn next_milestone_follows_streak() {
        let clock = clock();
        let mut store = HabitStore::builder(MemoryStorage::new())
            .clock(clock.clone())
            .open();
        let habit = store.create_habit(NewHabit::new("runner", "Put on shoes"));
        assert_eq!(store.next_milestone(&habit.id).map(|m| m.days), Some(3));
        for _ in 0..3 {
            store.mark_habit_complete(&habit.id);
            clock.advance_days(1);
        }
        clock.advance_days(-1);
        assert_eq!(store.habit_streak(&habit.id), 3);
        assert_eq!(store.next_milestone(&habit.id).map(|m| m.days), Some(7));
    }
}
