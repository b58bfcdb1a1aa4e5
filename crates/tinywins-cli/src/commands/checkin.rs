//! Daily check-in commands for CLI.

use std::cell::RefCell;
use std::rc::Rc;

use clap::Subcommand;
use tinywins_core::milestones::milestone_at;
use tinywins_core::StoreEvent;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum CheckinAction {
    /// Mark a habit complete for today
    Complete {
        /// Habit ID
        id: String,
    },
    /// Record that life happened today (no streak credit)
    LifeHappened {
        /// Habit ID
        id: String,
    },
    /// Show today's check-ins
    Today,
    /// Show the current streak of a habit
    Streak {
        /// Habit ID
        id: String,
    },
}

pub fn run(action: CheckinAction) -> CmdResult {
    match action {
        CheckinAction::Complete { id } => {
            let mut store = open_store()?;
            if store.habit(&id).is_none() {
                return Err(format!("habit not found: {id}").into());
            }

            let reached = Rc::new(RefCell::new(None));
            let sink = Rc::clone(&reached);
            let listener = store.subscribe(move |event| {
                if let StoreEvent::MilestoneReached { days, .. } = event {
                    *sink.borrow_mut() = Some(*days);
                }
            });
            let recorded = store.mark_habit_complete(&id);
            store.unsubscribe(listener);
            store.persist()?;

            let celebration = if recorded {
                let message = store.random_celebration_message();
                store.mark_celebration_shown(&id);
                Some(message)
            } else {
                None
            };
            let milestone = (*reached.borrow()).and_then(milestone_at);

            print_json(&serde_json::json!({
                "recorded": recorded,
                "habitId": id,
                "streak": store.habit_streak(&id),
                "totalShowUps": store.progress().total_show_ups,
                "celebration": celebration,
                "milestone": milestone,
                "nextMilestone": store.next_milestone(&id),
            }))?;
        }
        CheckinAction::LifeHappened { id } => {
            let mut store = open_store()?;
            if store.habit(&id).is_none() {
                return Err(format!("habit not found: {id}").into());
            }
            let recorded = store.mark_life_happened(&id);
            store.persist()?;
            print_json(&serde_json::json!({
                "recorded": recorded,
                "habitId": id,
            }))?;
        }
        CheckinAction::Today => {
            let store = open_store()?;
            print_json(&store.todays_check_ins())?;
        }
        CheckinAction::Streak { id } => {
            let store = open_store()?;
            if store.habit(&id).is_none() {
                return Err(format!("habit not found: {id}").into());
            }
            print_json(&serde_json::json!({
                "habitId": id,
                "streak": store.habit_streak(&id),
                "nextMilestone": store.next_milestone(&id),
            }))?;
        }
    }
    Ok(())
}
