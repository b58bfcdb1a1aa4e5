//! Habit management commands for CLI.

use clap::Subcommand;
use tinywins_core::{find_identity, HabitUpdate, NewHabit};

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Create {
        /// Identity the habit reinforces
        #[arg(long)]
        identity: String,
        /// Scaled-down habit title (e.g. "Read 1 page")
        #[arg(long)]
        title: String,
        /// The ambitious version the habit was scaled down from
        #[arg(long)]
        original_title: Option<String>,
        /// Implementation intention ("After I ..., I will ...")
        #[arg(long)]
        intention: Option<String>,
        /// Smallest possible version of the habit
        #[arg(long)]
        minimum: Option<String>,
    },
    /// List habits
    List {
        /// Include deactivated habits
        #[arg(long)]
        all: bool,
    },
    /// Update habit fields
    Update {
        /// Habit ID
        id: String,
        #[arg(long)]
        identity: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        original_title: Option<String>,
        #[arg(long)]
        intention: Option<String>,
        #[arg(long)]
        minimum: Option<String>,
    },
    /// Deactivate a habit (its history is kept)
    Deactivate {
        /// Habit ID
        id: String,
    },
}

pub fn run(action: HabitAction) -> CmdResult {
    match action {
        HabitAction::Create {
            identity,
            title,
            original_title,
            intention,
            minimum,
        } => {
            if find_identity(&identity).is_none() {
                return Err(format!("unknown identity: {identity}").into());
            }
            let mut data = NewHabit::new(identity, title);
            if let Some(original) = original_title {
                data = data.with_original_title(original);
            }
            if let Some(intention) = intention {
                data = data.with_intention(intention);
            }
            if let Some(minimum) = minimum {
                data = data.with_minimum_action(minimum);
            }

            let mut store = open_store()?;
            let habit = store.create_habit(data);
            store.persist()?;
            print_json(&habit)?;
        }
        HabitAction::List { all } => {
            let store = open_store()?;
            let habits: Vec<_> = store
                .habits()
                .iter()
                .filter(|h| all || h.is_active)
                .collect();
            print_json(&habits)?;
        }
        HabitAction::Update {
            id,
            identity,
            title,
            original_title,
            intention,
            minimum,
        } => {
            if let Some(identity) = identity.as_deref() {
                if find_identity(identity).is_none() {
                    return Err(format!("unknown identity: {identity}").into());
                }
            }
            let updates = HabitUpdate {
                identity_id: identity,
                title,
                original_title,
                implementation_intention: intention,
                minimum_action: minimum,
                is_active: None,
            };
            if updates.is_empty() {
                return Err("nothing to update".into());
            }

            let mut store = open_store()?;
            if !store.update_habit(&id, updates) {
                return Err(format!("habit not found: {id}").into());
            }
            store.persist()?;
            print_json(&store.habit(&id))?;
        }
        HabitAction::Deactivate { id } => {
            let mut store = open_store()?;
            if store.habit(&id).is_none() {
                return Err(format!("habit not found: {id}").into());
            }
            store.deactivate_habit(&id);
            store.persist()?;
            println!("Habit deactivated: {id}");
        }
    }
    Ok(())
}
