pub mod checkin;
pub mod config;
pub mod habit;
pub mod identity;
pub mod message;
pub mod recovery;
pub mod stats;
pub mod whimsy;

use serde::Serialize;
use tinywins_core::{Config, HabitStore};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the configured store and bring its recovery state up to date.
pub fn open_store() -> Result<HabitStore, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing::debug!(backend = ?config.store.backend, "opening habit store");
    let mut store = HabitStore::from_config(&config)?;
    store.refresh_recovery_state();
    Ok(store)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
