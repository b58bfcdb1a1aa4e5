use clap::Subcommand;
use tinywins_core::WhimsyLevel;

use super::{open_store, CmdResult};

#[derive(Subcommand)]
pub enum WhimsyAction {
    /// Show the current whimsy level
    Get,
    /// Set the whimsy level (minimal, normal, maximum)
    Set {
        level: String,
    },
}

pub fn run(action: WhimsyAction) -> CmdResult {
    match action {
        WhimsyAction::Get => {
            let store = open_store()?;
            println!("{}", store.whimsy_level());
        }
        WhimsyAction::Set { level } => {
            let level: WhimsyLevel = level.parse()?;
            let mut store = open_store()?;
            store.set_whimsy_level(level);
            store.persist()?;
            println!("Whimsy level set to {level}");
        }
    }
    Ok(())
}
