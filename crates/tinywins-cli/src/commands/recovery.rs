use clap::Subcommand;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Pause progress for a number of days
    Pause {
        /// Days to pause (1 to 3650)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=3650))]
        days: u32,
    },
    /// Resume progress immediately
    Resume,
    /// Show recovery state
    Status,
}

pub fn run(action: RecoveryAction) -> CmdResult {
    let mut store = open_store()?;
    match action {
        RecoveryAction::Pause { days } => {
            store.pause_progress(days);
            store.persist()?;
        }
        RecoveryAction::Resume => {
            store.resume_progress();
            store.persist()?;
        }
        RecoveryAction::Status => {}
    }

    let progress = store.progress();
    print_json(&serde_json::json!({
        "recoveryState": progress.recovery_state,
        "pausedUntil": progress.paused_until,
        "daysUntilRecovery": store.days_until_recovery(),
        "lastActiveDate": progress.last_active_date,
    }))
}
