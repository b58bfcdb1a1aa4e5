//! Progress statistics commands for CLI.

use clap::Subcommand;
use tinywins_core::predefined_identities;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Overall progress summary
    Summary,
    /// Identity streaks (all identities, or one)
    Identity {
        /// Identity ID
        id: Option<String>,
    },
}

pub fn run(action: StatsAction) -> CmdResult {
    let store = open_store()?;
    match action {
        StatsAction::Summary => print_json(&store.summary()),
        StatsAction::Identity { id: Some(id) } => print_json(&serde_json::json!({
            "identityId": id,
            "streak": store.identity_streak(&id),
        })),
        StatsAction::Identity { id: None } => {
            let streaks: Vec<_> = predefined_identities()
                .into_iter()
                .map(|identity| {
                    serde_json::json!({
                        "identityId": identity.id,
                        "emoji": identity.emoji,
                        "streak": store.identity_streak(&identity.id),
                    })
                })
                .collect();
            print_json(&streaks)
        }
    }
}
