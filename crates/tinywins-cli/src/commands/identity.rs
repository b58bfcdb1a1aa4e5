//! Identity commands for CLI.

use clap::Subcommand;
use tinywins_core::{find_identity, predefined_identities};

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum IdentityAction {
    /// List predefined identities
    List,
    /// Select the active identity
    Select {
        /// Identity ID (e.g. "reader", "runner")
        id: String,
    },
    /// Show the selected identity and its streak
    Show,
}

pub fn run(action: IdentityAction) -> CmdResult {
    match action {
        IdentityAction::List => print_json(&predefined_identities())?,
        IdentityAction::Select { id } => {
            let identity = find_identity(&id).ok_or_else(|| format!("unknown identity: {id}"))?;
            let mut store = open_store()?;
            store.select_identity(identity);
            store.persist()?;
            print_json(&serde_json::json!({
                "selectedIdentity": store.selected_identity(),
                "identityStreak": store.identity_streak(&id),
            }))?;
        }
        IdentityAction::Show => {
            let store = open_store()?;
            match store.selected_identity() {
                Some(identity) => print_json(&serde_json::json!({
                    "selectedIdentity": identity,
                    "identityStreak": store.identity_streak(&identity.id),
                    "identityDayCount": store.identity_day_count(),
                }))?,
                None => println!("no identity selected"),
            }
        }
    }
    Ok(())
}
