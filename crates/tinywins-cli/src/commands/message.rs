use clap::Subcommand;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum MessageAction {
    /// Pick an encouraging message for the current situation
    Encourage,
    /// Pick a celebration message for the current whimsy level
    Celebrate,
}

pub fn run(action: MessageAction) -> CmdResult {
    let mut store = open_store()?;
    match action {
        MessageAction::Encourage => print_json(&store.encouraging_message()),
        MessageAction::Celebrate => {
            let message = store.random_celebration_message();
            print_json(&serde_json::json!({
                "whimsyLevel": store.whimsy_level(),
                "message": message,
            }))
        }
    }
}
