//! Predefined identity catalog.
//!
//! Identities are the self-concepts habits are anchored to ("Reader",
//! "Runner"). They are static: users select one but never create or edit
//! them.

use serde::{Deserialize, Serialize};

/// A user-selectable identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub emoji: String,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        emoji: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            emoji: emoji.into(),
        }
    }
}

/// (id, name, description, emoji)
const PREDEFINED: [(&str, &str, &str, &str); 10] = [
    ("reader", "Reader", "Someone who reads daily", "📚"),
    ("writer", "Writer", "Someone who writes consistently", "✍️"),
    ("runner", "Runner", "Someone who moves their body", "🏃"),
    ("artist", "Artist", "Someone who creates art", "🎨"),
    ("learner", "Learner", "Someone who studies new things", "🧠"),
    ("meditator", "Meditator", "Someone who practices mindfulness", "🧘"),
    ("musician", "Musician", "Someone who practices music", "🎵"),
    ("gardener", "Gardener", "Someone who tends to growing things", "🌱"),
    ("cook", "Cook", "Someone who prepares nourishing meals", "👨‍🍳"),
    ("organizer", "Organizer", "Someone who creates order and clarity", "📋"),
];

/// All predefined identities, in display order.
pub fn predefined_identities() -> Vec<Identity> {
    PREDEFINED
        .iter()
        .map(|(id, name, description, emoji)| Identity::new(*id, *name, *description, *emoji))
        .collect()
}

/// Look up a predefined identity by id.
pub fn find_identity(id: &str) -> Option<Identity> {
    PREDEFINED
        .iter()
        .find(|(entry_id, ..)| *entry_id == id)
        .map(|(id, name, description, emoji)| Identity::new(*id, *name, *description, *emoji))
}
