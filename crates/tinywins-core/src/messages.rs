//! Encouraging and celebratory message catalogs.
//!
//! Selection is uniform over the filtered catalog. The random source is
//! always passed in, so seeded generators give deterministic picks.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Intensity of celebratory feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhimsyLevel {
    Minimal,
    #[default]
    Normal,
    Maximum,
}

impl WhimsyLevel {
    /// Minimum quiet time between extra encouragements.
    pub fn encouragement_cooldown(&self) -> Duration {
        match self {
            WhimsyLevel::Minimal => Duration::minutes(30),
            WhimsyLevel::Normal => Duration::minutes(15),
            WhimsyLevel::Maximum => Duration::minutes(5),
        }
    }

    pub fn celebration_messages(&self) -> &'static [&'static str] {
        match self {
            WhimsyLevel::Minimal => &MINIMAL_CELEBRATIONS,
            WhimsyLevel::Normal => &NORMAL_CELEBRATIONS,
            WhimsyLevel::Maximum => &MAXIMUM_CELEBRATIONS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WhimsyLevel::Minimal => "minimal",
            WhimsyLevel::Normal => "normal",
            WhimsyLevel::Maximum => "maximum",
        }
    }
}

impl fmt::Display for WhimsyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WhimsyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(WhimsyLevel::Minimal),
            "normal" => Ok(WhimsyLevel::Normal),
            "maximum" => Ok(WhimsyLevel::Maximum),
            other => Err(format!(
                "unknown whimsy level '{other}' (expected minimal, normal or maximum)"
            )),
        }
    }
}

const MINIMAL_CELEBRATIONS: [&str; 3] = ["Good job!", "Well done!", "Nice work!"];

const NORMAL_CELEBRATIONS: [&str; 5] = [
    "You're building something amazing! ✨",
    "Look at you go! 🚀",
    "Your consistency is inspiring! 🌟",
    "Another step forward! 💪",
    "You're becoming who you want to be! 🦋",
];

const MAXIMUM_CELEBRATIONS: [&str; 5] = [
    "WOOHOO! You're absolutely crushing it! 🎉🚀✨",
    "Incredible! Your future self is doing a happy dance! 💃🕺",
    "BOOM! That's what I call showing up! 💥⭐🔥",
    "You magnificent habit-building machine! 🤖✨🏆",
    "Plot twist: You're the main character of your own success story! 📚🌟🎭",
];

const FALLBACK_CELEBRATION: &str = "Great job!";

/// Uniformly pick a celebration line for the given whimsy level.
pub fn pick_celebration_message<R: Rng + ?Sized>(level: WhimsyLevel, rng: &mut R) -> &'static str {
    level
        .celebration_messages()
        .choose(rng)
        .copied()
        .unwrap_or(FALLBACK_CELEBRATION)
}

/// When in the day (or journey) a message is meant to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageContext {
    Morning,
    Evening,
    Streak,
    Recovery,
    FirstTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncouragingMessage {
    pub id: String,
    pub text: String,
    pub context: MessageContext,
    /// Restricts the message to one identity when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
}

impl EncouragingMessage {
    fn from_entry(entry: &MessageEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            text: entry.text.to_string(),
            context: entry.context,
            identity_id: entry.identity_id.map(str::to_string),
        }
    }
}

struct MessageEntry {
    id: &'static str,
    text: &'static str,
    context: MessageContext,
    identity_id: Option<&'static str>,
}

const fn entry(id: &'static str, text: &'static str, context: MessageContext) -> MessageEntry {
    MessageEntry {
        id,
        text,
        context,
        identity_id: None,
    }
}

const ENCOURAGING_MESSAGES: [MessageEntry; 10] = [
    entry("1", "You showed up. That's what matters.", MessageContext::Morning),
    entry("2", "Every small action builds who you're becoming.", MessageContext::Morning),
    entry("3", "Progress, not perfection.", MessageContext::Streak),
    entry("4", "You're proving to yourself who you are.", MessageContext::Streak),
    entry("5", "Welcome back. You belong here.", MessageContext::Recovery),
    entry("6", "Today is a new opportunity to show up.", MessageContext::Recovery),
    entry("7", "You did it. You chose to be who you want to become.", MessageContext::Evening),
    entry(
        "8",
        "Each day you show up, you're building evidence of who you are.",
        MessageContext::Evening,
    ),
    entry(
        "9",
        "This is how transformation happens - one small action at a time.",
        MessageContext::FirstTime,
    ),
    entry("10", "You're not just doing, you're becoming.", MessageContext::FirstTime),
];

/// The message returned when nothing matches the filter.
pub fn fallback_message() -> EncouragingMessage {
    EncouragingMessage::from_entry(&ENCOURAGING_MESSAGES[0])
}

/// Pick uniformly among messages for `context` that are unrestricted or
/// restricted to `identity_id`.
pub fn pick_encouraging_message<R: Rng + ?Sized>(
    context: MessageContext,
    identity_id: Option<&str>,
    rng: &mut R,
) -> EncouragingMessage {
    let relevant: Vec<&MessageEntry> = ENCOURAGING_MESSAGES
        .iter()
        .filter(|msg| msg.context == context)
        .filter(|msg| msg.identity_id.is_none() || msg.identity_id == identity_id)
        .collect();

    relevant
        .choose(rng)
        .map(|msg| EncouragingMessage::from_entry(msg))
        .unwrap_or_else(fallback_message)
}
