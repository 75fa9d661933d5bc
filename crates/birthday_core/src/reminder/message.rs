//! User-facing reminder text.

use super::ReminderEvent;
use serde::{Deserialize, Serialize};

/// Title shown by desktop-style notifiers.
pub const APP_TITLE: &str = "🎂 Birthday Matters";

/// Display language for reminder messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    /// Parses a config/CLI language code.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zh" => Some(Self::Zh),
            "en" => Some(Self::En),
            _ => None,
        }
    }
}

/// One star per priority level.
pub fn priority_stars(priority: u8) -> String {
    "⭐".repeat(usize::from(priority))
}

/// Renders the message a notifier shows for `event`.
pub fn render_message(event: &ReminderEvent, language: Language) -> String {
    let stars = priority_stars(event.priority);
    match (language, event.days_left) {
        (Language::Zh, 0) => format!("🎉 今天是 {} 的生日！ {stars}", event.name),
        (Language::Zh, days) => format!("🎈 {} 的生日还有 {days} 天 {stars}", event.name),
        (Language::En, 0) => format!("🎉 Today is {}'s birthday! {stars}", event.name),
        (Language::En, 1) => format!("🎈 {}'s birthday is tomorrow {stars}", event.name),
        (Language::En, days) => {
            format!("🎈 {}'s birthday is in {days} days {stars}", event.name)
        }
    }
}
