//! Terminal notifier: prints reminders to stdout, optionally ringing the bell.

use birthday_core::reminder::message::{render_message, Language, APP_TITLE};
use birthday_core::{DeliveryError, Notifier, ReminderEvent};
use std::io::Write;

const BELL: char = '\u{7}';

/// Prints each reminder as one line on stdout.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    language: Language,
    bell: bool,
}

impl ConsoleNotifier {
    pub fn new(language: Language, bell: bool) -> Self {
        Self { language, bell }
    }
}

impl Notifier for ConsoleNotifier {
    fn deliver(&self, event: &ReminderEvent) -> Result<(), DeliveryError> {
        let mut out = std::io::stdout().lock();
        out.write_all(render_line(event, self.language, self.bell).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

fn render_line(event: &ReminderEvent, language: Language, bell: bool) -> String {
    let mut line = format!("{APP_TITLE}: {}", render_message(event, language));
    if bell {
        line.push(BELL);
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::{render_line, BELL};
    use birthday_core::{Language, ReminderEvent};
    use chrono::NaiveDate;

    #[test]
    fn line_carries_title_message_and_optional_bell() {
        let event = ReminderEvent {
            name: "Ana".to_string(),
            days_left: 0,
            priority: 1,
            occurrence: NaiveDate::from_ymd_opt(2025, 2, 28).expect("valid date"),
        };

        let quiet = render_line(&event, Language::En, false);
        assert!(quiet.starts_with("🎂 Birthday Matters: "));
        assert!(quiet.contains("Today is Ana's birthday!"));
        assert!(!quiet.contains(BELL));
        assert!(quiet.ends_with('\n'));

        let loud = render_line(&event, Language::En, true);
        assert!(loud.contains(BELL));
    }
}
