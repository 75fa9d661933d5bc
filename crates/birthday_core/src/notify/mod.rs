//! Reminder delivery collaborators.
//!
//! # Responsibility
//! - Define the `Notifier` seam the reminder job hands events to.
//! - Provide a log-backed notifier and a fan-out combinator.
//!
//! # Invariants
//! - Delivery is fire-and-forget from the core's perspective: callers log
//!   `DeliveryError` and move on.

use crate::logging::sanitize_message;
use crate::reminder::message::{render_message, Language};
use crate::reminder::ReminderEvent;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

const MAX_LOGGED_MESSAGE_CHARS: usize = 160;

/// Failure reported by a notifier backend.
#[derive(Debug)]
pub enum DeliveryError {
    /// Backend cannot be reached (no display, channel closed, ...).
    Unavailable(String),
    /// Writing to the output failed.
    Io(std::io::Error),
    /// Some channels of a fan-out failed; successful ones are not retried.
    Partial(Vec<DeliveryError>),
}

impl Display for DeliveryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "notifier unavailable: {reason}"),
            Self::Io(err) => write!(f, "notifier i/o failed: {err}"),
            Self::Partial(errors) => {
                write!(f, "{} notifier channel(s) failed", errors.len())?;
                for err in errors {
                    write!(f, "; {err}")?;
                }
                Ok(())
            }
        }
    }
}

impl Error for DeliveryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Unavailable(_) | Self::Partial(_) => None,
        }
    }
}

impl From<std::io::Error> for DeliveryError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Delivers one reminder to the user.
pub trait Notifier: Send + Sync {
    fn deliver(&self, event: &ReminderEvent) -> Result<(), DeliveryError>;
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn deliver(&self, event: &ReminderEvent) -> Result<(), DeliveryError> {
        (**self).deliver(event)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn deliver(&self, event: &ReminderEvent) -> Result<(), DeliveryError> {
        (**self).deliver(event)
    }
}

/// Writes rendered reminders into the application log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier {
    language: Language,
}

impl LogNotifier {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

impl Notifier for LogNotifier {
    fn deliver(&self, event: &ReminderEvent) -> Result<(), DeliveryError> {
        let message = render_message(event, self.language);
        info!(
            "event=reminder_delivered module=notify status=ok channel=log days_left={} priority={} message={}",
            event.days_left,
            event.priority,
            sanitize_message(&message, MAX_LOGGED_MESSAGE_CHARS)
        );
        Ok(())
    }
}

/// Delivers each event to every channel, like a pop-up plus a sound.
///
/// A failing channel does not stop the others.
#[derive(Default)]
pub struct FanoutNotifier {
    channels: Vec<Box<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, channel: impl Notifier + 'static) -> Self {
        self.channels.push(Box::new(channel));
        self
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl Notifier for FanoutNotifier {
    fn deliver(&self, event: &ReminderEvent) -> Result<(), DeliveryError> {
        let errors = self
            .channels
            .iter()
            .filter_map(|channel| channel.deliver(event).err())
            .collect::<Vec<_>>();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DeliveryError::Partial(errors))
        }
    }
}
