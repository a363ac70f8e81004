//! Language-change notifications.
//!
//! A typed broadcast channel: components subscribe at initialization and
//! unsubscribe by dropping their receiver.

use tokio::sync::broadcast;
use tracing::debug;

use crate::i18n::LanguageCode;

/// Buffered notifications per subscriber before the oldest are dropped.
const CHANNEL_CAPACITY: usize = 16;

/// Emitted after every completed language switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageChanged {
    pub language: LanguageCode,
}

/// Sender side of the language-change channel.
#[derive(Debug, Clone)]
pub struct LanguageEvents {
    sender: broadcast::Sender<LanguageChanged>,
}

impl LanguageEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to future notifications. Drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> broadcast::Receiver<LanguageChanged> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Broadcast a change. Having no subscribers is not an error.
    pub fn emit(&self, language: &LanguageCode) {
        let event = LanguageChanged {
            language: language.clone(),
        };
        match self.sender.send(event) {
            Ok(n) => debug!("languageChanged({}) delivered to {} subscriber(s)", language, n),
            Err(_) => debug!("languageChanged({}) had no subscribers", language),
        }
    }
}

impl Default for LanguageEvents {
    fn default() -> Self {
        Self::new()
    }
}
