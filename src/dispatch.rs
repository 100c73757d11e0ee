// Hand-off of the reservation message to the external chat channel
// Nothing here talks to the network: a dispatcher only opens the prepared link.

use crate::config::ContactConfig;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Messaging channel unavailable: {0}")]
    Unavailable(String),
}

/// `https://<host>/<contact>?text=<percent-encoded message>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageLink {
    url: String,
}

impl MessageLink {
    pub fn new(contact: &ContactConfig, message: &str) -> Self {
        Self {
            url: format!(
                "https://{}/{}?text={}",
                contact.messaging_host,
                contact.contact_id,
                urlencoding::encode(message)
            ),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    // Message carried by the link, decoded back to plain text
    pub fn text(&self) -> Option<String> {
        let (_, encoded) = self.url.split_once("?text=")?;
        urlencoding::decode(encoded).ok().map(|text| text.into_owned())
    }
}

impl fmt::Display for MessageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

// Opens a prepared link in a new browsing context; no response is awaited
pub trait MessageDispatcher {
    fn open(&self, link: &MessageLink) -> Result<(), DispatchError>;
}

/// Keeps every opened link in memory, for previews and tests.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    opened: Mutex<Vec<MessageLink>>,
    fail_next: AtomicUsize,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    // The next `count` calls to `open` fail without recording anything
    pub fn fail_next(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    pub fn opened(&self) -> Vec<MessageLink> {
        self.opened.lock().clone()
    }

    pub fn last(&self) -> Option<MessageLink> {
        self.opened.lock().last().cloned()
    }
}

impl MessageDispatcher for RecordingDispatcher {
    fn open(&self, link: &MessageLink) -> Result<(), DispatchError> {
        let failing = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(DispatchError::Unavailable("simulated failure".to_string()));
        }

        self.opened.lock().push(link.clone());
        Ok(())
    }
}

// Emits the link through tracing for whatever front end is listening
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDispatcher;

impl MessageDispatcher for LogDispatcher {
    fn open(&self, link: &MessageLink) -> Result<(), DispatchError> {
        tracing::info!(url = %link, "opening reservation message link");
        Ok(())
    }
}
