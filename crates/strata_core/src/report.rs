//! Human-readable message log
//!
//! Tooling that drives a document wants failure detail beyond an error
//! value: which id was undeclared, which file failed to parse. A
//! `MessageLog` collects those messages. It is an explicit service the
//! caller owns and shares where needed, not process-global state, and the
//! caller decides when to clear it.

use std::sync::Mutex;

/// Append-only list of human-readable messages.
///
/// Interior mutability lets a shared handle record from wherever it is
/// attached. Entries persist until `clear` is called.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Mutex<Vec<String>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message
    pub fn push(&self, msg: impl Into<String>) {
        self.lock().push(msg.into());
    }

    /// Number of messages recorded since the last clear
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of all messages, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// All messages joined with newlines, oldest first
    pub fn join(&self) -> String {
        self.lock().join("\n")
    }

    /// Drop every recorded message
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // A poisoned lock only means another holder panicked mid-push;
        // the message list itself is still usable.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
