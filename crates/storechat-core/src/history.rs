use crate::error::StoreError;
use crate::message::{Message, Sender};
use crate::store::KeyValueStore;

/// Ordered conversation history mirrored into a key-value store.
///
/// Every mutation rewrites (or removes) the single stored blob before
/// returning, so the in-memory sequence and the stored one stay equal.
/// Persistence is best effort: a failing store is logged and the in-memory
/// change still stands.
pub struct History<S> {
    messages: Vec<Message>,
    store: S,
    key: String,
}

impl<S: KeyValueStore> History<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            store,
            key: key.into(),
        }
    }

    /// Replace the in-memory history with what the store holds.
    ///
    /// Returns `true` when stored history was found and parsed. Missing or
    /// malformed data leaves the history empty.
    pub fn load(&mut self) -> bool {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("No stored history under '{}'", self.key);
                return false;
            }
            Err(e) => {
                log::warn!("Failed to read stored history: {}", e);
                return false;
            }
        };

        match parse_history(&raw) {
            Some(messages) => {
                log::info!("Loaded {} messages from '{}'", messages.len(), self.key);
                self.messages = messages;
                true
            }
            None => {
                log::warn!("Ignoring malformed history stored under '{}'", self.key);
                self.messages.clear();
                false
            }
        }
    }

    /// Add a message at the end and persist the whole sequence
    pub fn append(&mut self, text: impl Into<String>, sender: Sender) -> &Message {
        self.messages.push(Message::new(text, sender));
        self.persist();
        &self.messages[self.messages.len() - 1]
    }

    /// Empty the history and remove the stored blob.
    ///
    /// Returns the removed messages, or `None` if there was nothing to clear.
    pub fn clear(&mut self) -> Option<Vec<Message>> {
        if self.messages.is_empty() {
            return None;
        }

        let removed = std::mem::take(&mut self.messages);
        if let Err(e) = self.store.remove(&self.key) {
            log::warn!("Failed to remove stored history: {}", e);
        }
        Some(removed)
    }

    /// Replace the history with `snapshot` and persist it
    pub fn restore(&mut self, snapshot: Vec<Message>) {
        self.messages = snapshot;
        self.persist();
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        if let Err(e) = self.try_persist() {
            log::warn!(
                "History not persisted ({} messages kept in memory): {}",
                self.messages.len(),
                e
            );
        }
    }

    fn try_persist(&mut self) -> Result<(), StoreError> {
        let json = serialize_history(&self.messages)?;
        self.store.set(&self.key, &json)?;
        log::debug!("Persisted {} messages under '{}'", self.messages.len(), self.key);
        Ok(())
    }
}

/// Serialize messages into the stored JSON form
pub fn serialize_history(messages: &[Message]) -> Result<String, StoreError> {
    Ok(serde_json::to_string(messages)?)
}

/// Parse the stored JSON form, `None` if it is not a valid message list
pub fn parse_history(raw: &str) -> Option<Vec<Message>> {
    serde_json::from_str(raw).ok()
}
