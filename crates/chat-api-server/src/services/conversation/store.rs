use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::models::chat::Conversation;

/// Thread-safe in-memory conversation table.
///
/// Uses DashMap for lock-free concurrent access across distinct ids; a
/// per-id async mutex serializes turns against the same conversation.
/// The table is unbounded and has no expiry.
#[derive(Clone, Default)]
pub struct ConversationStore {
    storage: Arc<DashMap<Uuid, Conversation>>,
    turn_locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<Conversation> {
        self.storage.get(&id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.storage.contains_key(&id)
    }

    pub fn insert(&self, conversation: Conversation) {
        debug!("Stored conversation {}", conversation.id);
        self.storage.insert(conversation.id, conversation);
    }

    pub fn remove(&self, id: Uuid) -> Option<Conversation> {
        self.turn_locks.remove(&id);
        self.storage.remove(&id).map(|(_, conversation)| conversation)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Exclusive section for one conversation id. Distinct ids get distinct
    /// locks and proceed fully concurrently.
    pub fn turn_lock(&self, id: Uuid) -> Arc<Mutex<()>> {
        self.turn_locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
