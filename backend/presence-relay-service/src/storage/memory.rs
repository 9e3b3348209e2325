use super::MessageStore;
use crate::error::AppError;
use crate::models::{Message, NewMessage};
use crate::presence::Identity;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-local store used when no database is configured, and in tests.
/// Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryMessageStore {
    messages: RwLock<Vec<Message>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn persist_message(
        &self,
        sender: &Identity,
        receiver: &Identity,
        message: NewMessage,
    ) -> Result<Message, AppError> {
        let stored = Message::from_draft(sender.clone(), receiver.clone(), message);
        self.messages.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn conversation(&self, a: &Identity, b: &Identity) -> Result<Vec<Message>, AppError> {
        let guard = self.messages.read().await;
        Ok(guard.iter().filter(|m| m.is_between(a, b)).cloned().collect())
    }
}
