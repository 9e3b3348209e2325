//! Durable message storage. The relay only depends on the trait; the backing
//! store is chosen at startup.

use crate::error::AppError;
use crate::models::{Message, NewMessage};
use crate::presence::Identity;
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryMessageStore;
pub use postgres::PostgresMessageStore;

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Durably write a validated message. The returned record is what gets
    /// pushed to the recipient, so it must only be returned once the write is
    /// acknowledged.
    async fn persist_message(
        &self,
        sender: &Identity,
        receiver: &Identity,
        message: NewMessage,
    ) -> Result<Message, AppError>;

    /// Messages exchanged between `a` and `b` in either direction, oldest first.
    async fn conversation(&self, a: &Identity, b: &Identity) -> Result<Vec<Message>, AppError>;
}
