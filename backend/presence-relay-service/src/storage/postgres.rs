use super::MessageStore;
use crate::error::AppError;
use crate::models::{Document, Message, NewMessage};
use crate::presence::Identity;
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::types::Json;
use tokio_postgres::Row;

const SCHEMA: &str = include_str!("../../migrations/0001_create_messages.sql");

pub struct PostgresMessageStore {
    pool: Pool,
}

impl PostgresMessageStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create the `messages` table and its index if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        let client = self.pool.get().await?;
        client
            .batch_execute(SCHEMA)
            .await
            .map_err(|e| AppError::Database(format!("apply schema: {e}")))?;
        tracing::info!("messages schema ready");
        Ok(())
    }
}

fn message_from_row(row: &Row) -> Result<Message, AppError> {
    let column = |e: tokio_postgres::Error| AppError::Database(format!("decode message row: {e}"));

    let sender_id: String = row.try_get("sender_id").map_err(column)?;
    let receiver_id: String = row.try_get("receiver_id").map_err(column)?;
    let document: Option<Json<Document>> = row.try_get("document").map_err(column)?;

    Ok(Message {
        id: row.try_get("id").map_err(column)?,
        sender_id: Identity::new(sender_id),
        receiver_id: Identity::new(receiver_id),
        text: row.try_get("text").map_err(column)?,
        image: row.try_get("image").map_err(column)?,
        document: document.map(|Json(doc)| doc),
        created_at: row.try_get("created_at").map_err(column)?,
        updated_at: row.try_get("updated_at").map_err(column)?,
    })
}

#[async_trait]
impl MessageStore for PostgresMessageStore {
    async fn persist_message(
        &self,
        sender: &Identity,
        receiver: &Identity,
        message: NewMessage,
    ) -> Result<Message, AppError> {
        let stored = Message::from_draft(sender.clone(), receiver.clone(), message);
        let client = self.pool.get().await?;

        client
            .execute(
                r#"
                INSERT INTO messages (id, sender_id, receiver_id, text, image, document, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
                &[
                    &stored.id,
                    &stored.sender_id.as_str(),
                    &stored.receiver_id.as_str(),
                    &stored.text,
                    &stored.image,
                    &stored.document.as_ref().map(Json),
                    &stored.created_at,
                    &stored.updated_at,
                ],
            )
            .await
            .map_err(|e| AppError::Database(format!("insert message: {e}")))?;

        Ok(stored)
    }

    async fn conversation(&self, a: &Identity, b: &Identity) -> Result<Vec<Message>, AppError> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                r#"
                SELECT id, sender_id, receiver_id, text, image, document, created_at, updated_at
                FROM messages
                WHERE (sender_id = $1 AND receiver_id = $2)
                   OR (sender_id = $2 AND receiver_id = $1)
                ORDER BY created_at ASC, id ASC
                "#,
                &[&a.as_str(), &b.as_str()],
            )
            .await
            .map_err(|e| AppError::Database(format!("load conversation: {e}")))?;

        rows.iter().map(message_from_row).collect()
    }
}
