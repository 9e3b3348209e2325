use crate::error::AppError;
use crate::presence::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attached document reference. The file itself lives with the asset service;
/// only its URL and metadata travel with the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Persisted content message, matching the `messages` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Identity,
    pub receiver_id: Identity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Image URL issued by the asset service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Stamp a validated draft with an id and timestamps.
    pub fn from_draft(sender_id: Identity, receiver_id: Identity, draft: NewMessage) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            text: draft.text,
            image: draft.image,
            document: draft.document,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when this message travelled between `a` and `b`, either direction.
    pub fn is_between(&self, a: &Identity, b: &Identity) -> bool {
        (&self.sender_id == a && &self.receiver_id == b)
            || (&self.sender_id == b && &self.receiver_id == a)
    }
}

/// Message content submitted by a sender, before persistence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub document: Option<Document>,
}

impl NewMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Normalize blank fields away and reject drafts that carry nothing.
    ///
    /// Inline `data:` images are refused: uploads go through the asset
    /// service and only the resulting URL is stored here.
    pub fn validate(self) -> Result<Self, AppError> {
        let text = self.text.filter(|t| !t.trim().is_empty());
        let image = self.image.filter(|i| !i.trim().is_empty());
        let document = self.document.filter(|d| !d.url.trim().is_empty());

        if let Some(image) = &image {
            if image.starts_with("data:") {
                return Err(AppError::BadRequest(
                    "inline image data is not accepted; upload the image and send its URL".into(),
                ));
            }
        }

        if text.is_none() && image.is_none() && document.is_none() {
            return Err(AppError::EmptyMessage);
        }

        Ok(Self {
            text,
            image,
            document,
        })
    }
}
