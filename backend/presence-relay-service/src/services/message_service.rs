use crate::delivery::{DeliveryNotifier, DeliveryOutcome};
use crate::error::AppError;
use crate::models::{Message, NewMessage};
use crate::presence::Identity;
use crate::storage::MessageStore;
use std::sync::Arc;

pub struct MessageService {
    store: Arc<dyn MessageStore>,
    notifier: DeliveryNotifier,
}

impl MessageService {
    pub fn new(store: Arc<dyn MessageStore>, notifier: DeliveryNotifier) -> Self {
        Self { store, notifier }
    }

    /// Validate, persist, then push to the recipient if they are online.
    ///
    /// The push only ever sees the record the store acknowledged. A store
    /// failure is returned to the caller and nothing is pushed.
    pub async fn send_message(
        &self,
        sender: &Identity,
        receiver: &Identity,
        draft: NewMessage,
    ) -> Result<(Message, DeliveryOutcome), AppError> {
        let draft = draft.validate()?;

        let stored = self
            .store
            .persist_message(sender, receiver, draft)
            .await
            .map_err(|e| {
                tracing::error!(
                    sender = %sender,
                    receiver = %receiver,
                    error = %e,
                    "failed to persist message"
                );
                e
            })?;

        let outcome = self.notifier.notify(&stored);
        Ok((stored, outcome))
    }

    pub async fn conversation(
        &self,
        me: &Identity,
        peer: &Identity,
    ) -> Result<Vec<Message>, AppError> {
        self.store.conversation(me, peer).await
    }
}
