use crate::{
    auth::ConnectionAuthenticator,
    config::Config,
    delivery::DeliveryNotifier,
    presence::{ConnectionRegistry, PresenceBroadcaster},
    relay::SignalRelay,
    services::MessageService,
    storage::MessageStore,
};
use std::sync::Arc;

/// Process-wide components, built once at startup and cloned into every
/// worker. There is exactly one registry per process; everything that reads
/// or writes bindings shares it.
#[derive(Clone)]
pub struct AppState {
    pub registry: ConnectionRegistry,
    pub broadcaster: Arc<PresenceBroadcaster>,
    pub relay: SignalRelay,
    pub messages: Arc<MessageService>,
    pub authenticator: Arc<dyn ConnectionAuthenticator>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn MessageStore>,
        authenticator: Arc<dyn ConnectionAuthenticator>,
    ) -> Self {
        let registry = ConnectionRegistry::new();
        let broadcaster = Arc::new(PresenceBroadcaster::new(registry.clone()));
        let relay = SignalRelay::new(registry.clone());
        let notifier = DeliveryNotifier::new(registry.clone());
        let messages = Arc::new(MessageService::new(store, notifier));

        Self {
            registry,
            broadcaster,
            relay,
            messages,
            authenticator,
            config,
        }
    }
}
