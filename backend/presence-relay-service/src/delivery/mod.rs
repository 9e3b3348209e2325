pub mod notifier;

pub use notifier::{DeliveryNotifier, DeliveryOutcome};
