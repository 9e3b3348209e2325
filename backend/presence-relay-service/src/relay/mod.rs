pub mod signal;

pub use signal::{RelayOutcome, SignalKind, SignalRelay};
