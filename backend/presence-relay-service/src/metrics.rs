use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, TextEncoder};

static LIVE_CONNECTIONS: Lazy<IntGauge> = Lazy::new(|| {
    let gauge = IntGauge::new(
        "presence_relay_live_connections",
        "WebSocket connections currently open",
    )
    .expect("failed to create presence_relay_live_connections");
    prometheus::default_registry()
        .register(Box::new(gauge.clone()))
        .expect("failed to register presence_relay_live_connections");
    gauge
});

static BOUND_IDENTITIES: Lazy<IntGauge> = Lazy::new(|| {
    let gauge = IntGauge::new(
        "presence_relay_bound_identities",
        "Identities with an active binding",
    )
    .expect("failed to create presence_relay_bound_identities");
    prometheus::default_registry()
        .register(Box::new(gauge.clone()))
        .expect("failed to register presence_relay_bound_identities");
    gauge
});

static PRESENCE_BROADCASTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::new(
        "presence_relay_presence_broadcasts_total",
        "Presence snapshots fanned out to live connections",
    )
    .expect("failed to create presence_relay_presence_broadcasts_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register presence_relay_presence_broadcasts_total");
    counter
});

static SIGNALS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "presence_relay_signals_total",
            "Call negotiation signals handled by the relay",
        ),
        &["kind", "outcome"],
    )
    .expect("failed to create presence_relay_signals_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register presence_relay_signals_total");
    counter
});

static MESSAGE_PUSHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "presence_relay_message_pushes_total",
            "Real-time pushes of persisted content messages",
        ),
        &["outcome"],
    )
    .expect("failed to create presence_relay_message_pushes_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register presence_relay_message_pushes_total");
    counter
});

pub fn set_live_connections(count: usize) {
    LIVE_CONNECTIONS.set(count as i64);
}

pub fn set_bound_identities(count: usize) {
    BOUND_IDENTITIES.set(count as i64);
}

pub fn record_presence_broadcast() {
    PRESENCE_BROADCASTS_TOTAL.inc();
}

pub fn record_signal(kind: &str, outcome: &str) {
    SIGNALS_TOTAL.with_label_values(&[kind, outcome]).inc();
}

pub fn record_message_push(outcome: &str) {
    MESSAGE_PUSHES_TOTAL.with_label_values(&[outcome]).inc();
}

/// Render every registered metric in the Prometheus text format.
pub fn render() -> Result<String, crate::error::AppError> {
    // Touch the lazies so series appear before first use.
    Lazy::force(&LIVE_CONNECTIONS);
    Lazy::force(&BOUND_IDENTITIES);
    Lazy::force(&PRESENCE_BROADCASTS_TOTAL);
    Lazy::force(&SIGNALS_TOTAL);
    Lazy::force(&MESSAGE_PUSHES_TOTAL);

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| crate::error::AppError::Internal(format!("encode metrics: {e}")))?;
    String::from_utf8(buffer)
        .map_err(|e| crate::error::AppError::Internal(format!("metrics not utf-8: {e}")))
}
