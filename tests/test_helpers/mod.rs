//! Shared clock and service helpers for integration tests.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use deckhand_store::document::{
    adapters::memory::InMemoryDocumentRepository, services::DocumentService,
};
use mockable::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing_subscriber::EnvFilter;

/// Clock that moves forward by one millisecond on every reading, standing
/// in for the wall clock between two operations.
#[derive(Debug, Default)]
pub struct TickingClock {
    ticks: AtomicI64,
}

impl Clock for TickingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(1_760_000_000, 0)
            .single()
            .unwrap_or_default()
            + Duration::milliseconds(tick)
    }
}

/// Service type backed by the in-memory repository.
pub type InMemoryService = DocumentService<InMemoryDocumentRepository, TickingClock>;

/// Builds a service over a fresh in-memory repository, returning the
/// repository handle for raw column access.
pub fn in_memory_service() -> (Arc<InMemoryDocumentRepository>, InMemoryService) {
    init_tracing();
    let repository = Arc::new(InMemoryDocumentRepository::new());
    let service = DocumentService::new(Arc::clone(&repository), Arc::new(TickingClock::default()));
    (repository, service)
}

/// Routes service logs to the test harness. `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
