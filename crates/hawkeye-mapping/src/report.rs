//! Status reporting.
//!
//! The engine never prints.  Every pose update, synchronization and
//! smoothing pass is handed to a [`MapReporter`] as a [`MapEvent`]; the
//! default [`TracingReporter`] forwards events to `tracing`, and
//! [`RecordingReporter`] keeps them in memory for inspection.

use hawkeye_types::{MapEvent, MapEventPayload};
use std::sync::Mutex;
use tracing::info;

/// Sink for engine status events.
pub trait MapReporter: Send + Sync {
    fn report(&self, event: MapEvent);
}

// ────────────────────────────────────────────────────────────────────────────
// TracingReporter
// ────────────────────────────────────────────────────────────────────────────

/// Logs every event at `INFO` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl MapReporter for TracingReporter {
    fn report(&self, event: MapEvent) {
        match &event.payload {
            MapEventPayload::LocationUpdated { pose, local_frame } => info!(
                source = %event.source,
                pose = %pose,
                local_frame = %local_frame,
                "location updated"
            ),
            MapEventPayload::Synchronized { cells_written } => info!(
                source = %event.source,
                cells_written,
                "local map synchronized to global"
            ),
            MapEventPayload::Smoothed { local_frame } => info!(
                source = %event.source,
                local_frame = %local_frame,
                "local map smoothed"
            ),
            MapEventPayload::Status(message) => info!(source = %event.source, "{message}"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RecordingReporter
// ────────────────────────────────────────────────────────────────────────────

/// Buffers events in memory.  Useful for tests and for front-ends that show
/// an event history.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<MapEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every event recorded so far, oldest first.
    pub fn events(&self) -> Vec<MapEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Remove and return every recorded event.
    pub fn drain(&self) -> Vec<MapEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl MapReporter for RecordingReporter {
    fn report(&self, event: MapEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

/// Reporting through a shared handle, so a caller can keep an `Arc` to the
/// reporter it gave the engine.
impl<R: MapReporter + ?Sized> MapReporter for std::sync::Arc<R> {
    fn report(&self, event: MapEvent) {
        (**self).report(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hawkeye_types::FrameId;
    use std::sync::Arc;

    #[test]
    fn recording_reporter_keeps_order() {
        let r = RecordingReporter::new();
        r.report(MapEvent::new("test", MapEventPayload::Status("one".into())));
        r.report(MapEvent::new("test", MapEventPayload::Synchronized { cells_written: 3 }));
        let events = r.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].payload, MapEventPayload::Status("one".into()));
    }

    #[test]
    fn drain_empties_the_buffer() {
        let r = RecordingReporter::new();
        r.report(MapEvent::new("test", MapEventPayload::Status("x".into())));
        assert_eq!(r.drain().len(), 1);
        assert!(r.events().is_empty());
    }

    #[test]
    fn arc_forwards_to_inner() {
        let inner = Arc::new(RecordingReporter::new());
        let shared: Box<dyn MapReporter> = Box::new(Arc::clone(&inner));
        shared.report(MapEvent::new(
            "test",
            MapEventPayload::Smoothed {
                local_frame: FrameId::new(),
            },
        ));
        assert_eq!(inner.events().len(), 1);
    }

    #[test]
    fn tracing_reporter_accepts_every_payload() {
        let r = TracingReporter;
        r.report(MapEvent::new("test", MapEventPayload::Status("hello".into())));
        r.report(MapEvent::new("test", MapEventPayload::Synchronized { cells_written: 0 }));
    }
}
