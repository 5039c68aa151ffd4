//! JSON Lines output: one object per event.

use crate::core::controller::DetectionEvent;
use crate::report::Reporter;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};
use tracing::warn;
use uuid::Uuid;

/// Event wrapped with the run it belongs to and when it was emitted.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    run_id: Uuid,
    emitted_at: DateTime<Utc>,
    #[serde(flatten)]
    event: &'a DetectionEvent,
}

/// Writes each event as a single JSON line.
pub struct JsonLinesReporter<W: Write> {
    out: W,
    run_id: Uuid,
}

impl JsonLinesReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            run_id: Uuid::new_v4(),
        }
    }

    /// Identifier stamped on every line of this run.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_event(&mut self, event: &DetectionEvent) -> io::Result<()> {
        let envelope = Envelope {
            run_id: self.run_id,
            emitted_at: Utc::now(),
            event,
        };
        serde_json::to_writer(&mut self.out, &envelope)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> Reporter for JsonLinesReporter<W> {
    fn report(&mut self, event: &DetectionEvent) {
        if let Err(e) = self.write_event(event) {
            warn!(error = %e, "json reporter write failed");
        }
    }
}
