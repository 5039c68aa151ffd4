//! cursor-verify - tell human pointer movement from synthetic movement.
//!
//! This library samples a short trajectory of cursor positions and checks
//! whether the path contains a sharp directional change. Attempts repeat
//! until a human-like trajectory is observed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       cursor-verify                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │  Position   │──▶│   Sampler   │──▶│ Classifier  │       │
//! │  │   Source    │   │ (5 @ 50ms)  │   │ (angle<45°) │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │                           ▲                 │               │
//! │                           │   bot-like      ▼               │
//! │                    ┌──────┴──────────────────────┐          │
//! │                    │       Retry Controller      │──▶ Reporter
//! │                    └─────────────────────────────┘          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cursor_verify::{collector, core, report};
//!
//! let source = collector::SystemSource::new();
//! let clock = core::SystemClock::new();
//! let mut controller =
//!     core::RetryController::new(source, clock, core::DetectionSettings::default());
//!
//! let mut reporter = report::ConsoleReporter::stdout();
//! let outcome = controller.run(&mut reporter).expect("detection failed");
//! assert!(outcome.is_human());
//! ```

pub mod collector;
pub mod config;
pub mod core;
pub mod report;
pub mod transparency;

// Re-export key types at crate root for convenience
pub use crate::collector::{
    PointerPosition, PositionSource, ReadError, ReplaySource, SystemSource,
};
pub use crate::config::{Config, ConfigError};
pub use crate::core::{
    capture, classify, AttemptResult, CancellationToken, Classifier, Clock, DetectionError,
    DetectionEvent, DetectionOutcome, DetectionSettings, RetryController, Sample, SystemClock,
    Verdict,
};
pub use crate::report::{ChannelReporter, ConsoleReporter, JsonLinesReporter, Reporter};
pub use crate::transparency::{SessionLog, SessionStats, SharedSessionLog};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Plain-language description of what the check does and does not do.
pub const HEURISTIC_NOTICE: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║                 CURSOR-VERIFY - HOW THE CHECK WORKS              ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  The check samples a few cursor positions and looks at the       ║
║  angles between consecutive movements.                           ║
║                                                                  ║
║  ✓ WHAT IT DOES:                                                 ║
║    • Reads the cursor position every 10ms                        ║
║    • Keeps 5 distinct positions at least 50ms apart              ║
║    • Passes when any angle between moves is below 45 degrees     ║
║    • Retries after a short pause until it passes                 ║
║                                                                  ║
║  ✗ WHAT IT DOES NOT DO:                                          ║
║    • Store positions after an attempt ends                       ║
║    • Learn from past sessions                                    ║
║    • Detect replayed recordings of real movement                 ║
║                                                                  ║
║  Straight, steady movement measures 0 degrees and passes, while  ║
║  repeated right-angle turns measure 90 degrees and do not.       ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;
