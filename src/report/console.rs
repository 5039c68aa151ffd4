//! Human-readable console output.

use crate::core::classifier::AttemptResult;
use crate::core::controller::DetectionEvent;
use crate::report::Reporter;
use std::io::{self, Write};
use tracing::warn;

/// Renders attempt progress and the vector/angle breakdown as text.
pub struct ConsoleReporter<W: Write> {
    out: W,
    /// Also print the breakdown for bot-like attempts
    verbose: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Header printed once before the first attempt.
    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "=== Mouse Behavior Detection System ===")?;
        writeln!(self.out, "Waiting for human activity...")?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn render(&mut self, event: &DetectionEvent) -> io::Result<()> {
        match event {
            DetectionEvent::AttemptStarted {
                attempt,
                sample_count,
            } => {
                writeln!(
                    self.out,
                    "[Attempt {attempt}] Capturing {sample_count} mouse positions..."
                )?;
            }
            DetectionEvent::Analyzed {
                attempt, result, ..
            } => {
                writeln!(
                    self.out,
                    "[Attempt {attempt}] Positions captured. Analyzing..."
                )?;
                if result.is_human {
                    writeln!(self.out, "[Attempt {attempt}] HUMAN ACTIVITY DETECTED!")?;
                    write_breakdown(&mut self.out, result)?;
                } else if self.verbose {
                    write_breakdown(&mut self.out, result)?;
                }
            }
            DetectionEvent::Retrying { attempt, .. } => {
                writeln!(
                    self.out,
                    "[Attempt {attempt}] Bot-like behavior detected. Retrying..."
                )?;
                writeln!(self.out)?;
            }
            DetectionEvent::Succeeded { .. } => {
                writeln!(self.out, "Human activity verified. Continuing execution...")?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, event: &DetectionEvent) {
        if let Err(e) = self.render(event) {
            warn!(error = %e, "console reporter write failed");
        }
    }
}

/// Write the vector, angle, and verdict sections for one attempt.
pub fn write_breakdown<W: Write + ?Sized>(out: &mut W, result: &AttemptResult) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== Vector Analysis ===")?;
    for (i, v) in result.vectors.iter().enumerate() {
        writeln!(
            out,
            "Vector V{i}: dx={:.2}, dy={:.2}, magnitude={:.2}",
            v.dx, v.dy, v.magnitude
        )?;
    }

    writeln!(out)?;
    writeln!(out, "=== Angle Analysis ===")?;
    for angle in &result.angles {
        write!(
            out,
            "Angle between V{} and V{}: {:.2} degrees",
            angle.from, angle.to, angle.degrees
        )?;
        if angle.sharp {
            write!(out, " [SHARP ANGLE]")?;
        }
        writeln!(out)?;
    }

    writeln!(out)?;
    writeln!(out, "=== Detection Result ===")?;
    writeln!(out, "{}", result.verdict())?;
    if result.is_human {
        writeln!(
            out,
            "At least one angle is less than {:.0} degrees (sharp turn)",
            result.threshold_degrees
        )?;
    } else {
        writeln!(
            out,
            "No angle is less than {:.0} degrees (path too linear)",
            result.threshold_degrees
        )?;
    }
    writeln!(out)
}
