//! Demonstration of live pointer detection.
//!
//! This example shows how to:
//! 1. Check that the cursor position can be read
//! 2. Run the retry controller on a background thread
//! 3. Receive detection events over a channel
//! 4. Stop early with Ctrl+C
//!
//! Run with: cargo run --example detect_demo
//!
//! Pass a JSON replay file as the first argument to run without a display:
//! cargo run --example detect_demo -- trace.json

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use cursor_verify::{
    collector::{check_available, ReplaySource, SystemSource},
    core::{
        CancellationToken, DetectionEvent, DetectionSettings, ManualClock, RetryController,
        SystemClock,
    },
    report::ChannelReporter,
    transparency::create_shared_log,
    HEURISTIC_NOTICE,
};

fn main() {
    println!("cursor-verify - Detection Demo");
    println!("==============================");
    println!();
    println!("{HEURISTIC_NOTICE}");
    println!();

    let replay = std::env::args().nth(1).map(PathBuf::from);

    if replay.is_none() {
        print!("Checking cursor access... ");
        if check_available() {
            println!("OK ✓");
        } else {
            println!("FAILED ✗");
            println!();
            println!("The cursor position cannot be read on this system.");
            println!("Pass a replay file instead: cargo run --example detect_demo -- trace.json");
            return;
        }
        println!();
        println!("Move your mouse along a curve. Ctrl+C stops the demo.");
        println!();
    }

    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || handler_token.cancel()).expect("Error setting Ctrl+C handler");

    let settings = DetectionSettings {
        max_attempts: Some(20),
        ..DetectionSettings::default()
    };
    let (reporter, receiver) = ChannelReporter::new(64);
    let log = create_shared_log();
    let worker_log = log.clone();

    let worker = thread::spawn(move || {
        let mut reporter = (reporter, worker_log);
        match replay {
            Some(path) => {
                let source = match ReplaySource::from_json_file(&path, 5) {
                    Ok(source) => source,
                    Err(e) => {
                        eprintln!("Error loading {}: {e}", path.display());
                        return None;
                    }
                };
                let mut controller = RetryController::new(source, ManualClock::new(), settings)
                    .with_cancellation(token);
                Some(controller.run(&mut reporter))
            }
            None => {
                let mut controller =
                    RetryController::new(SystemSource::new(), SystemClock::new(), settings)
                        .with_cancellation(token);
                Some(controller.run(&mut reporter))
            }
        }
    });

    // The channel closes when the worker drops its reporter.
    loop {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => match &event {
                DetectionEvent::AttemptStarted { attempt, .. } => {
                    println!("  Attempt {attempt}: sampling...");
                }
                DetectionEvent::Analyzed { result, .. } => {
                    let min = result
                        .min_angle()
                        .map(|a| format!("{a:.1}°"))
                        .unwrap_or_else(|| "n/a".to_string());
                    println!("    {} (smallest angle {min})", result.verdict());
                }
                DetectionEvent::Retrying { cooldown, .. } => {
                    println!("    retrying in {}ms", cooldown.as_millis());
                }
                DetectionEvent::Succeeded { attempt } => {
                    println!("  Verified on attempt {attempt}");
                }
            },
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        }
    }

    match worker.join() {
        Ok(Some(Ok(outcome))) => println!("\nOutcome: {outcome:?}"),
        Ok(Some(Err(e))) => println!("\nStopped: {e}"),
        Ok(None) => {}
        Err(_) => eprintln!("detection thread panicked"),
    }

    println!();
    println!("{}", log.summary());
}
