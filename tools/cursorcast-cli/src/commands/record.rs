//! Log events from the configured pointer source.

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;

use cursorcast_common::clock::TraceClock;
use cursorcast_common::config::SourceConfig;
use cursorcast_input_tracker::{open_source, InputTracker};

pub async fn run(
    source: &SourceConfig,
    output: PathBuf,
    duration_secs: Option<u64>,
) -> anyhow::Result<()> {
    let clock = TraceClock::start();
    let mut tracker = InputTracker::new(open_source(source)?, output.clone(), &clock)?;
    let stop = tracker.stop_flag();

    println!("Recording pointer events to: {}", output.display());
    match duration_secs {
        Some(secs) => println!("Stopping after {secs}s..."),
        None => println!("Press Ctrl+C to stop recording..."),
    }
    println!();

    let mut task = tokio::spawn(async move { tracker.run().await });

    // A finite source may run dry before we are asked to stop.
    let events = tokio::select! {
        result = &mut task => result??,
        _ = wait_for_stop(duration_secs) => {
            stop.store(true, Ordering::SeqCst);
            task.await??
        }
    };

    println!("Recorded {events} event(s) in {}ms", clock.elapsed_ms());
    Ok(())
}

async fn wait_for_stop(duration_secs: Option<u64>) {
    match duration_secs {
        Some(secs) => tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
            _ = tokio::signal::ctrl_c() => {}
        },
        None => {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}
