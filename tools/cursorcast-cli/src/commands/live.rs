//! Predict continuously from the configured pointer source.

use std::sync::atomic::Ordering;

use cursorcast_common::config::AppConfig;
use cursorcast_input_tracker::{open_source, PredictionSession};
use cursorcast_prediction_core::PredictionMode;

pub async fn run(config: AppConfig, delta_ms: i64) -> anyhow::Result<()> {
    let source = open_source(&config.source)?;
    let mut session = PredictionSession::new(config.predictor.clone(), source)?;

    session.on_ready(|library| {
        println!("Templates loaded: {}", library.len());
        println!("Press Ctrl+C to stop...");
        println!();
    });

    let stop = session.stop_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.store(true, Ordering::SeqCst);
        }
    });

    println!(
        "Loading templates from: {}",
        config.predictor.template_source.display()
    );
    session.start_loading();

    let moves = session
        .run(|s| {
            let Some(last) = s.current_trace().last() else {
                return;
            };
            match s.predict(delta_ms, PredictionMode::Default) {
                Ok(Some(p)) => println!(
                    "{:>8}ms  ({:.1}, {:.1}) -> ({:.1}, {:.1}) ± {:.1}",
                    last.t, last.x, last.y, p.x, p.y, p.confidence
                ),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Prediction failed"),
            }
        })
        .await?;

    println!("\nProcessed {moves} move(s)");
    Ok(())
}
