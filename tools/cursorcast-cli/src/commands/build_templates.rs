//! Build a template library from raw recordings.

use std::path::PathBuf;

use cursorcast_common::config::PredictorConfig;
use cursorcast_prediction_core::profile::build_library;
use cursorcast_prediction_core::TraceSampler;

pub fn run(config: &PredictorConfig, input: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let raws = super::load_traces(&input)?;
    let sampler = TraceSampler::from_config(config);

    println!("Building templates from: {}", input.display());
    println!("  Recordings: {}", raws.len());
    println!("  Sample interval: {}ms", sampler.sample_interval_ms());

    let library = build_library(&raws, &sampler);
    let skipped = raws.len() - library.len();

    library
        .save(&output)
        .map_err(|e| anyhow::anyhow!("Failed to save template library: {e}"))?;

    println!("  Templates: {}", library.len());
    if skipped > 0 {
        println!("  Skipped (too short): {skipped}");
    }
    println!("\nLibrary written to: {}", output.display());

    Ok(())
}
