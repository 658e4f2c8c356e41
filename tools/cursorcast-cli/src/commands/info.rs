//! Show template library information.

use std::path::PathBuf;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let library = super::load_library(&path)?;

    println!("Template library: {}", path.display());
    println!("  Templates: {}", library.len());

    let lengths: Vec<usize> = library.iter().map(|t| t.trace.len()).collect();
    if let (Some(min), Some(max)) = (lengths.iter().min(), lengths.iter().max()) {
        let mean = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
        println!("  Trace length: min {min}, max {max}, mean {mean:.1}");
    }

    let bounded = library.iter().filter(|t| t.lbos.is_some()).count();
    println!("  Bounded (lbos): {bounded}");

    let durations: Vec<i64> = library
        .iter()
        .filter_map(|t| Some(t.trace.last()?.t - t.trace.first()?.t))
        .collect();
    if let Some(max) = durations.iter().max() {
        println!("  Longest recording: {max}ms");
    }

    let issues = library.validate();
    if issues.is_empty() {
        println!("\nLibrary is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!("\n{} issue(s) found.", issues.len());
    }

    Ok(())
}
