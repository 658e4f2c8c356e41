pub mod build_templates;
pub mod evaluate;
pub mod info;
pub mod live;
pub mod predict;
pub mod record;

use std::path::Path;

use cursorcast_trace_model::library::TemplateLibrary;
use cursorcast_trace_model::point::{parse_traces, Trace};

fn load_library(path: &Path) -> anyhow::Result<TemplateLibrary> {
    TemplateLibrary::load(path).map_err(|e| anyhow::anyhow!("Failed to load template library: {e}"))
}

fn load_traces(path: &Path) -> anyhow::Result<Vec<Trace>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    parse_traces(&json).map_err(|e| anyhow::anyhow!("Failed to parse traces: {e}"))
}
