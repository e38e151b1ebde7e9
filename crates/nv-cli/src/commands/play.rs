use std::path::Path;

use nv_engine::{EngineConfig, NarrativeEngine};

pub fn run(path: &Path, tick_ms: u64, instant: bool) -> Result<(), String> {
    let graph = super::load_script(path)?;
    let config = EngineConfig::default()
        .with_tick_interval(tick_ms)
        .with_typewriter(!instant);
    crate::play::run(NarrativeEngine::new(graph, config))
}
