//! The JSON input of `lottiegen generate`.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lottiegen_codegen::TargetDescriptor;
use lottiegen_comp::CompositionGraph;
use lottiegen_core::{CodegenConfig, Vector2};

/// A composition graph plus the canvas it animates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    pub width: f64,
    pub height: f64,
    pub duration_seconds: f64,
    pub graph: CompositionGraph,
}

impl GraphDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read graph document: {}", path.display()))?;
        Self::from_json(&source)
            .with_context(|| format!("invalid graph document: {}", path.display()))
    }

    pub fn from_json(source: &str) -> Result<Self> {
        let document: GraphDocument = serde_json::from_str(source)?;
        if !(document.width > 0.0 && document.height > 0.0) {
            anyhow::bail!("canvas size must be positive");
        }
        if !(document.duration_seconds.is_finite() && document.duration_seconds >= 0.0) {
            anyhow::bail!("duration must be a non-negative number of seconds");
        }
        document.target(&CodegenConfig::default())?;
        Ok(document)
    }

    pub fn target(&self, config: &CodegenConfig) -> Result<TargetDescriptor> {
        let duration = Duration::try_from_secs_f64(self.duration_seconds)
            .with_context(|| format!("duration of {}s is out of range", self.duration_seconds))?;
        let target =
            TargetDescriptor::from_config(config, Vector2::new(self.width, self.height), duration);
        target.duration_ticks()?;
        Ok(target)
    }
}
