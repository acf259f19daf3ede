use serde::{Deserialize, Serialize};

use crate::error::{LottieGenError, LottieGenResult};
use crate::types::TargetLanguage;

/// `[codegen]` section: what to generate.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CodegenConfig {
    pub language: TargetLanguage,
    pub namespace: String,
    pub class_name: String,
    /// Target the modern (`Microsoft.UI.Composition`) runtime.
    pub modern_runtime: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            language: TargetLanguage::CSharp,
            namespace: "AnimatedVisuals".to_string(),
            class_name: "AnimatedVisual".to_string(),
            modern_runtime: false,
        }
    }
}

/// `[output]` section: where generated files land.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LottieGenConfig {
    #[serde(default)]
    pub codegen: CodegenConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl LottieGenConfig {
    pub fn from_toml_str(contents: &str) -> LottieGenResult<Self> {
        toml::from_str(contents).map_err(|e| LottieGenError::Config(e.to_string()))
    }

    pub fn load_from_file(path: &std::path::Path) -> LottieGenResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> LottieGenResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| LottieGenError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
