use serde::{Deserialize, Serialize};

use lottiegen_core::{LottieGenError, LottieGenResult};

/// Tag identifying the kind of a [`GraphicsEffect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GraphicsEffectType {
    CompositeEffect,
    GaussianBlurEffect,
}

impl GraphicsEffectType {
    /// The runtime type name of the effect.
    pub fn type_name(&self) -> &'static str {
        match self {
            GraphicsEffectType::CompositeEffect => "CompositeEffect",
            GraphicsEffectType::GaussianBlurEffect => "GaussianBlurEffect",
        }
    }
}

/// A named input slot of an effect. The brush that owns the effect binds a
/// brush to each slot by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSource {
    pub name: String,
}

impl EffectSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// How the sources of a composite effect are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CompositeMode {
    #[default]
    SourceOver,
    DestinationOver,
    SourceIn,
    DestinationIn,
    SourceOut,
    DestinationOut,
    SourceAtop,
    DestinationAtop,
    Xor,
    Add,
    Copy,
    BoundedCopy,
    MaskInvert,
}

impl CompositeMode {
    /// Name of the enum member in the runtime's `CanvasComposite` enum.
    pub fn member_name(&self) -> &'static str {
        match self {
            CompositeMode::SourceOver => "SourceOver",
            CompositeMode::DestinationOver => "DestinationOver",
            CompositeMode::SourceIn => "SourceIn",
            CompositeMode::DestinationIn => "DestinationIn",
            CompositeMode::SourceOut => "SourceOut",
            CompositeMode::DestinationOut => "DestinationOut",
            CompositeMode::SourceAtop => "SourceAtop",
            CompositeMode::DestinationAtop => "DestinationAtop",
            CompositeMode::Xor => "Xor",
            CompositeMode::Add => "Add",
            CompositeMode::Copy => "Copy",
            CompositeMode::BoundedCopy => "BoundedCopy",
            CompositeMode::MaskInvert => "MaskInvert",
        }
    }
}

/// An effect applied by an effect brush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphicsEffect {
    /// Combines N ordered sources with a composite mode.
    Composite {
        #[serde(default)]
        mode: CompositeMode,
        #[serde(default)]
        sources: Vec<EffectSource>,
    },
    /// Blurs a single source. An unset amount leaves the runtime default.
    GaussianBlur {
        #[serde(default)]
        blur_amount: Option<f64>,
        #[serde(default)]
        source: Option<EffectSource>,
    },
}

impl GraphicsEffect {
    pub fn effect_type(&self) -> GraphicsEffectType {
        match self {
            GraphicsEffect::Composite { .. } => GraphicsEffectType::CompositeEffect,
            GraphicsEffect::GaussianBlur { .. } => GraphicsEffectType::GaussianBlurEffect,
        }
    }

    /// The source slots in the order the runtime expects them. An effect
    /// with no configured source yields an empty list.
    pub fn sources(&self) -> Vec<&EffectSource> {
        match self {
            GraphicsEffect::Composite { sources, .. } => sources.iter().collect(),
            GraphicsEffect::GaussianBlur { source, .. } => source.iter().collect(),
        }
    }

    /// Check the source slots: names must be non-empty and unique.
    pub fn validate(&self, node: &str) -> LottieGenResult<()> {
        let sources = self.sources();
        if sources.is_empty() {
            tracing::warn!(
                node,
                effect = self.effect_type().type_name(),
                "effect has no sources"
            );
        }
        let mut seen = std::collections::BTreeSet::new();
        for source in &sources {
            if source.name.is_empty() {
                return Err(LottieGenError::structural(node, "effect source has an empty name"));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(LottieGenError::structural(
                    node,
                    format!("duplicate effect source '{}'", source.name),
                ));
            }
        }
        if let GraphicsEffect::GaussianBlur {
            blur_amount: Some(amount),
            ..
        } = self
        {
            if !amount.is_finite() || *amount < 0.0 {
                return Err(LottieGenError::structural(
                    node,
                    format!("invalid blur amount {amount}"),
                ));
            }
        }
        Ok(())
    }
}
