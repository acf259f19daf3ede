use serde::{Deserialize, Serialize};

use crate::animatable::{Animatable, Opacity, Rotation};
use crate::asset::AssetId;
use crate::context::RenderingContext;
use lottiegen_core::{BlendMode, Color, Vector2};

/// The animatable transform every layer carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerTransform {
    pub anchor: Animatable<Vector2>,
    pub position: Animatable<Vector2>,
    /// Percent.
    pub scale: Animatable<Vector2>,
    pub rotation: Animatable<Rotation>,
    pub opacity: Animatable<Opacity>,
}

impl LayerTransform {
    pub fn identity() -> Self {
        Self {
            anchor: Animatable::constant(Vector2::zero()),
            position: Animatable::constant(Vector2::zero()),
            scale: Animatable::constant(Vector2::splat(100.0)),
            rotation: Animatable::constant(Rotation::NONE),
            opacity: Animatable::constant(Opacity::OPAQUE),
        }
    }
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Positioning arguments shared by every layer variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerArgs {
    /// Index of the layer within its composition. Unique per composition.
    pub index: u32,
    pub name: String,
    /// Index of the layer this one is parented to.
    pub parent: Option<u32>,
    pub in_frame: f64,
    pub out_frame: f64,
    /// Frame at which the layer's local time starts.
    #[serde(default)]
    pub start_frame: f64,
    #[serde(default = "default_time_stretch")]
    pub time_stretch: f64,
    #[serde(default)]
    pub transform: LayerTransform,
    #[serde(default)]
    pub blend_mode: BlendMode,
}

fn default_time_stretch() -> f64 {
    1.0
}

impl LayerArgs {
    pub fn new(index: u32, name: impl Into<String>, in_frame: f64, out_frame: f64) -> Self {
        Self {
            index,
            name: name.into(),
            parent: None,
            in_frame,
            out_frame,
            start_frame: 0.0,
            time_stretch: 1.0,
            transform: LayerTransform::identity(),
            blend_mode: BlendMode::Normal,
        }
    }
}

/// What a layer renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerContent {
    /// An image loaded from an external asset.
    Image { asset_id: AssetId },
    /// A transform-only layer used for parenting.
    Null,
    /// A solid rectangle.
    Solid {
        width: f64,
        height: f64,
        color: Color,
    },
    /// An instance of another composition.
    PreComp { composition_id: String },
    /// Vector shapes. Shape contents are translated elsewhere.
    Shape,
}

/// A layer in a composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub args: LayerArgs,
    pub content: LayerContent,
}

impl Layer {
    pub fn new(args: LayerArgs, content: LayerContent) -> Self {
        Self { args, content }
    }

    pub fn index(&self) -> u32 {
        self.args.index
    }

    /// Builder: set the parent layer index.
    pub fn with_parent(mut self, parent: u32) -> Self {
        self.args.parent = Some(parent);
        self
    }

    /// Builder: replace the transform.
    pub fn with_transform(mut self, transform: LayerTransform) -> Self {
        self.args.transform = transform;
        self
    }

    /// Builder: set the blend mode.
    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.args.blend_mode = blend_mode;
        self
    }

    /// The asset this layer references, if any.
    pub fn asset_id(&self) -> Option<&AssetId> {
        match &self.content {
            LayerContent::Image { asset_id } => Some(asset_id),
            _ => None,
        }
    }

    /// True if the layer draws nothing itself.
    pub fn is_transform_only(&self) -> bool {
        matches!(self.content, LayerContent::Null)
    }

    /// The layer's own rendering context, unoptimized. Opacity and blend mode
    /// of a Null layer do not propagate to children, so they are omitted.
    pub fn rendering_context(&self) -> RenderingContext {
        let t = &self.args.transform;
        let mut items = vec![
            RenderingContext::Anchor(t.anchor.clone()),
            RenderingContext::Position(t.position.clone()),
            RenderingContext::Scale(t.scale.clone()),
            RenderingContext::Rotation(t.rotation.clone()),
        ];
        if !self.is_transform_only() {
            items.push(RenderingContext::Opacity(t.opacity.clone()));
            items.push(RenderingContext::BlendMode(self.args.blend_mode));
        }
        let context = RenderingContext::Composite(items);
        if self.args.start_frame != 0.0 {
            context.with_time_offset(self.args.start_frame)
        } else {
            context
        }
    }
}
