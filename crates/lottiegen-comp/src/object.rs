use serde::{Deserialize, Serialize};

use crate::effect::GraphicsEffect;
use lottiegen_core::{Color, Vector2, Vector3};
use lottiegen_ir::{AssetId, Easing, RenderingContext};

/// Index of an object in a [`crate::CompositionGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The runtime type of a composition object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectType {
    ContainerVisual,
    SpriteVisual,
    CompositionColorBrush,
    CompositionEffectBrush,
    CompositionSurfaceBrush,
    LoadedImageSurface,
    ScalarKeyFrameAnimation,
    Vector2KeyFrameAnimation,
    ExpressionAnimation,
}

impl ObjectType {
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectType::ContainerVisual => "ContainerVisual",
            ObjectType::SpriteVisual => "SpriteVisual",
            ObjectType::CompositionColorBrush => "CompositionColorBrush",
            ObjectType::CompositionEffectBrush => "CompositionEffectBrush",
            ObjectType::CompositionSurfaceBrush => "CompositionSurfaceBrush",
            ObjectType::LoadedImageSurface => "LoadedImageSurface",
            ObjectType::ScalarKeyFrameAnimation => "ScalarKeyFrameAnimation",
            ObjectType::Vector2KeyFrameAnimation => "Vector2KeyFrameAnimation",
            ObjectType::ExpressionAnimation => "ExpressionAnimation",
        }
    }

    pub fn is_visual(&self) -> bool {
        matches!(self, ObjectType::ContainerVisual | ObjectType::SpriteVisual)
    }

    pub fn is_brush(&self) -> bool {
        matches!(
            self,
            ObjectType::CompositionColorBrush
                | ObjectType::CompositionEffectBrush
                | ObjectType::CompositionSurfaceBrush
        )
    }

    pub fn is_animation(&self) -> bool {
        matches!(
            self,
            ObjectType::ScalarKeyFrameAnimation
                | ObjectType::Vector2KeyFrameAnimation
                | ObjectType::ExpressionAnimation
        )
    }
}

/// Properties common to every visual. Unset properties keep the runtime
/// default and are not emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualProperties {
    pub center_point: Option<Vector3>,
    pub offset: Option<Vector3>,
    pub size: Option<Vector2>,
    pub opacity: Option<f64>,
    pub rotation_angle_in_degrees: Option<f64>,
    pub scale: Option<Vector3>,
    pub is_visible: Option<bool>,
}

impl VisualProperties {
    /// Initial visual properties for an optimized rendering context. The
    /// anchor becomes the center point and the offset is the position moved
    /// back by the anchor. Keyframes and the blend mode are not applied here.
    pub fn from_context(context: &RenderingContext) -> Self {
        let mut props = VisualProperties::default();
        let mut anchor = Vector2::zero();
        let mut position = None;
        for item in context.items() {
            match item {
                RenderingContext::Anchor(v) => {
                    anchor = v.initial_value;
                    props.center_point = Some(Vector3::from(anchor));
                }
                RenderingContext::Position(v) => position = Some(v.initial_value),
                RenderingContext::Scale(v) => {
                    let s = v.initial_value;
                    props.scale = Some(Vector3::new(s.x / 100.0, s.y / 100.0, 1.0));
                }
                RenderingContext::Rotation(v) => {
                    props.rotation_angle_in_degrees = Some(v.initial_value.0)
                }
                RenderingContext::Opacity(v) => props.opacity = Some(v.initial_value.0),
                RenderingContext::BlendMode(_) | RenderingContext::Composite(_) => {}
            }
        }
        if position.is_some() || props.center_point.is_some() {
            let p = position.unwrap_or_else(Vector2::zero);
            props.offset = Some(Vector3::new(p.x - anchor.x, p.y - anchor.y, 0.0));
        }
        props
    }
}

/// Binds an animation to a named property of its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animator {
    pub property: String,
    pub animation: NodeId,
}

/// A keyframe of a composition keyframe animation, placed by normalized
/// progress in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationKeyFrame<T> {
    pub progress: f64,
    pub value: T,
    #[serde(default)]
    pub easing: Easing,
}

impl<T> AnimationKeyFrame<T> {
    pub fn new(progress: f64, value: T) -> Self {
        Self {
            progress,
            value,
            easing: Easing::Linear,
        }
    }
}

/// Something an expression animation can refer to by name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReferenceTarget {
    Node(NodeId),
    /// The shared property set holding the graph's property bindings.
    ThemeProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionReference {
    pub name: String,
    pub target: ReferenceTarget,
}

/// A brush bound to one of an effect's source slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectBrushSource {
    pub name: String,
    pub brush: NodeId,
}

/// A labelled edge from one object to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub label: String,
    pub target: NodeId,
}

impl Edge {
    fn new(label: impl Into<String>, target: NodeId) -> Self {
        Self {
            label: label.into(),
            target,
        }
    }
}

/// A node of the composition graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CompositionObject {
    ContainerVisual {
        #[serde(default)]
        properties: VisualProperties,
        #[serde(default)]
        children: Vec<NodeId>,
        #[serde(default)]
        animators: Vec<Animator>,
    },
    SpriteVisual {
        #[serde(default)]
        properties: VisualProperties,
        #[serde(default)]
        brush: Option<NodeId>,
        #[serde(default)]
        animators: Vec<Animator>,
    },
    ColorBrush {
        color: Color,
        #[serde(default)]
        animators: Vec<Animator>,
    },
    EffectBrush {
        effect: GraphicsEffect,
        #[serde(default)]
        sources: Vec<EffectBrushSource>,
    },
    SurfaceBrush {
        surface: NodeId,
    },
    LoadedImageSurface {
        asset_id: AssetId,
        uri: String,
    },
    ScalarKeyFrameAnimation {
        keyframes: Vec<AnimationKeyFrame<f64>>,
    },
    Vector2KeyFrameAnimation {
        keyframes: Vec<AnimationKeyFrame<Vector2>>,
    },
    ExpressionAnimation {
        expression: String,
        #[serde(default)]
        references: Vec<ExpressionReference>,
    },
}

impl CompositionObject {
    pub fn object_type(&self) -> ObjectType {
        match self {
            CompositionObject::ContainerVisual { .. } => ObjectType::ContainerVisual,
            CompositionObject::SpriteVisual { .. } => ObjectType::SpriteVisual,
            CompositionObject::ColorBrush { .. } => ObjectType::CompositionColorBrush,
            CompositionObject::EffectBrush { .. } => ObjectType::CompositionEffectBrush,
            CompositionObject::SurfaceBrush { .. } => ObjectType::CompositionSurfaceBrush,
            CompositionObject::LoadedImageSurface { .. } => ObjectType::LoadedImageSurface,
            CompositionObject::ScalarKeyFrameAnimation { .. } => {
                ObjectType::ScalarKeyFrameAnimation
            }
            CompositionObject::Vector2KeyFrameAnimation { .. } => {
                ObjectType::Vector2KeyFrameAnimation
            }
            CompositionObject::ExpressionAnimation { .. } => ObjectType::ExpressionAnimation,
        }
    }

    pub fn animators(&self) -> &[Animator] {
        match self {
            CompositionObject::ContainerVisual { animators, .. }
            | CompositionObject::SpriteVisual { animators, .. }
            | CompositionObject::ColorBrush { animators, .. } => animators,
            _ => &[],
        }
    }

    /// Outgoing edges in stored order: structural edges first, then
    /// animators.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        match self {
            CompositionObject::ContainerVisual { children, .. } => {
                edges.extend(children.iter().map(|&c| Edge::new("Children", c)));
            }
            CompositionObject::SpriteVisual { brush, .. } => {
                edges.extend(brush.iter().map(|&b| Edge::new("Brush", b)));
            }
            CompositionObject::EffectBrush { sources, .. } => {
                edges.extend(sources.iter().map(|s| Edge::new(s.name.clone(), s.brush)));
            }
            CompositionObject::SurfaceBrush { surface } => {
                edges.push(Edge::new("Surface", *surface));
            }
            CompositionObject::ExpressionAnimation { references, .. } => {
                for reference in references {
                    if let ReferenceTarget::Node(id) = reference.target {
                        edges.push(Edge::new(reference.name.clone(), id));
                    }
                }
            }
            CompositionObject::ColorBrush { .. }
            | CompositionObject::LoadedImageSurface { .. }
            | CompositionObject::ScalarKeyFrameAnimation { .. }
            | CompositionObject::Vector2KeyFrameAnimation { .. } => {}
        }
        edges.extend(
            self.animators()
                .iter()
                .map(|a| Edge::new(a.property.clone(), a.animation)),
        );
        edges
    }

    /// True if this object refers to the theme property set.
    pub fn references_theme(&self) -> bool {
        match self {
            CompositionObject::ExpressionAnimation { references, .. } => references
                .iter()
                .any(|r| r.target == ReferenceTarget::ThemeProperties),
            _ => false,
        }
    }
}
