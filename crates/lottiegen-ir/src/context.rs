use serde::{Deserialize, Serialize};

use crate::animatable::{Animatable, Opacity, Rotation};
use lottiegen_core::{BlendMode, Vector2};

/// One visual modifier applied to the content of a layer.
///
/// Contexts are immutable once built. Transformations such as
/// [`crate::optimize::optimize`] always return a new tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderingContext {
    Anchor(Animatable<Vector2>),
    Opacity(Animatable<Opacity>),
    Position(Animatable<Vector2>),
    Rotation(Animatable<Rotation>),
    /// Scale in percent; (100, 100) is the identity.
    Scale(Animatable<Vector2>),
    BlendMode(BlendMode),
    /// Ordered, flat list of contexts applied together.
    Composite(Vec<RenderingContext>),
}

impl RenderingContext {
    /// The context that does nothing.
    pub fn empty() -> Self {
        RenderingContext::Composite(Vec::new())
    }

    /// Compose a list of contexts. Nested composites are flattened so the
    /// result never contains a composite inside a composite.
    pub fn compose(items: impl IntoIterator<Item = RenderingContext>) -> Self {
        let mut flat = Vec::new();
        for item in items {
            match item {
                RenderingContext::Composite(children) => flat.extend(children),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            RenderingContext::Composite(flat)
        }
    }

    /// The items of this context: the children of a composite, or the
    /// context itself.
    pub fn items(&self) -> &[RenderingContext] {
        match self {
            RenderingContext::Composite(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    pub fn is_animated(&self) -> bool {
        match self {
            RenderingContext::Anchor(v)
            | RenderingContext::Position(v)
            | RenderingContext::Scale(v) => v.is_animated(),
            RenderingContext::Opacity(v) => v.is_animated(),
            RenderingContext::Rotation(v) => v.is_animated(),
            RenderingContext::BlendMode(_) => false,
            RenderingContext::Composite(items) => items.iter().any(|c| c.is_animated()),
        }
    }

    /// True if this context has no effect on rendering.
    pub fn is_default(&self) -> bool {
        match self {
            RenderingContext::Anchor(v) | RenderingContext::Position(v) => {
                v.is_always(&Vector2::zero())
            }
            RenderingContext::Scale(v) => v.is_always(&Vector2::splat(100.0)),
            RenderingContext::Opacity(v) => v.is_always(&Opacity::OPAQUE),
            RenderingContext::Rotation(v) => v.is_always(&Rotation::NONE),
            RenderingContext::BlendMode(mode) => mode.is_identity(),
            RenderingContext::Composite(items) => items.iter().all(|c| c.is_default()),
        }
    }

    /// Return a copy whose keyframes are shifted by `offset` frames.
    pub fn with_time_offset(&self, offset: f64) -> Self {
        match self {
            RenderingContext::Anchor(v) => RenderingContext::Anchor(v.with_time_offset(offset)),
            RenderingContext::Opacity(v) => RenderingContext::Opacity(v.with_time_offset(offset)),
            RenderingContext::Position(v) => {
                RenderingContext::Position(v.with_time_offset(offset))
            }
            RenderingContext::Rotation(v) => {
                RenderingContext::Rotation(v.with_time_offset(offset))
            }
            RenderingContext::Scale(v) => RenderingContext::Scale(v.with_time_offset(offset)),
            RenderingContext::BlendMode(mode) => RenderingContext::BlendMode(*mode),
            RenderingContext::Composite(items) => RenderingContext::Composite(
                items.iter().map(|c| c.with_time_offset(offset)).collect(),
            ),
        }
    }

    /// Short name of the variant, for logs and error context.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderingContext::Anchor(_) => "Anchor",
            RenderingContext::Opacity(_) => "Opacity",
            RenderingContext::Position(_) => "Position",
            RenderingContext::Rotation(_) => "Rotation",
            RenderingContext::Scale(_) => "Scale",
            RenderingContext::BlendMode(_) => "BlendMode",
            RenderingContext::Composite(_) => "Composite",
        }
    }
}

impl std::ops::Add for RenderingContext {
    type Output = RenderingContext;

    fn add(self, rhs: RenderingContext) -> RenderingContext {
        RenderingContext::compose([self, rhs])
    }
}
