//! Removes rendering contexts that have no effect on what gets drawn.

use crate::animatable::{Opacity, Rotation};
use crate::context::RenderingContext;
use lottiegen_core::Vector2;

/// Optimize a rendering context.
///
/// Non-composite contexts are returned unchanged. For a composite, each kind
/// of no-op context is filtered out, then blend modes are collapsed to the
/// last one and moved to the end. The result is always a composite.
pub fn optimize(input: &RenderingContext) -> RenderingContext {
    let RenderingContext::Composite(items) = input else {
        return input.clone();
    };

    let kept: Vec<RenderingContext> = items
        .iter()
        .filter(|item| keep_anchor(item))
        .filter(|item| keep_position(item))
        .filter(|item| keep_scale(item))
        .filter(|item| keep_rotation(item))
        .filter(|item| keep_opacity(item))
        .cloned()
        .collect();

    // Must run last: it reorders the sequence.
    let result = collapse_blend_modes(kept);

    tracing::trace!(
        before = items.len(),
        after = result.len(),
        "optimized rendering context"
    );
    RenderingContext::Composite(result)
}

fn keep_anchor(item: &RenderingContext) -> bool {
    match item {
        RenderingContext::Anchor(anchor) => {
            anchor.is_animated() || anchor.initial_value != Vector2::zero()
        }
        _ => true,
    }
}

fn keep_position(item: &RenderingContext) -> bool {
    match item {
        RenderingContext::Position(position) => {
            position.is_animated() || position.initial_value != Vector2::zero()
        }
        _ => true,
    }
}

fn keep_scale(item: &RenderingContext) -> bool {
    match item {
        RenderingContext::Scale(scale) => {
            scale.is_animated() || scale.initial_value != Vector2::splat(100.0)
        }
        _ => true,
    }
}

fn keep_rotation(item: &RenderingContext) -> bool {
    match item {
        RenderingContext::Rotation(rotation) => !rotation.is_always(&Rotation::NONE),
        _ => true,
    }
}

fn keep_opacity(item: &RenderingContext) -> bool {
    match item {
        RenderingContext::Opacity(opacity) => !opacity.is_always(&Opacity::OPAQUE),
        _ => true,
    }
}

/// Keep only the last blend mode and append it after everything else. Later
/// blend modes override earlier ones, and the blend mode must apply last.
fn collapse_blend_modes(items: Vec<RenderingContext>) -> Vec<RenderingContext> {
    let mut last_blend_mode = None;
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        match item {
            RenderingContext::BlendMode(mode) => last_blend_mode = Some(mode),
            other => result.push(other),
        }
    }
    if let Some(mode) = last_blend_mode.filter(|mode| !mode.is_identity()) {
        result.push(RenderingContext::BlendMode(mode));
    }
    result
}

/// Optimizes many contexts, e.g. one per layer. Each entry is independent.
pub fn optimize_all<'a>(
    contexts: impl IntoIterator<Item = &'a RenderingContext>,
) -> Vec<RenderingContext> {
    contexts.into_iter().map(optimize).collect()
}
