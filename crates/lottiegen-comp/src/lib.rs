//! # lottiegen-comp
//!
//! The composition graph: the visuals, brushes, effects and animations the
//! generated code recreates at runtime, plus the property bindings it exposes
//! to callers.
//!
//! Graphs are built by the animation translators and consumed read-only by
//! the code generator. [`CompositionGraph::validate`] rejects graphs the
//! generator could not lower.

pub mod binding;
pub mod effect;
pub mod graph;
pub mod object;

pub use binding::{PropertyBinding, PropertyBindings, PropertySetValueType, PropertyValue};
pub use effect::{CompositeMode, EffectSource, GraphicsEffect, GraphicsEffectType};
pub use graph::CompositionGraph;
pub use object::{
    AnimationKeyFrame, Animator, CompositionObject, Edge, EffectBrushSource, ExpressionReference,
    NodeId, ObjectType, ReferenceTarget, VisualProperties,
};
