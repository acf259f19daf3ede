//! # lottiegen-ir
//!
//! The LottieGen Intermediate Representation: layers translated from the
//! animation document and the rendering contexts that position, fade and
//! blend their content.
//!
//! The [`optimize`] pass strips contexts that cannot change what is drawn
//! before the composition graph is built from them.

pub mod animatable;
pub mod asset;
pub mod context;
pub mod layer;
pub mod optimize;
pub mod validate;

pub use animatable::{Animatable, Easing, KeyFrame, Opacity, Rotation};
pub use asset::{Asset, AssetId, AssetRegistry};
pub use context::RenderingContext;
pub use layer::{Layer, LayerArgs, LayerContent, LayerTransform};
pub use optimize::{optimize, optimize_all};
pub use validate::validate_layers;
