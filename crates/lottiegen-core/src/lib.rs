//! # lottiegen-core
//!
//! Core types and primitives for the LottieGen code generator.
//! This crate contains foundational types shared across all LottieGen crates:
//! vectors, colors, blend modes, target languages, configuration, content
//! hashing, and error types.

pub mod color;
pub mod config;
pub mod error;
pub mod hash;
pub mod math;
pub mod types;

pub use config::*;

pub use color::Color;
pub use error::{LottieGenError, LottieGenResult};
pub use hash::ContentHash;
pub use math::{Vector2, Vector3, Vector4};
pub use types::{BlendMode, TargetLanguage};
