use serde::{Deserialize, Serialize};

use lottiegen_core::Vector2;

/// How a keyframe eases into the next one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Hold the value until the next keyframe.
    Hold,
    CubicBezier { cp1: Vector2, cp2: Vector2 },
}

/// A keyframe: a value at a specific frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFrame<T> {
    /// Frame number, relative to the start of the composition.
    pub frame: f64,
    pub value: T,
    /// Easing used when interpolating TO this keyframe.
    #[serde(default)]
    pub easing: Easing,
}

impl<T> KeyFrame<T> {
    pub fn new(frame: f64, value: T) -> Self {
        Self {
            frame,
            value,
            easing: Easing::Linear,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// A value that is either constant or keyframed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animatable<T> {
    pub initial_value: T,
    /// Sorted by frame. Empty or single-element lists are not animated.
    #[serde(default = "Vec::new")]
    pub keyframes: Vec<KeyFrame<T>>,
}

impl<T: Clone + PartialEq> Animatable<T> {
    /// A constant value.
    pub fn constant(value: T) -> Self {
        Self {
            initial_value: value,
            keyframes: Vec::new(),
        }
    }

    /// A keyframed value. The initial value is taken from the first keyframe.
    /// Keyframes are sorted by frame.
    pub fn keyframed(mut keyframes: Vec<KeyFrame<T>>) -> Option<Self> {
        keyframes.sort_by(|a, b| a.frame.total_cmp(&b.frame));
        let initial_value = keyframes.first()?.value.clone();
        Some(Self {
            initial_value,
            keyframes,
        })
    }

    pub fn is_animated(&self) -> bool {
        self.keyframes.len() > 1
    }

    /// True if the value equals `value` at every point in time.
    pub fn is_always(&self, value: &T) -> bool {
        if self.is_animated() {
            self.keyframes.iter().all(|kf| kf.value == *value)
        } else {
            self.initial_value == *value
        }
    }

    /// Shift every keyframe by `offset` frames.
    pub fn with_time_offset(&self, offset: f64) -> Self {
        if !self.is_animated() || offset == 0.0 {
            return self.clone();
        }
        Self {
            initial_value: self.initial_value.clone(),
            keyframes: self
                .keyframes
                .iter()
                .map(|kf| KeyFrame {
                    frame: kf.frame + offset,
                    value: kf.value.clone(),
                    easing: kf.easing,
                })
                .collect(),
        }
    }
}

/// Opacity in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Opacity(pub f64);

impl Opacity {
    pub const OPAQUE: Opacity = Opacity(1.0);
    pub const TRANSPARENT: Opacity = Opacity(0.0);

    /// Convert from the document's percentage form.
    pub fn from_percent(percent: f64) -> Self {
        Opacity(percent / 100.0)
    }
}

/// Rotation in degrees, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Rotation(pub f64);

impl Rotation {
    pub const NONE: Rotation = Rotation(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_is_not_animated() {
        let a = Animatable::constant(Opacity::OPAQUE);
        assert!(!a.is_animated());
        assert!(a.is_always(&Opacity::OPAQUE));
        assert!(!a.is_always(&Opacity::TRANSPARENT));
    }

    #[test]
    fn test_single_keyframe_is_not_animated() {
        let a = Animatable::keyframed(vec![KeyFrame::new(10.0, Rotation(45.0))]).unwrap();
        assert!(!a.is_animated());
        assert_eq!(a.initial_value, Rotation(45.0));
    }

    #[test]
    fn test_keyframed_with_equal_values_is_always() {
        let a = Animatable::keyframed(vec![
            KeyFrame::new(0.0, Rotation::NONE),
            KeyFrame::new(30.0, Rotation::NONE),
        ])
        .unwrap();
        assert!(a.is_animated());
        assert!(a.is_always(&Rotation::NONE));
    }

    #[test]
    fn test_keyframed_sorts_by_frame() {
        let a = Animatable::keyframed(vec![
            KeyFrame::new(30.0, Opacity(0.5)),
            KeyFrame::new(0.0, Opacity(1.0)),
        ])
        .unwrap();
        assert_eq!(a.keyframes[0].frame, 0.0);
        assert_eq!(a.initial_value, Opacity(1.0));
    }

    #[test]
    fn test_keyframed_empty_is_none() {
        assert!(Animatable::<Opacity>::keyframed(Vec::new()).is_none());
    }

    #[test]
    fn test_time_offset_shifts_keyframes() {
        let a = Animatable::keyframed(vec![
            KeyFrame::new(0.0, Opacity(0.0)),
            KeyFrame::new(10.0, Opacity(1.0)),
        ])
        .unwrap()
        .with_time_offset(5.0);
        assert_eq!(a.keyframes[0].frame, 5.0);
        assert_eq!(a.keyframes[1].frame, 15.0);
    }
}
