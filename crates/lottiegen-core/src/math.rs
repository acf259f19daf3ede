use serde::{Deserialize, Serialize};

/// A 2D vector. Used for anchors, positions, sizes and scale percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Both components set to the same value.
    pub fn splat(v: f64) -> Self {
        Self { x: v, y: v }
    }

    /// Linear interpolation between two vectors.
    pub fn lerp(&self, other: &Vector2, t: f64) -> Vector2 {
        Vector2 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl Default for Vector2 {
    fn default() -> Self {
        Self::zero()
    }
}

/// A 3D vector. The composition runtime positions visuals with these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Vector2> for Vector3 {
    fn from(v: Vector2) -> Self {
        Self::new(v.x, v.y, 0.0)
    }
}

/// A 4D vector. Colors are stored in property sets as these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vector4 {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Vector4 {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector2_lerp() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(100.0, 200.0);
        let mid = a.lerp(&b, 0.5);
        assert!((mid.x - 50.0).abs() < 0.001);
        assert!((mid.y - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_vector3_from_vector2() {
        let v: Vector3 = Vector2::new(3.0, 4.0).into();
        assert_eq!(v, Vector3::new(3.0, 4.0, 0.0));
    }
}
