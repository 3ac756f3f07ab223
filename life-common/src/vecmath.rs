use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A simple 2D vector struct in simulation-space units (pixels).
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Creates a new Vec2.
    #[inline(always)]
    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// Creates a zero vector.
    #[inline(always)]
    pub fn zero() -> Self {
        Vec2 { x: 0.0, y: 0.0 }
    }

    /// Calculates the squared length (magnitude) of the vector.
    #[inline(always)]
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Calculates the length (magnitude) of the vector.
    #[inline(always)]
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Scales the vector by a scalar value.
    #[inline(always)]
    pub fn scale(&self, scalar: f64) -> Self {
        Vec2 { x: self.x * scalar, y: self.y * scalar }
    }

    /// True if both components are finite (no NaN or infinity).
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self { x: self.x * scalar, y: self.y * scalar }
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_of_three_four_is_five() {
        assert_eq!(Vec2::new(3.0, 4.0).length(), 5.0);
    }

    #[test]
    fn operators_are_componentwise() {
        let a = Vec2::new(1.5, -2.0);
        let b = Vec2::new(0.5, 4.0);
        assert_eq!(a + b, Vec2::new(2.0, 2.0));
        assert_eq!(a - b, Vec2::new(1.0, -6.0));
        assert_eq!(a * 2.0, a.scale(2.0));
        assert_eq!(-a, Vec2::new(-1.5, 2.0));
    }
}
