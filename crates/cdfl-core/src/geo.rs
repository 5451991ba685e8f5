//! Planar coordinate type.
//!
//! Road coordinates are treated as a flat 2-D plane in degree units; all
//! distances are Euclidean in those units.  `f64` is used because per-second
//! displacements are around 1e-4 degrees, below what `f32` resolves at
//! typical latitudes.

use std::ops::{Add, Mul, Sub};

/// A planar point (or displacement vector) with latitude/longitude axes.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { lat: 0.0, lon: 0.0 };

    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Euclidean length when used as a vector.
    #[inline]
    pub fn norm(self) -> f64 {
        self.lat.hypot(self.lon)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other - self).norm()
    }

    #[inline]
    pub fn distance_sq(self, other: Point) -> f64 {
        let d = other - self;
        d.lat * d.lat + d.lon * d.lon
    }

    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.lat * other.lat + self.lon * other.lon
    }

    /// Unit vector in the same direction, or the zero vector when `self` has
    /// zero length.
    #[inline]
    pub fn normalized(self) -> Point {
        let n = self.norm();
        if n > 0.0 { self * (1.0 / n) } else { Point::ORIGIN }
    }

    /// Cosine of the angle between two vectors; 0 if either is zero-length.
    pub fn cosine(self, other: Point) -> f64 {
        let denom = self.norm() * other.norm();
        if denom > 0.0 { self.dot(other) / denom } else { 0.0 }
    }

    /// Linear interpolation: `self + (to - self) * t`.
    #[inline]
    pub fn lerp(self, to: Point, t: f64) -> Point {
        self + (to - self) * t
    }

    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.lat + rhs.lat, self.lon + rhs.lon)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.lat - rhs.lat, self.lon - rhs.lon)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, k: f64) -> Point {
        Point::new(self.lat * k, self.lon * k)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
