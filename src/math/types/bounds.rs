// src/math/types/bounds.rs

use crate::math::types::Point3D;
use std::fmt;

/// 3D Bounding Box (Axis-Aligned Bounding Box)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3D {
    pub min: Point3D,
    pub max: Point3D,
}

impl Bounds3D {
    /// Leere Bounding Box (min = +∞, max = -∞)
    pub fn empty() -> Self {
        Self {
            min: Point3D::splat(f32::INFINITY),
            max: Point3D::splat(f32::NEG_INFINITY),
        }
    }

    /// Infinite Bounding Box (umschließt alles)
    pub fn infinite() -> Self {
        Self {
            min: Point3D::splat(f32::NEG_INFINITY),
            max: Point3D::splat(f32::INFINITY),
        }
    }

    /// Prüft ob die Bounding Box leer ist
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Prüft ob die Bounding Box gültig (nicht leer und endlich) ist
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.min.is_finite() && self.max.is_finite()
    }

    /// Erweitert die Bounding Box um einen Punkt.
    /// Funktioniert auch auf `empty()`, da min/max komponentenweise gebildet werden.
    pub fn expand_to_include_point(&mut self, point: Point3D) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Klemmt alle Komponenten auf [-limit, limit], z.B. für Shader-Uniforms.
    pub fn clamped(&self, limit: f32) -> Self {
        Self {
            min: self.min.clamp(Point3D::splat(-limit), Point3D::splat(limit)),
            max: self.max.clamp(Point3D::splat(-limit), Point3D::splat(limit)),
        }
    }
}

impl Default for Bounds3D {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Bounds3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Bounds3D(empty)")
        } else {
            write!(f, "Bounds3D({:?} to {:?})", self.min, self.max)
        }
    }
}
