// src/math/types/mod.rs
pub mod bounds;
pub mod grid;

pub use bounds::*;
pub use grid::*;

// Re-export häufig verwendete externe Typen
pub use bevy::math::Vec3;

// Einheitliche Typen für das gesamte Modul
pub type Point3D = Vec3;
