// src/math/algorithms/mod.rs

pub mod gradient;
pub mod surface_nets;

pub use self::gradient::central_difference;
pub use self::surface_nets::{LineGraph, SurfaceNets};
