// src/debug/visualization/mod.rs
pub mod svg;

pub use self::svg::{contour_segments, contours_to_svg, save_contours_svg};
