// src/colormap.rs
// Benannte Farbverläufe für die Höhen-Einfärbung der Oberfläche.

use crate::math::utils::{comparison::lerp, constants::COLORMAP_SHADES};
use crate::surface::{Rgba, SurfaceError, SurfaceResult};

/// Stützstellen (Position in [0, 1], RGB in 0..=255).
type Stop = (f32, [u8; 3]);

const JET: &[Stop] = &[
    (0.0, [0, 0, 131]),
    (0.125, [0, 60, 170]),
    (0.375, [5, 255, 255]),
    (0.625, [255, 255, 0]),
    (0.875, [250, 0, 0]),
    (1.0, [128, 0, 0]),
];

const HOT: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.3, [230, 0, 0]),
    (0.6, [255, 210, 0]),
    (1.0, [255, 255, 255]),
];

const GREYS: &[Stop] = &[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])];

const VIRIDIS: &[Stop] = &[
    (0.0, [68, 1, 84]),
    (0.13, [71, 44, 122]),
    (0.25, [59, 81, 139]),
    (0.38, [44, 113, 142]),
    (0.5, [33, 144, 141]),
    (0.63, [39, 173, 129]),
    (0.75, [92, 200, 99]),
    (0.88, [170, 220, 50]),
    (1.0, [253, 231, 37]),
];

/// Verfügbare Farbverläufe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMap {
    Jet,
    Hot,
    Greys,
    Viridis,
}

impl ColorMap {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "jet" => Some(ColorMap::Jet),
            "hot" => Some(ColorMap::Hot),
            "greys" | "grays" => Some(ColorMap::Greys),
            "viridis" => Some(ColorMap::Viridis),
            _ => None,
        }
    }

    fn stops(self) -> &'static [Stop] {
        match self {
            ColorMap::Jet => JET,
            ColorMap::Hot => HOT,
            ColorMap::Greys => GREYS,
            ColorMap::Viridis => VIRIDIS,
        }
    }

    /// Farbe bei `t` in [0, 1], stückweise linear zwischen den Stützstellen.
    pub fn map_value(self, t: f32) -> Rgba {
        let stops = self.stops();
        let t = t.clamp(0.0, 1.0);
        let upper = stops
            .iter()
            .position(|(p, _)| *p >= t)
            .unwrap_or(stops.len() - 1)
            .max(1);
        let (p0, c0) = stops[upper - 1];
        let (p1, c1) = stops[upper];
        let s = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };

        let channel = |i: usize| lerp(f32::from(c0[i]), f32::from(c1[i]), s) / 255.0;
        [channel(0), channel(1), channel(2), 1.0]
    }

    /// `COLORMAP_SHADES` gleichmäßig verteilte Farben.
    pub fn samples(self) -> Vec<Rgba> {
        (0..COLORMAP_SHADES)
            .map(|i| self.map_value(i as f32 / (COLORMAP_SHADES - 1) as f32))
            .collect()
    }
}

/// Erzeugt die Farbtabelle für einen Colormap-Namen.
pub fn generate(name: &str) -> SurfaceResult<Vec<Rgba>> {
    ColorMap::from_name(name)
        .map(ColorMap::samples)
        .ok_or_else(|| SurfaceError::UnknownColormap {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_generate_has_256_shades_in_unit_range() {
        for name in ["jet", "hot", "greys", "viridis"] {
            let colors = generate(name).unwrap();
            assert_eq!(colors.len(), 256);
            assert!(
                colors
                    .iter()
                    .flatten()
                    .all(|c| (0.0..=1.0).contains(c))
            );
            assert!(colors.iter().all(|c| c[3] == 1.0));
        }
    }

    #[test]
    fn test_endpoints_match_stops() {
        let jet = generate("jet").unwrap();
        assert_abs_diff_eq!(jet[0][2], 131.0 / 255.0, epsilon = 1e-6);
        assert_abs_diff_eq!(jet[255][0], 128.0 / 255.0, epsilon = 1e-6);

        let greys = generate("Greys").unwrap();
        assert_eq!(greys[0], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(greys[255], [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_map_value_interpolates() {
        let mid = ColorMap::Greys.map_value(0.5);
        assert_abs_diff_eq!(mid[0], 0.5, epsilon = 1e-6);
        // Zwischen (0.3, rot) und (0.6, gelb-orange)
        let hot = ColorMap::Hot.map_value(0.45);
        assert_abs_diff_eq!(hot[1], 105.0 / 255.0, epsilon = 1e-4);
        assert_eq!(ColorMap::Hot.map_value(-1.0), ColorMap::Hot.map_value(0.0));
    }

    #[test]
    fn test_unknown_name_fails() {
        let err = generate("rainbow-soft").unwrap_err();
        assert!(matches!(err, SurfaceError::UnknownColormap { ref name } if name == "rainbow-soft"));
    }
}
