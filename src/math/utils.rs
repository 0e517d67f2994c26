// src/math/utils.rs

/// Mathematische Konstanten
pub mod constants {
    pub const EPSILON: f32 = 1e-6;
    /// Unterhalb dieser quadrierten Länge gilt eine Normale als entartet.
    pub const DEGENERATE_NORMAL_SQUARED: f32 = 1e-6;
    /// Anzahl der Farbstufen einer Colormap.
    pub const COLORMAP_SHADES: usize = 256;
    /// Betragsgrenze für Clip-Bounds, bevor sie an den Renderer gehen.
    pub const CLIP_LIMIT: f32 = 1e8;
}

/// Vergleichs- und Interpolationshelfer
pub mod comparison {
    /// Lineare Interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Elementweiser Vergleich zweier Level-Listen (inkl. Länge).
    pub fn same_levels(a: &[f32], b: &[f32]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
    }
}

/// Hilfsfunktionen für bilineare Interpolation
pub mod interpolation {
    /// Zerlegt eine Gitterkoordinate in ganzzahligen Index und Nachkommaanteil.
    /// Negative Koordinaten werden auf 0 geklemmt.
    pub fn split_coordinate(x: f32) -> (usize, f32) {
        let floor = x.floor();
        if floor < 0.0 {
            return (0, 0.0);
        }
        (floor as usize, x - floor)
    }

    /// Gewichte der vier Ecken in der Reihenfolge (0,0), (0,1), (1,0), (1,1).
    pub fn bilinear_weights(fx: f32, fy: f32) -> [f32; 4] {
        let hx = 1.0 - fx;
        let hy = 1.0 - fy;
        [hx * hy, hx * fy, fx * hy, fx * fy]
    }
}
