// src/math/algorithms/gradient.rs

use crate::math::scalar_field::ScalarField2D;

/// Zentrale Differenzen eines Skalarfeldes in beiden Gitterrichtungen.
///
/// Schreibt pro Sample (zeilenweise) das Paar (∂f/∂u, ∂f/∂v) nach `out`, wobei u die
/// Zeilen- und v die Spaltenrichtung ist. Am Rand werden die Nachbarindizes
/// geklemmt, d.h. der Randwert wird wiederholt (gleiche Konvention wie beim
/// Geisterrand).
pub fn central_difference<F: ScalarField2D + ?Sized>(field: &F, out: &mut Vec<f32>) {
    let rows = field.height();
    let cols = field.width();
    out.clear();
    out.reserve(rows * cols * 2);
    if rows == 0 || cols == 0 {
        return;
    }

    for r in 0..rows {
        let r_prev = r.saturating_sub(1);
        let r_next = (r + 1).min(rows - 1);
        for c in 0..cols {
            let c_prev = c.saturating_sub(1);
            let c_next = (c + 1).min(cols - 1);

            let du = 0.5 * (field.get_value(r_next, c) - field.get_value(r_prev, c));
            let dv = 0.5 * (field.get_value(r, c_next) - field.get_value(r, c_prev));
            out.push(du);
            out.push(dv);
        }
    }
}
