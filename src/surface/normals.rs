// src/surface/normals.rs

use super::field::FieldStore;
use crate::math::{
    algorithms::central_difference, pool::ScratchPool, types::Point3D,
    utils::constants::DEGENERATE_NORMAL_SQUARED,
};

/// Berechnet eine Normale pro gepolsterter Gitterzelle aus den drei Feldern.
///
/// Die Tangenten ergeben sich aus zentralen Differenzen von (x, y, z) in u- und
/// v-Richtung, die Normale ist ihr Kreuzprodukt. Ist die quadrierte Länge
/// kleiner als `DEGENERATE_NORMAL_SQUARED`, wird der Nullvektor geschrieben.
pub fn estimate_normals(store: &FieldStore, pool: &mut ScratchPool<f32>, out: &mut Vec<Point3D>) {
    out.clear();
    if store.is_empty() {
        return;
    }

    let size = store.axis(2).padded_len();
    let mut gradients = [pool.acquire(size * 2), pool.acquire(size * 2), pool.acquire(size * 2)];
    for (d, gradient) in gradients.iter_mut().enumerate() {
        central_difference(store.axis(d), gradient);
    }

    out.reserve(size);
    for i in 0..size {
        let du = Point3D::new(gradients[0][2 * i], gradients[1][2 * i], gradients[2][2 * i]);
        let dv = Point3D::new(
            gradients[0][2 * i + 1],
            gradients[1][2 * i + 1],
            gradients[2][2 * i + 1],
        );
        out.push(normal_from_tangents(du, dv));
    }

    for gradient in gradients {
        pool.release(gradient);
    }
}

/// Normierte Normale aus zwei Tangenten, Nullvektor bei entarteter Fläche.
pub fn normal_from_tangents(du: Point3D, dv: Point3D) -> Point3D {
    let n = du.cross(dv);
    let len_sq = n.length_squared();
    if len_sq < DEGENERATE_NORMAL_SQUARED || !len_sq.is_finite() {
        return Point3D::ZERO;
    }
    n / len_sq.sqrt()
}
