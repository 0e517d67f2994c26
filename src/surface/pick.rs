// src/surface/pick.rs

use super::field::FieldStore;
use crate::math::types::Point3D;
use serde::{Deserialize, Serialize};

/// Rohes Pick-Sample, wie es ein Pick-Pass in den Framebuffer schreibt.
///
/// `value[0]` und `value[1]` tragen die groben 8-Bit-Anteile der normierten
/// Gitterkoordinate, `value[2]` die 4-Bit-Feinanteile (hohes Nibble: Zeile,
/// niedriges Nibble: Spalte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickSample {
    pub id: u32,
    pub value: [u8; 3],
}

impl PickSample {
    /// Kodiert eine ungepolsterte Gitterposition für ein Feld der Größe rows×cols.
    pub fn encode(x: f32, y: f32, rows: usize, cols: usize, id: u32) -> Self {
        let (xc, xf) = encode_axis(x, rows);
        let (yc, yf) = encode_axis(y, cols);
        Self {
            id,
            value: [xc, yc, (xf << 4) | yf],
        }
    }

    /// Gebrochene, ungepolsterte Gitterkoordinaten (Zeile, Spalte).
    pub fn grid_position(&self, rows: usize, cols: usize) -> (f32, f32) {
        let hi = f32::from(self.value[2] >> 4);
        let lo = f32::from(self.value[2] & 15);
        let x = rows as f32 * (f32::from(self.value[0]) + hi / 16.0) / 255.0;
        let y = cols as f32 * (f32::from(self.value[1]) + lo / 16.0) / 255.0;
        (x, y)
    }
}

fn encode_axis(coord: f32, extent: usize) -> (u8, u8) {
    if extent == 0 {
        return (0, 0);
    }
    let t = (coord / extent as f32).clamp(0.0, 1.0) * 255.0;
    let coarse = t.floor();
    let fine = ((t - coarse) * 16.0).round().min(15.0);
    (coarse as u8, fine as u8)
}

/// Ergebnis einer Pick-Abfrage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    /// Bilinear interpolierte Werte der drei Felder.
    pub position: Point3D,
    /// Nächstgelegener ungepolsterter Gitterindex (Zeile, Spalte).
    pub index: [usize; 2],
    /// Normierte Koordinate in [0, 1]².
    pub uv: [f32; 2],
    /// Nächstgelegenes Konturlevel pro Achse, -1 bei leerer Level-Liste.
    pub level: [i32; 3],
}

/// Index des Levels, das `value` am nächsten liegt.
///
/// Sucht zunächst das größte Level `<= value`. Liegt `value` unter allen Leveln,
/// ist das Ergebnis 0. Das nächsthöhere Level gewinnt nur, wenn es echt näher liegt.
pub fn nearest_level(levels: &[f32], value: f32) -> i32 {
    let at_or_below = levels.partition_point(|l| *l <= value);
    if at_or_below == 0 {
        return if levels.is_empty() { -1 } else { 0 };
    }

    let mut index = at_or_below - 1;
    if let Some(next) = levels.get(index + 1) {
        if (levels[index] - value).abs() > (next - value).abs() {
            index += 1;
        }
    }
    index as i32
}

/// Löst ein Pick-Sample gegen die Felder und Level-Listen auf.
/// Liefert `None`, wenn die ID nicht passt oder kein Feld gesetzt ist.
pub fn pick(
    store: &FieldStore,
    levels: [&[f32]; 3],
    pick_id: u32,
    sample: &PickSample,
) -> Option<PickResult> {
    if sample.id != pick_id || store.is_empty() {
        return None;
    }

    let (rows, cols) = store.shape();
    let (x, y) = sample.grid_position(rows, cols);
    let position = store.interpolate(x, y);

    let nearest = |coord: f32, extent: usize| {
        let i = coord.floor();
        let rounded = if coord - i < 0.5 { i } else { i + 1.0 };
        (rounded as usize).min(extent - 1)
    };

    let p = position.to_array();
    Some(PickResult {
        position,
        index: [nearest(x, rows), nearest(y, cols)],
        uv: [
            (x / rows as f32).clamp(0.0, 1.0),
            (y / cols as f32).clamp(0.0, 1.0),
        ],
        level: [
            nearest_level(levels[0], p[0]),
            nearest_level(levels[1], p[1]),
            nearest_level(levels[2], p[2]),
        ],
    })
}
