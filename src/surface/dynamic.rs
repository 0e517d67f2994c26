// src/surface/dynamic.rs

use super::contour::{IsoLineExtractor, SegmentWriter, companion_values};
use super::field::FieldStore;
use crate::math::pool::ScratchPool;
use serde::{Deserialize, Serialize};

/// Anzahl der Floats pro dynamischem Konturvertex: (u, v).
pub const DYNAMIC_VERTEX_FLOATS: usize = 2;

/// Auswahl eines Punktes auf der Oberfläche, typischerweise aus einem Pick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Interpolierte Weltposition.
    pub position: [f32; 3],
    /// Weltposition des nächstgelegenen Gitterpunkts.
    pub data_coordinate: [f32; 3],
    /// Index des nächstgelegenen Konturlevels pro Achse, -1 ohne Level.
    pub level: [i32; 3],
}

impl Selection {
    /// Die Level der dynamischen Konturen: Gitterpunkt oder interpolierte Position.
    pub fn dynamic_levels(&self, snap_to_data: bool) -> [f32; 3] {
        if snap_to_data {
            self.data_coordinate
        } else {
            self.position
        }
    }
}

/// Zustand der drei dynamischen Konturlinien, eine pro Achse.
#[derive(Debug, Clone, Default)]
pub struct DynamicContours {
    levels: [Option<f32>; 3],
    offsets: [usize; 3],
    counts: [usize; 3],
    buffer: Vec<f32>,
}

impl DynamicContours {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn levels(&self) -> [Option<f32>; 3] {
        self.levels
    }

    /// Offsets in Vertices (je `DYNAMIC_VERTEX_FLOATS` Floats).
    pub fn offsets(&self) -> [usize; 3] {
        self.offsets
    }

    pub fn counts(&self) -> [usize; 3] {
        self.counts
    }

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    /// Setzt alle drei Linien zurück (keine Auswahl).
    pub fn clear(&mut self) {
        self.levels = [None; 3];
        self.counts = [0; 3];
    }

    /// Prüft, ob jede aktive Achse bereits auf dem gewünschten Level steht.
    pub fn is_current(&self, levels: &[f32; 3], enabled: &[bool; 3]) -> bool {
        (0..3).all(|d| !enabled[d] || self.levels[d] == Some(levels[d]))
    }

    /// Extrahiert die dynamischen Konturen neu, sofern sich ein aktiver Level geändert hat.
    /// Liefert `true`, wenn der Puffer neu geschrieben wurde.
    pub fn update(
        &mut self,
        store: &FieldStore,
        levels: [f32; 3],
        enabled: [bool; 3],
        extractor: &mut IsoLineExtractor,
        index_pool: &mut ScratchPool<u32>,
    ) -> bool {
        if self.is_current(&levels, &enabled) {
            return false;
        }

        self.buffer.clear();
        for (d, (&level, &on)) in levels.iter().zip(&enabled).enumerate() {
            if !on {
                self.levels[d] = None;
                self.counts[d] = 0;
                continue;
            }

            self.levels[d] = Some(level);
            self.offsets[d] = self.buffer.len() / DYNAMIC_VERTEX_FLOATS;
            if store.is_empty() {
                self.counts[d] = 0;
                continue;
            }

            let graph = extractor.extract(store, d, level, index_pool);
            let mut writer = SegmentWriter::<DYNAMIC_VERTEX_FLOATS>::new(&mut self.buffer);
            for [a, b] in graph.segments() {
                let Some((au, av)) = companion_values(store, d, a) else {
                    continue;
                };
                writer.stage([au, av]);
                let Some((bu, bv)) = companion_values(store, d, b) else {
                    writer.rollback();
                    continue;
                };
                writer.commit([bu, bv]);
            }
            self.counts[d] = writer.vertex_count();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::types::Grid;
    use crate::surface::field::CoordinateSource;
    use approx::assert_abs_diff_eq;

    fn store_for(field: &Grid) -> FieldStore {
        let mut store = FieldStore::new();
        store
            .set_field(field, CoordinateSource::Indices, &mut ScratchPool::new())
            .unwrap();
        store
    }

    fn selection(position: [f32; 3]) -> Selection {
        Selection {
            position,
            data_coordinate: position.map(f32::round),
            level: [-1; 3],
        }
    }

    #[test]
    fn test_dynamic_levels_snap_to_data() {
        let s = selection([1.4, 2.6, 0.3]);
        assert_eq!(s.dynamic_levels(false), [1.4, 2.6, 0.3]);
        assert_eq!(s.dynamic_levels(true), [1.0, 3.0, 0.0]);
    }

    #[test]
    fn test_update_builds_three_lines() {
        let field = Grid::from_fn(5, 5, |r, c| (r + c) as f32).unwrap();
        let store = store_for(&field);
        let mut dynamic = DynamicContours::new();
        let mut extractor = IsoLineExtractor::new();
        let mut pool = ScratchPool::new();

        assert!(dynamic.update(&store, [1.5, 2.5, 3.5], [true; 3], &mut extractor, &mut pool));
        let counts = dynamic.counts();
        assert!(counts.iter().all(|c| *c > 0 && c % 2 == 0));
        assert_eq!(dynamic.offsets()[1], counts[0]);
        assert_eq!(dynamic.offsets()[2], counts[0] + counts[1]);
        assert_eq!(
            dynamic.buffer().len(),
            counts.iter().sum::<usize>() * DYNAMIC_VERTEX_FLOATS
        );

        // Achse 2 (Höhe = r + c = 3.5): Begleitwerte sind (x, y) mit x + y = 3.5
        let start = dynamic.offsets()[2] * DYNAMIC_VERTEX_FLOATS;
        for v in dynamic.buffer()[start..].chunks(DYNAMIC_VERTEX_FLOATS) {
            assert_abs_diff_eq!(v[0] + v[1], 3.5, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_unchanged_levels_are_a_no_op() {
        let field = Grid::from_fn(4, 4, |r, c| (r * c) as f32).unwrap();
        let store = store_for(&field);
        let mut dynamic = DynamicContours::new();
        let mut extractor = IsoLineExtractor::new();
        let mut pool = ScratchPool::new();

        assert!(dynamic.update(&store, [1.0, 1.0, 2.0], [true; 3], &mut extractor, &mut pool));
        let before = dynamic.buffer().to_vec();
        assert!(!dynamic.update(&store, [1.0, 1.0, 2.0], [true; 3], &mut extractor, &mut pool));
        assert_eq!(dynamic.buffer(), before.as_slice());

        // Deaktivierte Achse ignoriert Änderungen ihres Levels
        let mut d2 = dynamic.clone();
        assert!(!d2.update(&store, [1.0, 1.0, 9.0], [true, true, false], &mut extractor, &mut pool));
        assert!(d2.update(&store, [1.0, 2.0, 9.0], [true, true, false], &mut extractor, &mut pool));
        assert_eq!(d2.levels()[2], None);
        assert_eq!(d2.counts()[2], 0);
        assert!(!d2.update(&store, [1.0, 2.0, 5.0], [true, true, false], &mut extractor, &mut pool));
    }

    #[test]
    fn test_nan_level_is_never_current() {
        let field = Grid::from_fn(3, 3, |r, c| (r + c) as f32).unwrap();
        let store = store_for(&field);
        let mut dynamic = DynamicContours::new();
        let mut extractor = IsoLineExtractor::new();
        let mut pool = ScratchPool::new();
        let levels = [f32::NAN, 1.0, 1.0];
        assert!(dynamic.update(&store, levels, [true; 3], &mut extractor, &mut pool));
        assert_eq!(dynamic.counts()[0], 0);
        assert!(!dynamic.is_current(&levels, &[true; 3]));
    }

    #[test]
    fn test_clear_resets_levels_and_counts() {
        let field = Grid::from_fn(3, 3, |r, c| (r + c) as f32).unwrap();
        let store = store_for(&field);
        let mut dynamic = DynamicContours::new();
        dynamic.update(
            &store,
            [0.5, 0.5, 1.5],
            [true; 3],
            &mut IsoLineExtractor::new(),
            &mut ScratchPool::new(),
        );
        dynamic.clear();
        assert_eq!(dynamic.levels(), [None; 3]);
        assert_eq!(dynamic.counts(), [0; 3]);
    }

    #[test]
    fn test_hole_drops_whole_edges() {
        let mut field = Grid::from_fn(6, 6, |r, _| r as f32).unwrap();
        field.set(2, 3, f32::INFINITY);
        let store = store_for(&field);
        let mut dynamic = DynamicContours::new();
        dynamic.update(
            &store,
            [2.5, 0.0, 0.0],
            [true, false, false],
            &mut IsoLineExtractor::new(),
            &mut ScratchPool::new(),
        );
        assert_eq!(dynamic.counts()[0] % 2, 0);
        assert!(dynamic.buffer().iter().all(|v| v.is_finite()));
    }
}
