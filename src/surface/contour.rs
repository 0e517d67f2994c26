// src/surface/contour.rs

use super::field::FieldStore;
use crate::math::{
    algorithms::{LineGraph, SurfaceNets},
    pool::ScratchPool,
};
use bevy::math::Vec2;

/// Anzahl der Floats pro Konturvertex: (u, v, Gitter-x, Gitter-y).
pub const CONTOUR_VERTEX_FLOATS: usize = 4;

/// Begleitachsen (u, v) einer Konturachse d.
#[inline]
pub fn companion_axes(d: usize) -> (usize, usize) {
    ((d + 1) % 3, (d + 2) % 3)
}

/// Schreibt Liniensegmente in zwei Phasen: der erste Endpunkt wird nur
/// vorgemerkt und erst zusammen mit dem zweiten übernommen. So bleibt nie ein
/// einzelner Endpunkt im Puffer zurück.
pub struct SegmentWriter<'a, const N: usize> {
    buffer: &'a mut Vec<f32>,
    staged: Option<[f32; N]>,
    vertex_count: usize,
}

impl<'a, const N: usize> SegmentWriter<'a, N> {
    pub fn new(buffer: &'a mut Vec<f32>) -> Self {
        Self {
            buffer,
            staged: None,
            vertex_count: 0,
        }
    }

    /// Merkt den ersten Endpunkt vor. Ein noch vorgemerkter Punkt wird verworfen.
    pub fn stage(&mut self, vertex: [f32; N]) {
        self.staged = Some(vertex);
    }

    /// Übernimmt vorgemerkten und zweiten Endpunkt. Ohne Vormerkung passiert nichts.
    pub fn commit(&mut self, vertex: [f32; N]) -> bool {
        match self.staged.take() {
            Some(first) => {
                self.buffer.extend_from_slice(&first);
                self.buffer.extend_from_slice(&vertex);
                self.vertex_count += 2;
                true
            }
            None => false,
        }
    }

    /// Verwirft den vorgemerkten Endpunkt.
    pub fn rollback(&mut self) {
        self.staged = None;
    }

    /// Anzahl der übernommenen Vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}

/// Führt die Iso-Linien-Extraktion mit wiederverwendetem Graph-Speicher aus.
#[derive(Debug, Default)]
pub struct IsoLineExtractor {
    graph: LineGraph,
}

impl IsoLineExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extrahiert den Liniengraph von Feld `axis` auf `level` in gepolsterten Koordinaten.
    pub fn extract(
        &mut self,
        store: &FieldStore,
        axis: usize,
        level: f32,
        index_pool: &mut ScratchPool<u32>,
    ) -> &LineGraph {
        let field = store.axis(axis);
        let mut scratch = index_pool.acquire(field.padded_len());
        SurfaceNets::extract(field, level, &mut scratch, &mut self.graph);
        index_pool.release(scratch);
        &self.graph
    }
}

/// Werte der beiden Begleitachsen an einer gepolsterten Position,
/// `None` bei einem Loch in einer der Stützstellen.
pub fn companion_values(store: &FieldStore, axis: usize, p: Vec2) -> Option<(f32, f32)> {
    let (u, v) = companion_axes(axis);
    let cu = store.axis(u).bilinear(p.x, p.y)?;
    let cv = store.axis(v).bilinear(p.x, p.y)?;
    Some((cu, cv))
}

/// Offsets und Counts der Konturlinien einer Achse, indiziert wie die Level.
/// Offsets und Counts zählen in Vertices (je `CONTOUR_VERTEX_FLOATS` Floats).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContourTable {
    pub levels: Vec<f32>,
    pub offsets: Vec<usize>,
    pub counts: Vec<usize>,
}

impl ContourTable {
    pub fn clear(&mut self) {
        self.offsets.clear();
        self.counts.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Bereich des Levels `index` im gemeinsamen Konturpuffer (in Vertices).
    pub fn range(&self, index: usize) -> Option<std::ops::Range<usize>> {
        let offset = *self.offsets.get(index)?;
        let count = *self.counts.get(index)?;
        Some(offset..offset + count)
    }

    pub fn total_vertices(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Extrahiert die Konturlinien aller drei Achsen in einen gemeinsamen Puffer.
///
/// Für jede Achse d und jedes ihrer Level wird der Liniengraph von Feld d
/// gebildet; jeder Endpunkt erhält die bilinear interpolierten Werte der
/// Begleitachsen. Liegt ein Endpunkt in einem Loch, wird die ganze Kante
/// verworfen. Die Gitterkoordinaten werden ungepolstert gespeichert.
pub fn extract_contours(
    store: &FieldStore,
    tables: &mut [ContourTable; 3],
    extractor: &mut IsoLineExtractor,
    index_pool: &mut ScratchPool<u32>,
    out: &mut Vec<f32>,
) {
    out.clear();
    for (axis, table) in tables.iter_mut().enumerate() {
        table.clear();
        if store.is_empty() {
            table.offsets.resize(table.levels.len(), 0);
            table.counts.resize(table.levels.len(), 0);
            continue;
        }

        let ContourTable {
            levels,
            offsets,
            counts,
        } = table;
        for &level in levels.iter() {
            let offset = out.len() / CONTOUR_VERTEX_FLOATS;
            let graph = extractor.extract(store, axis, level, index_pool);

            let mut writer = SegmentWriter::<CONTOUR_VERTEX_FLOATS>::new(out);
            for [a, b] in graph.segments() {
                let Some((au, av)) = companion_values(store, axis, a) else {
                    continue;
                };
                writer.stage([au, av, a.x - 1.0, a.y - 1.0]);

                let Some((bu, bv)) = companion_values(store, axis, b) else {
                    writer.rollback();
                    continue;
                };
                writer.commit([bu, bv, b.x - 1.0, b.y - 1.0]);
            }

            offsets.push(offset);
            counts.push(writer.vertex_count());
        }
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
        let mut pool = ScratchPool::new();
        store
            .set_field(field, CoordinateSource::Indices, &mut pool)
            .unwrap();
        store
    }

    fn run(store: &FieldStore, levels: [Vec<f32>; 3]) -> ([ContourTable; 3], Vec<f32>) {
        let mut tables: [ContourTable; 3] = Default::default();
        for (table, l) in tables.iter_mut().zip(levels) {
            table.levels = l;
        }
        let mut out = Vec::new();
        extract_contours(
            store,
            &mut tables,
            &mut IsoLineExtractor::new(),
            &mut ScratchPool::new(),
            &mut out,
        );
        (tables, out)
    }

    #[test]
    fn test_segment_writer_two_phase() {
        let mut buffer = vec![9.0, 9.0];
        let mut writer = SegmentWriter::<2>::new(&mut buffer);
        assert!(!writer.commit([1.0, 1.0]));
        writer.stage([1.0, 2.0]);
        writer.rollback();
        assert!(!writer.commit([3.0, 4.0]));
        writer.stage([1.0, 2.0]);
        assert!(writer.commit([3.0, 4.0]));
        assert_eq!(writer.vertex_count(), 2);
        assert_eq!(buffer, vec![9.0, 9.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_companion_axes() {
        assert_eq!(companion_axes(0), (1, 2));
        assert_eq!(companion_axes(1), (2, 0));
        assert_eq!(companion_axes(2), (0, 1));
    }

    #[test]
    fn test_height_contour_reprojects_coordinates() {
        // z = c: Level 1.5 ergibt eine Linie bei Spalte 1.5 über alle Zeilen
        let field = Grid::from_fn(4, 4, |_, c| c as f32).unwrap();
        let store = store_for(&field);
        let (tables, out) = run(&store, [vec![], vec![], vec![1.5]]);

        assert_eq!(tables[2].offsets, vec![0]);
        let count = tables[2].counts[0];
        assert!(count > 0);
        assert_eq!(count % 2, 0);
        assert_eq!(out.len(), count * CONTOUR_VERTEX_FLOATS);

        for vertex in out.chunks(CONTOUR_VERTEX_FLOATS) {
            // u = Welt-X (Zeile), v = Welt-Y (Spalte)
            assert_abs_diff_eq!(vertex[1], 1.5, epsilon = 1e-5);
            assert_abs_diff_eq!(vertex[3], 1.5, epsilon = 1e-5);
            assert!(vertex[0] >= 0.0 && vertex[0] <= 3.0);
        }
    }

    #[test]
    fn test_level_outside_range_records_offset_and_zero_count() {
        let field = Grid::from_fn(4, 4, |r, c| (r + c) as f32).unwrap();
        let store = store_for(&field);
        let (tables, out) = run(&store, [vec![], vec![], vec![2.5, 100.0, 3.5]]);
        assert_eq!(tables[2].counts.len(), 3);
        assert_eq!(tables[2].counts[1], 0);
        // Offset des leeren Levels zeigt auf das Ende des vorherigen
        assert_eq!(tables[2].offsets[1], tables[2].counts[0]);
        assert_eq!(tables[2].offsets[2], tables[2].counts[0]);
        assert_eq!(out.len(), tables[2].total_vertices() * CONTOUR_VERTEX_FLOATS);
    }

    #[test]
    fn test_axes_share_one_buffer() {
        let field = Grid::from_fn(5, 5, |r, c| (r * c) as f32).unwrap();
        let store = store_for(&field);
        let (tables, out) = run(&store, [vec![1.5], vec![2.5], vec![4.0]]);
        let x_range = tables[0].range(0).unwrap();
        let y_range = tables[1].range(0).unwrap();
        let z_range = tables[2].range(0).unwrap();
        assert_eq!(x_range.start, 0);
        assert_eq!(y_range.start, x_range.end);
        assert_eq!(z_range.start, y_range.end);
        assert_eq!(z_range.end * CONTOUR_VERTEX_FLOATS, out.len());
        assert!(x_range.len() > 0 && y_range.len() > 0 && z_range.len() > 0);

        // Für Achse 0 (x = Zeile) liegt die Linie bei Zeile 1.5, u = Y, v = Z
        for vertex in out[..x_range.end * CONTOUR_VERTEX_FLOATS].chunks(CONTOUR_VERTEX_FLOATS) {
            assert_abs_diff_eq!(vertex[2], 1.5, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_companion_hole_drops_edges_without_dangling_vertices() {
        // Höhe z = r, Loch im Höhenfeld betrifft Achse-0-Konturen über die Begleitachse z
        let mut field = Grid::from_fn(6, 6, |r, _| r as f32).unwrap();
        field.set(2, 3, f32::NAN);
        let store = store_for(&field);
        let (tables, out) = run(&store, [vec![2.5], vec![], vec![]]);
        let count = tables[0].counts[0];
        assert_eq!(count % 2, 0);
        assert_eq!(out.len(), count * CONTOUR_VERTEX_FLOATS);
        assert!(out.iter().all(|v| v.is_finite()));

        let intact = Grid::from_fn(6, 6, |r, _| r as f32).unwrap();
        let (full_tables, _) = run(&store_for(&intact), [vec![2.5], vec![], vec![]]);
        assert!(count < full_tables[0].counts[0]);
    }

    #[test]
    fn test_flat_field_at_level_is_even() {
        let field = Grid::from_fn(4, 4, |_, _| 1.0).unwrap();
        let store = store_for(&field);
        let (tables, out) = run(&store, [vec![], vec![], vec![1.0]]);
        assert_eq!(tables[2].counts[0] % 2, 0);
        assert_eq!(out.len() % (2 * CONTOUR_VERTEX_FLOATS), 0);
    }

    #[test]
    fn test_empty_levels_leave_tables_empty() {
        let field = Grid::from_fn(3, 3, |r, c| (r + c) as f32).unwrap();
        let store = store_for(&field);
        let (tables, out) = run(&store, [vec![], vec![], vec![]]);
        assert!(tables.iter().all(ContourTable::is_empty));
        assert!(out.is_empty());
    }
}
