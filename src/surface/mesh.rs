// src/surface/mesh.rs

use super::field::FieldStore;
use crate::math::types::{Bounds3D, Point3D};

/// Anzahl der Floats pro Mesh-Vertex im gepackten Puffer.
pub const MESH_VERTEX_FLOATS: usize = 9;

/// Zwei Dreiecke pro Zelle als (Zeilen-, Spalten-)Offsets der Zellecken.
const QUAD: [(usize, usize); 6] = [(0, 0), (0, 1), (1, 0), (1, 1), (1, 0), (0, 1)];

/// Ein Vertex des Oberflächen-Meshes.
///
/// Layout im Puffer: gridRow, gridCol, worldX, worldY, height, reserviert,
/// normalX, normalY, normalZ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub grid_row: f32,
    pub grid_col: f32,
    pub position: Point3D,
    pub normal: Point3D,
}

impl MeshVertex {
    pub fn to_array(&self) -> [f32; MESH_VERTEX_FLOATS] {
        [
            self.grid_row,
            self.grid_col,
            self.position.x,
            self.position.y,
            self.position.z,
            0.0,
            self.normal.x,
            self.normal.y,
            self.normal.z,
        ]
    }

    /// Liest einen Vertex aus einem gepackten Puffer (Index in Vertices).
    pub fn read(buffer: &[f32], index: usize) -> Option<Self> {
        let start = index * MESH_VERTEX_FLOATS;
        let v = buffer.get(start..start + MESH_VERTEX_FLOATS)?;
        Some(Self {
            grid_row: v[0],
            grid_col: v[1],
            position: Point3D::new(v[2], v[3], v[4]),
            normal: Point3D::new(v[6], v[7], v[8]),
        })
    }
}

/// Ergebnis eines Mesh-Aufbaus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub skipped_cells: usize,
    pub bounds: Bounds3D,
}

/// Baut das trianguliertes Oberflächen-Mesh (6 Vertices pro gültiger Zelle).
///
/// Eine Zelle wird vollständig übersprungen, wenn eine ihrer vier Ecken in
/// irgendeinem der drei Felder nicht endlich ist. Die Bounding Box umfasst nur
/// die tatsächlich geschriebenen Vertices.
pub fn build_mesh(store: &FieldStore, normals: &[Point3D], out: &mut Vec<f32>) -> MeshStats {
    out.clear();
    let mut bounds = Bounds3D::empty();
    let mut vertex_count = 0;
    let mut skipped_cells = 0;

    let (rows, cols) = store.shape();
    if rows < 2 || cols < 2 {
        return MeshStats {
            vertex_count,
            skipped_cells,
            bounds,
        };
    }

    let padded_cols = cols + 2;
    out.reserve((rows - 1) * (cols - 1) * 6 * MESH_VERTEX_FLOATS);

    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let has_hole = (0..2)
                .flat_map(|dx| (0..2).map(move |dy| (dx, dy)))
                .any(|(dx, dy)| !store.is_finite_at(1 + i + dx, 1 + j + dy));
            if has_hole {
                skipped_cells += 1;
                continue;
            }

            for (dr, dc) in QUAD {
                let r = i + dr;
                let c = j + dc;
                let position = store.value_at(r + 1, c + 1);
                let vertex = MeshVertex {
                    grid_row: r as f32,
                    grid_col: c as f32,
                    position,
                    normal: normals[(r + 1) * padded_cols + c + 1],
                };
                out.extend_from_slice(&vertex.to_array());
                bounds.expand_to_include_point(position);
                vertex_count += 1;
            }
        }
    }

    MeshStats {
        vertex_count,
        skipped_cells,
        bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{pool::ScratchPool, types::Grid};
    use crate::surface::{field::CoordinateSource, normals::estimate_normals};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn build(field: &Grid) -> (Vec<f32>, MeshStats) {
        let mut store = FieldStore::new();
        let mut pool = ScratchPool::new();
        store
            .set_field(field, CoordinateSource::Indices, &mut pool)
            .unwrap();
        let mut normals = Vec::new();
        estimate_normals(&store, &mut pool, &mut normals);
        let mut out = Vec::new();
        let stats = build_mesh(&store, &normals, &mut out);
        (out, stats)
    }

    #[test]
    fn test_two_by_two_example() {
        let field = Grid::from_rows(vec![vec![0.0, 1.0], vec![1.0, 2.0]]).unwrap();
        let (buffer, stats) = build(&field);
        assert_eq!(stats.vertex_count, 6);
        assert_eq!(buffer.len(), 6 * MESH_VERTEX_FLOATS);
        assert_eq!(stats.bounds.min, Point3D::new(0.0, 0.0, 0.0));
        assert_eq!(stats.bounds.max, Point3D::new(1.0, 1.0, 2.0));

        // Reihenfolge der Ecken folgt dem festen Quad-Template
        let v1 = MeshVertex::read(&buffer, 1).unwrap();
        assert_eq!((v1.grid_row, v1.grid_col), (0.0, 1.0));
        assert_eq!(v1.position, Point3D::new(0.0, 1.0, 1.0));
        let v3 = MeshVertex::read(&buffer, 3).unwrap();
        assert_eq!((v3.grid_row, v3.grid_col), (1.0, 1.0));
        assert_eq!(v3.position.z, 2.0);
        assert!(MeshVertex::read(&buffer, 6).is_none());
    }

    #[test]
    fn test_full_grid_vertex_count_and_bounds() {
        let field = Grid::from_fn(5, 7, |r, c| (r as f32) * 0.5 - c as f32).unwrap();
        let (_, stats) = build(&field);
        assert_eq!(stats.vertex_count, 6 * 4 * 6);
        assert_eq!(stats.skipped_cells, 0);
        assert_eq!(stats.bounds.min, Point3D::new(0.0, 0.0, -6.0));
        assert_eq!(stats.bounds.max, Point3D::new(4.0, 6.0, 2.0));
    }

    #[test]
    fn test_single_nan_removes_adjacent_cells() {
        let mut field = Grid::from_fn(5, 5, |r, c| (r + c) as f32).unwrap();
        let full = build(&field).1.vertex_count;

        // Innerer Punkt: 4 Zellen
        field.set(2, 2, f32::NAN);
        let (_, stats) = build(&field);
        assert_eq!(stats.vertex_count, full - 4 * 6);
        assert_eq!(stats.skipped_cells, 4);
        assert!(stats.bounds.is_valid());

        // Eckpunkt: 1 Zelle, Bounding Box ohne diese Ecke
        let mut corner = Grid::from_fn(3, 3, |r, c| (r + c) as f32).unwrap();
        corner.set(2, 2, f32::INFINITY);
        let (_, stats) = build(&corner);
        assert_eq!(stats.vertex_count, 3 * 6);
        assert_eq!(stats.bounds.max.z, 3.0);
    }

    #[test]
    fn test_all_holes_leave_empty_bounds() {
        let field = Grid::from_fn(3, 3, |_, _| f32::NAN).unwrap();
        let (buffer, stats) = build(&field);
        assert_eq!(stats.vertex_count, 0);
        assert!(buffer.is_empty());
        assert_eq!(stats.bounds, Bounds3D::empty());
    }

    #[test]
    fn test_single_row_emits_nothing() {
        let field = Grid::new(1, 4, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let (_, stats) = build(&field);
        assert_eq!(stats.vertex_count, 0);
        assert!(stats.bounds.is_empty());
    }

    #[test]
    fn test_random_holes_never_emit_non_finite_vertices() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut field = Grid::from_fn(12, 9, |r, c| ((r * c) as f32).sin()).unwrap();
        for _ in 0..10 {
            let r = rng.random_range(0..12);
            let c = rng.random_range(0..9);
            field.set(r, c, f32::NAN);
        }
        let (buffer, stats) = build(&field);
        assert_eq!(buffer.len(), stats.vertex_count * MESH_VERTEX_FLOATS);
        assert_eq!(stats.vertex_count % 6, 0);
        assert_eq!(stats.vertex_count / 6 + stats.skipped_cells, 11 * 8);
        assert!(buffer.iter().all(|v| v.is_finite()));
    }
}
