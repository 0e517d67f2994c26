// src/math/algorithms/surface_nets.rs

use crate::math::scalar_field::ScalarField2D;
use crate::math::utils::constants;
use bevy::math::Vec2;

/// Markiert eine Zelle ohne Iso-Linien-Vertex im Index-Scratch.
const NO_VERTEX: u32 = u32::MAX;

/// Ergebnis einer Iso-Linien-Extraktion: ein Liniengraph in Gitterkoordinaten.
///
/// `positions[i].x` ist die (gebrochene) Zeile, `positions[i].y` die Spalte,
/// jeweils im Koordinatensystem des extrahierten Feldes. Jede Kante verbindet
/// zwei Positionen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineGraph {
    pub positions: Vec<Vec2>,
    pub edges: Vec<[u32; 2]>,
}

impl LineGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.edges.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iteriert über die Kanten als Paare von Positionen.
    pub fn segments(&self) -> impl Iterator<Item = [Vec2; 2]> + '_ {
        self.edges
            .iter()
            .map(|e| [self.positions[e[0] as usize], self.positions[e[1] as usize]])
    }

    /// Anzahl der Kanten, die an jedem Vertex hängen.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.positions.len()];
        for e in &self.edges {
            degrees[e[0] as usize] += 1;
            degrees[e[1] as usize] += 1;
        }
        degrees
    }
}

/// 2D Surface Nets: extrahiert Iso-Linien als Graph.
///
/// Jede Zelle, deren vier Ecken den Level kreuzen, erhält genau einen Vertex im
/// Mittel ihrer Kantenschnittpunkte. Zwei benachbarte Zellen werden verbunden,
/// wenn ihre gemeinsame Gitterkante den Level kreuzt. Zellen mit einer nicht
/// endlichen Ecke erzeugen keinen Vertex, sodass Löcher im Feld offen bleiben.
pub struct SurfaceNets;

impl SurfaceNets {
    /// Extrahiert den Liniengraph für `level`.
    ///
    /// `cell_scratch` dient als wiederverwendbarer Index-Puffer (Zelle -> Vertex)
    /// und wird überschrieben.
    pub fn extract<F: ScalarField2D + ?Sized>(
        field: &F,
        level: f32,
        cell_scratch: &mut Vec<u32>,
        graph: &mut LineGraph,
    ) {
        graph.clear();
        cell_scratch.clear();
        if !field.has_cells() {
            return;
        }

        let cell_rows = field.height() - 1;
        let cell_cols = field.width() - 1;
        cell_scratch.resize(cell_rows * cell_cols, NO_VERTEX);

        let below = |r: usize, c: usize| field.get_value(r, c) < level;

        for i in 0..cell_rows {
            for j in 0..cell_cols {
                let corners = [
                    field.get_value(i, j),
                    field.get_value(i, j + 1),
                    field.get_value(i + 1, j),
                    field.get_value(i + 1, j + 1),
                ];
                if corners.iter().any(|v| !v.is_finite()) {
                    continue;
                }

                let mask = corners
                    .iter()
                    .enumerate()
                    .fold(0u8, |m, (k, v)| if *v < level { m | (1 << k) } else { m });
                if mask == 0 || mask == 0b1111 {
                    continue;
                }

                let vertex = Self::cell_vertex(i, j, corners, level);
                let current = graph.positions.len() as u32;
                graph.positions.push(vertex);
                cell_scratch[i * cell_cols + j] = current;

                // Kante zur Zelle darüber über die Gitterkante (i,j)-(i,j+1)
                if i > 0 && below(i, j) != below(i, j + 1) {
                    let neighbor = cell_scratch[(i - 1) * cell_cols + j];
                    if neighbor != NO_VERTEX {
                        if below(i, j) {
                            graph.edges.push([neighbor, current]);
                        } else {
                            graph.edges.push([current, neighbor]);
                        }
                    }
                }

                // Kante zur Zelle links über die Gitterkante (i,j)-(i+1,j)
                if j > 0 && below(i, j) != below(i + 1, j) {
                    let neighbor = cell_scratch[i * cell_cols + j - 1];
                    if neighbor != NO_VERTEX {
                        if below(i, j) {
                            graph.edges.push([current, neighbor]);
                        } else {
                            graph.edges.push([neighbor, current]);
                        }
                    }
                }
            }
        }
    }

    /// Vertex einer Zelle: Mittelwert aller Schnittpunkte auf den vier Zellkanten.
    /// `corners` in der Reihenfolge (i,j), (i,j+1), (i+1,j), (i+1,j+1).
    fn cell_vertex(i: usize, j: usize, corners: [f32; 4], level: f32) -> Vec2 {
        let origin = Vec2::new(i as f32, j as f32);
        let offsets = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
        ];
        // Zellkanten als Eckpaare: oben, unten, links, rechts
        const CELL_EDGES: [(usize, usize); 4] = [(0, 1), (2, 3), (0, 2), (1, 3)];

        let mut sum = Vec2::ZERO;
        let mut crossings = 0;
        for (a, b) in CELL_EDGES {
            let (va, vb) = (corners[a], corners[b]);
            if (va < level) == (vb < level) {
                continue;
            }
            sum += Self::interpolate_intersection(level, va, vb, offsets[a], offsets[b]);
            crossings += 1;
        }
        origin + sum / crossings.max(1) as f32
    }

    fn interpolate_intersection(level: f32, val1: f32, val2: f32, p1: Vec2, p2: Vec2) -> Vec2 {
        if (val1 - val2).abs() < constants::EPSILON {
            return (p1 + p2) * 0.5; // Midpoint
        }
        let t = ((level - val1) / (val2 - val1)).clamp(0.0, 1.0);
        p1.lerp(p2, t)
    }
}
