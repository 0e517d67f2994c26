// src/surface/field.rs

use super::error::{SurfaceError, SurfaceResult};
use crate::math::{
    pool::ScratchPool,
    types::{Grid, PaddedGrid, Point3D},
    utils::interpolation,
};

/// Herkunft der x/y-Weltkoordinaten eines Feldes.
#[derive(Debug, Clone, Copy)]
pub enum CoordinateSource<'a> {
    /// Explizite Koordinatenraster, je eines für x und y.
    Grids(&'a [Grid]),
    /// 1D-Ticks: eine Liste pro Zeile, eine pro Spalte.
    Ticks(&'a [Vec<f32>]),
    /// Zeilen-/Spaltenindizes (0-basiert).
    Indices,
}

impl<'a> CoordinateSource<'a> {
    /// Explizite Raster haben Vorrang vor Ticks; ohne beides werden Indizes verwendet.
    pub fn select(coords: Option<&'a [Grid]>, ticks: Option<&'a [Vec<f32>]>) -> Self {
        match (coords, ticks) {
            (Some(grids), _) => CoordinateSource::Grids(grids),
            (None, Some(ticks)) => CoordinateSource::Ticks(ticks),
            (None, None) => CoordinateSource::Indices,
        }
    }

    /// Prüft Arität und Ausdehnung gegen das Höhenfeld, ohne etwas zu verändern.
    pub fn validate(&self, field: &Grid) -> SurfaceResult<()> {
        let shape = [field.rows(), field.cols()];
        match self {
            CoordinateSource::Grids(grids) => {
                if grids.len() != 2 {
                    return Err(SurfaceError::InvalidCoordinates {
                        message: format!("expected 2 coordinate grids for x/y, got {}", grids.len()),
                    });
                }
                for grid in grids.iter() {
                    let actual = [grid.rows(), grid.cols()];
                    for (axis, (&actual, &expected)) in actual.iter().zip(&shape).enumerate() {
                        if actual != expected {
                            return Err(SurfaceError::ShapeMismatch {
                                axis,
                                expected,
                                actual,
                            });
                        }
                    }
                }
            }
            CoordinateSource::Ticks(ticks) => {
                if ticks.len() != 2 {
                    return Err(SurfaceError::InvalidCoordinates {
                        message: format!("expected 2 tick lists, got {}", ticks.len()),
                    });
                }
                for (axis, tick) in ticks.iter().enumerate() {
                    if tick.len() != shape[axis] {
                        return Err(SurfaceError::ShapeMismatch {
                            axis,
                            expected: shape[axis],
                            actual: tick.len(),
                        });
                    }
                }
            }
            CoordinateSource::Indices => {}
        }
        Ok(())
    }
}

/// Die drei gepolsterten Felder einer Oberfläche: Welt-X, Welt-Y und Höhe.
#[derive(Debug, Default)]
pub struct FieldStore {
    fields: [PaddedGrid; 3],
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ungepolsterte Ausdehnung (Zeilen, Spalten).
    pub fn shape(&self) -> (usize, usize) {
        (self.fields[2].rows(), self.fields[2].cols())
    }

    pub fn is_empty(&self) -> bool {
        let (rows, cols) = self.shape();
        rows == 0 || cols == 0
    }

    pub fn axis(&self, d: usize) -> &PaddedGrid {
        &self.fields[d]
    }

    /// Ersetzt alle drei Felder. Schlägt fehl, bevor irgendein Zustand verändert wird.
    pub fn set_field(
        &mut self,
        field: &Grid,
        coords: CoordinateSource<'_>,
        pool: &mut ScratchPool<f32>,
    ) -> SurfaceResult<()> {
        coords.validate(field)?;

        let (rows, cols) = field.shape();
        for grid in self.fields.iter_mut() {
            grid.reshape(rows, cols, pool);
        }

        self.fields[2].pad_from(field);
        match coords {
            CoordinateSource::Grids(grids) => {
                self.fields[0].pad_from(&grids[0]);
                self.fields[1].pad_from(&grids[1]);
            }
            CoordinateSource::Ticks(ticks) => {
                // Broadcast entlang der orthogonalen Richtung (Stride 0)
                let (row_ticks, col_ticks) = (&ticks[0], &ticks[1]);
                self.fields[0].fill_with(|r, _| row_ticks[r]);
                self.fields[1].fill_with(|_, c| col_ticks[c]);
            }
            CoordinateSource::Indices => {
                self.fields[0].fill_with(|r, _| r as f32);
                self.fields[1].fill_with(|_, c| c as f32);
            }
        }
        Ok(())
    }

    /// Prüft, ob alle drei Felder an der gepolsterten Position endlich sind.
    pub fn is_finite_at(&self, pr: usize, pc: usize) -> bool {
        self.fields.iter().all(|f| f.get(pr, pc).is_finite())
    }

    /// Alle drei Feldwerte an der gepolsterten Position.
    pub fn value_at(&self, pr: usize, pc: usize) -> Point3D {
        Point3D::new(
            self.fields[0].get(pr, pc),
            self.fields[1].get(pr, pc),
            self.fields[2].get(pr, pc),
        )
    }

    /// Bilineare Interpolation aller drei Felder an einer ungepolsterten,
    /// gebrochenen Gitterposition. Die vier Stützstellen liegen im Inneren
    /// (um den Geisterrand verschoben) und werden auf den gepolsterten Bereich geklemmt.
    pub fn interpolate(&self, x: f32, y: f32) -> Point3D {
        let (rows, cols) = self.shape();
        let (ix, fx) = interpolation::split_coordinate(x);
        let (iy, fy) = interpolation::split_coordinate(y);
        let weights = interpolation::bilinear_weights(fx, fy);
        let corners = [(0, 0), (0, 1), (1, 0), (1, 1)];

        let mut pos = Point3D::ZERO;
        for ((dx, dy), w) in corners.into_iter().zip(weights) {
            if w == 0.0 {
                continue;
            }
            let pr = (ix + 1 + dx).min(rows + 1);
            let pc = (iy + 1 + dy).min(cols + 1);
            pos += self.value_at(pr, pc) * w;
        }
        pos
    }
}
