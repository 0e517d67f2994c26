// src/math/types/grid.rs

use crate::math::{
    error::{MathError, MathResult},
    pool::ScratchPool,
    scalar_field::ScalarField2D,
    utils::interpolation,
};
use serde::{Deserialize, Serialize};

/// Zweidimensionales Raster für Skalarwerte.
/// Speicherung zeilenweise (row-major), Indizes sind (Zeile, Spalte).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

#[derive(Deserialize)]
struct RawGrid {
    rows: usize,
    cols: usize,
    // `null` markiert ein Loch im Feld
    data: Vec<Option<f32>>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = MathError;

    fn try_from(raw: RawGrid) -> MathResult<Self> {
        let data = raw
            .data
            .into_iter()
            .map(|v| v.unwrap_or(f32::NAN))
            .collect();
        Grid::new(raw.rows, raw.cols, data)
    }
}

impl Grid {
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> MathResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(MathError::EmptyGrid { rows, cols });
        }
        if data.len() != rows * cols {
            return Err(MathError::DataLengthMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Erstellt ein Raster, dessen Werte von `f(zeile, spalte)` geliefert werden.
    pub fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> f32) -> MathResult<Self> {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self::new(rows, cols, data)
    }

    /// Erstellt ein Raster aus verschachtelten Zeilen; alle Zeilen müssen gleich lang sein.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> MathResult<Self> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(MathError::DataLengthMismatch {
                expected: cols,
                actual: bad.len(),
            });
        }
        Self::new(row_count, cols, rows.into_iter().flatten().collect())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, r: usize, c: usize) -> f32 {
        self.data[r * self.cols + c]
    }

    pub fn set(&mut self, r: usize, c: usize, v: f32) {
        self.data[r * self.cols + c] = v;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl ScalarField2D for Grid {
    fn width(&self) -> usize {
        self.cols
    }

    fn height(&self) -> usize {
        self.rows
    }

    fn get_value(&self, row: usize, col: usize) -> f32 {
        self.get(row, col)
    }
}

/// Raster mit einem Geisterrand von einer Zelle auf jeder Seite.
///
/// Der Speicher hat die Ausdehnung (rows+2)×(cols+2). Das Innere [1..=rows, 1..=cols]
/// enthält die eigentlichen Daten, die Randstreifen spiegeln die jeweils
/// angrenzende Zeile/Spalte, die Ecken übernehmen den nächsten inneren Eckwert.
#[derive(Debug, Clone, Default)]
pub struct PaddedGrid {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl PaddedGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ungepolsterte Zeilenzahl.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Ungepolsterte Spaltenzahl.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn padded_rows(&self) -> usize {
        self.rows + 2
    }

    pub fn padded_cols(&self) -> usize {
        self.cols + 2
    }

    /// Anzahl der gepolsterten Samples.
    pub fn padded_len(&self) -> usize {
        self.padded_rows() * self.padded_cols()
    }

    /// Aktuelle Speicherkapazität in Samples.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    #[inline]
    fn idx(&self, pr: usize, pc: usize) -> usize {
        pr * self.padded_cols() + pc
    }

    /// Wert an gepolsterter Position (pr, pc).
    pub fn get(&self, pr: usize, pc: usize) -> f32 {
        self.data[self.idx(pr, pc)]
    }

    pub fn set(&mut self, pr: usize, pc: usize, v: f32) {
        let i = self.idx(pr, pc);
        self.data[i] = v;
    }

    /// Wert an ungepolsterter Position (r, c).
    pub fn interior(&self, r: usize, c: usize) -> f32 {
        self.get(r + 1, c + 1)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Passt die Ausdehnung an. Der Speicher wird nur neu angefordert, wenn die
    /// gepolsterte Größe die aktuelle Kapazität übersteigt; der alte Speicher geht
    /// dann an den Pool zurück.
    pub fn reshape(&mut self, rows: usize, cols: usize, pool: &mut ScratchPool<f32>) {
        let needed = (rows + 2) * (cols + 2);
        if needed > self.data.capacity() {
            let old = std::mem::replace(&mut self.data, pool.acquire(needed));
            pool.release(old);
        }
        self.rows = rows;
        self.cols = cols;
        self.data.clear();
        self.data.resize(needed, 0.0);
    }

    /// Füllt das Raster (inklusive Geisterrand) aus `f(zeile, spalte)` mit ungepolsterten Indizes.
    /// Randzellen lesen den nächstgelegenen inneren Index.
    pub fn fill_with(&mut self, f: impl Fn(usize, usize) -> f32) {
        let (rows, cols) = (self.rows, self.cols);
        if rows == 0 || cols == 0 {
            return;
        }
        for pr in 0..rows + 2 {
            let r = pr.saturating_sub(1).min(rows - 1);
            for pc in 0..cols + 2 {
                let c = pc.saturating_sub(1).min(cols - 1);
                let i = self.idx(pr, pc);
                self.data[i] = f(r, c);
            }
        }
    }

    /// Kopiert ein Feld gleicher Ausdehnung ins Innere und füllt den Geisterrand.
    pub fn pad_from<F: ScalarField2D + ?Sized>(&mut self, source: &F) {
        debug_assert_eq!(source.height(), self.rows);
        debug_assert_eq!(source.width(), self.cols);
        self.fill_with(|r, c| source.get_value(r, c));
    }

    /// Bilineare Interpolation an einer gepolsterten Koordinate (x = Zeile, y = Spalte).
    /// Die vier Stützstellen werden auf den gültigen Indexbereich geklemmt.
    /// Liefert `None`, sobald eine der Stützstellen nicht endlich ist.
    pub fn bilinear(&self, x: f32, y: f32) -> Option<f32> {
        let (ix, fx) = interpolation::split_coordinate(x);
        let (iy, fy) = interpolation::split_coordinate(y);
        let max_r = self.padded_rows() - 1;
        let max_c = self.padded_cols() - 1;
        let r0 = ix.min(max_r);
        let r1 = (ix + 1).min(max_r);
        let c0 = iy.min(max_c);
        let c1 = (iy + 1).min(max_c);

        let w = interpolation::bilinear_weights(fx, fy);
        let samples = [
            self.get(r0, c0),
            self.get(r0, c1),
            self.get(r1, c0),
            self.get(r1, c1),
        ];
        if samples.iter().any(|s| !s.is_finite()) {
            return None;
        }
        Some(samples.iter().zip(w).map(|(s, w)| s * w).sum())
    }
}

impl ScalarField2D for PaddedGrid {
    fn width(&self) -> usize {
        self.padded_cols()
    }

    fn height(&self) -> usize {
        self.padded_rows()
    }

    fn get_value(&self, row: usize, col: usize) -> f32 {
        self.get(row, col)
    }
}
