// src/surface/mod.rs
// Oberflächen-Plot: Höhenfeld als beleuchtetes Mesh mit Konturlinien und Picking.

pub mod backend;
pub mod config;
pub mod contour;
pub mod dynamic;
pub mod error;
pub mod field;
pub mod mesh;
pub mod normals;
pub mod pick;

pub use backend::{CpuBackend, SurfaceBackend};
pub use config::{Color, LevelSpec, PerAxis, Rgba, SurfaceConfig, SurfaceUpdate};
pub use contour::ContourTable;
pub use dynamic::{DynamicContours, Selection};
pub use error::{SurfaceError, SurfaceResult};
pub use field::{CoordinateSource, FieldStore};
pub use mesh::{MeshStats, MeshVertex};
pub use pick::{PickResult, PickSample};

use crate::colormap;
use crate::math::{
    pool::ScratchPool,
    types::{Bounds3D, Grid, Point3D},
    utils::{comparison::same_levels, constants::CLIP_LIMIT},
};
use bevy::log::{debug, info};
use contour::IsoLineExtractor;

/// Eine Oberfläche mit ihren Feldern, Level-Listen und allen abgeleiteten Puffern.
///
/// Alle Operationen laufen synchron; die berechneten Puffer werden nach jeder
/// Änderung an das Backend übergeben.
pub struct SurfacePlot<B: SurfaceBackend> {
    backend: B,
    config: SurfaceConfig,
    store: FieldStore,

    normals: Vec<Point3D>,
    mesh: Vec<f32>,
    mesh_stats: MeshStats,

    contours: [ContourTable; 3],
    contour_buffer: Vec<f32>,
    contour_revision: u64,

    dynamic: DynamicContours,
    highlight_level: [i32; 3],

    extractor: IsoLineExtractor,
    float_pool: ScratchPool<f32>,
    index_pool: ScratchPool<u32>,
}

impl<B: SurfaceBackend> SurfacePlot<B> {
    /// Erzeugt eine Oberfläche für `field` und wendet `update` als Anfangskonfiguration an.
    /// Ohne Colormap-Angabe wird die Default-Colormap geladen.
    pub fn new(backend: B, field: Grid, update: SurfaceUpdate) -> SurfaceResult<Self> {
        let config = SurfaceConfig::default();
        let initial = SurfaceUpdate {
            field: Some(field),
            colormap: update.colormap.clone().or_else(|| Some(config.colormap.clone())),
            ..update
        };

        let mut plot = Self {
            backend,
            config,
            store: FieldStore::new(),
            normals: Vec::new(),
            mesh: Vec::new(),
            mesh_stats: MeshStats {
                vertex_count: 0,
                skipped_cells: 0,
                bounds: Bounds3D::empty(),
            },
            contours: Default::default(),
            contour_buffer: Vec::new(),
            contour_revision: 0,
            dynamic: DynamicContours::new(),
            highlight_level: [-1; 3],
            extractor: IsoLineExtractor::new(),
            float_pool: ScratchPool::new(),
            index_pool: ScratchPool::new(),
        };
        plot.update(&initial)?;
        Ok(plot)
    }

    /// Wendet ein Update an.
    ///
    /// Alle Teile werden zuerst validiert; schlägt eine Prüfung fehl, bleibt der
    /// bisherige Zustand vollständig erhalten. Danach gilt die feste Reihenfolge
    /// Konfiguration, Feld, Level, Colormap.
    pub fn update(&mut self, update: &SurfaceUpdate) -> SurfaceResult<()> {
        let coords = CoordinateSource::select(update.coords.as_deref(), update.ticks.as_deref());
        if let Some(field) = &update.field {
            coords.validate(field)?;
        } else if !matches!(coords, CoordinateSource::Indices) {
            debug!("Coordinates without field are ignored");
        }
        let levels = update.levels.clone().map(LevelSpec::into_axes).transpose()?;
        let colormap = update.colormap.as_deref().map(colormap::generate).transpose()?;

        self.config.apply(update);

        let mut field_changed = false;
        if let Some(field) = &update.field {
            self.set_field(field, coords)?;
            field_changed = true;
        }

        let mut levels_changed = false;
        if let Some(levels) = levels {
            for (table, new_levels) in self.contours.iter_mut().zip(levels) {
                if !same_levels(&table.levels, &new_levels) {
                    table.levels = new_levels;
                    levels_changed = true;
                }
            }
            if !levels_changed {
                debug!("Level sets unchanged, contours kept");
            }
        }

        let has_levels = self.contours.iter().any(|t| !t.levels.is_empty());
        if levels_changed || (field_changed && has_levels) {
            self.rebuild_contours();
        }

        if let (Some(pixels), Some(name)) = (colormap, &update.colormap) {
            self.backend.update_colormap(&pixels);
            self.config.colormap = name.clone();
        }
        Ok(())
    }

    fn set_field(&mut self, field: &Grid, coords: CoordinateSource<'_>) -> SurfaceResult<()> {
        self.store.set_field(field, coords, &mut self.float_pool)?;
        normals::estimate_normals(&self.store, &mut self.float_pool, &mut self.normals);
        self.mesh_stats = mesh::build_mesh(&self.store, &self.normals, &mut self.mesh);
        self.backend.update_mesh_buffer(&self.mesh);

        // Dynamische Konturen gehören zum alten Feld
        self.dynamic.clear();

        let (rows, cols) = self.store.shape();
        info!(
            "Surface field updated: {}x{}, {} mesh vertices, {} cells skipped, bounds {}",
            rows,
            cols,
            self.mesh_stats.vertex_count,
            self.mesh_stats.skipped_cells,
            self.mesh_stats.bounds
        );
        Ok(())
    }

    fn rebuild_contours(&mut self) {
        contour::extract_contours(
            &self.store,
            &mut self.contours,
            &mut self.extractor,
            &mut self.index_pool,
            &mut self.contour_buffer,
        );
        self.contour_revision += 1;
        self.backend.update_contour_buffer(&self.contour_buffer);

        info!(
            "Contours extracted: levels per axis {:?}, {} vertices",
            self.contours.each_ref().map(|t| t.levels.len()),
            self.contour_buffer.len() / contour::CONTOUR_VERTEX_FLOATS
        );
    }

    /// Aktualisiert Highlight-Level und dynamische Konturen für eine Auswahl.
    /// `None` entfernt alle dynamischen Konturen.
    pub fn highlight(&mut self, selection: Option<&Selection>) {
        let Some(selection) = selection else {
            self.dynamic.clear();
            self.highlight_level = [-1; 3];
            return;
        };

        let enabled = self.config.enable_highlight;
        for ((slot, level), on) in self
            .highlight_level
            .iter_mut()
            .zip(selection.level)
            .zip(enabled)
        {
            *slot = if on { level } else { -1 };
        }

        let levels = selection.dynamic_levels(self.config.snap_to_data);
        let rebuilt = self.dynamic.update(
            &self.store,
            levels,
            self.config.enable_dynamic,
            &mut self.extractor,
            &mut self.index_pool,
        );
        if rebuilt {
            self.backend.update_dynamic_buffer(self.dynamic.buffer());
        } else {
            debug!("Dynamic contour levels unchanged: {:?}", levels);
        }
    }

    /// Löst ein Pick-Sample auf. `None` bei fremder ID oder leerem Feld.
    pub fn pick(&self, sample: &PickSample) -> Option<PickResult> {
        pick::pick(&self.store, self.levels(), self.config.pick_id, sample)
    }

    /// Baut aus einem Pick-Ergebnis eine Auswahl; die Datenkoordinate ist der
    /// Feldwert am nächstgelegenen Gitterpunkt.
    pub fn selection_from_pick(&self, result: &PickResult) -> Selection {
        let [r, c] = result.index;
        Selection {
            position: result.position.to_array(),
            data_coordinate: self.store.value_at(r + 1, c + 1).to_array(),
            level: result.level,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.config.opacity < 1.0
    }

    /// Undurchsichtig bei voller Deckkraft oder sobald Konturlinien vorhanden sind.
    pub fn is_opaque(&self) -> bool {
        self.config.opacity >= 1.0
            || self.contours.iter().any(|t| !t.counts.is_empty())
            || self.dynamic.counts().iter().any(|c| *c > 0)
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    pub fn shape(&self) -> (usize, usize) {
        self.store.shape()
    }

    /// Bounding Box aller geschriebenen Mesh-Vertices.
    pub fn bounds(&self) -> Bounds3D {
        self.mesh_stats.bounds
    }

    /// Clip-Bounds, komponentenweise auf `CLIP_LIMIT` begrenzt.
    pub fn clip_bounds(&self) -> Bounds3D {
        self.config.clip_bounds.clamped(CLIP_LIMIT)
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh_stats.vertex_count
    }

    pub fn mesh_buffer(&self) -> &[f32] {
        &self.mesh
    }

    pub fn levels(&self) -> [&[f32]; 3] {
        self.contours.each_ref().map(|t| t.levels.as_slice())
    }

    pub fn contour_buffer(&self) -> &[f32] {
        &self.contour_buffer
    }

    pub fn contour_table(&self, axis: usize) -> &ContourTable {
        &self.contours[axis]
    }

    pub fn contour_offsets(&self, axis: usize) -> &[usize] {
        &self.contours[axis].offsets
    }

    pub fn contour_counts(&self, axis: usize) -> &[usize] {
        &self.contours[axis].counts
    }

    /// Zählt jede tatsächliche Neuberechnung der Konturlinien.
    pub fn contour_revision(&self) -> u64 {
        self.contour_revision
    }

    pub fn dynamic_buffer(&self) -> &[f32] {
        self.dynamic.buffer()
    }

    pub fn dynamic_offsets(&self) -> [usize; 3] {
        self.dynamic.offsets()
    }

    pub fn dynamic_counts(&self) -> [usize; 3] {
        self.dynamic.counts()
    }

    pub fn highlight_level(&self) -> [i32; 3] {
        self.highlight_level
    }
}
