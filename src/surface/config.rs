// src/surface/config.rs

use super::error::{SurfaceError, SurfaceResult};
use crate::math::types::{Bounds3D, Grid, Point3D};
use serde::{Deserialize, Serialize};

/// RGBA-Farbe mit Kanälen in [0, 1].
pub type Rgba = [f32; 4];

/// Ein Wert, der entweder für alle drei Achsen gilt oder pro Achse angegeben wird.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerAxis<T> {
    Each([T; 3]),
    Uniform(T),
}

impl<T: Clone> PerAxis<T> {
    /// Löst den Wert in ein Array mit einem Eintrag pro Achse auf.
    pub fn resolve(&self) -> [T; 3] {
        match self {
            PerAxis::Each(values) => values.clone(),
            PerAxis::Uniform(value) => [value.clone(), value.clone(), value.clone()],
        }
    }
}

/// Farbe aus 3 (RGB, Alpha = 1) oder 4 (RGBA) Komponenten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct Color(pub Rgba);

impl TryFrom<Vec<f32>> for Color {
    type Error = String;

    fn try_from(v: Vec<f32>) -> Result<Self, Self::Error> {
        match v.as_slice() {
            [r, g, b] => Ok(Color([*r, *g, *b, 1.0])),
            [r, g, b, a] => Ok(Color([*r, *g, *b, *a])),
            _ => Err(format!("color needs 3 or 4 components, got {}", v.len())),
        }
    }
}

impl From<Color> for Vec<f32> {
    fn from(c: Color) -> Self {
        c.0.to_vec()
    }
}

/// Level-Angabe: flache Liste (nur Höhenachse) oder bis zu drei Listen pro Achse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    PerAxis(Vec<Vec<f32>>),
    Flat(Vec<f32>),
}

impl LevelSpec {
    /// Normalisiert auf genau drei aufsteigend sortierte Level-Listen.
    pub fn into_axes(self) -> SurfaceResult<[Vec<f32>; 3]> {
        let mut axes: [Vec<f32>; 3] = match self {
            LevelSpec::Flat(levels) => [Vec::new(), Vec::new(), levels],
            LevelSpec::PerAxis(lists) => {
                if lists.len() > 3 {
                    return Err(SurfaceError::InvalidLevels {
                        message: format!("expected at most 3 axes, got {}", lists.len()),
                    });
                }
                let mut iter = lists.into_iter();
                [
                    iter.next().unwrap_or_default(),
                    iter.next().unwrap_or_default(),
                    iter.next().unwrap_or_default(),
                ]
            }
        };

        for (axis, levels) in axes.iter_mut().enumerate() {
            if let Some(bad) = levels.iter().find(|l| !l.is_finite()) {
                return Err(SurfaceError::InvalidLevels {
                    message: format!("axis {axis} contains non-finite level {bad}"),
                });
            }
            levels.sort_by(f32::total_cmp);
        }
        Ok(axes)
    }
}

/// Konfiguration einer Oberfläche. Wird über `SurfaceUpdate` feldweise ersetzt.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    // --- Konturen ---
    pub contour_width: [f32; 3],
    pub contour_tint: [f32; 3],
    pub contour_color: [Rgba; 3],
    pub show_contour: [bool; 3],
    pub contour_project: [[bool; 3]; 3],

    // --- Oberfläche ---
    pub show_surface: bool,
    pub surface_project: [bool; 3],
    pub opacity: f32,
    pub colormap: String,

    // --- Highlight & dynamische Konturen ---
    pub enable_highlight: [bool; 3],
    pub highlight_color: [Rgba; 3],
    pub highlight_tint: [f32; 3],
    pub enable_dynamic: [bool; 3],
    pub dynamic_color: [Rgba; 3],
    pub dynamic_tint: [f32; 3],
    pub dynamic_width: [f32; 3],
    pub snap_to_data: bool,

    // --- Geometrie & Picking ---
    pub axes_bounds: Bounds3D,
    pub clip_bounds: Bounds3D,
    pub pick_id: u32,

    // --- Beleuchtung ---
    pub light_position: Point3D,
    pub ambient_light: f32,
    pub diffuse_light: f32,
    pub specular_light: f32,
    pub roughness: f32,
    pub fresnel: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            contour_width: [1.0; 3],
            contour_tint: [0.0; 3],
            contour_color: [[0.5, 0.5, 0.5, 1.0]; 3],
            show_contour: [true; 3],
            contour_project: [[false; 3]; 3],

            show_surface: true,
            surface_project: [false; 3],
            opacity: 1.0,
            colormap: "jet".to_string(),

            enable_highlight: [true; 3],
            highlight_color: [[0.0, 0.0, 0.0, 1.0]; 3],
            highlight_tint: [1.0; 3],
            enable_dynamic: [true; 3],
            dynamic_color: [[0.0, 0.0, 0.0, 1.0]; 3],
            dynamic_tint: [1.0; 3],
            dynamic_width: [1.0; 3],
            snap_to_data: false,

            axes_bounds: Bounds3D::empty(),
            clip_bounds: Bounds3D::infinite(),
            pick_id: 1,

            light_position: Point3D::new(10.0, 10000.0, 0.0),
            ambient_light: 0.8,
            diffuse_light: 0.8,
            specular_light: 2.0,
            roughness: 0.5,
            fresnel: 1.5,
        }
    }
}

impl SurfaceConfig {
    /// Übernimmt alle reinen Konfigurationsschlüssel eines Updates.
    /// Feld, Koordinaten, Level und Colormap behandelt `SurfacePlot::update`.
    pub fn apply(&mut self, update: &SurfaceUpdate) {
        if let Some(id) = update.pick_id {
            self.pick_id = id;
        }
        if let Some(w) = &update.contour_width {
            self.contour_width = w.resolve();
        }
        if let Some(show) = &update.show_contour {
            self.show_contour = show.resolve();
        }
        if let Some(show) = update.show_surface {
            self.show_surface = show;
        }
        if let Some(tint) = &update.contour_tint {
            self.contour_tint = tint.resolve();
        }
        if let Some(color) = &update.contour_color {
            self.contour_color = color.resolve().map(|c| c.0);
        }
        if let Some(project) = &update.contour_project {
            self.contour_project = project.resolve().map(|p| p.resolve());
        }
        if let Some(project) = &update.surface_project {
            self.surface_project = project.resolve();
        }
        if let Some([lo, hi]) = update.axes_bounds {
            self.axes_bounds = Bounds3D {
                min: Point3D::from_array(lo),
                max: Point3D::from_array(hi),
            };
        }
        if let Some([lo, hi]) = update.clip_bounds {
            self.clip_bounds = Bounds3D {
                min: Point3D::from_array(lo),
                max: Point3D::from_array(hi),
            };
        }
        if let Some(color) = &update.dynamic_color {
            self.dynamic_color = color.resolve().map(|c| c.0);
        }
        if let Some(tint) = &update.dynamic_tint {
            self.dynamic_tint = tint.resolve();
        }
        if let Some(width) = &update.dynamic_width {
            self.dynamic_width = width.resolve();
        }
        if let Some(enable) = &update.enable_dynamic {
            self.enable_dynamic = enable.resolve();
        }
        if let Some(enable) = &update.enable_highlight {
            self.enable_highlight = enable.resolve();
        }
        if let Some(color) = &update.highlight_color {
            self.highlight_color = color.resolve().map(|c| c.0);
        }
        if let Some(tint) = &update.highlight_tint {
            self.highlight_tint = tint.resolve();
        }
        if let Some(snap) = update.snap_to_data {
            self.snap_to_data = snap;
        }
        if let Some(opacity) = update.opacity {
            self.opacity = opacity;
        }
        if let Some(pos) = update.light_position {
            self.light_position = Point3D::from_array(pos);
        }
        if let Some(v) = update.ambient_light {
            self.ambient_light = v;
        }
        if let Some(v) = update.diffuse_light {
            self.diffuse_light = v;
        }
        if let Some(v) = update.specular_light {
            self.specular_light = v;
        }
        if let Some(v) = update.roughness {
            self.roughness = v;
        }
        if let Some(v) = update.fresnel {
            self.fresnel = v;
        }
    }
}

/// Typisiertes Patch-Update. Nur gesetzte Schlüssel werden übernommen,
/// unbekannte Schlüssel werden beim Deserialisieren ignoriert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SurfaceUpdate {
    pub field: Option<Grid>,
    /// Explizite x/y-Koordinatenraster (genau 2, gleiche Ausdehnung wie `field`).
    pub coords: Option<Vec<Grid>>,
    /// 1D-Ticks für Zeilen und Spalten (genau 2 Listen).
    pub ticks: Option<Vec<Vec<f32>>>,
    pub levels: Option<LevelSpec>,

    pub contour_width: Option<PerAxis<f32>>,
    pub contour_tint: Option<PerAxis<f32>>,
    pub contour_color: Option<PerAxis<Color>>,
    pub show_contour: Option<PerAxis<bool>>,
    pub contour_project: Option<PerAxis<PerAxis<bool>>>,
    pub show_surface: Option<bool>,
    pub surface_project: Option<PerAxis<bool>>,
    pub axes_bounds: Option<[[f32; 3]; 2]>,
    pub clip_bounds: Option<[[f32; 3]; 2]>,

    pub dynamic_color: Option<PerAxis<Color>>,
    pub dynamic_tint: Option<PerAxis<f32>>,
    pub dynamic_width: Option<PerAxis<f32>>,
    pub enable_dynamic: Option<PerAxis<bool>>,
    pub enable_highlight: Option<PerAxis<bool>>,
    pub highlight_color: Option<PerAxis<Color>>,
    pub highlight_tint: Option<PerAxis<f32>>,
    pub snap_to_data: Option<bool>,

    pub opacity: Option<f32>,
    pub colormap: Option<String>,
    pub pick_id: Option<u32>,

    pub light_position: Option<[f32; 3]>,
    pub ambient_light: Option<f32>,
    pub diffuse_light: Option<f32>,
    pub specular_light: Option<f32>,
    pub roughness: Option<f32>,
    pub fresnel: Option<f32>,
}

impl SurfaceUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: Grid) -> Self {
        self.field = Some(field);
        self
    }

    /// Feld aus verschachtelten Zeilen; ungleich lange Zeilen ergeben `SurfaceError::Math`.
    pub fn with_field_rows(self, rows: Vec<Vec<f32>>) -> SurfaceResult<Self> {
        Ok(self.with_field(Grid::from_rows(rows)?))
    }

    pub fn with_coords(mut self, x: Grid, y: Grid) -> Self {
        self.coords = Some(vec![x, y]);
        self
    }

    pub fn with_ticks(mut self, row_ticks: Vec<f32>, col_ticks: Vec<f32>) -> Self {
        self.ticks = Some(vec![row_ticks, col_ticks]);
        self
    }

    pub fn with_levels(mut self, levels: [Vec<f32>; 3]) -> Self {
        self.levels = Some(LevelSpec::PerAxis(levels.to_vec()));
        self
    }

    /// Level nur für die Höhenachse; die beiden Koordinatenachsen bleiben leer.
    pub fn with_height_levels(mut self, levels: Vec<f32>) -> Self {
        self.levels = Some(LevelSpec::Flat(levels));
        self
    }

    pub fn with_colormap(mut self, name: impl Into<String>) -> Self {
        self.colormap = Some(name.into());
        self
    }

    pub fn with_pick_id(mut self, id: u32) -> Self {
        self.pick_id = Some(id);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_axis_uniform_and_each() {
        let u: PerAxis<f32> = serde_json::from_str("2.5").unwrap();
        assert_eq!(u.resolve(), [2.5; 3]);
        let e: PerAxis<f32> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(e.resolve(), [1.0, 2.0, 3.0]);
        assert!(serde_json::from_str::<PerAxis<f32>>("[1, 2]").is_err());
    }

    #[test]
    fn test_color_rgb_and_rgba() {
        let rgb: PerAxis<Color> = serde_json::from_str("[0.1, 0.2, 0.3]").unwrap();
        assert_eq!(rgb.resolve()[2].0, [0.1, 0.2, 0.3, 1.0]);
        let each: PerAxis<Color> =
            serde_json::from_str("[[1,0,0],[0,1,0,0.5],[0,0,1]]").unwrap();
        let colors = each.resolve();
        assert_eq!(colors[0].0, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(colors[1].0, [0.0, 1.0, 0.0, 0.5]);
        assert!(serde_json::from_str::<Color>("[1, 2]").is_err());
    }

    #[test]
    fn test_levels_flat_goes_to_height_axis() {
        let spec: LevelSpec = serde_json::from_str("[3, 1, 2]").unwrap();
        let axes = spec.into_axes().unwrap();
        assert!(axes[0].is_empty());
        assert!(axes[1].is_empty());
        assert_eq!(axes[2], vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_levels_sorted_per_axis() {
        let spec: LevelSpec = serde_json::from_str("[[5, 1], [], [2, 2, 0]]").unwrap();
        let axes = spec.into_axes().unwrap();
        assert_eq!(axes[0], vec![1.0, 5.0]);
        assert!(axes[1].is_empty());
        assert_eq!(axes[2], vec![0.0, 2.0, 2.0]);
    }

    #[test]
    fn test_levels_too_many_axes() {
        let spec = LevelSpec::PerAxis(vec![vec![]; 4]);
        assert!(matches!(
            spec.into_axes(),
            Err(SurfaceError::InvalidLevels { .. })
        ));
        let nan = LevelSpec::Flat(vec![f32::NAN]);
        assert!(nan.into_axes().is_err());
    }

    #[test]
    fn test_field_rows_ragged_is_math_error() {
        let update = SurfaceUpdate::new()
            .with_field_rows(vec![vec![0.0, 1.0], vec![2.0, 3.0]])
            .unwrap();
        assert_eq!(update.field.as_ref().map(Grid::shape), Some((2, 2)));

        let err = SurfaceUpdate::new()
            .with_field_rows(vec![vec![0.0, 1.0], vec![2.0]])
            .unwrap_err();
        assert!(matches!(
            err,
            SurfaceError::Math(crate::math::MathError::DataLengthMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_update_ignores_unknown_keys() {
        let update: SurfaceUpdate = serde_json::from_str(
            r#"{"contourWidth": 3, "somethingElse": true, "pickId": 7, "dynamicTint": [0, 0.5, 1]}"#,
        )
        .unwrap();
        assert_eq!(update.pick_id, Some(7));
        assert!(update.field.is_none());

        let mut config = SurfaceConfig::default();
        config.apply(&update);
        assert_eq!(config.contour_width, [3.0; 3]);
        assert_eq!(config.pick_id, 7);
        assert_eq!(config.dynamic_tint, [0.0, 0.5, 1.0]);
        // Unberührte Schlüssel behalten ihren Default
        assert_eq!(config.dynamic_width, [1.0; 3]);
    }

    #[test]
    fn test_contour_project_nested() {
        let update: SurfaceUpdate = serde_json::from_str(
            r#"{"contourProject": [[true, false, false], false, true]}"#,
        )
        .unwrap();
        let mut config = SurfaceConfig::default();
        config.apply(&update);
        assert_eq!(config.contour_project[0], [true, false, false]);
        assert_eq!(config.contour_project[1], [false; 3]);
        assert_eq!(config.contour_project[2], [true; 3]);
    }

    #[test]
    fn test_axes_bounds_update() {
        let update: SurfaceUpdate =
            serde_json::from_str(r#"{"axesBounds": [[0, 0, 0], [1, 2, 3]]}"#).unwrap();
        let mut config = SurfaceConfig::default();
        assert!(config.axes_bounds.is_empty());
        config.apply(&update);
        assert_eq!(config.axes_bounds.max, Point3D::new(1.0, 2.0, 3.0));
    }
}
