// src/debug/visualization/svg.rs
use crate::surface::{
    SurfaceBackend, SurfacePlot, SurfaceResult, contour::CONTOUR_VERTEX_FLOATS,
};
use bevy::log::info;
use bevy::math::Vec2;
use std::path::Path;
use svg::Document;
use svg::node::element::{Group, Line, Rectangle, Style};

/// Linienfarbe pro Konturachse (Welt-X, Welt-Y, Höhe).
const AXIS_CLASSES: [&str; 3] = ["contour-x", "contour-y", "contour-z"];

// ===================================================================================
// HILFS-STRUCT für die SVG-Erstellung
// ===================================================================================
/// Baut ein SVG im Gitter-Parameterraum: x-Achse = Spalte, y-Achse = Zeile.
struct SvgBuilder {
    document: Document,
}

impl SvgBuilder {
    fn new(rows: usize, cols: usize, svg_pixel_size: f64) -> Self {
        // Ein halber Zellrand, damit Linien auf dem Rand sichtbar bleiben
        let min = -0.5;
        let width = cols.max(1) as f64;
        let height = rows.max(1) as f64;
        let stroke_w = (width + height) / 2.0 * 0.004;

        let style = Style::new(format!(
            ".background {{ fill: #f0f0f0; }}\n\
             .grid-bounds {{ fill: none; stroke: #888888; stroke-width: {stroke_w}; stroke-dasharray: 0.2,0.2; }}\n\
             .contour-x {{ stroke: #cc3333; stroke-width: {stroke_w}; }}\n\
             .contour-y {{ stroke: #33aa33; stroke-width: {stroke_w}; }}\n\
             .contour-z {{ stroke: #3355cc; stroke-width: {stroke_w}; }}"
        ));

        let document = Document::new()
            .set("width", svg_pixel_size)
            .set("height", svg_pixel_size * height / width)
            .set("viewBox", (min, min, width, height))
            .add(style)
            .add(
                Rectangle::new()
                    .set("x", min)
                    .set("y", min)
                    .set("width", width)
                    .set("height", height)
                    .set("class", "background"),
            )
            .add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", width - 1.0)
                    .set("height", height - 1.0)
                    .set("class", "grid-bounds"),
            );

        Self { document }
    }

    fn add_group(self, group: Group) -> Self {
        Self {
            document: self.document.add(group),
        }
    }

    fn segment(a: Vec2, b: Vec2) -> Line {
        Line::new()
            .set("x1", a.x)
            .set("y1", a.y)
            .set("x2", b.x)
            .set("y2", b.y)
    }

    fn finish(self) -> Document {
        self.document
    }
}

/// Liniensegmente einer Konturachse in Gitterkoordinaten (Spalte, Zeile).
pub fn contour_segments<B: SurfaceBackend>(plot: &SurfacePlot<B>, axis: usize) -> Vec<[Vec2; 2]> {
    let buffer = plot.contour_buffer();
    let table = plot.contour_table(axis);
    let mut segments = Vec::with_capacity(table.total_vertices() / 2);

    for index in 0..table.counts.len() {
        let Some(range) = table.range(index) else {
            continue;
        };
        let start = range.start * CONTOUR_VERTEX_FLOATS;
        let end = range.end * CONTOUR_VERTEX_FLOATS;
        for pair in buffer[start..end].chunks_exact(2 * CONTOUR_VERTEX_FLOATS) {
            let a = Vec2::new(pair[3], pair[2]);
            let b = Vec2::new(pair[CONTOUR_VERTEX_FLOATS + 3], pair[CONTOUR_VERTEX_FLOATS + 2]);
            segments.push([a, b]);
        }
    }
    segments
}

/// Zeichnet die Konturlinien der gewählten Achsen als SVG-Dokument.
pub fn contours_to_svg<B: SurfaceBackend>(plot: &SurfacePlot<B>, axis_mask: [bool; 3]) -> Document {
    let (rows, cols) = plot.shape();
    let mut svg = SvgBuilder::new(rows, cols, 800.0);

    for axis in (0..3).filter(|d| axis_mask[*d]) {
        let group = contour_segments(plot, axis)
            .into_iter()
            .fold(Group::new().set("class", AXIS_CLASSES[axis]), |g, [a, b]| {
                g.add(SvgBuilder::segment(a, b))
            });
        svg = svg.add_group(group);
    }
    svg.finish()
}

/// Schreibt die Konturlinien als SVG-Datei.
pub fn save_contours_svg<B: SurfaceBackend>(
    path: impl AsRef<Path>,
    plot: &SurfacePlot<B>,
    axis_mask: [bool; 3],
) -> SurfaceResult<()> {
    let document = contours_to_svg(plot, axis_mask);
    svg::save(path.as_ref(), &document)?;
    info!("Debug SVG '{}' wurde erstellt.", path.as_ref().display());
    Ok(())
}
