// src/surface/backend.rs
// Schnittstelle zum Renderer: nimmt die berechneten Puffer entgegen.

use super::config::Rgba;

/// Empfänger für die numerischen Puffer einer Oberfläche.
///
/// Eine GPU-Implementierung lädt die Daten in Vertex-Puffer bzw. eine
/// 1D-Colormap-Textur; `CpuBackend` behält sie einfach im Speicher.
pub trait SurfaceBackend {
    /// Mesh-Vertices, 9 Floats pro Vertex (siehe `MeshVertex`).
    fn update_mesh_buffer(&mut self, data: &[f32]);

    /// Konturvertices, 4 Floats pro Vertex.
    fn update_contour_buffer(&mut self, data: &[f32]);

    /// Dynamische Konturvertices, 2 Floats pro Vertex.
    fn update_dynamic_buffer(&mut self, data: &[f32]);

    /// Farbverlauf der Colormap, Kanäle in [0, 1].
    fn update_colormap(&mut self, pixels: &[Rgba]);
}

/// Backend, das die zuletzt hochgeladenen Daten im Speicher hält.
#[derive(Debug, Clone, Default)]
pub struct CpuBackend {
    pub mesh: Vec<f32>,
    pub contour: Vec<f32>,
    pub dynamic: Vec<f32>,
    pub colormap: Vec<Rgba>,
    /// Anzahl der Uploads pro Puffer: Mesh, Kontur, dynamisch, Colormap.
    pub uploads: [usize; 4],
}

impl SurfaceBackend for CpuBackend {
    fn update_mesh_buffer(&mut self, data: &[f32]) {
        self.mesh.clear();
        self.mesh.extend_from_slice(data);
        self.uploads[0] += 1;
    }

    fn update_contour_buffer(&mut self, data: &[f32]) {
        self.contour.clear();
        self.contour.extend_from_slice(data);
        self.uploads[1] += 1;
    }

    fn update_dynamic_buffer(&mut self, data: &[f32]) {
        self.dynamic.clear();
        self.dynamic.extend_from_slice(data);
        self.uploads[2] += 1;
    }

    fn update_colormap(&mut self, pixels: &[Rgba]) {
        self.colormap.clear();
        self.colormap.extend_from_slice(pixels);
        self.uploads[3] += 1;
    }
}
