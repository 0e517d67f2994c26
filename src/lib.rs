// src/lib.rs
pub mod colormap;
pub mod debug;
pub mod math;
pub mod plugin;
pub mod surface;

pub use plugin::{
    SurfaceHighlightEvent, SurfacePickRequest, SurfacePicked, SurfacePlotPlugin,
    SurfacePlotResource, SurfaceUpdateEvent,
};
pub use surface::{
    CpuBackend, PickResult, PickSample, Selection, SurfaceBackend, SurfaceConfig, SurfaceError,
    SurfacePlot, SurfaceResult, SurfaceUpdate,
};
