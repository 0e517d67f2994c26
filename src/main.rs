// ./src/main.rs
use bevy::log::LogPlugin;
use bevy::prelude::*;

use surface_plot::{
    PickSample, SurfacePickRequest, SurfacePlotPlugin, SurfacePlotResource, SurfaceUpdate,
    SurfaceResult, SurfaceUpdateEvent, debug::visualization::save_contours_svg, math::types::Grid,
    surface::contour::CONTOUR_VERTEX_FLOATS,
};

const ROWS: usize = 48;
const COLS: usize = 64;

/// Welliges Testfeld mit einem kreisförmigen Loch aus NaN-Werten.
fn synthetic_field() -> SurfaceResult<Grid> {
    let field = Grid::from_fn(ROWS, COLS, |r, c| {
        let x = r as f32 / ROWS as f32 * std::f32::consts::TAU;
        let y = c as f32 / COLS as f32 * std::f32::consts::TAU;
        let (dr, dc) = (r as f32 - 30.0, c as f32 - 20.0);
        if dr * dr + dc * dc < 25.0 {
            f32::NAN
        } else {
            x.sin() * y.cos() * 2.0 + 0.05 * c as f32
        }
    })?;
    Ok(field)
}

fn main() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default(), SurfacePlotPlugin));

    let field = match synthetic_field() {
        Ok(field) => field,
        Err(err) => {
            error!("Could not build the synthetic field: {}", err);
            return;
        }
    };

    let update = SurfaceUpdate::new()
        .with_field(field)
        .with_levels([
            vec![12.0, 24.0, 36.0],
            vec![16.0, 32.0, 48.0],
            (-4..=5).map(|l| l as f32 * 0.5).collect(),
        ])
        .with_colormap("viridis");
    app.world.send_event(SurfaceUpdateEvent(update));
    app.world.send_event(SurfacePickRequest(PickSample::encode(
        10.0, 40.0, ROWS, COLS, 1,
    )));
    app.update();

    let surface = app.world.resource::<SurfacePlotResource>();
    let Some(plot) = surface.plot.as_ref() else {
        error!("Surface was not created");
        return;
    };
    info!(
        "Surface ready: {} mesh vertices, {} contour vertices, dynamic {:?}",
        plot.vertex_count(),
        plot.contour_buffer().len() / CONTOUR_VERTEX_FLOATS,
        plot.dynamic_counts()
    );

    if let Err(err) = save_contours_svg("surface_contours.svg", plot, [true, true, true]) {
        error!("Could not write contour SVG: {}", err);
    }
}
