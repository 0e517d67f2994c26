//! Bevy-Integration der Oberfläche.
//!
//! Das Plugin hält eine `SurfacePlot`-Instanz als Resource und verarbeitet
//! Updates, Pick-Anfragen und Highlight-Ereignisse in dieser Reihenfolge.

use crate::surface::{
    CpuBackend, PickResult, PickSample, Selection, SurfacePlot, SurfaceResult, SurfaceUpdate,
};
use bevy::prelude::*;

/// Neue Konfiguration oder neue Daten für die Oberfläche.
/// Das erste Update muss ein Feld enthalten.
#[derive(Event, Debug, Clone)]
pub struct SurfaceUpdateEvent(pub SurfaceUpdate);

/// Ein Pick-Sample aus dem Framebuffer, das aufgelöst werden soll.
#[derive(Event, Debug, Clone, Copy)]
pub struct SurfacePickRequest(pub PickSample);

/// Ergebnis einer erfolgreichen Pick-Anfrage.
#[derive(Event, Debug, Clone, Copy)]
pub struct SurfacePicked {
    pub result: PickResult,
    pub selection: Selection,
}

/// Setzt die Auswahl explizit; `None` entfernt die dynamischen Konturen.
#[derive(Event, Debug, Clone, Copy)]
pub struct SurfaceHighlightEvent(pub Option<Selection>);

/// Die Oberfläche der App, `None` bis das erste Feld eintrifft.
#[derive(Resource, Default)]
pub struct SurfacePlotResource {
    pub plot: Option<SurfacePlot<CpuBackend>>,
}

impl SurfacePlotResource {
    /// Wendet ein Update an oder erzeugt die Oberfläche beim ersten Feld.
    pub fn apply(&mut self, update: &SurfaceUpdate) -> SurfaceResult<bool> {
        if let Some(plot) = self.plot.as_mut() {
            return plot.update(update).map(|_| true);
        }
        let Some(field) = &update.field else {
            return Ok(false);
        };
        let plot = SurfacePlot::new(CpuBackend::default(), field.clone(), update.clone())?;
        self.plot = Some(plot);
        Ok(true)
    }
}

pub struct SurfacePlotPlugin;

impl Plugin for SurfacePlotPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SurfacePlotResource>()
            .add_event::<SurfaceUpdateEvent>()
            .add_event::<SurfacePickRequest>()
            .add_event::<SurfacePicked>()
            .add_event::<SurfaceHighlightEvent>()
            .add_systems(
                Update,
                (
                    apply_surface_updates,
                    resolve_pick_requests,
                    apply_highlight_events,
                )
                    .chain(),
            );
    }
}

fn apply_surface_updates(
    mut events: EventReader<SurfaceUpdateEvent>,
    mut surface: ResMut<SurfacePlotResource>,
) {
    for SurfaceUpdateEvent(update) in events.read() {
        match surface.apply(update) {
            Ok(true) => {}
            Ok(false) => warn!("Surface update ignored: no surface exists and no field was given"),
            // Fehlgeschlagene Updates lassen den vorherigen Zustand stehen
            Err(err) => warn!("Surface update rejected: {}", err),
        }
    }
}

/// Löst Pick-Anfragen auf und hebt den getroffenen Punkt sofort hervor.
fn resolve_pick_requests(
    mut requests: EventReader<SurfacePickRequest>,
    mut picked: EventWriter<SurfacePicked>,
    mut surface: ResMut<SurfacePlotResource>,
) {
    let Some(plot) = surface.plot.as_mut() else {
        requests.clear();
        return;
    };

    for SurfacePickRequest(sample) in requests.read() {
        let Some(result) = plot.pick(sample) else {
            debug!("Pick sample {:?} does not hit this surface", sample);
            continue;
        };
        let selection = plot.selection_from_pick(&result);
        plot.highlight(Some(&selection));
        info!(
            "Surface picked at grid {:?}, position {:?}, levels {:?}",
            result.index, result.position, result.level
        );
        picked.send(SurfacePicked { result, selection });
    }
}

fn apply_highlight_events(
    mut events: EventReader<SurfaceHighlightEvent>,
    mut surface: ResMut<SurfacePlotResource>,
) {
    let Some(plot) = surface.plot.as_mut() else {
        events.clear();
        return;
    };
    for SurfaceHighlightEvent(selection) in events.read() {
        plot.highlight(selection.as_ref());
    }
}
