//! Pointer routing from the picking backend into the interaction engine

use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use bevy_picking::pointer::PointerId;
use bevy_picking::prelude::*;
use showroom_core::{ClickResolution, Hit};

use crate::hotspots::HotspotMarker;
use crate::models::CarMesh;
use crate::types::ViewerEngine;

/// Everything clicked this frame, in arrival order
#[derive(Resource, Default)]
pub struct PendingClicks {
    pub hits: Vec<Hit<Entity>>,
}

/// Pointer travel (in pixels) beyond which a press-release is a drag, not a tap
pub const TAP_THRESHOLD: f32 = 10.0;

/// Where each pointer went down, so orbit drags are not mistaken for clicks
#[derive(Resource, Default)]
pub struct TapTracker {
    pressed_at: HashMap<PointerId, Vec2>,
}

impl TapTracker {
    pub fn press(&mut self, pointer: PointerId, position: Vec2) {
        self.pressed_at.insert(pointer, position);
    }

    /// Consume the press for `pointer` and report whether the release was a tap
    pub fn release_is_tap(&mut self, pointer: PointerId, position: Vec2) -> bool {
        match self.pressed_at.remove(&pointer) {
            Some(start) => start.distance(position) <= TAP_THRESHOLD,
            // Press happened off any pickable entity
            None => true,
        }
    }
}

pub struct PickingRoutePlugin;

impl Plugin for PickingRoutePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingClicks>()
            .init_resource::<TapTracker>()
            .add_observer(on_pointer_press)
            .add_observer(on_pointer_over)
            .add_observer(on_pointer_out)
            .add_observer(on_pointer_click)
            .add_systems(Update, resolve_pending_clicks);
    }
}

fn on_pointer_over(
    trigger: On<Pointer<Over>>,
    car_meshes: Query<(), With<CarMesh>>,
    mut engine: ResMut<ViewerEngine>,
) {
    let entity = trigger.event().event_target();
    if car_meshes.contains(entity) {
        engine.pointer_over(entity);
    }
}

fn on_pointer_out(
    trigger: On<Pointer<Out>>,
    car_meshes: Query<(), With<CarMesh>>,
    mut engine: ResMut<ViewerEngine>,
) {
    let entity = trigger.event().event_target();
    if car_meshes.contains(entity) {
        engine.pointer_out(entity);
    }
}

fn on_pointer_press(trigger: On<Pointer<Press>>, mut taps: ResMut<TapTracker>) {
    let event = trigger.event();
    if event.button == PointerButton::Primary {
        taps.press(event.pointer_id, event.pointer_location.position);
    }
}

fn on_pointer_click(
    mut trigger: On<Pointer<Click>>,
    markers: Query<&HotspotMarker>,
    car_meshes: Query<(), With<CarMesh>>,
    mut pending: ResMut<PendingClicks>,
    mut taps: ResMut<TapTracker>,
) {
    let event = trigger.event();
    if event.button != PointerButton::Primary {
        return;
    }
    if !taps.release_is_tap(event.pointer_id, event.pointer_location.position) {
        tracing::debug!("Ignoring click at the end of a drag");
        trigger.propagate(false);
        return;
    }
    let entity = trigger.event().event_target();
    if let Ok(marker) = markers.get(entity) {
        pending.hits.push(Hit::Marker(marker.index));
        trigger.propagate(false);
    } else if car_meshes.contains(entity) {
        pending.hits.push(Hit::Mesh(entity));
        trigger.propagate(false);
    }
}

/// Resolve the frame's clicks together so a marker beats the mesh behind it
fn resolve_pending_clicks(mut pending: ResMut<PendingClicks>, mut engine: ResMut<ViewerEngine>) {
    if pending.hits.is_empty() {
        return;
    }
    let hits = std::mem::take(&mut pending.hits);
    match engine.resolve_click(&hits) {
        ClickResolution::Hotspot(index) => tracing::debug!("Hotspot {} clicked", index),
        ClickResolution::Part => {}
        ClickResolution::Nothing => tracing::debug!("Click resolved to nothing"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_jitter_is_still_a_tap() {
        let mut taps = TapTracker::default();
        taps.press(PointerId::Mouse, Vec2::new(100.0, 100.0));
        assert!(taps.release_is_tap(PointerId::Mouse, Vec2::new(104.0, 97.0)));
    }

    #[test]
    fn test_orbit_drag_is_not_a_tap() {
        let mut taps = TapTracker::default();
        taps.press(PointerId::Mouse, Vec2::new(100.0, 100.0));
        assert!(!taps.release_is_tap(PointerId::Mouse, Vec2::new(180.0, 110.0)));
    }

    #[test]
    fn test_presses_tracked_per_pointer() {
        let mut taps = TapTracker::default();
        taps.press(PointerId::Mouse, Vec2::ZERO);
        taps.press(PointerId::Touch(1), Vec2::new(50.0, 0.0));
        assert!(!taps.release_is_tap(PointerId::Touch(1), Vec2::new(200.0, 0.0)));
        assert!(taps.release_is_tap(PointerId::Mouse, Vec2::new(1.0, 1.0)));
        // Press is consumed by the release
        assert!(taps.release_is_tap(PointerId::Mouse, Vec2::new(500.0, 500.0)));
    }
}
