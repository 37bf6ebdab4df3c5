//! In-scene overlays: hotspot panels, hover label, part details and view navigation

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use showroom_core::{CarPart, Hit, HotspotOverlay, LoadStatus, ViewStep};

use crate::camera::MainCamera;
use crate::picking::PendingClicks;
use crate::types::{to_vec3, ModelLoad, UiLayout, ViewerEngine, ViewerSettings};

/// World position of the floating hover label
pub const HOVER_LABEL_POSITION: Vec3 = Vec3::new(0.0, 1.5, 0.0);

/// Grouped system parameters for the overlay system
#[derive(SystemParam)]
pub struct OverlayParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub engine: ResMut<'w, ViewerEngine>,
    pub load: Res<'w, ModelLoad>,
    pub pending_clicks: ResMut<'w, PendingClicks>,
    pub ui_layout: Res<'w, UiLayout>,
    pub settings: Res<'w, ViewerSettings>,
    pub diagnostics: Res<'w, DiagnosticsStore>,
    pub cameras: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<MainCamera>>,
}

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, update_ui_layout)
            .add_systems(EguiPrimaryContextPass, overlay_system);
    }
}

/// Update UI layout based on window size
fn update_ui_layout(windows: Query<&Window>, mut ui_layout: ResMut<UiLayout>) {
    if let Ok(window) = windows.single() {
        let width = window.width();
        let height = window.height();

        // Only update if dimensions changed significantly
        if (ui_layout.screen_width - width).abs() > 1.0
            || (ui_layout.screen_height - height).abs() > 1.0
        {
            ui_layout.update_for_screen(width, height);
        }
    }
}

fn overlay_system(mut params: OverlayParams) {
    let Ok(ctx) = params.contexts.ctx_mut() else { return };
    let ctx = ctx.clone();
    let ui_scale = params.ui_layout.ui_scale();

    let project = |world: Vec3| -> Option<egui::Pos2> {
        let (camera, camera_transform) = params.cameras.single().ok()?;
        let viewport = camera.world_to_viewport(camera_transform, world).ok()?;
        Some(egui::pos2(viewport.x, viewport.y))
    };

    // Hotspot panels and chips
    let active = params.engine.state().active_hotspot;
    let mut toggled = None;
    for (index, hotspot) in params.engine.visible_hotspots().iter().enumerate() {
        let overlay = HotspotOverlay::for_index(index, active);
        let world = to_vec3(hotspot.position) + Vec3::Y * overlay.offset();
        let Some(pos) = project(world) else { continue };

        egui::Area::new(egui::Id::new(("hotspot_overlay", index)))
            .fixed_pos(pos)
            .pivot(egui::Align2::CENTER_BOTTOM)
            .show(&ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| match overlay {
                    HotspotOverlay::Detail => {
                        ui.set_max_width(240.0 * ui_scale);
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(&hotspot.title)
                                    .strong()
                                    .size(15.0 * ui_scale),
                            );
                            if ui.small_button("✕").clicked() {
                                toggled = Some(index);
                            }
                        });
                        ui.label(
                            egui::RichText::new(hotspot.category.as_str())
                                .small()
                                .color(egui::Color32::GRAY),
                        );
                        ui.label(&hotspot.description);
                        if let Some(image) = &hotspot.detail_image {
                            ui.hyperlink_to("View close-up", image);
                        }
                    }
                    HotspotOverlay::TitleChip => {
                        let chip = egui::Label::new(
                            egui::RichText::new(&hotspot.title).size(12.0 * ui_scale),
                        )
                        .sense(egui::Sense::click());
                        if ui.add(chip).clicked() {
                            toggled = Some(index);
                        }
                    }
                });
            });
    }
    if let Some(index) = toggled {
        params.pending_clicks.hits.push(Hit::Marker(index));
    }

    // Hover label
    if let Some(label) = params.engine.hover_label() {
        if let Some(pos) = project(HOVER_LABEL_POSITION) {
            egui::Area::new(egui::Id::new("hover_label"))
                .fixed_pos(pos)
                .pivot(egui::Align2::CENTER_CENTER)
                .interactable(false)
                .show(&ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(egui::RichText::new(label).strong().size(14.0 * ui_scale));
                    });
                });
        }
    }

    // Part details
    let mut close_part = false;
    if let Some(selected) = &params.engine.state().selected_part {
        egui::Window::new("Part details")
            .id(egui::Id::new("part_details"))
            .collapsible(false)
            .resizable(false)
            .default_width(params.ui_layout.detail_panel_width())
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
            .show(&ctx, |ui| {
                render_part_details(ui, &selected.part, &params.ui_layout);
                ui.separator();
                if ui.button("Close").clicked() {
                    close_part = true;
                }
            });
    }
    if close_part {
        params.engine.close_part();
    }

    // Previous / next view
    let current = params.engine.context().view;
    let mut step = None;
    egui::Area::new(egui::Id::new("view_navigation"))
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -16.0))
        .show(&ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("◀").clicked() {
                        step = Some(ViewStep::Previous);
                    }
                    ui.label(egui::RichText::new(current.label()).size(14.0 * ui_scale));
                    if ui.button("▶").clicked() {
                        step = Some(ViewStep::Next);
                    }
                });
            });
        });
    if let Some(step) = step {
        params.engine.request_view(step);
    }

    // Frame stats
    if params.settings.show_stats {
        let fps = params
            .diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .and_then(|fps| fps.smoothed());
        let frame_time = params
            .diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
            .and_then(|time| time.smoothed());
        egui::Area::new(egui::Id::new("frame_stats"))
            .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 12.0))
            .interactable(false)
            .show(&ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(format_stats(fps, frame_time))
                            .monospace()
                            .size(12.0 * ui_scale),
                    );
                });
            });
    }

    // Loading / error indicator
    let status = params.load.tracker.status();
    if let Some(message) = status.message() {
        let color = match status {
            LoadStatus::Failed { .. } => egui::Color32::from_rgb(255, 100, 100),
            _ => egui::Color32::from_rgb(200, 200, 200),
        };
        egui::Area::new(egui::Id::new("load_status"))
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .interactable(false)
            .show(&ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    if status.is_loading() {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(egui::RichText::new(message).color(color));
                        });
                    } else {
                        ui.label(egui::RichText::new(message).color(color));
                    }
                });
            });
    }
}

/// One-line frame stats readout
pub fn format_stats(fps: Option<f64>, frame_time_ms: Option<f64>) -> String {
    match (fps, frame_time_ms) {
        (Some(fps), Some(ms)) => format!("FPS: {:.0} ({:.1} ms)", fps, ms),
        (Some(fps), None) => format!("FPS: {:.0}", fps),
        _ => "FPS: --".to_string(),
    }
}

/// Render part details panel (shared between apps)
pub fn render_part_details(ui: &mut egui::Ui, part: &CarPart, ui_layout: &UiLayout) {
    let ui_scale = ui_layout.ui_scale();

    ui.heading(egui::RichText::new(&part.name).size(18.0 * ui_scale));
    if part.is_anonymous() {
        ui.label(
            egui::RichText::new("Not in the parts catalog")
                .small()
                .color(egui::Color32::GRAY),
        );
    }
    ui.label(&part.description);

    if !part.specs.is_empty() {
        ui.separator();
        egui::Grid::new(("part_specs", part.key.as_str()))
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for spec in &part.specs {
                    ui.label(egui::RichText::new(&spec.label).color(egui::Color32::GRAY));
                    ui.label(&spec.value);
                    ui.end_row();
                }
            });
    }

    if let Some(image) = &part.image {
        ui.hyperlink_to("Part image", image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_readout() {
        assert_eq!(format_stats(Some(59.6), Some(16.78)), "FPS: 60 (16.8 ms)");
        assert_eq!(format_stats(Some(30.2), None), "FPS: 30");
        assert_eq!(format_stats(None, Some(16.0)), "FPS: --");
    }
}
