//! Host page controls using bevy_egui

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use showroom_core::view::{EXPLODE_MAX, EXPLODE_MIN, EXPLODE_STEP};
use showroom_core::{LoadStatus, QualityTier, ShowroomCatalog, ViewMode};
use showroom_scene::models::CarModelRoot;
use showroom_scene::{
    CameraCommand, HotspotToggled, ModelStatusChanged, PartInteraction, QualityDowngraded,
    ReloadModel, UiLayout, ViewModeRequested, ViewerContent, ViewerEngine, ViewerSettings,
};

use crate::fetch::{parse_catalog, CatalogFetch};
use crate::toasts::ToastQueue;

/// Host-side state: which catalog model is showing and pending toasts
#[derive(Resource)]
pub struct HostState {
    pub catalog: ShowroomCatalog,
    /// Catalog id of the current model, `None` for a raw path
    pub model_id: Option<String>,
    pub toasts: ToastQueue,
    pub show_controls: bool,
}

impl HostState {
    pub fn new(catalog: ShowroomCatalog, model_id: Option<String>) -> Self {
        Self {
            catalog,
            model_id,
            toasts: ToastQueue::default(),
            show_controls: true,
        }
    }
}

/// Grouped system parameters for the host UI system
#[derive(SystemParam)]
pub struct UiParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub host: ResMut<'w, HostState>,
    pub settings: ResMut<'w, ViewerSettings>,
    pub ui_layout: Res<'w, UiLayout>,
    pub camera_commands: MessageWriter<'w, CameraCommand>,
    pub catalog_fetch: Res<'w, CatalogFetch>,
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CatalogFetch>()
            .add_systems(
                Update,
                (
                    process_catalog_fetch,
                    apply_view_requests,
                    collect_toasts,
                ),
            )
            .add_systems(EguiPrimaryContextPass, ui_system);
    }
}

/// Swap in a downloaded catalog and reload with its default model
fn process_catalog_fetch(
    mut commands: Commands,
    roots: Query<Entity, With<CarModelRoot>>,
    mut fetch: ResMut<CatalogFetch>,
    mut host: ResMut<HostState>,
    mut settings: ResMut<ViewerSettings>,
    mut reload: MessageWriter<ReloadModel>,
) {
    let Some(result) = fetch.take_result() else {
        return;
    };
    let url = fetch.url.clone().unwrap_or_default();
    let parsed = result.and_then(|body| parse_catalog(&url, &body).map_err(|e| e.to_string()));

    match parsed {
        Ok(catalog) => {
            tracing::info!("Catalog loaded from {} ({} models)", url, catalog.model.len());
            let content = ViewerContent {
                hotspots: catalog.hotspot_catalog(),
                parts: catalog.part_table(),
                surfaces: catalog.surfaces.clone(),
            };

            settings.placeholder_path = catalog.placeholder.clone();
            if let Some(model) = catalog.default_model() {
                settings.model_path = model.model_path.clone();
                settings.color = model.default_color();
                host.model_id = Some(model.id.clone());
            }
            // The new engine is unbound; the old model must not stay pickable
            for root in roots.iter() {
                commands.entity(root).despawn();
            }
            commands.insert_resource(ViewerEngine::new(&content, &settings));
            commands.insert_resource(content);
            host.catalog = catalog;
            reload.write(ReloadModel);
        }
        Err(err) => {
            tracing::warn!("Failed to load catalog from {}: {}", url, err);
            fetch.error = Some(err);
        }
    }
}

/// The viewer asks, the host decides: apply requested views
fn apply_view_requests(
    mut requests: MessageReader<ViewModeRequested>,
    mut settings: ResMut<ViewerSettings>,
) {
    if let Some(ViewModeRequested(view)) = requests.read().last() {
        if settings.active_view != *view {
            tracing::info!("Switching to {} view", view);
            settings.active_view = *view;
        }
    }
}

fn collect_toasts(
    mut host: ResMut<HostState>,
    time: Res<Time>,
    engine: Res<ViewerEngine>,
    mut parts: MessageReader<PartInteraction>,
    mut hotspots: MessageReader<HotspotToggled>,
    mut downgrades: MessageReader<QualityDowngraded>,
    mut statuses: MessageReader<ModelStatusChanged>,
) {
    let now = time.elapsed_secs_f64();

    for part in parts.read() {
        host.toasts.push(format!("Part: {}", part.name), part.snippet.clone(), now);
    }
    for toggled in hotspots.read() {
        if !toggled.active {
            continue;
        }
        if let Some(hotspot) = engine.hotspots().get(toggled.index) {
            host.toasts.push(hotspot.title.clone(), hotspot.category.to_string(), now);
        }
    }
    for downgrade in downgrades.read() {
        host.toasts.push(
            "Quality lowered",
            format!("Switched to {} quality to keep things smooth", downgrade.to.label()),
            now,
        );
    }
    for ModelStatusChanged(status) in statuses.read() {
        if let LoadStatus::Ready { fallback: true, .. } = status {
            host.toasts.push("Model unavailable", "Showing a placeholder model instead", now);
        }
    }

    host.toasts.prune(now);
}

fn ui_system(mut params: UiParams) {
    let is_mobile = params.ui_layout.is_mobile;
    let ui_scale = params.ui_layout.ui_scale();

    // Get the egui context - early return if not available
    let Ok(ctx) = params.contexts.ctx_mut() else { return };
    let ctx = ctx.clone();

    if is_mobile {
        egui::TopBottomPanel::bottom("mobile_toolbar").show(&ctx, |ui| {
            ui.horizontal(|ui| {
                let menu_text = if params.host.show_controls { "✕ Controls" } else { "☰ Controls" };
                if ui.button(egui::RichText::new(menu_text).size(16.0 * ui_scale)).clicked() {
                    params.host.show_controls = !params.host.show_controls;
                }
            });
        });
    }

    if params.host.show_controls {
        let panel = egui::SidePanel::left("controls_panel")
            .resizable(false)
            .default_width(if is_mobile { params.ui_layout.screen_width * 0.8 } else { 260.0 });
        panel.show(&ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                render_controls(ui, &mut params, ui_scale);
            });
        });
    }

    // Toasts, newest at the bottom
    let mut dismissed = None;
    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -64.0))
        .show(&ctx, |ui| {
            for (index, toast) in params.host.toasts.iter().enumerate() {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(280.0 * ui_scale);
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(&toast.title).strong());
                        if ui.small_button("✕").clicked() {
                            dismissed = Some(index);
                        }
                    });
                    if !toast.body.is_empty() {
                        ui.label(egui::RichText::new(&toast.body).small());
                    }
                });
            }
        });
    if let Some(index) = dismissed {
        params.host.toasts.dismiss(index);
    }
}

fn render_controls(ui: &mut egui::Ui, params: &mut UiParams, ui_scale: f32) {
    ui.heading(egui::RichText::new("Showroom").size(20.0 * ui_scale));

    // Model picker
    let current_name = params
        .host
        .model_id
        .as_deref()
        .and_then(|id| params.host.catalog.find_model(id).ok())
        .map(|m| m.name.clone())
        .unwrap_or_else(|| "Custom model".to_string());
    let mut picked = None;
    egui::ComboBox::from_id_salt("model_picker")
        .selected_text(current_name)
        .show_ui(ui, |ui| {
            for model in &params.host.catalog.model {
                let selected = params.host.model_id.as_deref() == Some(model.id.as_str());
                if ui.selectable_label(selected, &model.name).clicked() {
                    picked = Some(model.clone());
                }
            }
        });
    if let Some(model) = picked {
        tracing::info!("Model selected: {}", model.id);
        params.settings.model_path = model.model_path.clone();
        params.settings.color = model.default_color();
        params.host.model_id = Some(model.id);
    }
    if let Some(tagline) = params
        .host
        .model_id
        .as_deref()
        .and_then(|id| params.host.catalog.find_model(id).ok())
        .and_then(|m| m.tagline.clone())
    {
        ui.label(egui::RichText::new(tagline).small().color(egui::Color32::GRAY));
    }
    if let Some(error) = &params.catalog_fetch.error {
        ui.label(
            egui::RichText::new(format!("Catalog: {}", error))
                .small()
                .color(egui::Color32::from_rgb(255, 100, 100)),
        );
    }

    ui.separator();

    // View mode
    ui.label("View");
    ui.horizontal(|ui| {
        for view in ViewMode::ALL {
            let selected = params.settings.active_view == view;
            if ui.selectable_label(selected, view.label()).clicked() && !selected {
                params.settings.active_view = view;
            }
        }
    });

    // Paint
    let colors = params
        .host
        .model_id
        .as_deref()
        .and_then(|id| params.host.catalog.find_model(id).ok())
        .map(|m| m.colors.clone())
        .unwrap_or_default();
    if !colors.is_empty() {
        ui.label("Color");
        ui.horizontal_wrapped(|ui| {
            for color in colors {
                let rgba = color.color();
                let swatch = egui::Color32::from_rgb(
                    (rgba.r * 255.0) as u8,
                    (rgba.g * 255.0) as u8,
                    (rgba.b * 255.0) as u8,
                );
                let selected = params.settings.color == color;
                let button = egui::Button::new("")
                    .fill(swatch)
                    .min_size(egui::vec2(28.0 * ui_scale, 28.0 * ui_scale))
                    .selected(selected);
                if ui.add(button).on_hover_text(&color.name).clicked() && !selected {
                    params.settings.color = color;
                }
            }
        });
        ui.label(egui::RichText::new(&params.settings.color.name).small());
    }

    ui.separator();

    // Explode
    let mut explode = params.settings.explode_amount;
    ui.label("Exploded view");
    if ui
        .add(egui::Slider::new(&mut explode, EXPLODE_MIN..=EXPLODE_MAX).step_by(EXPLODE_STEP as f64))
        .changed()
    {
        params.settings.explode_amount = explode;
    }

    // Toggles
    let mut show_hotspots = params.settings.show_hotspots;
    if ui.checkbox(&mut show_hotspots, "Show hotspots").changed() {
        params.settings.show_hotspots = show_hotspots;
    }
    let mut highlight = params.settings.highlight_parts;
    if ui.checkbox(&mut highlight, "Highlight parts").changed() {
        params.settings.highlight_parts = highlight;
    }

    ui.separator();

    // Quality
    ui.label("Quality");
    ui.horizontal(|ui| {
        for tier in QualityTier::ALL {
            let selected = params.settings.quality == tier;
            if ui.selectable_label(selected, tier.label()).clicked() && !selected {
                params.settings.quality = tier;
            }
        }
    });
    let mut auto_quality = params.settings.auto_quality;
    if ui.checkbox(&mut auto_quality, "Adjust automatically").changed() {
        params.settings.auto_quality = auto_quality;
    }
    let mut show_stats = params.settings.show_stats;
    if ui.checkbox(&mut show_stats, "Show stats").changed() {
        params.settings.show_stats = show_stats;
    }

    ui.separator();

    // Camera
    ui.horizontal(|ui| {
        if ui.button("Zoom in").clicked() {
            params.camera_commands.write(CameraCommand::DollyIn);
        }
        if ui.button("Zoom out").clicked() {
            params.camera_commands.write(CameraCommand::DollyOut);
        }
        if ui.button("Reset view").clicked() {
            params.camera_commands.write(CameraCommand::Reset);
        }
    });
}
