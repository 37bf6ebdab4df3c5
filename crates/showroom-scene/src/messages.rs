//! Messages exchanged between the viewer and its host

use bevy::prelude::*;
use showroom_core::{LoadStatus, Notice, QualityTier, ViewMode};

use crate::types::ViewerEngine;

/// A click on the model resolved to a part
#[derive(Message, Debug, Clone, PartialEq)]
pub struct PartInteraction {
    pub key: String,
    pub name: String,
    /// Description shortened for a toast
    pub snippet: String,
    /// True when the node matched no part in the table
    pub anonymous: bool,
}

#[derive(Message, Debug, Clone, PartialEq)]
pub struct HotspotToggled {
    pub index: usize,
    pub active: bool,
}

/// The viewer's own navigation asks the host to change view
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewModeRequested(pub ViewMode);

/// Frame rate stayed low and quality stepped down
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityDowngraded {
    pub from: QualityTier,
    pub to: QualityTier,
}

#[derive(Message, Debug, Clone, PartialEq)]
pub struct ModelStatusChanged(pub LoadStatus);

/// Load the configured model again even if the path is unchanged
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadModel;

/// Camera actions the host can trigger from its controls
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraCommand {
    DollyIn,
    DollyOut,
    Reset,
}

pub struct MessagesPlugin;

impl Plugin for MessagesPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PartInteraction>()
            .add_message::<HotspotToggled>()
            .add_message::<ViewModeRequested>()
            .add_message::<QualityDowngraded>()
            .add_message::<ModelStatusChanged>()
            .add_message::<CameraCommand>()
            .add_message::<ReloadModel>()
            .add_systems(PostUpdate, forward_notices);
    }
}

/// Drain engine notices into host messages
fn forward_notices(
    mut engine: ResMut<ViewerEngine>,
    mut parts: MessageWriter<PartInteraction>,
    mut hotspots: MessageWriter<HotspotToggled>,
    mut views: MessageWriter<ViewModeRequested>,
) {
    if !engine.has_notices() {
        return;
    }
    for notice in engine.take_notices() {
        match notice {
            Notice::PartInteraction { key, name, snippet, anonymous } => {
                tracing::info!("Part selected: {} ({})", name, key);
                parts.write(PartInteraction { key, name, snippet, anonymous });
            }
            Notice::HotspotToggled { index, active } => {
                hotspots.write(HotspotToggled { index, active });
            }
            Notice::ViewModeRequested(view) => {
                views.write(ViewModeRequested(view));
            }
        }
    }
}
