//! UI overlays using bevy_egui - hotspot labels and the detail panel

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use crate::camera::MainCamera;
use crate::hotspots::{FieldFrames, HotspotFieldRes};

/// Height of a label above its hotspot, in world units
pub const LABEL_OFFSET: f32 = 0.16;

/// Label colors as (background, text)
pub fn label_colors(is_active: bool) -> (egui::Color32, egui::Color32) {
    if is_active {
        // amber
        (
            egui::Color32::from_rgb(0xfe, 0xf3, 0xc7),
            egui::Color32::from_rgb(0x92, 0x40, 0x0e),
        )
    } else {
        (
            egui::Color32::from_rgba_unmultiplied(255, 255, 255, 230),
            egui::Color32::from_rgb(0x04, 0x78, 0x57),
        )
    }
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
        app.add_systems(EguiPrimaryContextPass, (hotspot_labels, detail_panel).chain());
    }
}

fn hotspot_labels(
    mut contexts: EguiContexts,
    field: Res<HotspotFieldRes>,
    frames: Res<FieldFrames>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    for frame in &frames.0 {
        let anchor = Vec3::from(frame.position) + Vec3::Y * LABEL_OFFSET;
        let Ok(screen) = camera.world_to_viewport(camera_transform, anchor) else {
            continue;
        };
        let title = field
            .0
            .registry()
            .get(&frame.id)
            .map(|h| h.title.as_str())
            .unwrap_or(frame.id.as_str());
        let (fill, text) = label_colors(frame.is_active);

        egui::Area::new(egui::Id::new(("hotspot_label", frame.id.as_str())))
            .fixed_pos(egui::pos2(screen.x, screen.y))
            .pivot(egui::Align2::CENTER_CENTER)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(fill)
                    .corner_radius(4.0)
                    .inner_margin(egui::Margin::symmetric(8, 4))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(title).small().color(text));
                    });
            });
    }
}

fn detail_panel(mut contexts: EguiContexts, mut field: ResMut<HotspotFieldRes>) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let Some(panel) = field.0.detail_panel() else {
        return;
    };

    let mut close = false;
    egui::TopBottomPanel::bottom("hotspot_detail")
        .frame(
            egui::Frame::new()
                .fill(egui::Color32::WHITE)
                .inner_margin(egui::Margin::same(20))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(0xe6, 0xe0, 0xd7))),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.heading(egui::RichText::new(&panel.title).strong());
                    ui.label(
                        egui::RichText::new(&panel.description)
                            .color(egui::Color32::from_rgb(0x47, 0x55, 0x69)),
                    );
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                });
            });
        });

    if close {
        field.0.deactivate();
    }
}
