use eframe::egui;

use super::painter;
use crate::gui::constants::*;
use crate::notification::NotificationManager;
use crate::theme::{Theme, fonts};

/// Stack active toasts over the top of the widget; × dismisses one
pub fn ui(ctx: &egui::Context, notifications: &mut NotificationManager, theme: &Theme) {
    let mut dismissed = None;

    for (index, toast) in notifications.active().iter().enumerate() {
        let offset = egui::vec2(0.0, 6.0 + index as f32 * 64.0);
        egui::Area::new(egui::Id::new(("toast", index)))
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_TOP, offset)
            .show(ctx, |ui| {
                painter::card_frame(theme)
                    .fill(theme.card)
                    .stroke(egui::Stroke::new(1.5, theme.accent))
                    .show(ui, |ui| {
                        ui.set_width(TOAST_WIDTH);
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.label(
                                    egui::RichText::new(&toast.title)
                                        .strong()
                                        .color(theme.accent),
                                );
                                ui.label(egui::RichText::new(&toast.message).size(fonts::BODY));
                            });
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                                if ui.small_button("×").clicked() {
                                    dismissed = Some(index);
                                }
                            });
                        });
                    });
            });
    }

    if let Some(index) = dismissed {
        notifications.dismiss(index);
    }
}
