use eframe::egui;

use super::painter;
use crate::gui::constants::*;
use crate::theme::{Theme, fonts};
use crate::urls::UrlGroup;

pub enum UrlAction {
    Open(usize),
    Edit(usize),
    Add,
}

/// List of URL group cards. Clicking a group's name opens all of its URLs.
pub fn ui(ui: &mut egui::Ui, groups: &[UrlGroup], theme: &Theme) -> Option<UrlAction> {
    let mut action = None;

    if groups.is_empty() {
        ui.add_space(SECTION_SPACING);
        ui.label(egui::RichText::new("No URL groups yet").color(theme.text_secondary));
    }

    for (index, group) in groups.iter().enumerate() {
        painter::card_frame(theme).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                let details = ui.vertical(|ui| {
                    ui.label(
                        egui::RichText::new(&group.name)
                            .strong()
                            .size(fonts::HEADING),
                    );
                    let count = match group.urls.len() {
                        1 => "1 URL".to_string(),
                        n => format!("{n} URLs"),
                    };
                    ui.label(
                        egui::RichText::new(count)
                            .size(fonts::SMALL)
                            .color(theme.text_secondary),
                    );
                });
                // Name and count act as the "open" target; the edit button sits beside them
                let open = details
                    .response
                    .interact(egui::Sense::click())
                    .on_hover_cursor(egui::CursorIcon::PointingHand)
                    .on_hover_text(group.urls.join("\n"));
                if open.clicked() {
                    action = Some(UrlAction::Open(index));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if painter::icon_button(ui, "✏", theme)
                        .on_hover_text("Edit group")
                        .clicked()
                    {
                        action = Some(UrlAction::Edit(index));
                    }
                });
            });
        });
        ui.add_space(ITEM_SPACING);
    }

    ui.add_space(SECTION_SPACING);
    ui.vertical_centered(|ui| {
        if painter::accent_button(ui, "Add URL Group", theme).clicked() {
            action = Some(UrlAction::Add);
        }
    });

    action
}
