use chrono::NaiveDateTime;
use eframe::egui;

use super::painter;
use crate::gui::constants::*;
use crate::theme::{Theme, fonts};
use crate::todo::Todo;
use crate::types::DueStatus;

pub enum TodoAction {
    Toggle(String),
    Edit(String),
    Delete(String),
    Add,
}

pub fn ui(ui: &mut egui::Ui, todos: &[Todo], now: NaiveDateTime, theme: &Theme) -> Option<TodoAction> {
    let mut action = None;

    if todos.is_empty() {
        ui.add_space(SECTION_SPACING);
        ui.label(egui::RichText::new("Nothing to do").color(theme.text_secondary));
    }

    for todo in todos {
        let status = todo.due_status(now);
        let mut frame = painter::card_frame(theme);
        if status == DueStatus::DueSoon && !todo.completed {
            frame = frame.fill(theme.highlight.gamma_multiply(0.35));
        }

        frame.show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.set_min_height(ROW_HEIGHT - 16.0);
            ui.horizontal(|ui| {
                let mut completed = todo.completed;
                if ui.checkbox(&mut completed, "").changed() {
                    action = Some(TodoAction::Toggle(todo.id.clone()));
                }

                ui.vertical(|ui| {
                    let mut text = egui::RichText::new(&todo.text).size(fonts::BODY + 1.0);
                    if todo.completed {
                        text = text.strikethrough().color(theme.text_secondary);
                    }
                    ui.label(text);

                    if let Some(due) = todo.due {
                        let color = match status {
                            DueStatus::Overdue if !todo.completed => theme.error,
                            DueStatus::DueSoon if !todo.completed => theme.accent,
                            _ => theme.text_secondary,
                        };
                        ui.label(
                            egui::RichText::new(format!("Due: {due}"))
                                .size(fonts::SMALL)
                                .color(color),
                        );
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .small_button("🗑")
                        .on_hover_text("Delete")
                        .clicked()
                    {
                        action = Some(TodoAction::Delete(todo.id.clone()));
                    }
                    if ui.small_button("✏").on_hover_text("Edit").clicked() {
                        action = Some(TodoAction::Edit(todo.id.clone()));
                    }
                });
            });
        });
        ui.add_space(ITEM_SPACING);
    }

    ui.add_space(SECTION_SPACING);
    ui.vertical_centered(|ui| {
        if painter::accent_button(ui, "Add To-Do", theme).clicked() {
            action = Some(TodoAction::Add);
        }
    });

    action
}
