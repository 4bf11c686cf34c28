use chrono::NaiveDate;
use eframe::egui::{self, Align2, FontId, Sense, Stroke, Vec2};

use super::painter;
use crate::calendar::{CalendarView, WEEKDAY_HEADERS};
use crate::gui::constants::*;
use crate::theme::{Theme, fonts};
use crate::todo::Todo;

const CELL: f32 = 44.0;

/// Month grid with markers on days that have todos.
///
/// Returns a date when the user asks to add a todo on the selected day.
pub fn ui(
    ui: &mut egui::Ui,
    view: &mut CalendarView,
    todos: &[Todo],
    today: NaiveDate,
    theme: &Theme,
) -> Option<NaiveDate> {
    let mut add_on = None;

    ui.horizontal(|ui| {
        if ui.button("◀").clicked() {
            view.previous_month();
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("▶").clicked() {
                view.next_month();
            }
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new(view.title()).strong().size(fonts::HEADING));
            });
        });
    });
    ui.add_space(ITEM_SPACING);

    egui::Grid::new("calendar_grid")
        .spacing(Vec2::splat(4.0))
        .show(ui, |ui| {
            for header in WEEKDAY_HEADERS {
                ui.add_sized(
                    Vec2::new(CELL, 16.0),
                    egui::Label::new(
                        egui::RichText::new(header)
                            .size(fonts::SMALL)
                            .color(theme.text_secondary),
                    ),
                );
            }
            ui.end_row();

            for week in view.weeks() {
                for cell in week {
                    match cell {
                        Some(day) => {
                            if day_cell(ui, view, day, todos, today, theme).clicked() {
                                view.select(day);
                            }
                        }
                        None => {
                            ui.allocate_exact_size(Vec2::new(CELL, CELL - 10.0), Sense::hover());
                        }
                    }
                }
                ui.end_row();
            }
        });

    let (Some(selected), Some(day)) = (view.selected(), view.selected_day()) else {
        return None;
    };

    ui.add_space(SECTION_SPACING);
    ui.separator();
    ui.label(egui::RichText::new(selected.format("%A, %B %-d").to_string()).strong());

    let day_todos = view.todos_for(day, todos, today);
    if day_todos.is_empty() {
        ui.label(egui::RichText::new("No todos").color(theme.text_secondary));
    }
    for todo in day_todos {
        let mark = if todo.completed { "☑" } else { "☐" };
        ui.label(format!("{mark} {}", todo.text));
    }

    ui.add_space(ITEM_SPACING);
    ui.vertical_centered(|ui| {
        if painter::accent_button(ui, "Add To-Do on this day", theme).clicked() {
            add_on = Some(selected);
        }
    });

    add_on
}

fn day_cell(
    ui: &mut egui::Ui,
    view: &CalendarView,
    day: u32,
    todos: &[Todo],
    today: NaiveDate,
    theme: &Theme,
) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(Vec2::new(CELL, CELL - 10.0), Sense::click());
    if !ui.is_rect_visible(rect) {
        return response;
    }

    let selected = view.selected() == view.date_of(day);
    let fill = if selected {
        theme.accent
    } else if view.is_today(day, today) {
        theme.highlight
    } else if response.hovered() {
        theme.hover
    } else {
        theme.background
    };
    painter::rounded_rect(ui.painter(), rect, 8.0, fill, Stroke::NONE);

    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        day.to_string(),
        FontId::proportional(fonts::BODY),
        theme.text,
    );

    if view.has_todos(day, todos, today) {
        let dot = egui::pos2(rect.center().x, rect.bottom() - 5.0);
        ui.painter().circle_filled(dot, 2.5, theme.success);
    }

    response.on_hover_cursor(egui::CursorIcon::PointingHand)
}
