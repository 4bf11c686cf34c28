//! Drawing primitives for the widget's rounded "glass" look

use eframe::egui::{
    self, Align2, Color32, CursorIcon, FontId, Painter, Rect, Response, Rounding, Sense, Stroke, Vec2,
};

use crate::constants::window::OPACITY;
use crate::gui::constants::{BUTTON_SIZE, TAB_HEIGHT};
use crate::theme::{CORNER_RADIUS, PADDING, Theme, fonts};

pub fn rounded_rect(painter: &Painter, rect: Rect, radius: f32, fill: Color32, stroke: Stroke) {
    painter.rect(rect, Rounding::same(radius), fill, stroke);
}

/// Card background with a soft drop shadow, filling `rect`
pub fn glass_panel(painter: &Painter, rect: Rect, theme: &Theme) {
    let shadow = rect.translate(Vec2::new(0.0, 2.0)).shrink(1.0);
    rounded_rect(painter, shadow, CORNER_RADIUS, theme.shadow.gamma_multiply(0.6), Stroke::NONE);
    rounded_rect(
        painter,
        rect.shrink(2.0),
        CORNER_RADIUS,
        theme.card.gamma_multiply(OPACITY),
        Stroke::new(1.0, theme.border),
    );
}

/// Frame for list items inside the expanded view
pub fn card_frame(theme: &Theme) -> egui::Frame {
    egui::Frame::none()
        .fill(theme.background)
        .rounding(Rounding::same(CORNER_RADIUS / 2.0))
        .stroke(Stroke::new(1.0, theme.border))
        .inner_margin(egui::Margin::symmetric(PADDING / 1.5, PADDING / 2.0))
}

/// Square button showing a single glyph
pub fn icon_button(ui: &mut egui::Ui, icon: &str, theme: &Theme) -> Response {
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(BUTTON_SIZE), Sense::click());
    if ui.is_rect_visible(rect) {
        let fill = if response.hovered() { theme.hover } else { theme.background };
        rounded_rect(ui.painter(), rect, BUTTON_SIZE / 4.0, fill, Stroke::new(1.0, theme.border));
        ui.painter().text(
            rect.center(),
            Align2::CENTER_CENTER,
            icon,
            FontId::proportional(fonts::HEADING),
            theme.text,
        );
    }
    response.on_hover_cursor(CursorIcon::PointingHand)
}

/// Tab header; the active tab is filled with the accent color
pub fn tab_button(ui: &mut egui::Ui, label: &str, active: bool, width: f32, theme: &Theme) -> Response {
    let (rect, response) = ui.allocate_exact_size(Vec2::new(width, TAB_HEIGHT), Sense::click());
    if ui.is_rect_visible(rect) {
        let (fill, text) = match (active, response.hovered()) {
            (true, _) => (theme.accent, Color32::WHITE),
            (false, true) => (theme.hover, theme.text),
            (false, false) => (theme.background, theme.text_secondary),
        };
        rounded_rect(ui.painter(), rect, TAB_HEIGHT / 2.0, fill, Stroke::NONE);
        ui.painter().text(
            rect.center(),
            Align2::CENTER_CENTER,
            label,
            FontId::proportional(fonts::BODY + 1.0),
            text,
        );
    }
    response.on_hover_cursor(CursorIcon::PointingHand)
}

/// Full-width call-to-action button
pub fn accent_button(ui: &mut egui::Ui, label: &str, theme: &Theme) -> Response {
    let button = egui::Button::new(egui::RichText::new(label).color(Color32::WHITE))
        .fill(theme.accent)
        .rounding(Rounding::same(CORNER_RADIUS / 2.0))
        .min_size(Vec2::new(150.0, BUTTON_SIZE));
    ui.add(button).on_hover_cursor(CursorIcon::PointingHand)
}
