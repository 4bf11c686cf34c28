//! Dark and light palettes plus shared font sizes and corner radius

use eframe::egui::{self, Color32, Rounding, Stroke};

use crate::config::ThemeChoice;

pub mod fonts {
    pub const TITLE: f32 = 18.0;
    pub const HEADING: f32 = 16.0;
    pub const BODY: f32 = 12.0;
    pub const SMALL: f32 = 10.0;
}

pub const CORNER_RADIUS: f32 = 15.0;
pub const PADDING: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub dark: bool,
    pub background: Color32,
    pub card: Color32,
    pub text: Color32,
    pub text_secondary: Color32,
    pub accent: Color32,
    pub hover: Color32,
    pub border: Color32,
    pub highlight: Color32,
    pub error: Color32,
    pub success: Color32,
    pub shadow: Color32,
}

pub const DARK: Theme = Theme {
    dark: true,
    background: Color32::from_rgb(0x1a, 0x1e, 0x2e),
    card: Color32::from_rgb(0x24, 0x28, 0x42),
    text: Color32::from_rgb(0xff, 0xff, 0xff),
    text_secondary: Color32::from_rgb(0x8f, 0x96, 0xdd),
    accent: Color32::from_rgb(0x69, 0x78, 0xff),
    hover: Color32::from_rgb(0x53, 0x5d, 0xb2),
    border: Color32::from_rgb(0x32, 0x37, 0x61),
    highlight: Color32::from_rgb(0x53, 0x5d, 0xb2),
    error: Color32::from_rgb(0xff, 0x5f, 0x5f),
    success: Color32::from_rgb(0x5f, 0xd5, 0x87),
    shadow: Color32::from_rgb(0x10, 0x14, 0x25),
};

pub const LIGHT: Theme = Theme {
    dark: false,
    background: Color32::from_rgb(0xf8, 0xf9, 0xfa),
    card: Color32::from_rgb(0xff, 0xff, 0xff),
    text: Color32::from_rgb(0x1a, 0x1e, 0x2e),
    text_secondary: Color32::from_rgb(0x5f, 0x63, 0xaa),
    accent: Color32::from_rgb(0x69, 0x78, 0xff),
    hover: Color32::from_rgb(0x53, 0x5d, 0xb2),
    border: Color32::from_rgb(0xe9, 0xec, 0xef),
    highlight: Color32::from_rgb(0xd8, 0xdb, 0xff),
    error: Color32::from_rgb(0xff, 0x5f, 0x5f),
    success: Color32::from_rgb(0x5f, 0xd5, 0x87),
    shadow: Color32::from_rgb(0xe1, 0xe4, 0xe8),
};

impl Theme {
    pub fn for_choice(choice: ThemeChoice) -> &'static Theme {
        match choice {
            ThemeChoice::Dark => &DARK,
            ThemeChoice::Light => &LIGHT,
        }
    }

    /// egui visuals matching this palette
    pub fn visuals(&self) -> egui::Visuals {
        let mut visuals = if self.dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };

        visuals.override_text_color = Some(self.text);
        visuals.panel_fill = self.background;
        visuals.window_fill = self.card;
        visuals.extreme_bg_color = self.background;
        visuals.faint_bg_color = self.card;
        visuals.hyperlink_color = self.accent;
        visuals.error_fg_color = self.error;
        visuals.window_rounding = Rounding::same(CORNER_RADIUS);
        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.selection.bg_fill = self.accent;

        visuals.widgets.noninteractive.bg_fill = self.card;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.inactive.bg_fill = self.card;
        visuals.widgets.inactive.weak_bg_fill = self.card;
        visuals.widgets.hovered.bg_fill = self.hover;
        visuals.widgets.hovered.weak_bg_fill = self.hover;
        visuals.widgets.active.bg_fill = self.accent;
        visuals.widgets.active.weak_bg_fill = self.accent;
        visuals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_selection() {
        assert!(Theme::for_choice(ThemeChoice::Dark).dark);
        assert!(!Theme::for_choice(ThemeChoice::Light).dark);
        assert_eq!(Theme::for_choice(ThemeChoice::Light).text, DARK.background);
    }

    #[test]
    fn test_visuals_use_palette() {
        let visuals = LIGHT.visuals();
        assert!(!visuals.dark_mode);
        assert_eq!(visuals.panel_fill, LIGHT.background);
        assert_eq!(visuals.override_text_color, Some(LIGHT.text));
    }
}
