//! Add/edit forms shown in their own always-on-top window

use anyhow::Result;
use chrono::NaiveDate;
use eframe::egui;

use crate::config::ThemeChoice;
use crate::gui::constants::*;
use crate::theme::{Theme, fonts};
use crate::todo::Todo;
use crate::types::{DUE_INPUT_HINT, Due};
use crate::urls::{UrlGroup, parse_url_lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Save,
    Cancel,
    Delete,
    Quit,
}

pub enum Dialog {
    Group(GroupForm),
    Todo(TodoForm),
    Settings(SettingsForm),
}

impl Dialog {
    pub fn title(&self) -> &'static str {
        match self {
            Dialog::Group(form) if form.editing.is_some() => "Edit URL Group",
            Dialog::Group(_) => "Add URL Group",
            Dialog::Todo(form) if form.editing.is_some() => "Edit To-Do",
            Dialog::Todo(_) => "Add To-Do",
            Dialog::Settings(_) => "Settings",
        }
    }

    pub fn set_error(&mut self, message: String) {
        let error = match self {
            Dialog::Group(form) => &mut form.error,
            Dialog::Todo(form) => &mut form.error,
            Dialog::Settings(form) => &mut form.error,
        };
        *error = Some(message);
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, theme: &Theme) -> Option<FormAction> {
        ui.add_space(ITEM_SPACING);
        let action = match self {
            Dialog::Group(form) => form.ui(ui, theme),
            Dialog::Todo(form) => form.ui(ui, theme),
            Dialog::Settings(form) => form.ui(ui, theme),
        };

        let error = match self {
            Dialog::Group(form) => form.error.as_deref(),
            Dialog::Todo(form) => form.error.as_deref(),
            Dialog::Settings(form) => form.error.as_deref(),
        };
        if let Some(error) = error {
            ui.add_space(ITEM_SPACING);
            ui.colored_label(theme.error, error);
        }
        action
    }
}

/// Save/Cancel row, with optional extra button on the left
fn buttons(ui: &mut egui::Ui, theme: &Theme, extra: Option<(&str, FormAction)>) -> Option<FormAction> {
    let mut action = None;
    ui.add_space(SECTION_SPACING);
    ui.horizontal(|ui| {
        if ui.button("Cancel").clicked() {
            action = Some(FormAction::Cancel);
        }
        if let Some((label, extra_action)) = extra
            && ui
                .button(egui::RichText::new(label).color(theme.error))
                .clicked()
        {
            action = Some(extra_action);
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let save = egui::Button::new(egui::RichText::new("Save").color(egui::Color32::WHITE))
                .fill(theme.accent);
            if ui.add(save).clicked() {
                action = Some(FormAction::Save);
            }
        });
    });
    action
}

#[derive(Debug, Default)]
pub struct GroupForm {
    /// Index of the group being edited, `None` when adding
    pub editing: Option<usize>,
    pub name: String,
    /// One URL per line
    pub urls_text: String,
    pub error: Option<String>,
}

impl GroupForm {
    pub fn edit(index: usize, group: &UrlGroup) -> Self {
        Self {
            editing: Some(index),
            name: group.name.clone(),
            urls_text: group.urls.join("\n"),
            error: None,
        }
    }

    pub fn urls(&self) -> Vec<String> {
        parse_url_lines(&self.urls_text)
    }

    fn ui(&mut self, ui: &mut egui::Ui, theme: &Theme) -> Option<FormAction> {
        ui.label(egui::RichText::new("Group Name:").strong());
        ui.add(egui::TextEdit::singleline(&mut self.name).desired_width(f32::INFINITY));
        ui.add_space(ITEM_SPACING);

        ui.label(egui::RichText::new("URLs (one per line):").strong());
        ui.add(
            egui::TextEdit::multiline(&mut self.urls_text)
                .desired_rows(6)
                .desired_width(f32::INFINITY)
                .hint_text("https://example.com"),
        );

        let delete = self.editing.map(|_| ("Delete", FormAction::Delete));
        buttons(ui, theme, delete)
    }
}

#[derive(Debug, Default)]
pub struct TodoForm {
    /// Id of the todo being edited, `None` when adding
    pub editing: Option<String>,
    pub text: String,
    pub has_due: bool,
    pub due_text: String,
    pub error: Option<String>,
}

impl TodoForm {
    /// New todo pre-filled with a due date
    pub fn on_date(date: NaiveDate) -> Self {
        Self {
            has_due: true,
            due_text: Due::Date(date).to_string(),
            ..Self::default()
        }
    }

    pub fn edit(todo: &Todo) -> Self {
        Self {
            editing: Some(todo.id.clone()),
            text: todo.text.clone(),
            has_due: todo.due.is_some(),
            due_text: todo.due.map(|d| d.to_string()).unwrap_or_default(),
            error: None,
        }
    }

    /// Parsed due value; the entry is ignored when the checkbox is off
    pub fn due(&self) -> Result<Option<Due>> {
        if !self.has_due || self.due_text.trim().is_empty() {
            return Ok(None);
        }
        Due::parse(&self.due_text).map(Some)
    }

    fn ui(&mut self, ui: &mut egui::Ui, theme: &Theme) -> Option<FormAction> {
        ui.label(egui::RichText::new("To-Do:").strong());
        ui.add(egui::TextEdit::singleline(&mut self.text).desired_width(f32::INFINITY));
        ui.add_space(ITEM_SPACING);

        ui.checkbox(&mut self.has_due, "Add due date or reminder");
        if self.has_due {
            ui.add(egui::TextEdit::singleline(&mut self.due_text).desired_width(f32::INFINITY));
            ui.label(
                egui::RichText::new(format!("Format: {DUE_INPUT_HINT}"))
                    .size(fonts::SMALL)
                    .color(theme.text_secondary),
            );
        }

        let delete = self.editing.as_ref().map(|_| ("Delete", FormAction::Delete));
        buttons(ui, theme, delete)
    }
}

#[derive(Debug)]
pub struct SettingsForm {
    pub theme: ThemeChoice,
    pub autostart: bool,
    /// Whether this platform can register autostart at all
    pub autostart_available: bool,
    pub data_dir: String,
    pub error: Option<String>,
}

impl SettingsForm {
    fn ui(&mut self, ui: &mut egui::Ui, theme: &Theme) -> Option<FormAction> {
        ui.group(|ui| {
            ui.label(egui::RichText::new("Appearance").strong());
            ui.add_space(ITEM_SPACING);
            ui.horizontal(|ui| {
                ui.label("Theme:");
                ui.radio_value(&mut self.theme, ThemeChoice::Dark, "Dark");
                ui.radio_value(&mut self.theme, ThemeChoice::Light, "Light");
            });
        });
        ui.add_space(ITEM_SPACING);

        ui.group(|ui| {
            ui.label(egui::RichText::new("System").strong());
            ui.add_space(ITEM_SPACING);
            ui.add_enabled(
                self.autostart_available,
                egui::Checkbox::new(&mut self.autostart, "Start with system"),
            );
            ui.label(
                egui::RichText::new(format!("Data: {}", self.data_dir))
                    .small()
                    .color(theme.text_secondary),
            );
        });

        buttons(ui, theme, Some(("Quit Widget", FormAction::Quit)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_group_form_round_trips_urls() {
        let group = UrlGroup {
            name: "Work".to_string(),
            urls: vec!["https://mail.example.com".to_string(), "intranet".to_string()],
        };
        let mut form = GroupForm::edit(2, &group);
        assert_eq!(form.editing, Some(2));
        assert_eq!(form.urls_text, "https://mail.example.com\nintranet");

        form.urls_text.push_str("\n\n   \nwiki.example.com  ");
        assert_eq!(
            form.urls(),
            vec!["https://mail.example.com", "intranet", "wiki.example.com"]
        );
    }

    #[test]
    fn test_todo_form_due_parsing() {
        let mut form = TodoForm {
            text: "Stand-up".to_string(),
            has_due: false,
            due_text: "garbage".to_string(),
            ..TodoForm::default()
        };
        // Unchecked entry is ignored
        assert_eq!(form.due().unwrap(), None);

        form.has_due = true;
        assert!(form.due().is_err());

        form.due_text = "9:30 AM".to_string();
        assert_eq!(
            form.due().unwrap(),
            Some(Due::Time(NaiveTime::from_hms_opt(9, 30, 0).unwrap()))
        );
    }

    #[test]
    fn test_todo_form_prefills() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        let form = TodoForm::on_date(date);
        assert!(form.has_due);
        assert_eq!(form.due().unwrap(), Some(Due::Date(date)));

        let todo = Todo {
            id: "4".to_string(),
            text: "Pay rent".to_string(),
            completed: false,
            created: None,
            due: Some(Due::Date(date)),
            notified_at: None,
        };
        let form = TodoForm::edit(&todo);
        assert_eq!(form.editing.as_deref(), Some("4"));
        assert_eq!(form.due_text, "04/15/2024");
    }

    #[test]
    fn test_dialog_titles_and_errors() {
        let mut dialog = Dialog::Todo(TodoForm::default());
        assert_eq!(dialog.title(), "Add To-Do");
        dialog.set_error("Todo text cannot be empty.".to_string());
        let Dialog::Todo(form) = &dialog else {
            panic!("expected todo dialog");
        };
        assert_eq!(form.error.as_deref(), Some("Todo text cannot be empty."));

        let group = UrlGroup {
            name: "News".to_string(),
            urls: vec!["example.com".to_string()],
        };
        assert_eq!(Dialog::Group(GroupForm::edit(0, &group)).title(), "Edit URL Group");
    }
}
