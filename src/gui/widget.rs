//! The widget window: collapsed clock bar and expanded URL/todo/calendar panel

use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate, NaiveDateTime};
use eframe::egui::{self, Pos2, Vec2, ViewportCommand};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::components::dialogs::{Dialog, FormAction, GroupForm, SettingsForm, TodoForm};
use super::components::todo_panel::TodoAction;
use super::components::url_panel::UrlAction;
use super::components::{calendar_panel, painter, toasts, todo_panel, url_panel};
use super::constants::*;
use crate::animation::{Tab, View, WidgetController};
use crate::calendar::CalendarView;
use crate::constants::animation::STEP_MS;
use crate::constants::window::{
    COLLAPSED_HEIGHT, EDGE_MARGIN, EXPANDED_HEIGHT, TASKBAR_MARGIN, TITLE, WIDTH,
};
use crate::notification::NotificationManager;
use crate::state::AppData;
use crate::theme::{PADDING, Theme, fonts};
use crate::todo::Todo;
use crate::types::Position;
use crate::urls::SystemOpener;

/// Something the user did this frame, applied after drawing
enum UiEvent {
    Toggle(Option<Tab>),
    SwitchTab(Tab),
    OpenSettings,
    StartDrag,
    Url(UrlAction),
    Todo(TodoAction),
    AddTodoOn(NaiveDate),
}

pub struct WidgetApp {
    data: AppData,
    theme: &'static Theme,
    opener: SystemOpener,
    controller: WidgetController,
    calendar: CalendarView,
    notifications: NotificationManager,
    dialog: Option<Dialog>,
    /// Last error shown under the expanded content
    status: Option<String>,
    /// Local wall-clock time as of the last clock tick
    now: NaiveDateTime,
    last_clock: Option<Instant>,
    last_step: Instant,
    /// Bottom edge to keep fixed while resizing, when growing upward
    anchor_bottom: Option<f32>,
    placed: bool,
    dragging: bool,
}

impl WidgetApp {
    pub fn new(cc: &eframe::CreationContext<'_>, data: AppData) -> Self {
        let theme = Theme::for_choice(data.settings.theme);
        cc.egui_ctx.set_visuals(theme.visuals());

        let now = Local::now().naive_local();
        Self {
            placed: false,
            data,
            theme,
            opener: SystemOpener,
            controller: WidgetController::default(),
            calendar: CalendarView::new(now.date()),
            notifications: NotificationManager::default(),
            dialog: None,
            status: None,
            now,
            last_clock: None,
            last_step: Instant::now(),
            anchor_bottom: None,
            dragging: false,
        }
    }

    /// Once the monitor size is known, pull a saved position back on screen
    /// or move to the bottom-right corner when nothing was saved
    fn place_initially(&mut self, ctx: &egui::Context) {
        if self.placed {
            return;
        }
        let Some(monitor) = ctx.input(|i| i.viewport().monitor_size) else {
            return;
        };
        self.placed = true;

        let size = Vec2::new(WIDTH, self.controller.height());
        match self.data.settings.position {
            Some(saved) => {
                let (x, y) = saved.as_tuple();
                let saved = Pos2::new(x as f32, y as f32);
                let pos = clamp_to_screen(saved, size, monitor);
                if pos != saved {
                    debug!(x = pos.x, y = pos.y, "Saved position was off screen, moving widget");
                    ctx.send_viewport_cmd(ViewportCommand::OuterPosition(pos));
                }
            }
            None => {
                let pos = bottom_right(monitor, size.y);
                debug!(x = pos.x, y = pos.y, "Placing widget bottom-right");
                ctx.send_viewport_cmd(ViewportCommand::OuterPosition(pos));
            }
        }
    }

    /// Once a second: refresh the clock, fire reminders, expire toasts
    fn tick_clock(&mut self, now: Instant) {
        if self
            .last_clock
            .is_some_and(|last| now.duration_since(last) < CLOCK_TICK)
        {
            return;
        }
        self.last_clock = Some(now);
        let previous = self.now;
        self.now = Local::now().naive_local();
        // Reminder ids embed the instant, so yesterday's ids can go
        if self.now.date() != previous.date() {
            self.notifications.clear_history();
        }

        match self.data.todos.check_due_reminders(self.now) {
            Ok(fired) => {
                for todo in fired {
                    let id = reminder_id(&todo);
                    self.notifications.show("Reminder", &todo.text, Some(&id), now);
                }
            }
            Err(e) => error!(error = %e, "Failed to record fired reminders"),
        }
        self.notifications.expire(now);
    }

    fn step_animation(&mut self, ctx: &egui::Context, now: Instant) {
        if !self.controller.is_animating()
            || now.duration_since(self.last_step) < Duration::from_millis(STEP_MS)
        {
            return;
        }
        self.last_step = now;

        if let Some(height) = self.controller.tick() {
            ctx.send_viewport_cmd(ViewportCommand::InnerSize(Vec2::new(WIDTH, height)));
            if let Some(bottom) = self.anchor_bottom
                && let Some(outer) = ctx.input(|i| i.viewport().outer_rect)
            {
                let top = (bottom - height).max(0.0);
                ctx.send_viewport_cmd(ViewportCommand::OuterPosition(Pos2::new(outer.min.x, top)));
            }
        }
    }

    fn toggle(&mut self, ctx: &egui::Context, tab: Option<Tab>) {
        let expanding = !self.controller.is_expanded();
        let height = self.controller.height();
        let (outer, monitor) = ctx.input(|i| (i.viewport().outer_rect, i.viewport().monitor_size));

        if !self.controller.toggle_expand(tab) {
            return;
        }
        self.last_step = Instant::now();

        self.anchor_bottom = match outer {
            Some(outer) if expanding => {
                monitor.and_then(|m| grows_upward(outer.min.y, m.y).then_some(outer.min.y + height))
            }
            // Collapse back toward the same bottom edge we expanded from
            Some(outer) if self.anchor_bottom.is_some() => Some(outer.min.y + height),
            _ => None,
        };
    }

    fn begin_drag(&mut self, ctx: &egui::Context) {
        ctx.send_viewport_cmd(ViewportCommand::StartDrag);
        self.dragging = true;
    }

    /// Persist the window position once a drag has been released
    fn track_drag(&mut self, ctx: &egui::Context) {
        if !self.dragging || ctx.input(|i| i.pointer.any_down()) {
            return;
        }
        self.dragging = false;

        let Some(outer) = ctx.input(|i| i.viewport().outer_rect) else {
            return;
        };
        let mut top_left = outer.min;
        if let Some(monitor) = ctx.input(|i| i.viewport().monitor_size) {
            top_left = clamp_to_screen(top_left, outer.size(), monitor);
            if top_left != outer.min {
                ctx.send_viewport_cmd(ViewportCommand::OuterPosition(top_left));
            }
        }
        let position = Position::new(top_left.x.round() as i32, top_left.y.round() as i32);
        if self.data.settings.position == Some(position) {
            return;
        }
        self.data.settings.position = Some(position);
        match self.data.save_settings() {
            Ok(()) => debug!(x = position.x, y = position.y, "Saved widget position"),
            Err(e) => error!(error = %e, "Failed to save widget position"),
        }
    }

    fn report<T>(&mut self, result: Result<T>) {
        match result {
            Ok(_) => self.status = None,
            Err(e) => {
                warn!(error = %e, "Action failed");
                self.status = Some(format!("{e:#}"));
            }
        }
    }

    fn handle(&mut self, ctx: &egui::Context, event: UiEvent) {
        match event {
            UiEvent::Toggle(tab) => self.toggle(ctx, tab),
            UiEvent::SwitchTab(tab) => self.controller.switch_tab(tab),
            UiEvent::StartDrag => self.begin_drag(ctx),
            UiEvent::OpenSettings => {
                self.dialog = Some(Dialog::Settings(SettingsForm {
                    theme: self.data.settings.theme,
                    autostart: self.data.settings.autostart,
                    autostart_available: self.data.autostart.is_some(),
                    data_dir: self.data.data_dir.root().display().to_string(),
                    error: None,
                }));
            }
            UiEvent::Url(UrlAction::Open(index)) => {
                let result = self
                    .data
                    .urls
                    .open_group(index, &mut self.opener)
                    .and_then(|failures| match failures.as_slice() {
                        [] => Ok(()),
                        [only] => Err(anyhow!("Could not open {}", only.url)),
                        many => Err(anyhow!("Could not open {} URLs", many.len())),
                    });
                self.report(result);
            }
            UiEvent::Url(UrlAction::Edit(index)) => {
                if let Some(group) = self.data.urls.get(index) {
                    self.dialog = Some(Dialog::Group(GroupForm::edit(index, group)));
                }
            }
            UiEvent::Url(UrlAction::Add) => self.dialog = Some(Dialog::Group(GroupForm::default())),
            UiEvent::Todo(TodoAction::Toggle(id)) => {
                let result = self.data.todos.toggle(&id);
                self.report(result);
            }
            UiEvent::Todo(TodoAction::Edit(id)) => {
                if let Some(todo) = self.data.todos.get(&id) {
                    self.dialog = Some(Dialog::Todo(TodoForm::edit(todo)));
                }
            }
            UiEvent::Todo(TodoAction::Delete(id)) => {
                let result = self.data.todos.delete(&id);
                self.report(result);
            }
            UiEvent::Todo(TodoAction::Add) => self.dialog = Some(Dialog::Todo(TodoForm::default())),
            UiEvent::AddTodoOn(date) => self.dialog = Some(Dialog::Todo(TodoForm::on_date(date))),
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        let theme = self.theme;
        let title = dialog.title();

        let action = ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("dialog"),
            egui::ViewportBuilder::default()
                .with_title(title)
                .with_inner_size(DIALOG_SIZE)
                .with_always_on_top()
                .with_resizable(false),
            |ctx, class| {
                let mut action = None;
                if class == egui::ViewportClass::Embedded {
                    egui::Window::new(title)
                        .collapsible(false)
                        .resizable(false)
                        .show(ctx, |ui| action = dialog.ui(ui, theme));
                } else {
                    egui::CentralPanel::default().show(ctx, |ui| action = dialog.ui(ui, theme));
                    if ctx.input(|i| i.viewport().close_requested()) {
                        action = Some(FormAction::Cancel);
                    }
                }
                action
            },
        );

        if let Some(action) = action {
            self.apply_dialog(ctx, action);
        }
    }

    fn apply_dialog(&mut self, ctx: &egui::Context, action: FormAction) {
        let Some(mut dialog) = self.dialog.take() else {
            return;
        };

        let result = match (&dialog, action) {
            (_, FormAction::Cancel) => Ok(()),
            (_, FormAction::Quit) => {
                info!("Quit requested");
                ctx.send_viewport_cmd(ViewportCommand::Close);
                Ok(())
            }
            (Dialog::Group(form), FormAction::Save) => match form.editing {
                Some(index) => self.data.urls.edit(index, &form.name, form.urls()),
                None => self.data.urls.add(&form.name, form.urls()),
            },
            (Dialog::Group(form), FormAction::Delete) => match form.editing {
                Some(index) => self.data.urls.delete(index).map(|_| ()),
                None => Ok(()),
            },
            (Dialog::Todo(form), FormAction::Save) => self.save_todo(form),
            (Dialog::Todo(form), FormAction::Delete) => match &form.editing {
                Some(id) => self.data.todos.delete(id).map(|_| ()),
                None => Ok(()),
            },
            (Dialog::Settings(form), FormAction::Save) => self.apply_settings(ctx, form),
            (Dialog::Settings(_), FormAction::Delete) => Ok(()),
        };

        if let Err(e) = result {
            warn!(error = %e, "Dialog action rejected");
            dialog.set_error(format!("{e:#}"));
            self.dialog = Some(dialog);
        }
    }

    fn save_todo(&mut self, form: &TodoForm) -> Result<()> {
        let due = form.due()?;
        match &form.editing {
            Some(id) => self.data.todos.edit(id, &form.text, due),
            None => self.data.todos.add(&form.text, due).map(|_| ()),
        }
    }

    fn apply_settings(&mut self, ctx: &egui::Context, form: &SettingsForm) -> Result<()> {
        if form.autostart != self.data.settings.autostart {
            let autostart = self
                .data
                .autostart
                .as_ref()
                .ok_or_else(|| anyhow!("Autostart is not available on this platform"))?;
            autostart.set(form.autostart)?;
            self.data.settings.autostart = form.autostart;
        }

        if form.theme != self.data.settings.theme {
            info!(theme = %form.theme, "Switching theme");
            self.data.settings.theme = form.theme;
            self.theme = Theme::for_choice(form.theme);
            ctx.set_visuals(self.theme.visuals());
        }

        self.data.save_settings()
    }

    fn collapsed_ui(&self, ui: &mut egui::Ui, events: &mut Vec<UiEvent>) {
        let theme = self.theme;
        ui.horizontal_centered(|ui| {
            ui.vertical(|ui| {
                ui.label(
                    egui::RichText::new(self.now.format("%b %d, %Y").to_string())
                        .strong()
                        .size(fonts::TITLE),
                );
                ui.label(
                    egui::RichText::new(self.now.format("%I:%M %p").to_string())
                        .size(fonts::BODY)
                        .color(theme.text_secondary),
                );
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if painter::icon_button(ui, "⚙", theme).on_hover_text("Settings").clicked() {
                    events.push(UiEvent::OpenSettings);
                }
                let pending = self.data.todos.pending_count();
                if painter::icon_button(ui, "☑", theme)
                    .on_hover_text(format!("To-Do ({pending} open)"))
                    .clicked()
                {
                    events.push(UiEvent::Toggle(Some(Tab::Todos)));
                }
                if painter::icon_button(ui, "🔗", theme).on_hover_text("URLs").clicked() {
                    events.push(UiEvent::Toggle(None));
                }
            });
        });
    }

    fn expanded_ui(&mut self, ui: &mut egui::Ui, events: &mut Vec<UiEvent>) {
        let theme = self.theme;

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(self.now.format("%b %d, %Y").to_string())
                    .strong()
                    .size(fonts::HEADING),
            );
            ui.label(
                egui::RichText::new(self.now.format("%I:%M %p").to_string())
                    .color(theme.text_secondary),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if painter::icon_button(ui, "✖", theme).on_hover_text("Collapse").clicked() {
                    events.push(UiEvent::Toggle(None));
                }
                if painter::icon_button(ui, "⚙", theme).on_hover_text("Settings").clicked() {
                    events.push(UiEvent::OpenSettings);
                }
            });
        });
        ui.add_space(SECTION_SPACING);

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = ITEM_SPACING;
            let width = (ui.available_width() - 2.0 * ITEM_SPACING) / 3.0;
            for (tab, label) in [(Tab::Urls, "URLs"), (Tab::Todos, "To-Do"), (Tab::Calendar, "Calendar")] {
                if painter::tab_button(ui, label, self.controller.tab() == tab, width, theme).clicked() {
                    events.push(UiEvent::SwitchTab(tab));
                }
            }
        });
        ui.add_space(SECTION_SPACING);

        let status_height = if self.status.is_some() { 24.0 } else { 0.0 };
        egui::ScrollArea::vertical()
            .max_height(ui.available_height() - status_height)
            .auto_shrink([false, false])
            .show(ui, |ui| match self.controller.tab() {
                Tab::Urls => {
                    if let Some(action) = url_panel::ui(ui, self.data.urls.groups(), theme) {
                        events.push(UiEvent::Url(action));
                    }
                }
                Tab::Todos => {
                    if let Some(action) = todo_panel::ui(ui, self.data.todos.todos(), self.now, theme) {
                        events.push(UiEvent::Todo(action));
                    }
                }
                Tab::Calendar => {
                    let today = self.now.date();
                    if let Some(date) =
                        calendar_panel::ui(ui, &mut self.calendar, self.data.todos.todos(), today, theme)
                    {
                        events.push(UiEvent::AddTodoOn(date));
                    }
                }
            });

        if let Some(status) = &self.status {
            ui.colored_label(theme.error, status);
        }
    }
}

impl eframe::App for WidgetApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.place_initially(ctx);
        self.tick_clock(now);
        self.step_animation(ctx, now);
        self.track_drag(ctx);

        painter::glass_panel(
            &ctx.layer_painter(egui::LayerId::background()),
            ctx.screen_rect(),
            self.theme,
        );

        let mut events = Vec::new();
        egui::CentralPanel::default()
            .frame(egui::Frame::none().inner_margin(egui::Margin::same(PADDING)))
            .show(ctx, |ui| {
                let drag = ui.interact(ctx.screen_rect(), egui::Id::new("widget_drag"), egui::Sense::drag());
                if drag.drag_started() {
                    events.push(UiEvent::StartDrag);
                }

                match self.controller.visible_view() {
                    View::Collapsed => self.collapsed_ui(ui, &mut events),
                    View::Expanded => self.expanded_ui(ui, &mut events),
                }
            });

        toasts::ui(ctx, &mut self.notifications, self.theme);

        for event in events {
            self.handle(ctx, event);
        }
        self.show_dialog(ctx);

        let mut next = if self.controller.is_animating() {
            Duration::from_millis(STEP_MS)
        } else {
            CLOCK_TICK
        };
        if let Some(expiry) = self.notifications.next_expiry(now) {
            next = next.min(expiry);
        }
        ctx.request_repaint_after(next);
    }
}

/// Collapsed-window origin in the bottom-right corner, above the taskbar
fn bottom_right(monitor: Vec2, height: f32) -> Pos2 {
    Pos2::new(
        (monitor.x - WIDTH - EDGE_MARGIN).max(0.0),
        (monitor.y - height - TASKBAR_MARGIN).max(0.0),
    )
}

/// Keep a window of `size` at `pos` fully inside the monitor
fn clamp_to_screen(pos: Pos2, size: Vec2, monitor: Vec2) -> Pos2 {
    Pos2::new(
        pos.x.clamp(0.0, (monitor.x - size.x).max(0.0)),
        pos.y.clamp(0.0, (monitor.y - size.y).max(0.0)),
    )
}

/// Expanding downward from `top` would run past the bottom of the screen
fn grows_upward(top: f32, monitor_height: f32) -> bool {
    top + EXPANDED_HEIGHT > monitor_height
}

/// Notification id for one firing of a todo's reminder
fn reminder_id(todo: &Todo) -> String {
    match todo.notified_at {
        Some(at) => format!("{}@{}", todo.id, at.format("%Y-%m-%dT%H:%M")),
        None => todo.id.clone(),
    }
}

pub fn run_gui(data: AppData) -> Result<()> {
    let mut viewport = egui::ViewportBuilder::default()
        .with_title(TITLE)
        .with_inner_size([WIDTH, COLLAPSED_HEIGHT])
        .with_decorations(false)
        .with_always_on_top()
        .with_transparent(true)
        .with_resizable(false)
        .with_taskbar(false);
    if let Some(position) = data.settings.position {
        let (x, y) = position.as_tuple();
        viewport = viewport.with_position([x as f32, y as f32]);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    info!("Starting widget window");
    eframe::run_native(
        TITLE,
        options,
        Box::new(|cc| Ok(Box::new(WidgetApp::new(cc, data)))),
    )
    .map_err(|e| anyhow!("Failed to run egui application: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Due;
    use chrono::NaiveTime;

    #[test]
    fn test_bottom_right_placement() {
        let pos = bottom_right(Vec2::new(1920.0, 1080.0), COLLAPSED_HEIGHT);
        assert_eq!(pos, Pos2::new(1500.0, 970.0));

        // Never off the top-left of a tiny screen
        assert_eq!(bottom_right(Vec2::new(300.0, 50.0), COLLAPSED_HEIGHT), Pos2::ZERO);
    }

    #[test]
    fn test_clamp_to_screen() {
        let monitor = Vec2::new(1920.0, 1080.0);
        let size = Vec2::new(WIDTH, COLLAPSED_HEIGHT);

        let inside = Pos2::new(400.0, 300.0);
        assert_eq!(clamp_to_screen(inside, size, monitor), inside);

        let off_right = clamp_to_screen(Pos2::new(5000.0, -200.0), size, monitor);
        assert_eq!(off_right, Pos2::new(1920.0 - WIDTH, 0.0));

        let off_bottom = clamp_to_screen(Pos2::new(-50.0, 1075.0), size, monitor);
        assert_eq!(off_bottom, Pos2::new(0.0, 1080.0 - COLLAPSED_HEIGHT));

        // A window bigger than the screen pins to the top-left
        assert_eq!(clamp_to_screen(inside, size, Vec2::new(100.0, 40.0)), Pos2::ZERO);
    }

    #[test]
    fn test_grows_upward_near_screen_bottom() {
        assert!(grows_upward(970.0, 1080.0));
        assert!(!grows_upward(100.0, 1080.0));
        assert!(!grows_upward(580.0, 1080.0));
    }

    #[test]
    fn test_reminder_id_changes_per_firing() {
        let day = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let mut todo = Todo {
            id: "3".to_string(),
            text: "Call dentist".to_string(),
            completed: false,
            created: None,
            due: Some(Due::Time(ten)),
            notified_at: Some(day.and_time(ten)),
        };
        assert_eq!(reminder_id(&todo), "3@2024-04-15T10:00");

        todo.notified_at = day.succ_opt().map(|d| d.and_time(ten));
        assert_eq!(reminder_id(&todo), "3@2024-04-16T10:00");

        todo.notified_at = None;
        assert_eq!(reminder_id(&todo), "3");
    }
}
