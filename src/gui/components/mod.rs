pub mod calendar_panel;
pub mod dialogs;
pub mod painter;
pub mod toasts;
pub mod todo_panel;
pub mod url_panel;
