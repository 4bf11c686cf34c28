//! GUI module - borderless always-on-top egui widget

mod components;
mod constants;
mod widget;

pub use widget::run_gui;
