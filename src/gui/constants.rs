//! Layout constants shared by the GUI components

use std::time::Duration;

pub const ITEM_SPACING: f32 = 6.0;
pub const SECTION_SPACING: f32 = 10.0;

/// Side of the square icon buttons
pub const BUTTON_SIZE: f32 = 36.0;
pub const TAB_HEIGHT: f32 = 32.0;
pub const ROW_HEIGHT: f32 = 40.0;

pub const DIALOG_SIZE: [f32; 2] = [400.0, 300.0];
pub const TOAST_WIDTH: f32 = 300.0;

/// Clock refresh and reminder check interval
pub const CLOCK_TICK: Duration = Duration::from_secs(1);
