//! Collapsed/expanded window controller
//!
//! The widget is a short bar when collapsed and a tall panel when expanded.
//! Switching runs a linear height interpolation over a fixed number of steps,
//! one step per timer tick. The visible view only changes once the animation
//! has finished.

use tracing::debug;

use crate::constants::animation::STEPS;
use crate::constants::window::{COLLAPSED_HEIGHT, EXPANDED_HEIGHT};

/// Content tab shown in the expanded view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Urls,
    Todos,
    Calendar,
}

/// Which of the two layouts is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Collapsed,
    Expanded,
}

#[derive(Debug, Clone, Copy)]
struct HeightAnimation {
    from: f32,
    to: f32,
    step: u32,
}

pub struct WidgetController {
    expanded: bool,
    tab: Tab,
    collapsed_height: f32,
    expanded_height: f32,
    steps: u32,
    animation: Option<HeightAnimation>,
    height: f32,
}

impl Default for WidgetController {
    fn default() -> Self {
        Self::new(COLLAPSED_HEIGHT, EXPANDED_HEIGHT, STEPS)
    }
}

impl WidgetController {
    pub fn new(collapsed_height: f32, expanded_height: f32, steps: u32) -> Self {
        Self {
            expanded: false,
            tab: Tab::Urls,
            collapsed_height,
            expanded_height,
            steps: steps.max(1),
            animation: None,
            height: collapsed_height,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Current window height
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn target_height(&self) -> f32 {
        if self.expanded {
            self.expanded_height
        } else {
            self.collapsed_height
        }
    }

    /// Layout to draw; lags `is_expanded` until the animation completes
    pub fn visible_view(&self) -> View {
        let expanded = if self.is_animating() { !self.expanded } else { self.expanded };
        if expanded { View::Expanded } else { View::Collapsed }
    }

    /// Flip between collapsed and expanded
    ///
    /// Ignored while an animation is running. Expanding with `Some(Tab::Todos)`
    /// opens the todo tab; anything else lands on the URL tab.
    pub fn toggle_expand(&mut self, tab: Option<Tab>) -> bool {
        if self.is_animating() {
            debug!("Ignoring toggle while animating");
            return false;
        }

        self.expanded = !self.expanded;
        self.tab = match tab {
            Some(Tab::Todos) if self.expanded => Tab::Todos,
            _ => Tab::Urls,
        };

        let to = self.target_height();
        self.animation = Some(HeightAnimation {
            from: self.height,
            to,
            step: 0,
        });
        debug!(expanded = self.expanded, tab = ?self.tab, to, "Starting resize animation");
        true
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Advance one step and return the new height, or `None` when idle
    pub fn tick(&mut self) -> Option<f32> {
        let mut anim = self.animation?;

        if anim.step < self.steps {
            let progress = anim.step as f32 / self.steps as f32;
            self.height = anim.from + (anim.to - anim.from) * progress;
            anim.step += 1;
            self.animation = Some(anim);
        } else {
            self.height = anim.to;
            self.animation = None;
            debug!(height = self.height, "Resize animation finished");
        }
        Some(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(ctrl: &mut WidgetController) -> Vec<f32> {
        let mut heights = Vec::new();
        while let Some(h) = ctrl.tick() {
            heights.push(h);
        }
        heights
    }

    #[test]
    fn test_starts_collapsed_and_idle() {
        let mut ctrl = WidgetController::default();
        assert!(!ctrl.is_expanded());
        assert_eq!(ctrl.visible_view(), View::Collapsed);
        assert_eq!(ctrl.height(), 70.0);
        assert_eq!(ctrl.tick(), None);
    }

    #[test]
    fn test_expand_interpolates_linearly() {
        let mut ctrl = WidgetController::new(0.0, 100.0, 4);
        assert!(ctrl.toggle_expand(None));

        let heights = run_to_end(&mut ctrl);
        assert_eq!(heights, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert!(!ctrl.is_animating());
        assert_eq!(ctrl.height(), 100.0);
    }

    #[test]
    fn test_view_switches_only_after_animation() {
        let mut ctrl = WidgetController::default();
        ctrl.toggle_expand(None);
        assert!(ctrl.is_expanded());
        assert_eq!(ctrl.visible_view(), View::Collapsed);

        ctrl.tick();
        assert_eq!(ctrl.visible_view(), View::Collapsed);

        run_to_end(&mut ctrl);
        assert_eq!(ctrl.visible_view(), View::Expanded);
        assert_eq!(ctrl.height(), 500.0);
    }

    #[test]
    fn test_toggle_ignored_while_animating() {
        let mut ctrl = WidgetController::default();
        ctrl.toggle_expand(None);
        ctrl.tick();
        assert!(!ctrl.toggle_expand(None));
        assert!(ctrl.is_expanded());
    }

    #[test]
    fn test_collapse_runs_back_down() {
        let mut ctrl = WidgetController::new(70.0, 500.0, 15);
        ctrl.toggle_expand(None);
        run_to_end(&mut ctrl);

        ctrl.toggle_expand(None);
        let heights = run_to_end(&mut ctrl);
        assert_eq!(heights.len(), 16);
        assert_eq!(heights[0], 500.0);
        assert!(heights.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(*heights.last().unwrap(), 70.0);
        assert_eq!(ctrl.visible_view(), View::Collapsed);
    }

    #[test]
    fn test_tab_selection_on_toggle() {
        let mut ctrl = WidgetController::default();
        ctrl.toggle_expand(Some(Tab::Todos));
        assert_eq!(ctrl.tab(), Tab::Todos);
        run_to_end(&mut ctrl);

        ctrl.switch_tab(Tab::Calendar);
        assert_eq!(ctrl.tab(), Tab::Calendar);

        // Collapsing resets to the URL tab
        ctrl.toggle_expand(Some(Tab::Todos));
        assert_eq!(ctrl.tab(), Tab::Urls);
        run_to_end(&mut ctrl);

        ctrl.toggle_expand(None);
        assert_eq!(ctrl.tab(), Tab::Urls);
    }
}
