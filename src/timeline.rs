use crate::layout::{PanelLayout, THUMB_GRAB_RADIUS};
use eframe::egui::Pos2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotHovering,
    Hovering,
    Dragging,
}

/// Hit-tests, hovers, drags and commits seeks on the progress bar. While a
/// drag is live its progress value is authoritative for rendering; the
/// store's position takes over again after release.
pub struct TimelineInteractionController {
    phase: Phase,
    drag_progress: f32,
}

impl Default for TimelineInteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineInteractionController {
    pub fn new() -> Self {
        Self {
            phase: Phase::NotHovering,
            drag_progress: 0.0,
        }
    }

    pub fn is_hovering(&self) -> bool {
        self.phase == Phase::Hovering
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == Phase::Dragging
    }

    pub fn drag_progress(&self) -> f32 {
        self.drag_progress
    }

    /// Track pointer movement. `timeline_active` reflects whether the
    /// current session draws a bar at all; a drag already in progress keeps
    /// updating regardless (capability loss mid-drag does not cancel it).
    pub fn pointer_moved(&mut self, pos: Pos2, layout: &PanelLayout, timeline_active: bool) {
        if self.phase == Phase::Dragging {
            let bar = layout.timeline_bar(false);
            self.drag_progress = ((pos.x - bar.min.x) / bar.width()).clamp(0.0, 1.0);
            return;
        }

        self.phase = if timeline_active && layout.timeline_hit_rect().contains(pos) {
            Phase::Hovering
        } else {
            Phase::NotHovering
        };
    }

    /// Pointer press. Starts a drag when the press lands on the seek thumb
    /// (with grab tolerance) or anywhere on the bar; returns `true` when the
    /// press was consumed and pointer capture should be held.
    pub fn pointer_pressed(
        &mut self,
        pos: Pos2,
        layout: &PanelLayout,
        current_progress: f32,
        timeline_active: bool,
    ) -> bool {
        if !timeline_active {
            return false;
        }

        let bar = layout.timeline_bar(false);
        let thumb_x = bar.min.x + bar.width() * current_progress.clamp(0.0, 1.0);
        let thumb_y = bar.center().y;
        let dx = pos.x - thumb_x;
        let dy = pos.y - thumb_y;
        if dx * dx + dy * dy <= THUMB_GRAB_RADIUS * THUMB_GRAB_RADIUS * 2.0 {
            self.phase = Phase::Dragging;
            self.drag_progress = current_progress.clamp(0.0, 1.0);
            return true;
        }

        if layout.timeline_hit_rect().contains(pos) {
            self.phase = Phase::Dragging;
            self.drag_progress = ((pos.x - bar.min.x) / bar.width()).clamp(0.0, 1.0);
            return true;
        }

        false
    }

    /// Pointer release. A live drag commits exactly one seek at the dragged
    /// progress; otherwise nothing happens.
    pub fn pointer_released(&mut self) -> Option<f32> {
        if self.phase == Phase::Dragging {
            self.phase = Phase::NotHovering;
            Some(self.drag_progress)
        } else {
            None
        }
    }

    /// Pointer left the panel. Hover state clears; a drag stays live because
    /// capture keeps move events flowing.
    pub fn pointer_left(&mut self) {
        if self.phase == Phase::Hovering {
            self.phase = Phase::NotHovering;
        }
    }
}
