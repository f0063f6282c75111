use crate::{config::PanelConfig, media::TransportControl};
use eframe::egui::{pos2, Pos2, Rect};

/// Width of the reveal zone kept on-screen when the panel slides closed.
pub const REVEAL_ZONE_WIDTH: f32 = 20.0;
/// Vertical space reserved under the text for the progress bar.
pub const TIMELINE_RESERVED_HEIGHT: f32 = 10.0;
/// Grab tolerance radius around the seek thumb.
pub const THUMB_GRAB_RADIUS: f32 = 8.0;

const ART_MARGIN: f32 = 6.0;
const CONTROL_SLOT_SPACING: f32 = 28.0;
const TEXT_GAP_AFTER_CONTROLS: f32 = 20.0;
const TEXT_MIN_WIDTH: f32 = 50.0;

/// All panel geometry as a deterministic function of the configured panel
/// dimensions, the font size, and the measured line height. Nothing here is
/// stateful; every frame recomputes from scratch.
#[derive(Debug, Clone, Copy)]
pub struct PanelLayout {
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub line_height: f32,
}

impl PanelLayout {
    pub fn new(config: &PanelConfig, line_height: f32) -> Self {
        Self {
            width: config.width as f32,
            height: config.height as f32,
            font_size: config.font_size,
            line_height: line_height.max(1.0),
        }
    }

    /// Square album-art slot on the left edge.
    pub fn art_rect(&self) -> Rect {
        let side = (self.height - 2.0 * ART_MARGIN).max(1.0);
        Rect::from_min_size(
            pos2(ART_MARGIN, ART_MARGIN),
            eframe::egui::vec2(side, side),
        )
    }

    fn controls_start_x(&self) -> f32 {
        let art = self.art_rect();
        art.max.x + 12.0
    }

    /// Anchor point for a transport control's icon geometry.
    pub fn control_anchor(&self, control: TransportControl) -> Pos2 {
        let slot = match control {
            TransportControl::Previous => 0.0,
            TransportControl::PlayPause => CONTROL_SLOT_SPACING,
            TransportControl::Next => 2.0 * CONTROL_SLOT_SPACING,
        };
        pos2(self.controls_start_x() + slot, self.height / 2.0)
    }

    /// Which transport control, if any, sits under the pointer.
    pub fn control_hit(&self, pos: Pos2) -> Option<TransportControl> {
        if pos.y <= 10.0 || pos.y >= self.height - 10.0 {
            return None;
        }
        let rel = pos.x - self.controls_start_x();
        if (-10.0..14.0).contains(&rel) {
            Some(TransportControl::Previous)
        } else if (14.0..42.0).contains(&rel) {
            Some(TransportControl::PlayPause)
        } else if (42.0..66.0).contains(&rel) {
            Some(TransportControl::Next)
        } else {
            None
        }
    }

    /// X coordinate of the vertical separator in front of the reveal zone.
    pub fn separator_x(&self) -> f32 {
        self.width - REVEAL_ZONE_WIDTH
    }

    /// The dwell zone on the right edge, padded 5 px past the separator for
    /// easier targeting.
    pub fn in_reveal_zone(&self, pos: Pos2) -> bool {
        pos.x >= self.separator_x() - 5.0 && pos.y >= 6.0 && pos.y <= self.height - 6.0
    }

    pub fn text_x(&self) -> f32 {
        self.control_anchor(TransportControl::Next).x + TEXT_GAP_AFTER_CONTROLS
    }

    pub fn text_max_width(&self) -> f32 {
        let content_max_x = self.separator_x() - 10.0;
        (content_max_x - self.text_x()).max(TEXT_MIN_WIDTH)
    }

    /// Baseline-top of the metadata text; shifted up when a progress bar is
    /// drawn beneath it.
    pub fn text_y(&self, timeline_visible: bool) -> f32 {
        let reserved = if timeline_visible {
            TIMELINE_RESERVED_HEIGHT
        } else {
            0.0
        };
        (self.height - self.line_height - reserved) / 2.0
    }

    pub fn text_clip_rect(&self) -> Rect {
        Rect::from_min_size(
            pos2(self.text_x(), 0.0),
            eframe::egui::vec2(self.text_max_width(), self.height),
        )
    }

    /// The progress-bar rectangle. `emphasized` thickens the bar while it is
    /// hovered or dragged.
    pub fn timeline_bar(&self, emphasized: bool) -> Rect {
        let bar_height = if emphasized { 8.0 } else { 5.0 };
        let y = self.text_y(true) + self.line_height + 4.0;
        Rect::from_min_size(
            pos2(self.text_x(), y),
            eframe::egui::vec2(self.text_max_width(), bar_height),
        )
    }

    /// Pointer region that counts as "on the bar": a few pixels of vertical
    /// slack, right-bounded clear of the reveal zone so the two interactive
    /// regions never overlap.
    pub fn timeline_hit_rect(&self) -> Rect {
        let bar = self.timeline_bar(false);
        let right = (self.separator_x() - 15.0).min(bar.max.x);
        Rect::from_min_max(
            pos2(bar.min.x, bar.min.y - 4.0),
            pos2(right, bar.max.y + 8.0),
        )
    }

    /// How far the panel travels between open and closed.
    pub fn slide_distance(&self) -> i32 {
        (self.width - REVEAL_ZONE_WIDTH).max(0.0) as i32
    }
}
