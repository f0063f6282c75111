/// Horizontal slide distance covered per animation tick, in pixels.
pub const SLIDE_STEP_PX: i32 = 15;

/// Ticks to hold still before marquee scrolling starts (and after a wrap).
pub const SCROLL_WAIT_TICKS: u32 = 60;
/// Gap between the two text copies that makes the wrap seamless.
pub const SCROLL_WRAP_GAP_PX: i32 = 40;

/// Slides the panel horizontally toward its open or closed offset by a
/// bounded step per tick, never overshooting the target.
pub struct PanelAnimator {
    is_open: bool,
    current_offset: i32,
    target_offset: i32,
}

impl Default for PanelAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelAnimator {
    pub fn new() -> Self {
        Self {
            is_open: true,
            current_offset: 0,
            target_offset: 0,
        }
    }

    /// Flip between open and closed. `slide_distance` is how far the closed
    /// panel tucks off-screen (panel width minus the reveal zone).
    pub fn toggle(&mut self, slide_distance: i32) {
        if self.is_open {
            self.target_offset = -slide_distance.max(0);
            self.is_open = false;
        } else {
            self.target_offset = 0;
            self.is_open = true;
        }
    }

    /// One animation step; returns `true` if the offset moved.
    pub fn tick(&mut self) -> bool {
        if self.current_offset == self.target_offset {
            return false;
        }
        let diff = self.target_offset - self.current_offset;
        if diff.abs() <= SLIDE_STEP_PX {
            self.current_offset = self.target_offset;
        } else if diff > 0 {
            self.current_offset += SLIDE_STEP_PX;
        } else {
            self.current_offset -= SLIDE_STEP_PX;
        }
        true
    }

    pub fn settled(&self) -> bool {
        self.current_offset == self.target_offset
    }

    pub fn offset(&self) -> i32 {
        self.current_offset
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }
}

/// Marquee scroll for metadata text wider than its box: wait, advance one
/// pixel per tick, wrap past the text width plus the seam gap, repeat.
pub struct TextScrollController {
    offset: i32,
    wait_ticks: u32,
    is_scrolling: bool,
    text_width: i32,
}

impl Default for TextScrollController {
    fn default() -> Self {
        Self::new()
    }
}

impl TextScrollController {
    pub fn new() -> Self {
        Self {
            offset: 0,
            wait_ticks: SCROLL_WAIT_TICKS,
            is_scrolling: false,
            text_width: 0,
        }
    }

    /// Feed the measured text width against the available box width.
    /// Scrolling engages only while the text does not fit.
    pub fn set_measured(&mut self, text_width: i32, available_width: i32) {
        self.text_width = text_width.max(0);
        let should_scroll = self.text_width > available_width.max(0);
        if should_scroll != self.is_scrolling {
            self.is_scrolling = should_scroll;
            self.offset = 0;
            self.wait_ticks = SCROLL_WAIT_TICKS;
        }
    }

    /// One animation step; returns `true` if the offset moved.
    pub fn tick(&mut self) -> bool {
        if !self.is_scrolling {
            return false;
        }
        if self.wait_ticks > 0 {
            self.wait_ticks -= 1;
            return false;
        }
        self.offset += 1;
        if self.offset > self.text_width + SCROLL_WRAP_GAP_PX {
            self.offset = 0;
            self.wait_ticks = SCROLL_WAIT_TICKS;
        }
        true
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn settled(&self) -> bool {
        !self.is_scrolling
    }
}
