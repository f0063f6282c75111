use std::time::{Duration, Instant};

/// Sustained dwell required before the panel toggle fires.
pub const DWELL_TRIGGER: Duration = Duration::from_millis(3000);
/// Leaving the zone keeps accumulated dwell alive for this long.
pub const GRACE_WINDOW: Duration = Duration::from_millis(500);
/// Check cadence while the gesture timer is armed.
pub const GESTURE_TICK_INTERVAL: Duration = Duration::from_millis(50);
/// Bold level lost per tick once the grace window has expired.
pub const BOLD_DECAY_PER_TICK: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Dwelling,
    /// Pointer left mid-dwell; dwell progress survives until the grace
    /// window runs out, after which the bold level decays back to zero.
    Grace { left_at: Instant },
}

/// Turns pointer dwell over the reveal zone into a single panel-toggle
/// trigger. Jittery exits near the zone boundary are absorbed by the grace
/// window instead of restarting the three-second dwell.
pub struct GestureController {
    phase: Phase,
    zone_hovered: bool,
    hover_start: Option<Instant>,
    bold_level: f32,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureController {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            zone_hovered: false,
            hover_start: None,
            bold_level: 0.0,
        }
    }

    /// Feed the current reveal-zone hover flag; only transitions matter.
    pub fn set_zone_hovered(&mut self, inside: bool, now: Instant) {
        if inside == self.zone_hovered {
            return;
        }
        self.zone_hovered = inside;
        if inside {
            self.enter(now);
        } else {
            self.leave(now);
        }
    }

    /// Pointer left the panel entirely.
    pub fn pointer_left(&mut self, now: Instant) {
        self.set_zone_hovered(false, now);
    }

    fn enter(&mut self, now: Instant) {
        let resumed = match (self.phase, self.hover_start) {
            (Phase::Grace { left_at }, Some(start))
                if now.saturating_duration_since(left_at) < GRACE_WINDOW =>
            {
                // Resume from the original start, unless the accrued time
                // already exceeds the trigger threshold.
                if now.saturating_duration_since(start) > DWELL_TRIGGER {
                    self.hover_start = Some(now);
                }
                true
            }
            _ => false,
        };

        if !resumed {
            self.hover_start = Some(now);
        }
        self.phase = Phase::Dwelling;
    }

    fn leave(&mut self, now: Instant) {
        if self.phase == Phase::Dwelling {
            self.phase = Phase::Grace { left_at: now };
        }
    }

    /// Advance the machine; returns `true` exactly once per dwell episode,
    /// when the accrued dwell reaches the trigger threshold.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Idle => false,
            Phase::Dwelling => {
                let Some(start) = self.hover_start else {
                    self.phase = Phase::Idle;
                    return false;
                };
                let elapsed = now.saturating_duration_since(start);
                self.bold_level =
                    (elapsed.as_secs_f32() / DWELL_TRIGGER.as_secs_f32()).clamp(0.0, 1.0);
                if elapsed >= DWELL_TRIGGER {
                    self.phase = Phase::Idle;
                    self.zone_hovered = false;
                    self.hover_start = None;
                    self.bold_level = 0.0;
                    return true;
                }
                false
            }
            Phase::Grace { left_at } => {
                if now.saturating_duration_since(left_at) >= GRACE_WINDOW {
                    self.bold_level = (self.bold_level - BOLD_DECAY_PER_TICK).max(0.0);
                    if self.bold_level <= 0.0 {
                        self.phase = Phase::Idle;
                        self.hover_start = None;
                    }
                }
                false
            }
        }
    }

    /// Current emphasis of the separator line, 0..=1.
    pub fn bold_level(&self) -> f32 {
        self.bold_level
    }

    /// Whether the gesture check timer needs to keep running.
    pub fn timer_armed(&self) -> bool {
        self.phase != Phase::Idle
    }
}
