use eframe::egui::ColorImage;
use std::{
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};

/// Smooth position snaps to the authoritative position when they diverge by
/// more than this many seconds (user seek or track change).
pub const SMOOTH_SNAP_THRESHOLD_SECS: f64 = 2.0;

pub const BASELINE_POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const TIMELINE_POLL_INTERVAL: Duration = Duration::from_millis(16);
/// An in-flight refresh that has not reported back after this long is
/// presumed lost and polling resumes.
pub const REFRESH_STUCK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportControl {
    Previous,
    PlayPause,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeDirection {
    Up,
    Down,
}

/// Fine-grained timeline data, present only for sessions that expose it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineSnapshot {
    pub position_secs: f64,
    pub duration_secs: f64,
}

/// One poll result from the session provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSnapshot {
    pub title: String,
    pub artist: String,
    pub is_playing: bool,
    pub timeline: Option<TimelineSnapshot>,
}

/// Seam to the OS media session. All calls may fail or come back empty; the
/// store tolerates both and never lets an error escape its boundary.
pub trait MediaSessionBridge: Send {
    /// `Ok(None)` means no active session exists right now.
    fn fetch_snapshot(&mut self) -> anyhow::Result<Option<PlaybackSnapshot>>;
    /// Raw encoded thumbnail bytes for the current session, if any.
    fn fetch_thumbnail(&mut self) -> anyhow::Result<Option<Vec<u8>>>;
    fn try_transport(&mut self, control: TransportControl) -> bool;
    fn try_seek(&mut self, position_secs: f64) -> bool;
    fn adjust_volume(&mut self, direction: VolumeDirection);
}

/// Last known playback state. Replaced wholesale on every refresh; the album
/// art is owned here and deep-cloned into snapshots.
#[derive(Debug, Clone, Default)]
pub struct MediaState {
    pub title: String,
    pub artist: String,
    pub is_playing: bool,
    pub has_media: bool,
    pub album_art: Option<ColorImage>,
    pub timeline_capable: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub smooth_position_secs: f64,
    pub last_update: Option<Instant>,
}

impl MediaState {
    /// Progress fraction for rendering, derived from the interpolated
    /// position. Zero when the session has no usable timeline.
    pub fn progress(&self) -> f32 {
        if self.timeline_capable && self.duration_secs > 0.0 {
            let fraction = self.smooth_position_secs / self.duration_secs;
            if fraction.is_nan() {
                0.0
            } else {
                fraction.clamp(0.0, 1.0) as f32
            }
        } else {
            0.0
        }
    }
}

/// Thread-safe cache of the latest [`MediaState`]. The lock is internal and
/// held only for in-memory updates; bridge calls always complete first.
pub struct MediaStateStore {
    state: Mutex<MediaState>,
}

impl Default for MediaStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaStateStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MediaState::default()),
        }
    }

    fn locked(&self) -> MutexGuard<'_, MediaState> {
        // A panic while holding the lock leaves plain data behind; keep going
        // with whatever was last written.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Query the bridge and atomically replace the cached state. Any failure
    /// or missing session resets to "no media"; a thumbnail failure clears
    /// only the art.
    pub fn refresh(&self, bridge: &mut dyn MediaSessionBridge) {
        let snapshot = match bridge.fetch_snapshot() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                self.clear();
                return;
            }
            Err(err) => {
                log::debug!("session snapshot failed: {err:#}");
                self.clear();
                return;
            }
        };

        // Reload art only when the track identity changed or none is cached;
        // ordinary timeline ticks must not re-decode the thumbnail.
        let reload_art = {
            let state = self.locked();
            snapshot.title != state.title
                || snapshot.artist != state.artist
                || state.album_art.is_none()
        };

        let fetched_art = if reload_art {
            match bridge.fetch_thumbnail() {
                Ok(Some(bytes)) => match decode_thumbnail_image(&bytes) {
                    Ok(art) => Some(art),
                    Err(err) => {
                        log::warn!("thumbnail decode failed: {err:#}");
                        None
                    }
                },
                Ok(None) => None,
                Err(err) => {
                    log::warn!("thumbnail fetch failed: {err:#}");
                    None
                }
            }
        } else {
            None
        };

        let now = Instant::now();
        let mut state = self.locked();
        state.title = snapshot.title;
        state.artist = snapshot.artist;
        state.is_playing = snapshot.is_playing;
        state.has_media = true;
        if reload_art {
            state.album_art = fetched_art;
        }

        match snapshot.timeline {
            Some(timeline) => {
                state.timeline_capable = true;
                state.position_secs = timeline.position_secs.max(0.0);
                state.duration_secs = timeline.duration_secs.max(0.0);
                if state.duration_secs > 0.0 {
                    if !state.is_playing {
                        state.smooth_position_secs = state.position_secs;
                    } else if (state.smooth_position_secs - state.position_secs).abs()
                        > SMOOTH_SNAP_THRESHOLD_SECS
                    {
                        state.smooth_position_secs = state.position_secs;
                    }
                    state.last_update = Some(now);
                } else {
                    state.smooth_position_secs = 0.0;
                    state.last_update = None;
                }
            }
            None => {
                state.timeline_capable = false;
                state.position_secs = 0.0;
                state.duration_secs = 0.0;
                state.smooth_position_secs = 0.0;
                state.last_update = None;
            }
        }
    }

    /// Advance the interpolated position between polls while playback is
    /// progressing. No effect when paused or without a usable timeline.
    pub fn advance_smooth(&self, now: Instant) {
        let mut state = self.locked();
        if !(state.has_media
            && state.is_playing
            && state.timeline_capable
            && state.duration_secs > 0.0)
        {
            return;
        }
        if let Some(last) = state.last_update {
            let elapsed = now.saturating_duration_since(last).as_secs_f64();
            state.smooth_position_secs =
                (state.smooth_position_secs + elapsed).clamp(0.0, state.duration_secs);
        }
        state.last_update = Some(now);
    }

    /// Optimistic position update after a committed seek on a paused source,
    /// so the bar does not sit on the old position until the next poll.
    pub fn note_seek(&self, position_secs: f64) {
        let mut state = self.locked();
        if state.timeline_capable && state.duration_secs > 0.0 {
            let clamped = position_secs.clamp(0.0, state.duration_secs);
            state.position_secs = clamped;
            state.smooth_position_secs = clamped;
            state.last_update = Some(Instant::now());
        }
    }

    /// Immutable, independently-owned copy (album art included) that is safe
    /// to read without holding any lock.
    pub fn snapshot(&self) -> MediaState {
        self.locked().clone()
    }

    /// Reset to the "no media" state, freeing any held art.
    pub fn clear(&self) {
        let mut state = self.locked();
        *state = MediaState::default();
    }
}

/// Adaptive poll cadence: 1 s baseline, display-rate while the session is
/// timeline-capable so the progress bar animates smoothly. Re-armed after
/// every tick rather than fixed-rate, so a slow provider shifts later ticks.
pub struct PollingScheduler {
    interval: Duration,
    last_fire: Option<Instant>,
    inflight_since: Option<Instant>,
}

impl Default for PollingScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl PollingScheduler {
    pub fn new() -> Self {
        Self {
            interval: BASELINE_POLL_INTERVAL,
            last_fire: None,
            inflight_since: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a refresh should be dispatched now. Marks the refresh
    /// in-flight when it answers `true`; further firing is held until
    /// [`Self::complete`] or the stuck timeout.
    pub fn should_fire(&mut self, now: Instant) -> bool {
        if let Some(since) = self.inflight_since {
            if now.saturating_duration_since(since) > REFRESH_STUCK_TIMEOUT {
                self.inflight_since = None;
            } else {
                return false;
            }
        }

        let due = match self.last_fire {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        };
        if due {
            self.last_fire = Some(now);
            self.inflight_since = Some(now);
        }
        due
    }

    /// Record a finished refresh and pick the next interval from the
    /// just-refreshed state.
    pub fn complete(&mut self, timeline_capable: bool) {
        self.inflight_since = None;
        self.interval = if timeline_capable {
            TIMELINE_POLL_INTERVAL
        } else {
            BASELINE_POLL_INTERVAL
        };
    }

    pub fn refresh_inflight(&self) -> bool {
        self.inflight_since.is_some()
    }
}

pub fn decode_thumbnail_image(bytes: &[u8]) -> anyhow::Result<ColorImage> {
    let image = image::load_from_memory(bytes)?;
    let image = image.to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    let pixels = image.into_raw();
    Ok(ColorImage::from_rgba_unmultiplied(size, &pixels))
}
