use crate::media::{MediaSessionBridge, PlaybackSnapshot, TransportControl, VolumeDirection};

/// Bridge for the current platform: GSMTC on Windows, a session-less stub
/// elsewhere so the widget still runs and renders "no media".
pub fn platform_bridge() -> Box<dyn MediaSessionBridge> {
    #[cfg(target_os = "windows")]
    {
        Box::new(gsmtc::GsmtcBridge::new())
    }
    #[cfg(not(target_os = "windows"))]
    {
        Box::new(NullBridge)
    }
}

/// Bridge that never sees a session and rejects every command.
pub struct NullBridge;

impl MediaSessionBridge for NullBridge {
    fn fetch_snapshot(&mut self) -> anyhow::Result<Option<PlaybackSnapshot>> {
        Ok(None)
    }

    fn fetch_thumbnail(&mut self) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn try_transport(&mut self, _control: TransportControl) -> bool {
        false
    }

    fn try_seek(&mut self, _position_secs: f64) -> bool {
        false
    }

    fn adjust_volume(&mut self, _direction: VolumeDirection) {}
}

#[cfg(target_os = "windows")]
mod gsmtc {
    use super::*;
    use crate::media::TimelineSnapshot;
    use futures::executor::block_on;
    use std::future::IntoFuture;
    use windows::{
        core::Result as WinResult,
        Foundation::TimeSpan,
        Media::Control::{
            GlobalSystemMediaTransportControlsSession,
            GlobalSystemMediaTransportControlsSessionManager,
            GlobalSystemMediaTransportControlsSessionMediaProperties,
            GlobalSystemMediaTransportControlsSessionPlaybackStatus,
        },
        Storage::Streams::{
            DataReader, IRandomAccessStreamReference, IRandomAccessStreamWithContentType,
            InputStreamOptions,
        },
        Win32::UI::Input::KeyboardAndMouse::{
            keybd_event, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP, VK_VOLUME_DOWN, VK_VOLUME_UP,
        },
    };

    const TICKS_PER_SECOND: f64 = 10_000_000.0;

    fn block_on_operation<O, T>(operation: O) -> WinResult<T>
    where
        O: IntoFuture<Output = WinResult<T>>,
    {
        block_on(operation.into_future())
    }

    fn current_session() -> WinResult<GlobalSystemMediaTransportControlsSession> {
        let manager =
            block_on_operation(GlobalSystemMediaTransportControlsSessionManager::RequestAsync()?)?;
        manager.GetCurrentSession()
    }

    fn time_span_to_secs(span: TimeSpan) -> f64 {
        span.Duration as f64 / TICKS_PER_SECOND
    }

    fn secs_to_ticks(seconds: f64) -> i64 {
        if !seconds.is_finite() {
            return if seconds.is_sign_positive() {
                i64::MAX
            } else {
                i64::MIN
            };
        }
        let ticks = seconds * TICKS_PER_SECOND;
        if ticks >= i64::MAX as f64 {
            i64::MAX
        } else if ticks <= i64::MIN as f64 {
            i64::MIN
        } else {
            ticks.round() as i64
        }
    }

    fn load_thumbnail_bytes(
        props: &GlobalSystemMediaTransportControlsSessionMediaProperties,
    ) -> WinResult<Option<Vec<u8>>> {
        let reference: IRandomAccessStreamReference = match props.Thumbnail() {
            Ok(reference) => reference,
            Err(_) => return Ok(None),
        };

        let stream: IRandomAccessStreamWithContentType =
            block_on_operation(reference.OpenReadAsync()?)?;
        let input_stream = stream.GetInputStreamAt(0)?;
        let reader = DataReader::CreateDataReader(&input_stream)?;
        reader.SetInputStreamOptions(InputStreamOptions::Partial)?;

        let mut buffer = Vec::new();
        const CHUNK: u32 = 64 * 1024;

        loop {
            let loaded = block_on_operation(reader.LoadAsync(CHUNK)?)?;
            if loaded == 0 {
                break;
            }
            let mut chunk = vec![0u8; loaded as usize];
            reader.ReadBytes(&mut chunk)?;
            buffer.extend_from_slice(&chunk);
            if loaded < CHUNK {
                break;
            }
        }

        Ok(Some(buffer))
    }

    /// Bridge over the Global System Media Transport Controls session of
    /// whatever is currently playing. Sessions are re-resolved per call; the
    /// OS hands out the active one.
    pub struct GsmtcBridge {
        _priv: (),
    }

    impl GsmtcBridge {
        pub fn new() -> Self {
            Self { _priv: () }
        }
    }

    impl MediaSessionBridge for GsmtcBridge {
        fn fetch_snapshot(&mut self) -> anyhow::Result<Option<PlaybackSnapshot>> {
            // No current session is the common idle case, not an error.
            let session = match current_session() {
                Ok(session) => session,
                Err(_) => return Ok(None),
            };

            let props = block_on_operation(session.TryGetMediaPropertiesAsync()?)?;
            let info = session.GetPlaybackInfo()?;
            let is_playing = info.PlaybackStatus()?
                == GlobalSystemMediaTransportControlsSessionPlaybackStatus::Playing;

            let timeline = session.GetTimelineProperties().ok().and_then(|tl| {
                let start = time_span_to_secs(tl.StartTime().ok()?);
                let end = time_span_to_secs(tl.EndTime().ok()?);
                let mut position = time_span_to_secs(tl.Position().ok()?);
                let duration = (end - start).max(0.0);
                if duration <= f64::EPSILON {
                    return None;
                }
                if !position.is_finite() {
                    position = start;
                }
                Some(TimelineSnapshot {
                    position_secs: (position - start).clamp(0.0, duration),
                    duration_secs: duration,
                })
            });

            Ok(Some(PlaybackSnapshot {
                title: props.Title()?.to_string_lossy(),
                artist: props.Artist()?.to_string_lossy(),
                is_playing,
                timeline,
            }))
        }

        fn fetch_thumbnail(&mut self) -> anyhow::Result<Option<Vec<u8>>> {
            let session = match current_session() {
                Ok(session) => session,
                Err(_) => return Ok(None),
            };
            let props = block_on_operation(session.TryGetMediaPropertiesAsync()?)?;
            Ok(load_thumbnail_bytes(&props)?)
        }

        fn try_transport(&mut self, control: TransportControl) -> bool {
            let result: WinResult<bool> = current_session().and_then(|session| match control {
                TransportControl::Previous => {
                    block_on_operation(session.TrySkipPreviousAsync()?)
                }
                TransportControl::PlayPause => {
                    block_on_operation(session.TryTogglePlayPauseAsync()?)
                }
                TransportControl::Next => block_on_operation(session.TrySkipNextAsync()?),
            });

            match result {
                Ok(accepted) => {
                    if !accepted {
                        log::warn!("{control:?} command rejected by the media session");
                    }
                    accepted
                }
                Err(err) => {
                    log::warn!("{control:?} command failed: {err:?}");
                    false
                }
            }
        }

        fn try_seek(&mut self, position_secs: f64) -> bool {
            let result: WinResult<bool> = current_session().and_then(|session| {
                block_on_operation(
                    session.TryChangePlaybackPositionAsync(secs_to_ticks(position_secs))?,
                )
            });

            match result {
                Ok(accepted) => accepted,
                Err(err) => {
                    log::warn!("seek failed: {err:?}");
                    false
                }
            }
        }

        fn adjust_volume(&mut self, direction: VolumeDirection) {
            let key = match direction {
                VolumeDirection::Up => VK_VOLUME_UP,
                VolumeDirection::Down => VK_VOLUME_DOWN,
            };
            unsafe {
                keybd_event(key.0 as u8, 0, KEYBD_EVENT_FLAGS(0), 0);
                keybd_event(key.0 as u8, 0, KEYEVENTF_KEYUP, 0);
            }
        }
    }
}
