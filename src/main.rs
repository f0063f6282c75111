use eframe::egui::{
    self, Align2, Color32, CornerRadius, FontId, PointerButton, Stroke, StrokeKind,
    TextureHandle, TextureOptions, ViewportBuilder, ViewportCommand,
};
use music_lounge::{
    anim::{PanelAnimator, TextScrollController},
    bridge,
    config::Config,
    gesture::{GestureController, GESTURE_TICK_INTERVAL},
    layout::PanelLayout,
    media::{MediaStateStore, PollingScheduler, TransportControl, VolumeDirection},
    render::{compose, marquee_text, DrawPrimitive, RenderInput, TimelineView},
    theme,
    timeline::TimelineInteractionController,
};
use notify::{RecursiveMode, Watcher};
use std::{
    path::PathBuf,
    sync::{
        mpsc::{self, TryRecvError},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

#[cfg(target_os = "windows")]
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
#[cfg(target_os = "windows")]
use windows::Win32::{
    Foundation::RPC_E_CHANGED_MODE,
    System::Com::{CoInitializeEx, CoUninitialize, COINIT_MULTITHREADED},
};

const ANIM_TICK_INTERVAL: Duration = Duration::from_millis(16);

enum WorkerCommand {
    Refresh,
    Transport(TransportControl),
    Seek(f64),
    Volume(VolumeDirection),
    Shutdown,
}

/// The poll worker owns the OS bridge so slow session queries never stall a
/// frame. The store's internal lock is the only shared state; results land
/// there and a repaint is requested.
fn spawn_poll_worker(
    store: Arc<MediaStateStore>,
    ctx: egui::Context,
) -> (mpsc::Sender<WorkerCommand>, mpsc::Receiver<()>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
    let (done_tx, done_rx) = mpsc::channel::<()>();

    thread::spawn(move || {
        #[cfg(target_os = "windows")]
        let com_initialized = unsafe {
            let hr = CoInitializeEx(None, COINIT_MULTITHREADED);
            if hr.is_ok() {
                true
            } else if hr == RPC_E_CHANGED_MODE {
                false
            } else {
                log::error!("COM init failed: {hr:?}");
                return;
            }
        };

        let mut bridge = bridge::platform_bridge();

        while let Ok(command) = cmd_rx.recv() {
            match command {
                WorkerCommand::Refresh => {
                    store.refresh(bridge.as_mut());
                    let _ = done_tx.send(());
                    ctx.request_repaint();
                }
                WorkerCommand::Transport(control) => {
                    bridge.try_transport(control);
                    // Ground truth right away rather than waiting a poll.
                    store.refresh(bridge.as_mut());
                    ctx.request_repaint();
                }
                WorkerCommand::Seek(position_secs) => {
                    bridge.try_seek(position_secs);
                    store.refresh(bridge.as_mut());
                    ctx.request_repaint();
                }
                WorkerCommand::Volume(direction) => {
                    bridge.adjust_volume(direction);
                }
                WorkerCommand::Shutdown => break,
            }
        }

        #[cfg(target_os = "windows")]
        if com_initialized {
            unsafe {
                CoUninitialize();
            }
        }
    });

    (cmd_tx, done_rx)
}

struct App {
    config: Config,
    config_path: Option<PathBuf>,
    _config_watcher: Option<notify::RecommendedWatcher>,
    config_rx: Option<mpsc::Receiver<notify::Result<notify::Event>>>,

    store: Arc<MediaStateStore>,
    scheduler: PollingScheduler,
    cmd_tx: Option<mpsc::Sender<WorkerCommand>>,
    refresh_done_rx: Option<mpsc::Receiver<()>>,

    gesture: GestureController,
    panel: PanelAnimator,
    scroll: TextScrollController,
    timeline: TimelineInteractionController,
    hovered_control: Option<TransportControl>,
    last_gesture_tick: Instant,
    last_anim_tick: Instant,

    art_texture: Option<TextureHandle>,
    art_track: Option<(String, String)>,
    last_window_pos: Option<egui::Pos2>,
    last_applied_size: Option<(u32, u32)>,
    #[cfg(target_os = "windows")]
    corners_applied: bool,
}

impl App {
    fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let store = Arc::new(MediaStateStore::new());
        let (cmd_tx, refresh_done_rx) = spawn_poll_worker(store.clone(), cc.egui_ctx.clone());

        let config_path = Config::find_path();
        let (watcher, config_rx) = match config_path.as_deref().map(spawn_config_watcher) {
            Some(Ok((watcher, rx))) => (Some(watcher), Some(rx)),
            Some(Err(err)) => {
                log::warn!("config watcher failed: {err:#}");
                (None, None)
            }
            None => (None, None),
        };

        Self {
            config,
            config_path,
            _config_watcher: watcher,
            config_rx,
            store,
            scheduler: PollingScheduler::new(),
            cmd_tx: Some(cmd_tx),
            refresh_done_rx: Some(refresh_done_rx),
            gesture: GestureController::new(),
            panel: PanelAnimator::new(),
            scroll: TextScrollController::new(),
            timeline: TimelineInteractionController::new(),
            hovered_control: None,
            last_gesture_tick: Instant::now(),
            last_anim_tick: Instant::now(),
            art_texture: None,
            art_track: None,
            last_window_pos: None,
            last_applied_size: None,
            #[cfg(target_os = "windows")]
            corners_applied: false,
        }
    }

    fn send_command(&mut self, command: WorkerCommand) {
        if let Some(tx) = self.cmd_tx.as_ref() {
            if tx.send(command).is_err() {
                self.cmd_tx = None;
            }
        }
    }

    fn maintain_config(&mut self, ctx: &egui::Context) {
        let mut changed_on_disk = false;
        if let Some(rx) = self.config_rx.as_ref() {
            while let Ok(event) = rx.try_recv() {
                if event.is_ok() {
                    changed_on_disk = true;
                }
            }
        }

        if changed_on_disk {
            if let Some(path) = self.config_path.as_deref() {
                match Config::load_from(path) {
                    Ok(config) => {
                        if config != self.config {
                            log::info!("config reloaded from {}", path.display());
                            self.config = config;
                            self.last_window_pos = None;
                        }
                    }
                    Err(err) => log::warn!("config reload failed: {err:#}"),
                }
            }
        }

        let size = (self.config.panel.width, self.config.panel.height);
        if self.last_applied_size != Some(size) {
            ctx.send_viewport_cmd(ViewportCommand::InnerSize(egui::vec2(
                size.0 as f32,
                size.1 as f32,
            )));
            self.last_applied_size = Some(size);
        }
    }

    fn drain_refresh_results(&mut self) -> bool {
        let mut completed = false;
        let mut disconnected = false;
        if let Some(rx) = self.refresh_done_rx.as_ref() {
            loop {
                match rx.try_recv() {
                    Ok(()) => completed = true,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }
        if disconnected {
            self.refresh_done_rx = None;
            self.cmd_tx = None;
        }
        completed
    }

    /// Move the window so the panel sits at its configured spot plus the
    /// current slide offset, tucked against the bottom of the work area.
    fn update_window_position(&mut self, ctx: &egui::Context) {
        let monitor = ctx.input(|i| i.viewport().monitor_size);
        let Some(monitor) = monitor else {
            return;
        };

        let x = self.config.panel.offset_x as f32 + self.panel.offset() as f32;
        let y = monitor.y - self.config.panel.height as f32 - self.config.panel.offset_y as f32;
        let pos = egui::pos2(x, y.max(0.0));
        if self.last_window_pos != Some(pos) {
            ctx.send_viewport_cmd(ViewportCommand::OuterPosition(pos));
            self.last_window_pos = Some(pos);
        }
    }

    fn sync_art_texture(&mut self, ctx: &egui::Context, state: &music_lounge::media::MediaState) {
        match state.album_art.as_ref() {
            Some(art) => {
                let track = (state.title.clone(), state.artist.clone());
                if self.art_texture.is_none() || self.art_track.as_ref() != Some(&track) {
                    self.art_texture = Some(ctx.load_texture(
                        "music_lounge.album_art",
                        art.clone(),
                        TextureOptions::LINEAR,
                    ));
                    self.art_track = Some(track);
                }
            }
            None => {
                self.art_texture = None;
                self.art_track = None;
            }
        }
    }

    #[cfg(target_os = "windows")]
    fn apply_corner_preference(&mut self, frame: &eframe::Frame) {
        use windows::Win32::Foundation::HWND;
        use windows::Win32::Graphics::Dwm::{
            DwmSetWindowAttribute, DWMWA_WINDOW_CORNER_PREFERENCE, DWMWCP_ROUND,
        };

        if self.corners_applied {
            return;
        }
        let Ok(window_handle) = frame.window_handle() else {
            return;
        };
        let hwnd = match window_handle.as_raw() {
            RawWindowHandle::Win32(handle) => HWND(handle.hwnd.get() as *mut std::ffi::c_void),
            _ => return,
        };

        let preference = DWMWCP_ROUND;
        unsafe {
            let _ = DwmSetWindowAttribute(
                hwnd,
                DWMWA_WINDOW_CORNER_PREFERENCE,
                &preference as *const _ as *const _,
                std::mem::size_of_val(&preference) as u32,
            );
        }
        self.corners_applied = true;
    }

    #[cfg(not(target_os = "windows"))]
    fn apply_corner_preference(&mut self, _frame: &eframe::Frame) {}
}

impl eframe::App for App {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.apply_corner_preference(frame);
        self.maintain_config(ctx);

        let refresh_completed = self.drain_refresh_results();
        self.store.advance_smooth(now);
        let state = self.store.snapshot();
        if refresh_completed {
            self.scheduler
                .complete(state.timeline_capable && state.duration_secs > 0.0);
        }
        if self.scheduler.should_fire(now) {
            self.send_command(WorkerCommand::Refresh);
        }

        let font_id = FontId::proportional(self.config.panel.font_size);
        let full_text = marquee_text(&state);
        let (line_height, text_width) = ctx.fonts(|fonts| {
            let galley = fonts.layout_no_wrap(full_text.clone(), font_id.clone(), Color32::WHITE);
            (fonts.row_height(&font_id), galley.size().x)
        });
        let layout = PanelLayout::new(&self.config.panel, line_height);
        self.scroll
            .set_measured(text_width.ceil() as i32, layout.text_max_width() as i32);

        let timeline_active = state.timeline_capable && state.duration_secs > 0.0;

        let (pointer_pos, pressed, released, scroll_delta) = ctx.input(|i| {
            let pos = if self.timeline.is_dragging() {
                i.pointer.latest_pos()
            } else {
                i.pointer.hover_pos()
            };
            (
                pos,
                i.pointer.button_pressed(PointerButton::Primary),
                i.pointer.button_released(PointerButton::Primary),
                i.raw_scroll_delta.y,
            )
        });

        match pointer_pos {
            Some(pos) => {
                self.gesture.set_zone_hovered(layout.in_reveal_zone(pos), now);
                self.timeline.pointer_moved(pos, &layout, timeline_active);
                self.hovered_control =
                    if self.timeline.is_dragging() || self.timeline.is_hovering() {
                        None
                    } else {
                        layout.control_hit(pos)
                    };

                if pressed {
                    self.timeline
                        .pointer_pressed(pos, &layout, state.progress(), timeline_active);
                }

                if released {
                    if let Some(progress) = self.timeline.pointer_released() {
                        let target = progress as f64 * state.duration_secs;
                        if !state.is_playing {
                            // The next poll may be a second away; show the
                            // committed position immediately.
                            self.store.note_seek(target);
                        }
                        self.send_command(WorkerCommand::Seek(target));
                    } else if let Some(control) = self.hovered_control {
                        self.send_command(WorkerCommand::Transport(control));
                    }
                }

                if scroll_delta.abs() > 0.0
                    && !layout.in_reveal_zone(pos)
                    && !layout.timeline_hit_rect().contains(pos)
                {
                    // Reversed on purpose: wheel up nudges the volume down.
                    let direction = if scroll_delta > 0.0 {
                        VolumeDirection::Down
                    } else {
                        VolumeDirection::Up
                    };
                    self.send_command(WorkerCommand::Volume(direction));
                }

                let interactive = layout.in_reveal_zone(pos)
                    || self.timeline.is_hovering()
                    || self.timeline.is_dragging()
                    || self.hovered_control.is_some();
                if interactive {
                    ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
                }
            }
            None => {
                self.gesture.pointer_left(now);
                self.timeline.pointer_left();
                self.hovered_control = None;
            }
        }

        if self.gesture.timer_armed()
            && now.saturating_duration_since(self.last_gesture_tick) >= GESTURE_TICK_INTERVAL
        {
            self.last_gesture_tick = now;
            if self.gesture.tick(now) {
                self.panel.toggle(layout.slide_distance());
            }
        }

        if now.saturating_duration_since(self.last_anim_tick) >= ANIM_TICK_INTERVAL {
            self.last_anim_tick = now;
            self.panel.tick();
            self.scroll.tick();
        }

        self.update_window_position(ctx);
        self.sync_art_texture(ctx, &state);

        let primitives = compose(&RenderInput {
            state: &state,
            layout: &layout,
            text_color: theme::resolve_text_color(&self.config.theme),
            bold_level: self.gesture.bold_level(),
            hovered_control: self.hovered_control,
            scroll_offset: self.scroll.offset(),
            is_scrolling: self.scroll.is_scrolling(),
            text_width,
            timeline: TimelineView {
                hovering: self.timeline.is_hovering(),
                dragging: self.timeline.is_dragging(),
                drag_progress: self.timeline.drag_progress(),
            },
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let painter = ui.painter();
                let panel_rect = ui.max_rect();
                let tint = theme::background_tint(&self.config.theme);
                if tint.a() > 0 {
                    painter.rect_filled(panel_rect, CornerRadius::same(8), tint);
                }
                paint_primitives(painter, &primitives, self.art_texture.as_ref(), &font_id);
            });

        let mut next = self.scheduler.interval();
        if !self.panel.settled() || !self.scroll.settled() {
            next = next.min(ANIM_TICK_INTERVAL);
        }
        if self.gesture.timer_armed() {
            next = next.min(GESTURE_TICK_INTERVAL);
        }
        ctx.request_repaint_after(next);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(WorkerCommand::Shutdown);
        }
    }
}

fn paint_primitives(
    painter: &egui::Painter,
    primitives: &[DrawPrimitive],
    art: Option<&TextureHandle>,
    font_id: &FontId,
) {
    for primitive in primitives {
        match primitive {
            DrawPrimitive::FillRect { rect, color } => {
                painter.rect_filled(*rect, CornerRadius::ZERO, *color);
            }
            DrawPrimitive::FillCircle {
                center,
                radius,
                color,
            } => {
                painter.circle_filled(*center, *radius, *color);
            }
            DrawPrimitive::StrokeCircle {
                center,
                radius,
                color,
                width,
            } => {
                painter.circle_stroke(*center, *radius, Stroke::new(*width, *color));
            }
            DrawPrimitive::FillEllipse {
                center,
                radius,
                color,
            } => {
                painter.add(egui::epaint::EllipseShape::filled(*center, *radius, *color));
            }
            DrawPrimitive::FillTriangle { points, color } => {
                painter.add(egui::Shape::convex_polygon(
                    points.to_vec(),
                    *color,
                    Stroke::NONE,
                ));
            }
            DrawPrimitive::Line {
                from,
                to,
                color,
                width,
            } => {
                painter.line_segment([*from, *to], Stroke::new(*width, *color));
            }
            DrawPrimitive::RoundedBar { rect, fill, stroke } => {
                let radius = CornerRadius::same((rect.height() / 2.0).round() as u8);
                painter.rect_filled(*rect, radius, *fill);
                if let Some((color, width)) = stroke {
                    painter.rect_stroke(
                        *rect,
                        radius,
                        Stroke::new(*width, *color),
                        StrokeKind::Inside,
                    );
                }
            }
            DrawPrimitive::AlbumArt { rect } => {
                if let Some(texture) = art {
                    painter.image(
                        texture.id(),
                        *rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }
            }
            DrawPrimitive::Text {
                pos,
                text,
                color,
                clip,
            } => {
                painter.with_clip_rect(*clip).text(
                    *pos,
                    Align2::LEFT_TOP,
                    text,
                    font_id.clone(),
                    *color,
                );
            }
        }
    }
}

fn spawn_config_watcher(
    path: &std::path::Path,
) -> anyhow::Result<(
    notify::RecommendedWatcher,
    mpsc::Receiver<notify::Result<notify::Event>>,
)> {
    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |event| {
        let _ = tx.send(event);
    })?;
    watcher.watch(path, RecursiveMode::NonRecursive)?;
    Ok((watcher, rx))
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = Config::load().unwrap_or_else(|err| {
        log::warn!("config load failed, using defaults: {err:#}");
        Config::default()
    });

    let size = egui::vec2(config.panel.width as f32, config.panel.height as f32);
    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size(size)
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_resizable(false),
        ..Default::default()
    };

    let run_res = eframe::run_native(
        "Music Lounge",
        native_options,
        Box::new(
            move |cc| -> std::result::Result<
                Box<dyn eframe::App>,
                Box<dyn std::error::Error + Send + Sync>,
            > { Ok(Box::new(App::new(cc, config))) },
        ),
    );
    if let Err(e) = run_res {
        return Err(Box::new(e));
    }

    Ok(())
}
