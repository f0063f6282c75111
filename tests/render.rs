use eframe::egui::{Color32, ColorImage};
use music_lounge::{
    config::PanelConfig,
    layout::PanelLayout,
    media::MediaState,
    render::{compose, marquee_text, DrawPrimitive, RenderInput, TimelineView},
};

fn layout() -> PanelLayout {
    PanelLayout::new(&PanelConfig::default(), 14.0)
}

fn playing_state() -> MediaState {
    MediaState {
        title: "Song".to_string(),
        artist: "Artist".to_string(),
        is_playing: true,
        has_media: true,
        timeline_capable: true,
        position_secs: 150.0,
        duration_secs: 200.0,
        smooth_position_secs: 150.0,
        ..Default::default()
    }
}

fn input<'a>(state: &'a MediaState, layout: &'a PanelLayout) -> RenderInput<'a> {
    RenderInput {
        state,
        layout,
        text_color: Color32::WHITE,
        bold_level: 0.0,
        hovered_control: None,
        scroll_offset: 0,
        is_scrolling: false,
        text_width: 60.0,
        timeline: TimelineView::default(),
    }
}

fn rounded_bars(primitives: &[DrawPrimitive]) -> Vec<&DrawPrimitive> {
    primitives
        .iter()
        .filter(|p| matches!(p, DrawPrimitive::RoundedBar { .. }))
        .collect()
}

fn texts(primitives: &[DrawPrimitive]) -> Vec<&DrawPrimitive> {
    primitives
        .iter()
        .filter(|p| matches!(p, DrawPrimitive::Text { .. }))
        .collect()
}

#[test]
fn marquee_text_joins_title_and_artist() {
    let state = playing_state();
    assert_eq!(marquee_text(&state), "Song • Artist");

    let no_artist = MediaState {
        title: "Song".to_string(),
        ..Default::default()
    };
    assert_eq!(marquee_text(&no_artist), "Song");
}

#[test]
fn missing_art_draws_a_placeholder_block() {
    let state = playing_state();
    let layout = layout();
    let primitives = compose(&input(&state, &layout));

    assert!(matches!(primitives[0], DrawPrimitive::FillRect { .. }));
    assert!(!primitives
        .iter()
        .any(|p| matches!(p, DrawPrimitive::AlbumArt { .. })));
}

#[test]
fn present_art_replaces_the_placeholder() {
    let mut state = playing_state();
    state.album_art = Some(ColorImage::from_rgba_unmultiplied([1, 1], &[0, 0, 0, 255]));
    let layout = layout();
    let primitives = compose(&input(&state, &layout));

    assert!(matches!(
        primitives[0],
        DrawPrimitive::AlbumArt { rect } if rect == layout.art_rect()
    ));
}

#[test]
fn timeline_only_appears_for_capable_sessions() {
    let layout = layout();

    let capable = playing_state();
    assert!(!rounded_bars(&compose(&input(&capable, &layout))).is_empty());

    let mut incapable = playing_state();
    incapable.timeline_capable = false;
    assert!(rounded_bars(&compose(&input(&incapable, &layout))).is_empty());

    let mut zero_duration = playing_state();
    zero_duration.duration_secs = 0.0;
    assert!(rounded_bars(&compose(&input(&zero_duration, &layout))).is_empty());
}

#[test]
fn timeline_fill_reflects_playback_progress() {
    let state = playing_state();
    let layout = layout();
    let primitives = compose(&input(&state, &layout));

    let bars = rounded_bars(&primitives);
    assert_eq!(bars.len(), 2, "track plus fill");
    let (DrawPrimitive::RoundedBar { rect: track, .. }, DrawPrimitive::RoundedBar { rect: fill, .. }) =
        (bars[0], bars[1])
    else {
        unreachable!();
    };
    // 150 of 200 seconds: three quarters of the track.
    assert!((fill.width() - track.width() * 0.75).abs() < 0.5);
}

#[test]
fn a_live_drag_overrides_the_playback_position() {
    let state = playing_state();
    let layout = layout();
    let mut render_input = input(&state, &layout);
    render_input.timeline = TimelineView {
        hovering: false,
        dragging: true,
        drag_progress: 0.25,
    };
    let primitives = compose(&render_input);

    let bars = rounded_bars(&primitives);
    let (DrawPrimitive::RoundedBar { rect: track, .. }, DrawPrimitive::RoundedBar { rect: fill, .. }) =
        (bars[0], bars[1])
    else {
        unreachable!();
    };
    assert!((fill.width() - track.width() * 0.25).abs() < 0.5);
}

#[test]
fn the_seek_thumb_appears_only_under_emphasis() {
    let state = playing_state();
    let layout = layout();

    let plain = compose(&input(&state, &layout));
    assert!(!plain
        .iter()
        .any(|p| matches!(p, DrawPrimitive::StrokeCircle { .. })));

    let mut hovered = input(&state, &layout);
    hovered.timeline = TimelineView {
        hovering: true,
        dragging: false,
        drag_progress: 0.0,
    };
    let emphasized = compose(&hovered);
    assert!(emphasized
        .iter()
        .any(|p| matches!(p, DrawPrimitive::StrokeCircle { .. })));
}

#[test]
fn scrolling_text_draws_a_trailing_copy_for_the_wrap() {
    let state = playing_state();
    let layout = layout();

    let still = compose(&input(&state, &layout));
    assert_eq!(texts(&still).len(), 1);

    let mut scrolling = input(&state, &layout);
    scrolling.is_scrolling = true;
    scrolling.text_width = 200.0;
    scrolling.scroll_offset = 150;
    // First copy starts at x -20 and ends at 180, inside the panel: the
    // trailing copy must already be on its way in.
    assert_eq!(texts(&compose(&scrolling)).len(), 2);

    scrolling.scroll_offset = 10;
    // First copy still covers the whole box; no second copy yet.
    assert_eq!(texts(&compose(&scrolling)).len(), 1);
}

#[test]
fn the_separator_thickens_with_dwell_emphasis() {
    let state = playing_state();
    let layout = layout();
    let sep_x = layout.separator_x();

    let separator_width = |bold: f32| -> f32 {
        let mut render_input = input(&state, &layout);
        render_input.bold_level = bold;
        compose(&render_input)
            .iter()
            .find_map(|p| match p {
                DrawPrimitive::Line { from, width, .. }
                    if from.x == sep_x && from.y == 6.0 =>
                {
                    Some(*width)
                }
                _ => None,
            })
            .expect("separator line present")
    };

    assert_eq!(separator_width(0.0), 1.0);
    assert_eq!(separator_width(1.0), 3.5);
}

#[test]
fn a_hovered_control_gains_a_highlight_circle() {
    use music_lounge::media::TransportControl;

    let state = playing_state();
    let layout = layout();

    let plain = compose(&input(&state, &layout));
    let plain_circles = plain
        .iter()
        .filter(|p| matches!(p, DrawPrimitive::FillCircle { .. }))
        .count();

    let mut hovered = input(&state, &layout);
    hovered.hovered_control = Some(TransportControl::PlayPause);
    let highlighted = compose(&hovered);
    let highlighted_circles = highlighted
        .iter()
        .filter(|p| matches!(p, DrawPrimitive::FillCircle { .. }))
        .count();

    assert_eq!(highlighted_circles, plain_circles + 1);
}

#[test]
fn play_and_pause_glyphs_swap_with_playback() {
    let layout = layout();

    // Playing: the play/pause slot shows two pause bars (extra FillRects).
    let playing = playing_state();
    let playing_rects = compose(&input(&playing, &layout))
        .iter()
        .filter(|p| matches!(p, DrawPrimitive::FillRect { .. }))
        .count();

    let mut paused = playing_state();
    paused.is_playing = false;
    let paused_rects = compose(&input(&paused, &layout))
        .iter()
        .filter(|p| matches!(p, DrawPrimitive::FillRect { .. }))
        .count();

    assert_eq!(playing_rects, paused_rects + 2);
}
