use eframe::egui::pos2;
use music_lounge::{
    config::PanelConfig,
    layout::PanelLayout,
    timeline::TimelineInteractionController,
};

// Default 300x48 panel with a 14 px line: bar spans x 130..270 at y 30..35.
fn layout() -> PanelLayout {
    PanelLayout::new(&PanelConfig::default(), 14.0)
}

#[test]
fn pressing_the_bar_starts_a_drag_at_the_pressed_position() {
    let layout = layout();
    let mut timeline = TimelineInteractionController::new();

    assert!(timeline.pointer_pressed(pos2(200.0, 32.0), &layout, 0.1, true));
    assert!(timeline.is_dragging());
    assert!((timeline.drag_progress() - 0.5).abs() < 0.01);
}

#[test]
fn grabbing_the_thumb_keeps_the_current_progress() {
    let layout = layout();
    let mut timeline = TimelineInteractionController::new();

    // Thumb for progress 0.5 sits at x 200; press a few pixels off it.
    assert!(timeline.pointer_pressed(pos2(205.0, 30.0), &layout, 0.5, true));
    assert!(timeline.is_dragging());
    assert_eq!(timeline.drag_progress(), 0.5, "a thumb grab must not jump");
}

#[test]
fn dragging_clamps_beyond_the_bar_edges() {
    let layout = layout();
    let mut timeline = TimelineInteractionController::new();
    timeline.pointer_pressed(pos2(200.0, 32.0), &layout, 0.5, true);

    timeline.pointer_moved(pos2(600.0, 32.0), &layout, true);
    assert_eq!(timeline.drag_progress(), 1.0);

    timeline.pointer_moved(pos2(-50.0, 32.0), &layout, true);
    assert_eq!(timeline.drag_progress(), 0.0);
}

#[test]
fn release_commits_exactly_one_seek() {
    let layout = layout();
    let mut timeline = TimelineInteractionController::new();

    // Drag to 60% of a 200 second track and let go.
    timeline.pointer_pressed(pos2(214.0, 32.0), &layout, 0.0, true);
    let progress = timeline.pointer_released().expect("a drag commits on release");
    assert!((progress - 0.6).abs() < 0.01);

    let target_secs = progress as f64 * 200.0;
    assert!((target_secs - 120.0).abs() < 2.0);

    // No drag, no commit.
    assert_eq!(timeline.pointer_released(), None);
    assert!(!timeline.is_dragging());
}

#[test]
fn presses_outside_the_hit_region_are_ignored() {
    let layout = layout();
    let mut timeline = TimelineInteractionController::new();

    assert!(!timeline.pointer_pressed(pos2(200.0, 10.0), &layout, 0.0, true));
    assert!(!timeline.pointer_pressed(pos2(60.0, 32.0), &layout, 0.0, true));
    assert!(!timeline.is_dragging());
}

#[test]
fn the_reveal_zone_edge_is_not_part_of_the_bar() {
    let layout = layout();
    let mut timeline = TimelineInteractionController::new();

    // Just left of the separator: reveal-zone territory, not seek territory.
    let pos = pos2(layout.separator_x() - 5.0, 32.0);
    timeline.pointer_moved(pos, &layout, true);
    assert!(!timeline.is_hovering());
    assert!(!timeline.pointer_pressed(pos, &layout, 0.0, true));
}

#[test]
fn hover_requires_an_active_timeline() {
    let layout = layout();
    let mut timeline = TimelineInteractionController::new();

    timeline.pointer_moved(pos2(200.0, 32.0), &layout, false);
    assert!(!timeline.is_hovering());
    assert!(!timeline.pointer_pressed(pos2(200.0, 32.0), &layout, 0.0, false));

    timeline.pointer_moved(pos2(200.0, 32.0), &layout, true);
    assert!(timeline.is_hovering());
}

#[test]
fn a_live_drag_survives_the_pointer_leaving_the_panel() {
    let layout = layout();
    let mut timeline = TimelineInteractionController::new();
    timeline.pointer_pressed(pos2(200.0, 32.0), &layout, 0.5, true);

    timeline.pointer_left();
    assert!(timeline.is_dragging());

    // Capability loss mid-drag does not cancel it either.
    timeline.pointer_moved(pos2(240.0, 32.0), &layout, false);
    assert!(timeline.is_dragging());
    assert!(timeline.drag_progress() > 0.7);

    assert!(timeline.pointer_released().is_some());
}

#[test]
fn hover_clears_when_the_pointer_leaves() {
    let layout = layout();
    let mut timeline = TimelineInteractionController::new();

    timeline.pointer_moved(pos2(200.0, 32.0), &layout, true);
    assert!(timeline.is_hovering());

    timeline.pointer_left();
    assert!(!timeline.is_hovering());
}
