use crate::{
    layout::PanelLayout,
    media::{MediaState, TransportControl},
};
use eframe::egui::{pos2, vec2, Color32, Pos2, Rect, Vec2};

/// One abstract draw call. The list produced by [`compose`] is ordered
/// back-to-front; executing it in order against any 2D context reproduces
/// the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawPrimitive {
    FillRect {
        rect: Rect,
        color: Color32,
    },
    FillCircle {
        center: Pos2,
        radius: f32,
        color: Color32,
    },
    StrokeCircle {
        center: Pos2,
        radius: f32,
        color: Color32,
        width: f32,
    },
    FillEllipse {
        center: Pos2,
        radius: Vec2,
        color: Color32,
    },
    FillTriangle {
        points: [Pos2; 3],
        color: Color32,
    },
    Line {
        from: Pos2,
        to: Pos2,
        color: Color32,
        width: f32,
    },
    /// Pill-shaped bar segment (track or filled portion of the timeline).
    RoundedBar {
        rect: Rect,
        fill: Color32,
        stroke: Option<(Color32, f32)>,
    },
    /// The snapshot's album art; the executing side binds the texture.
    AlbumArt {
        rect: Rect,
    },
    Text {
        pos: Pos2,
        text: String,
        color: Color32,
        clip: Rect,
    },
}

/// Timeline interaction state as the renderer needs it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineView {
    pub hovering: bool,
    pub dragging: bool,
    pub drag_progress: f32,
}

/// Everything one frame needs. Text metrics are measured by the caller
/// (the drawing context owns measurement) and passed in, keeping this
/// module free of side effects.
pub struct RenderInput<'a> {
    pub state: &'a MediaState,
    pub layout: &'a PanelLayout,
    pub text_color: Color32,
    pub bold_level: f32,
    pub hovered_control: Option<TransportControl>,
    pub scroll_offset: i32,
    pub is_scrolling: bool,
    pub text_width: f32,
    pub timeline: TimelineView,
}

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// The single line drawn in the metadata box: title, then a bullet and the
/// artist when one is known.
pub fn marquee_text(state: &MediaState) -> String {
    let mut text = state.title.clone();
    if !state.artist.is_empty() {
        text.push_str(" • ");
        text.push_str(&state.artist);
    }
    text
}

/// Pure composition: map one consistent snapshot of the widget state to an
/// ordered list of draw primitives. Later entries draw on top.
pub fn compose(input: &RenderInput) -> Vec<DrawPrimitive> {
    let mut out = Vec::new();
    let layout = input.layout;
    let state = input.state;

    // Album art or a neutral placeholder block.
    let art_rect = layout.art_rect();
    if state.album_art.is_some() {
        out.push(DrawPrimitive::AlbumArt { rect: art_rect });
    } else {
        out.push(DrawPrimitive::FillRect {
            rect: art_rect,
            color: Color32::from_rgba_unmultiplied(128, 128, 128, 40),
        });
    }

    compose_controls(&mut out, input);
    compose_separator_and_glyph(&mut out, input);

    let timeline_visible = state.timeline_capable && state.duration_secs > 0.0;
    compose_text(&mut out, input, timeline_visible);

    if timeline_visible {
        compose_timeline(&mut out, input);
    }

    out
}

fn compose_controls(out: &mut Vec<DrawPrimitive>, input: &RenderInput) {
    let layout = input.layout;
    let main = input.text_color;

    for control in [
        TransportControl::Previous,
        TransportControl::PlayPause,
        TransportControl::Next,
    ] {
        let anchor = layout.control_anchor(control);
        let (ax, cy) = (anchor.x, anchor.y);

        if input.hovered_control == Some(control) {
            out.push(DrawPrimitive::FillCircle {
                center: pos2(ax + 4.0, cy),
                radius: 12.0,
                color: with_alpha(main, 40),
            });
        }

        match control {
            TransportControl::Previous => {
                out.push(DrawPrimitive::FillTriangle {
                    points: [
                        pos2(ax + 8.0, cy - 6.0),
                        pos2(ax + 8.0, cy + 6.0),
                        pos2(ax, cy),
                    ],
                    color: main,
                });
                out.push(DrawPrimitive::FillRect {
                    rect: Rect::from_min_size(pos2(ax, cy - 6.0), vec2(2.0, 12.0)),
                    color: main,
                });
            }
            TransportControl::PlayPause => {
                if input.state.is_playing {
                    for bar_x in [ax, ax + 6.0] {
                        out.push(DrawPrimitive::FillRect {
                            rect: Rect::from_min_size(pos2(bar_x, cy - 7.0), vec2(3.0, 14.0)),
                            color: main,
                        });
                    }
                } else {
                    out.push(DrawPrimitive::FillTriangle {
                        points: [
                            pos2(ax, cy - 8.0),
                            pos2(ax, cy + 8.0),
                            pos2(ax + 10.0, cy),
                        ],
                        color: main,
                    });
                }
            }
            TransportControl::Next => {
                out.push(DrawPrimitive::FillTriangle {
                    points: [
                        pos2(ax, cy - 6.0),
                        pos2(ax, cy + 6.0),
                        pos2(ax + 8.0, cy),
                    ],
                    color: main,
                });
                out.push(DrawPrimitive::FillRect {
                    rect: Rect::from_min_size(pos2(ax + 8.0, cy - 6.0), vec2(2.0, 12.0)),
                    color: main,
                });
            }
        }
    }
}

fn compose_separator_and_glyph(out: &mut Vec<DrawPrimitive>, input: &RenderInput) {
    let layout = input.layout;
    let main = input.text_color;
    let bold = input.bold_level.clamp(0.0, 1.0);
    let sep_x = layout.separator_x();

    // The separator thickens and brightens continuously with dwell progress.
    let thickness = 1.0 + bold * 2.5;
    let alpha = (60.0 + 60.0 * bold) as u8;
    out.push(DrawPrimitive::Line {
        from: pos2(sep_x, 6.0),
        to: pos2(sep_x, layout.height - 6.0),
        color: with_alpha(main, alpha),
        width: thickness,
    });

    // Small double-note glyph marking the reveal zone.
    let glyph_color = Color32::from_rgb(100, 100, 100);
    let icon_x = sep_x + 7.0;
    let icon_y = layout.height / 2.0;
    let note1 = pos2(icon_x - 3.0, icon_y + 1.0);
    let note2 = pos2(icon_x + 3.0, icon_y - 2.0);
    for note in [note1, note2] {
        out.push(DrawPrimitive::FillEllipse {
            center: pos2(note.x, note.y + 1.5),
            radius: vec2(2.0, 1.5),
            color: glyph_color,
        });
        out.push(DrawPrimitive::Line {
            from: pos2(note.x, note.y - 3.0),
            to: note,
            color: glyph_color,
            width: 1.0,
        });
    }
    out.push(DrawPrimitive::Line {
        from: pos2(note1.x, note1.y - 3.0),
        to: pos2(note2.x, note2.y - 3.0),
        color: glyph_color,
        width: 1.0,
    });
}

fn compose_text(out: &mut Vec<DrawPrimitive>, input: &RenderInput, timeline_visible: bool) {
    let layout = input.layout;
    let full_text = marquee_text(input.state);

    let text_y = layout.text_y(timeline_visible);
    let clip = layout.text_clip_rect();

    if input.is_scrolling {
        let draw_x = layout.text_x() - input.scroll_offset as f32;
        out.push(DrawPrimitive::Text {
            pos: pos2(draw_x, text_y),
            text: full_text.clone(),
            color: input.text_color,
            clip,
        });
        // Second copy trails the first for a seamless wrap once the tail
        // has scrolled into view.
        if draw_x + input.text_width < layout.width {
            out.push(DrawPrimitive::Text {
                pos: pos2(
                    draw_x + input.text_width + crate::anim::SCROLL_WRAP_GAP_PX as f32,
                    text_y,
                ),
                text: full_text,
                color: input.text_color,
                clip,
            });
        }
    } else {
        out.push(DrawPrimitive::Text {
            pos: pos2(layout.text_x(), text_y),
            text: full_text,
            color: input.text_color,
            clip,
        });
    }
}

fn compose_timeline(out: &mut Vec<DrawPrimitive>, input: &RenderInput) {
    let layout = input.layout;
    let main = input.text_color;
    let emphasized = input.timeline.hovering || input.timeline.dragging;
    let bar = layout.timeline_bar(emphasized);

    let progress = if input.timeline.dragging {
        input.timeline.drag_progress.clamp(0.0, 1.0)
    } else {
        input.state.progress()
    };

    out.push(DrawPrimitive::RoundedBar {
        rect: bar,
        fill: Color32::from_rgba_unmultiplied(0, 0, 0, 32),
        stroke: Some((with_alpha(main, 60), 1.5)),
    });

    let fill_width = bar.width() * progress;
    if fill_width > 0.0 {
        out.push(DrawPrimitive::RoundedBar {
            rect: Rect::from_min_size(bar.min, vec2(fill_width, bar.height())),
            fill: with_alpha(main, 220),
            stroke: None,
        });
    }

    if emphasized {
        let center = pos2(bar.min.x + fill_width, bar.center().y);
        let radius = bar.height() / 2.0 + 2.0;
        out.push(DrawPrimitive::FillCircle {
            center,
            radius,
            color: with_alpha(main, 220),
        });
        out.push(DrawPrimitive::StrokeCircle {
            center,
            radius,
            color: Color32::WHITE,
            width: 1.5,
        });
    }
}
