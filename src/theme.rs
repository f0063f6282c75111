use crate::config::ThemeConfig;
use eframe::egui::Color32;

/// Parse an RRGGBB hex string, tolerating `#` and `0x` prefixes.
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let digits = hex
        .trim()
        .trim_start_matches('#')
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    if digits.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    Some(Color32::from_rgb(
        (value >> 16) as u8,
        (value >> 8) as u8,
        value as u8,
    ))
}

pub fn luminance(color: Color32) -> f32 {
    0.2126 * color.r() as f32 + 0.7152 * color.g() as f32 + 0.0722 * color.b() as f32
}

pub fn is_dark_color(color: Color32) -> bool {
    luminance(color) < 128.0
}

#[cfg(target_os = "windows")]
fn system_prefers_light() -> bool {
    use windows::UI::ViewManagement::{UIColorType, UISettings};

    if let Ok(settings) = UISettings::new() {
        if let Ok(background) = settings.GetColorValue(UIColorType::Background) {
            return !is_dark_color(Color32::from_rgb(background.R, background.G, background.B));
        }
    }
    false
}

#[cfg(not(target_os = "windows"))]
fn system_prefers_light() -> bool {
    false
}

/// Text/icon color for the panel: follows the system theme when auto-theme
/// is on, otherwise the configured manual color.
pub fn resolve_text_color(theme: &ThemeConfig) -> Color32 {
    if theme.auto_theme {
        if system_prefers_light() {
            Color32::BLACK
        } else {
            Color32::WHITE
        }
    } else {
        parse_hex_color(&theme.text_color).unwrap_or(Color32::WHITE)
    }
}

/// Background tint painted under the panel content. Opacity zero keeps the
/// surface fully see-through.
pub fn background_tint(theme: &ThemeConfig) -> Color32 {
    if theme.auto_theme {
        if system_prefers_light() {
            Color32::from_rgba_unmultiplied(255, 255, 255, 0x40)
        } else {
            Color32::from_rgba_unmultiplied(0, 0, 0, 0x40)
        }
    } else {
        Color32::from_rgba_unmultiplied(255, 255, 255, theme.bg_opacity)
    }
}
