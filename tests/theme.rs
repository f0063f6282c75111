use eframe::egui::Color32;
use music_lounge::{
    config::ThemeConfig,
    theme::{background_tint, is_dark_color, parse_hex_color, resolve_text_color},
};

#[test]
fn hex_colors_parse_with_common_prefixes() {
    assert_eq!(parse_hex_color("FF8800"), Some(Color32::from_rgb(255, 136, 0)));
    assert_eq!(parse_hex_color("#00ff00"), Some(Color32::from_rgb(0, 255, 0)));
    assert_eq!(parse_hex_color("0x0000FF"), Some(Color32::from_rgb(0, 0, 255)));
    assert_eq!(parse_hex_color("  FFFFFF "), Some(Color32::WHITE));
}

#[test]
fn invalid_hex_colors_are_rejected() {
    assert_eq!(parse_hex_color(""), None);
    assert_eq!(parse_hex_color("FFF"), None);
    assert_eq!(parse_hex_color("GGGGGG"), None);
    assert_eq!(parse_hex_color("FFFFFFFF"), None);
}

#[test]
fn luminance_splits_dark_from_light() {
    assert!(is_dark_color(Color32::BLACK));
    assert!(is_dark_color(Color32::from_rgb(30, 30, 60)));
    assert!(!is_dark_color(Color32::WHITE));
    assert!(!is_dark_color(Color32::from_rgb(0, 255, 0)));
}

#[test]
fn manual_theme_uses_the_configured_color() {
    let theme = ThemeConfig {
        auto_theme: false,
        text_color: "FF0000".to_string(),
        bg_opacity: 128,
    };
    assert_eq!(resolve_text_color(&theme), Color32::from_rgb(255, 0, 0));
    assert_eq!(background_tint(&theme).a(), 128);
}

#[test]
fn unparsable_manual_color_falls_back_to_white() {
    let theme = ThemeConfig {
        auto_theme: false,
        text_color: "not a color".to_string(),
        bg_opacity: 0,
    };
    assert_eq!(resolve_text_color(&theme), Color32::WHITE);
}

#[test]
fn zero_opacity_keeps_the_background_invisible() {
    let theme = ThemeConfig {
        auto_theme: false,
        text_color: "FFFFFF".to_string(),
        bg_opacity: 0,
    };
    assert_eq!(background_tint(&theme).a(), 0);
}

#[cfg(not(target_os = "windows"))]
#[test]
fn auto_theme_defaults_to_dark_without_a_system_preference() {
    let theme = ThemeConfig::default();
    assert_eq!(resolve_text_color(&theme), Color32::WHITE);
    assert_eq!(background_tint(&theme), Color32::from_rgba_unmultiplied(0, 0, 0, 0x40));
}
