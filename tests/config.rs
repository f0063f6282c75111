use music_lounge::config::{Config, PanelConfig, ThemeConfig};
use std::{env, fs, path::PathBuf};

fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("music_lounge_{}_{}.toml", name, std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn full_document_round_trips() {
    let path = write_config(
        "full",
        r#"
[panel]
width = 400
height = 56
font_size = 13.0
offset_x = 24
offset_y = 8

[theme]
auto_theme = false
text_color = "FF8800"
bg_opacity = 96
"#,
    );
    let config = Config::load_from(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.panel.width, 400);
    assert_eq!(config.panel.height, 56);
    assert_eq!(config.panel.font_size, 13.0);
    assert_eq!(config.panel.offset_x, 24);
    assert_eq!(config.panel.offset_y, 8);
    assert!(!config.theme.auto_theme);
    assert_eq!(config.theme.text_color, "FF8800");
    assert_eq!(config.theme.bg_opacity, 96);
}

#[test]
fn out_of_range_values_are_clamped() {
    let path = write_config(
        "clamped",
        r#"
[panel]
width = 50
height = 10
font_size = 200.0

[theme]
bg_opacity = 9999
"#,
    );
    let config = Config::load_from(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.panel.width, 100);
    assert_eq!(config.panel.height, 24);
    assert_eq!(config.panel.font_size, 48.0);
    assert_eq!(config.theme.bg_opacity, 255);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let path = write_config("partial", "[panel]\nwidth = 320\n");
    let config = Config::load_from(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.panel.width, 320);
    assert_eq!(config.panel.height, PanelConfig::default().height);
    assert_eq!(config.theme, ThemeConfig::default());
}

#[test]
fn empty_document_is_the_default_config() {
    let path = write_config("empty", "");
    let config = Config::load_from(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config, Config::default());
}

#[test]
fn malformed_toml_is_an_error() {
    let path = write_config("broken", "[panel\nwidth = ");
    let result = Config::load_from(&path);
    fs::remove_file(&path).ok();
    assert!(result.is_err());
}

#[test]
fn missing_file_is_an_error() {
    let path = env::temp_dir().join("music_lounge_definitely_missing.toml");
    assert!(Config::load_from(&path).is_err());
}

#[test]
fn defaults_match_the_documented_values() {
    let config = Config::default();
    assert_eq!(config.panel.width, 300);
    assert_eq!(config.panel.height, 48);
    assert_eq!(config.panel.font_size, 11.0);
    assert_eq!(config.panel.offset_x, 12);
    assert_eq!(config.panel.offset_y, 0);
    assert!(config.theme.auto_theme);
    assert_eq!(config.theme.text_color, "FFFFFF");
    assert_eq!(config.theme.bg_opacity, 0);
}
