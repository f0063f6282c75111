pub mod anim;
pub mod bridge;
pub mod config;
pub mod gesture;
pub mod layout;
pub mod media;
pub mod render;
pub mod theme;
pub mod timeline;
