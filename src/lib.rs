// src/lib.rs
//! Textscape
//!
//! Matcap-shaded 3D text surrounded by randomly scattered spheres, boxes and
//! donuts, rendered with wgpu and winit and tweaked live from an imgui panel.

pub mod app;
pub mod assets;
pub mod config;
pub mod demo;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::TextscapeApp;
pub use config::DemoConfig;
pub use error::{Result, TextscapeError};

/// Creates an application configured from the environment
pub fn default() -> anyhow::Result<TextscapeApp> {
    TextscapeApp::new(DemoConfig::from_env())
}
