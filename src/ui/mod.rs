//! # User Interface Module
//!
//! Dear ImGui integration and the parameter panel.
//!
//! ## Key Components
//!
//! - [`UiManager`] - ImGui context, winit platform glue and the wgpu renderer
//! - [`parameter_panel`] - Widgets bound to the demo's [`ParameterSet`]
//!
//! ## Input Handling
//!
//! When the UI wants the mouse or keyboard, camera controls are skipped so
//! dragging a slider does not orbit the view.
//!
//! [`ParameterSet`]: crate::demo::ParameterSet

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{parameter_panel, PanelStatus};
