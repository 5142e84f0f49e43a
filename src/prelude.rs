//! # Textscape Prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use textscape::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = DemoConfig::from_env().with_text("Hi\nthere");
//!     TextscapeApp::new(config)?.run()
//! }
//! ```

// Re-export core application types
pub use crate::app::TextscapeApp;
pub use crate::config::DemoConfig;
pub use crate::error::{Result, TextscapeError};

// Re-export the demo model
pub use crate::demo::{
    Demo, Generator, ParamField, ParameterSet, RegenerationRequest, ShapeKind,
};

// Re-export graphics and scene types
pub use crate::gfx::camera::CameraManager;
pub use crate::gfx::geometry::{
    generate_box, generate_sphere, generate_torus, text::generate_text, text::TextParams,
    GeometryData,
};
pub use crate::gfx::scene::{ObjectId, Scene, Transform};
pub use crate::gfx::typeface::Font;

// Re-export common external dependencies
pub use cgmath::{Vector3, Zero};
