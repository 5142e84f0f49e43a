//! # Graphics Module
//!
//! Everything between parsed assets and pixels on screen.
//!
//! - **Camera** ([`camera`]) - Orbit camera with damped rotation and pan
//! - **Typefaces** ([`typeface`]) - Typeface JSON parsing and glyph layout
//! - **Geometry** ([`geometry`]) - Extruded text and primitive shapes
//! - **Scene** ([`scene`]) - Shared geometries and the objects placing them
//! - **Resources** ([`resources`]) - Matcap materials, textures, global uniforms
//! - **Rendering** ([`rendering`]) - Instanced matcap pipeline and frame loop
//!
//! The [`RenderEngine`] draws a [`Scene`] each frame; geometry is uploaded
//! lazily the first time an object using it is drawn.
//!
//! [`Scene`]: scene::Scene

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod typeface;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
