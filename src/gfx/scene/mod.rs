//! # Scene Management Module
//!
//! This module provides the scene container: an object store, a pool of
//! shared geometry and the material manager.
//!
//! ## Key Components
//!
//! - [`Scene`] - The main scene container that manages objects, geometry, camera, and materials
//! - [`Object`] - A mesh instance referencing pooled geometry and a material by id
//! - [`Transform`] - Position, Euler rotation and scale of an object
//! - [`Vertex3D`] - 3D vertex data structure with position and normal
//!
//! ## Usage
//!
//! ```no_run
//! use textscape::gfx::geometry::generate_box;
//! use textscape::gfx::scene::{Object, Scene};
//! # fn demo(scene: &mut Scene) {
//! let cube = scene.add_geometry(&generate_box(0.6, 0.6, 0.6));
//! let id = scene.add_object(Object::new(cube, "default"));
//! assert!(scene.contains(id));
//! # }
//! ```

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{DrawMesh, Mesh, Object, Transform};
pub use scene::{GeometryId, InstanceBatch, ObjectId, Scene, SceneStatistics};
pub use vertex::Vertex3D;
