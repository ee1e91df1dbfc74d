//! OpenGL bindings for rasterizing textured 3D meshes via [glow].
//!
//! This crate is a thin binding layer: it creates a rendering context
//! (a headless OSMesa software rasterizer or a glutin window), uploads
//! mesh geometry and texture data to the GPU, and reads rendered pixels
//! back into host memory. Shader compilation and draw-call issuance are
//! deliberately left to the caller, through the raw context exposed by
//! [`GlState::gl`].
//!
//! # Overview
//!
//! - Build descriptors over host data: [`VectorSet`], [`Texture`],
//!   [`TexturedMesh`].
//! - Create and initialize a [`RenderContext`] (offscreen or windowed).
//! - Upload the descriptors through the context's [`GlState`], which
//!   tracks the ambient GL bindings (active texture unit, bound VAO,
//!   bound framebuffer) so its postconditions are inspectable.
//! - Attach a target texture to a framebuffer, draw (caller's code),
//!   then read the result back with [`GlState::read_texture`] — or,
//!   offscreen, straight from [`RenderContext::host_framebuffer`].
//!
//! # Example
//!
//! ```no_run
//! use mesh_raster_glow::{RenderContext, TexturedMesh};
//!
//! # fn example() -> Result<(), mesh_raster_glow::Error> {
//! let mut context = RenderContext::offscreen(256, 256);
//! context.init()?;
//!
//! # let (vertices, normals, f3v) = ([0.0f32; 9], [0.0f32; 9], [0.0f32; 9]);
//! # let (tcoords, trilist, pixels) = ([0.0f32; 6], [0u32, 1, 2], vec![0u8; 16 * 16 * 3]);
//! let mut mesh = TexturedMesh::f3_rgb_u8(
//!     &vertices, &normals, &f3v, &tcoords, &trilist, &pixels, 1, 16, 16,
//! );
//!
//! let state = context.state_mut().expect("context is live");
//! unsafe {
//!     state.upload_mesh(&mut mesh)?;
//!     state.upload_texture(&mut mesh.texture)?;
//! }
//! // ... bind shaders and draw through state.gl() ...
//! # Ok(())
//! # }
//! ```
//!
//! # Safety
//!
//! Every GL-issuing method is `unsafe`: it requires the owning
//! [`RenderContext`] to be current on the calling thread. The crate is
//! single-threaded by contract — no GPU handle or host buffer is ever
//! shared across threads.
//!
//! [glow]: https://docs.rs/glow

mod backend;
mod binder;
mod context;
mod error;
mod framebuffer;
pub mod math;
mod state;
mod types;

pub use binder::{F3V_ATTRIB, NORMAL_ATTRIB, TCOORD_ATTRIB, VERTEX_ATTRIB};
pub use context::{Lifecycle, RenderContext};
pub use error::Error;
pub use state::GlState;
pub use types::{PixelFormat, Scalar, Texture, TexturedMesh, VectorSet};
