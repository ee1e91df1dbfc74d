//! The GL resource binder: materializes descriptors as live GPU
//! objects.
//!
//! Buffer uploads configure vertex attributes in place, texture uploads
//! leave a fully configured texture unit behind, and mesh assembly
//! wraps the five per-mesh buffers in a single VAO. Every operation
//! restores the ambient bindings it disturbs: the active unit returns
//! to 0 and the VAO is left unbound.

use glow::{HasContext, PixelUnpackData};

use crate::error::Error;
use crate::state::{gl_len, gl_size, GlState};
use crate::types::{Texture, TexturedMesh, VectorSet};

/// Attribute slot for vertex positions.
pub const VERTEX_ATTRIB: u32 = 0;
/// Attribute slot for normals.
pub const NORMAL_ATTRIB: u32 = 1;
/// Attribute slot for the opaque per-vertex float3 data.
pub const F3V_ATTRIB: u32 = 2;
/// Attribute slot for texture coordinates.
pub const TCOORD_ATTRIB: u32 = 3;

impl GlState {
    /// Upload a vector set as a vertex attribute buffer.
    ///
    /// Allocates one buffer object, uploads the full
    /// `stride × n_vectors` byte range as `STATIC_DRAW`, then enables
    /// `attribute` and points it at the buffer with the set's
    /// dimensionality and datatype. The buffer handle is stored back on
    /// the descriptor.
    ///
    /// Must be called with the target VAO bound; the attribute
    /// configuration is captured by it.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocate`] if the buffer cannot be created, or
    /// [`Error::Gl`] if the driver flags the upload.
    pub unsafe fn upload_array_buffer(
        &mut self,
        set: &mut VectorSet<'_>,
        attribute: u32,
    ) -> Result<(), Error> {
        let gl = self.gl();
        unsafe {
            let buffer = gl.create_buffer().map_err(Error::Allocate)?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, set.as_bytes(), glow::STATIC_DRAW);
            gl.enable_vertex_attrib_array(attribute);
            gl.vertex_attrib_pointer_f32(
                attribute,
                gl_len(set.n_dims()),
                set.scalar().gl_type(),
                false,
                0,
                0,
            );
            set.buffer = Some(buffer);
        }
        unsafe { self.check_error("array buffer upload") }
    }

    /// Upload a vector set as an element (index) buffer.
    ///
    /// Same upload as [`upload_array_buffer`](Self::upload_array_buffer)
    /// but against `ELEMENT_ARRAY_BUFFER`, with no attribute
    /// configuration.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocate`] if the buffer cannot be created, or
    /// [`Error::Gl`] if the driver flags the upload.
    pub unsafe fn upload_element_buffer(&mut self, set: &mut VectorSet<'_>) -> Result<(), Error> {
        let gl = self.gl();
        unsafe {
            let buffer = gl.create_buffer().map_err(Error::Allocate)?;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffer));
            gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, set.as_bytes(), glow::STATIC_DRAW);
            set.buffer = Some(buffer);
        }
        unsafe { self.check_error("element buffer upload") }
    }

    /// Upload a texture and configure its unit.
    ///
    /// Activates the descriptor's texture unit, allocates and fills a
    /// texture object with the descriptor's format triple, then
    /// allocates a nearest-neighbor clamp-to-edge sampler and binds it
    /// to the same unit. Unit 0 is restored before returning, leaving
    /// the configured unit's bind state intact: before drawing, the
    /// caller only reactivates the unit, it never re-specifies sampler
    /// parameters.
    ///
    /// Postcondition: [`active_unit`](Self::active_unit) is 0, on both
    /// the success and the error path.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocate`] if the texture or sampler cannot be
    /// created, or [`Error::Gl`] if the driver flags the pixel upload.
    pub unsafe fn upload_texture(&mut self, texture: &mut Texture<'_>) -> Result<(), Error> {
        log::debug!(
            "uploading {}x{} {:?} texture to unit {}",
            texture.width(),
            texture.height(),
            texture.format(),
            texture.unit()
        );

        unsafe { self.set_active_unit(texture.unit()) };
        let filled = unsafe { self.fill_texture_unit(texture) };

        // Leave the unit's texture + sampler binds untouched; only the
        // active unit selector goes back to 0. This happens whether or
        // not the fill succeeded.
        unsafe {
            self.set_active_unit(0);
            self.gl().bind_texture(glow::TEXTURE_2D, None);
        }
        filled?;
        unsafe { self.check_error("sampler setup") }
    }

    /// Fill the currently active unit: allocate the texture object,
    /// upload pixels, allocate and bind the sampler. The caller owns
    /// restoring unit 0.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    unsafe fn fill_texture_unit(&mut self, texture: &mut Texture<'_>) -> Result<(), Error> {
        let gl = self.gl();
        unsafe {
            let handle = gl.create_texture().map_err(Error::Allocate)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(handle));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                texture.format().gl_internal_format(),
                gl_size(texture.width()),
                gl_size(texture.height()),
                0,
                texture.format().gl_format(),
                texture.format().gl_type(),
                PixelUnpackData::Slice(Some(texture.pixels())),
            );
            texture.handle = Some(handle);
        }
        unsafe { self.check_error("texture upload") }?;

        // GL constant values are small enough that the cast is always safe.
        #[expect(clippy::cast_possible_wrap)]
        unsafe {
            let gl = self.gl();
            let sampler = gl.create_sampler().map_err(Error::Allocate)?;
            gl.sampler_parameter_i32(sampler, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
            gl.sampler_parameter_i32(sampler, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
            gl.sampler_parameter_i32(sampler, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.sampler_parameter_i32(sampler, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            gl.bind_sampler(texture.unit(), Some(sampler));
            texture.sampler = Some(sampler);
        }
        Ok(())
    }

    /// Assemble a mesh's GPU state: one VAO wrapping four attribute
    /// buffers and one element buffer.
    ///
    /// Attribute slots are fixed: vertices 0, normals 1, f3v 2,
    /// tcoords 3. The trilist uploads as the element buffer. The VAO is
    /// unbound before returning; rendering only needs the VAO rebound.
    ///
    /// The mesh's texture is not touched here; upload it separately
    /// with [`upload_texture`](Self::upload_texture).
    ///
    /// Postcondition: [`bound_vertex_array`](Self::bound_vertex_array)
    /// is `None`.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    ///
    /// # Errors
    ///
    /// Returns the first allocation or driver error encountered. There
    /// is no partial-failure recovery: buffers uploaded before the
    /// failure keep their handles, and
    /// [`destroy_mesh`](Self::destroy_mesh) releases whatever exists.
    pub unsafe fn upload_mesh(&mut self, mesh: &mut TexturedMesh<'_>) -> Result<(), Error> {
        log::debug!(
            "assembling mesh: {} points, {} triangles",
            mesh.vertices.n_vectors(),
            mesh.trilist.n_vectors()
        );

        let vao = unsafe { self.gl().create_vertex_array() }.map_err(Error::Allocate)?;
        unsafe {
            self.set_bound_vertex_array(Some(vao));
            mesh.vao = Some(vao);

            self.upload_array_buffer(&mut mesh.vertices, VERTEX_ATTRIB)?;
            self.upload_array_buffer(&mut mesh.normals, NORMAL_ATTRIB)?;
            self.upload_array_buffer(&mut mesh.f3v, F3V_ATTRIB)?;
            self.upload_array_buffer(&mut mesh.tcoords, TCOORD_ATTRIB)?;
            self.upload_element_buffer(&mut mesh.trilist)?;

            self.set_bound_vertex_array(None);
        }
        unsafe { self.check_error("mesh assembly") }
    }

    /// Release a mesh's GPU state: the five buffers, then the VAO.
    ///
    /// Handles are taken out of the descriptors, so calling this twice
    /// is a no-op the second time. The texture is released separately
    /// by [`destroy_texture`](Self::destroy_texture).
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    pub unsafe fn destroy_mesh(&mut self, mesh: &mut TexturedMesh<'_>) {
        unsafe { self.set_bound_vertex_array(None) };
        let gl = self.gl();
        for set in [
            &mut mesh.vertices,
            &mut mesh.normals,
            &mut mesh.f3v,
            &mut mesh.tcoords,
            &mut mesh.trilist,
        ] {
            if let Some(buffer) = set.buffer.take() {
                unsafe { gl.delete_buffer(buffer) };
            }
        }
        if let Some(vao) = mesh.vao.take() {
            unsafe { gl.delete_vertex_array(vao) };
        }
    }

    /// Release a texture's GPU handle and sampler.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    pub unsafe fn destroy_texture(&mut self, texture: &mut Texture<'_>) {
        log::debug!("destroying texture on unit {}", texture.unit());
        let gl = self.gl();
        if let Some(handle) = texture.handle.take() {
            unsafe { gl.delete_texture(handle) };
        }
        if let Some(sampler) = texture.sampler.take() {
            unsafe { gl.delete_sampler(sampler) };
        }
    }
}
