//! The explicit "current binding" GL state object.
//!
//! OpenGL is a global state machine: the active texture unit, the bound
//! vertex array, and the bound framebuffer are ambient driver state.
//! [`GlState`] owns the [`glow`] context and shadows those three
//! bindings, so the invariants the binder relies on ("unit 0 is
//! restored before returning", "no VAO is left bound after mesh
//! assembly") are inspectable postconditions rather than folklore.

use std::sync::Arc;

use glow::HasContext;

use crate::error::Error;

/// Convert a `u32` to `i32` for GL API calls.
///
/// # Panics
///
/// Panics if `value > i32::MAX`. Unreachable for normal viewport and
/// texture dimensions.
pub(crate) fn gl_size(value: u32) -> i32 {
    i32::try_from(value).expect("dimension exceeds i32::MAX")
}

/// Convert a `usize` length to `i32` for GL API calls.
///
/// # Panics
///
/// Panics if `value > i32::MAX`.
pub(crate) fn gl_len(value: usize) -> i32 {
    i32::try_from(value).expect("length exceeds i32::MAX")
}

/// The GL context plus shadowed binding state, threaded through every
/// binder, framebuffer, and readback call.
///
/// One `GlState` exists per live [`RenderContext`](crate::RenderContext)
/// and assumes that context is current on the calling thread for the
/// whole of its life.
pub struct GlState {
    gl: Arc<glow::Context>,
    active_unit: u32,
    bound_vertex_array: Option<glow::VertexArray>,
    bound_framebuffer: Option<glow::Framebuffer>,
}

impl GlState {
    pub(crate) fn new(gl: Arc<glow::Context>) -> Self {
        Self {
            gl,
            active_unit: 0,
            bound_vertex_array: None,
            bound_framebuffer: None,
        }
    }

    /// The underlying [`glow`] context, for issuing draw calls and any
    /// other GL work outside this crate's scope.
    ///
    /// Raw calls made through this handle bypass the binding shadow;
    /// restore any unit/VAO/framebuffer bindings you change.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// The texture unit this state last activated.
    pub fn active_unit(&self) -> u32 {
        self.active_unit
    }

    /// The vertex array this state last bound, if any.
    pub fn bound_vertex_array(&self) -> Option<glow::VertexArray> {
        self.bound_vertex_array
    }

    /// The framebuffer this state last bound, if any.
    pub fn bound_framebuffer(&self) -> Option<glow::Framebuffer> {
        self.bound_framebuffer
    }

    /// Activate a texture unit, shadowing the change.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    pub(crate) unsafe fn set_active_unit(&mut self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
        self.active_unit = unit;
    }

    /// Bind (or unbind) a vertex array, shadowing the change.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    pub(crate) unsafe fn set_bound_vertex_array(&mut self, vao: Option<glow::VertexArray>) {
        unsafe { self.gl.bind_vertex_array(vao) };
        self.bound_vertex_array = vao;
    }

    /// Bind (or unbind) a framebuffer, shadowing the change.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    pub(crate) unsafe fn set_bound_framebuffer(&mut self, fbo: Option<glow::Framebuffer>) {
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, fbo) };
        self.bound_framebuffer = fbo;
    }

    /// Query the driver's sticky error flag; any non-success code
    /// becomes [`Error::Gl`] tagged with `op`.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Gl`] if the driver reports anything other than
    /// `GL_NO_ERROR`.
    pub unsafe fn check_error(&self, op: &'static str) -> Result<(), Error> {
        let code = unsafe { self.gl.get_error() };
        if code == glow::NO_ERROR {
            Ok(())
        } else {
            Err(Error::Gl { op, code })
        }
    }

    /// Apply the global rendering defaults: depth test on with
    /// less-or-equal comparison, back-face culling on, clear color
    /// opaque white.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    pub unsafe fn apply_global_settings(&mut self) {
        let gl = &self.gl;
        unsafe {
            gl.enable(glow::DEPTH_TEST);
            gl.enable(glow::CULL_FACE);
            gl.cull_face(glow::BACK);
            gl.depth_func(glow::LEQUAL);
            gl.clear_color(1.0, 1.0, 1.0, 0.0);
        }
    }

    /// Set the clear color.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    pub unsafe fn set_clear_color(&mut self, [r, g, b, a]: [f32; 4]) {
        unsafe { self.gl.clear_color(r, g, b, a) };
    }

    /// Read the current clear color back from the driver.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    pub unsafe fn clear_color(&self) -> [f32; 4] {
        let mut color = [0.0; 4];
        unsafe {
            self.gl
                .get_parameter_f32_slice(glow::COLOR_CLEAR_VALUE, &mut color);
        }
        color
    }

    /// Set the viewport to cover `width × height` from the origin.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    pub(crate) unsafe fn set_viewport(&mut self, width: u32, height: u32) {
        unsafe { self.gl.viewport(0, 0, gl_size(width), gl_size(height)) };
    }
}
