//! Rendering context lifecycle.
//!
//! A [`RenderContext`] walks through three states: built (descriptor
//! populated, nothing native exists), created (native context live and
//! current, GL function pointers loaded, global defaults applied), and
//! terminated (native state destroyed, host framebuffer released).
//! Termination is idempotent and also runs on drop.

use std::sync::Arc;

use glow::HasContext;

use crate::backend::{Backend, OsmesaBackend, WindowedBackend};
use crate::error::Error;
use crate::state::GlState;

/// An extension Mesa advertises when float (X, Y, Z) render targets
/// work; logged in the init banner.
const FLOAT_RENDER_EXTENSION: &str = "GL_ARB_texture_buffer_object_rgb32";

/// Lifecycle state of a [`RenderContext`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Built but not yet initialized.
    Uncreated,
    /// Native context live and current.
    Created,
    /// Native context destroyed.
    Terminated,
}

/// The connection to a rendering device, headless or windowed.
///
/// Exactly one context is assumed live at a time; every
/// [`GlState`] operation implicitly requires that context to be current
/// on the calling thread.
pub struct RenderContext {
    width: u32,
    height: u32,
    offscreen: bool,
    backend: Box<dyn Backend>,
    state: Option<GlState>,
    lifecycle: Lifecycle,
}

impl RenderContext {
    /// Build a headless context descriptor of the given size.
    ///
    /// The `width × height × 4` RGBA8 host framebuffer is allocated
    /// immediately; the native OSMesa context is created by
    /// [`init`](Self::init).
    pub fn offscreen(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            offscreen: true,
            backend: Box::new(OsmesaBackend::new(width, height)),
            state: None,
            lifecycle: Lifecycle::Uncreated,
        }
    }

    /// Build a windowed context descriptor of the given size and window
    /// title.
    pub fn windowed(width: u32, height: u32, title: &str) -> Self {
        Self {
            width,
            height,
            offscreen: false,
            backend: Box::new(WindowedBackend::new(title)),
            state: None,
            lifecycle: Lifecycle::Uncreated,
        }
    }

    /// Create the native context, load GL function pointers, and apply
    /// the global defaults (viewport to the requested size, depth test,
    /// back-face culling, opaque white clear color).
    ///
    /// Calling `init` on an already created context first tears the old
    /// native context down, so no native state or host memory leaks. If
    /// recreation then fails, the context reports
    /// [`Lifecycle::Terminated`], never a stale `Created`.
    ///
    /// # Errors
    ///
    /// [`Error::ContextInit`] if the native context cannot be created
    /// or made current, [`Error::WindowCreation`] if the window cannot
    /// be built (windowed backend), [`Error::ExtensionLoader`] if the
    /// loaded context reports no GL version. Any partially created
    /// native state is torn down before returning.
    pub fn init(&mut self) -> Result<(), Error> {
        if self.lifecycle == Lifecycle::Created {
            log::warn!("init called on a live context; recreating");
            self.state = None;
            self.backend.destroy();
            // The old native context is gone; if recreation fails below,
            // the caller must not still see Created.
            self.lifecycle = Lifecycle::Terminated;
        }

        self.backend.create(self.width, self.height)?;

        let gl = Arc::new(unsafe {
            glow::Context::from_loader_function(|symbol| self.backend.load_symbol(symbol))
        });

        let version = unsafe { gl.get_parameter_string(glow::VERSION) };
        if version.is_empty() {
            self.backend.destroy();
            return Err(Error::ExtensionLoader(
                "loaded context reports no GL version".into(),
            ));
        }
        log::info!("OpenGL version: {version}");
        if gl.supported_extensions().contains(FLOAT_RENDER_EXTENSION) {
            log::info!("float (X, Y, Z) rendering is supported");
        } else {
            log::info!("float (X, Y, Z) rendering not supported");
        }

        // Loader bring-up sometimes leaves a harmless GL_INVALID_ENUM
        // in the error flag even though all is fine.
        let code = unsafe { gl.get_error() };
        if code == glow::INVALID_ENUM {
            log::warn!("swallowing GL_INVALID_ENUM from loader bring-up");
        } else if code != glow::NO_ERROR {
            log::debug!("loader bring-up left error 0x{code:04X}");
        }

        let mut state = GlState::new(gl);
        unsafe {
            state.set_viewport(self.width, self.height);
            state.apply_global_settings();
        }
        self.state = Some(state);
        self.lifecycle = Lifecycle::Created;
        Ok(())
    }

    /// Destroy the native context/window and release the host
    /// framebuffer if one was allocated.
    ///
    /// Safe to call repeatedly, and safe after a failed
    /// [`init`](Self::init).
    pub fn terminate(&mut self) {
        self.state = None;
        self.backend.destroy();
        self.lifecycle = Lifecycle::Terminated;
    }

    /// Requested width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Requested height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether this context renders offscreen into host memory.
    pub fn is_offscreen(&self) -> bool {
        self.offscreen
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The GL state object, present while the context is created.
    pub fn state(&self) -> Option<&GlState> {
        self.state.as_ref()
    }

    /// Mutable GL state object, present while the context is created.
    pub fn state_mut(&mut self) -> Option<&mut GlState> {
        self.state.as_mut()
    }

    /// The host-visible framebuffer the offscreen backend renders into.
    ///
    /// RGBA8, tightly packed, `width × height × 4` bytes, bottom-up row
    /// order as OSMesa writes it. `None` for windowed contexts and
    /// after termination.
    pub fn host_framebuffer(&self) -> Option<&[u8]> {
        self.backend.host_framebuffer()
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        self.terminate();
    }
}
