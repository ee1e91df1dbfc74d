//! Native rendering backends: one capability, two implementations.
//!
//! [`OsmesaBackend`] drives Mesa's software rasterizer and renders
//! straight into a host-owned RGBA8 buffer; [`WindowedBackend`] creates
//! a real window with a hardware context via glutin. The backend is
//! chosen when the [`RenderContext`](crate::RenderContext) is built and
//! never switches at runtime.

use std::ffi::CString;
use std::os::raw::{c_int, c_void};
use std::ptr;

use glutin::dpi::PhysicalSize;
use glutin::event_loop::EventLoop;
use glutin::window::WindowBuilder;
use glutin::{Api, ContextBuilder, GlProfile, GlRequest, PossiblyCurrent, WindowedContext};

use crate::error::Error;

/// A native context provider: create/make-current, symbol resolution,
/// and teardown.
///
/// Implementations hold raw native handles and are deliberately not
/// `Send`; the whole crate is single-threaded by contract.
pub(crate) trait Backend {
    /// Create the native context and make it current on this thread.
    ///
    /// On failure, any partially created native state is torn down
    /// before the error is returned.
    fn create(&mut self, width: u32, height: u32) -> Result<(), Error>;

    /// Resolve a GL symbol. Returns null when no context is live.
    fn load_symbol(&self, symbol: &str) -> *const c_void;

    /// Whether a native context is currently live.
    fn is_created(&self) -> bool;

    /// Destroy the native context and release any owned host memory.
    /// Must be safe to call repeatedly and after a failed `create`.
    fn destroy(&mut self);

    /// The host-visible framebuffer, for backends that render into host
    /// memory. `None` for windowed backends or after teardown.
    fn host_framebuffer(&self) -> Option<&[u8]>;
}

/// Headless software backend: an OSMesa core-profile context bound
/// directly to a host-owned `width × height × 4` RGBA8 buffer.
pub(crate) struct OsmesaBackend {
    context: osmesa_sys::OSMesaContext,
    buffer: Vec<u8>,
}

impl OsmesaBackend {
    /// Build the backend descriptor, allocating the host framebuffer up
    /// front.
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            context: ptr::null_mut(),
            buffer: vec![0; width as usize * height as usize * 4],
        }
    }
}

impl Backend for OsmesaBackend {
    fn create(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if let Err(err) = osmesa_sys::OsMesa::try_loading() {
            return Err(Error::ContextInit(format!(
                "could not load libOSMesa: {err:?}"
            )));
        }

        // Re-init after terminate reallocates the released buffer.
        let needed = width as usize * height as usize * 4;
        if self.buffer.len() != needed {
            self.buffer = vec![0; needed];
        }

        // Core profile 3.3, 16-bit depth, 8-bit stencil, RGBA color.
        #[expect(clippy::cast_possible_wrap)]
        let attribs = [
            osmesa_sys::OSMESA_PROFILE,
            osmesa_sys::OSMESA_CORE_PROFILE,
            osmesa_sys::OSMESA_CONTEXT_MAJOR_VERSION,
            3,
            osmesa_sys::OSMESA_CONTEXT_MINOR_VERSION,
            3,
            osmesa_sys::OSMESA_DEPTH_BITS,
            16,
            osmesa_sys::OSMESA_STENCIL_BITS,
            8,
            osmesa_sys::OSMESA_FORMAT,
            osmesa_sys::OSMESA_RGBA as c_int,
            0,
        ];

        let context =
            unsafe { osmesa_sys::OSMesaCreateContextAttribs(attribs.as_ptr(), ptr::null_mut()) };
        if context.is_null() {
            self.destroy();
            return Err(Error::ContextInit(
                "OSMesaCreateContextAttribs returned null".into(),
            ));
        }
        self.context = context;

        let made_current = unsafe {
            osmesa_sys::OSMesaMakeCurrent(
                self.context,
                self.buffer.as_mut_ptr().cast::<c_void>(),
                glow::UNSIGNED_BYTE,
                gl_int(width),
                gl_int(height),
            )
        };
        if made_current != 1 {
            self.destroy();
            return Err(Error::ContextInit("OSMesaMakeCurrent failed".into()));
        }
        Ok(())
    }

    fn load_symbol(&self, symbol: &str) -> *const c_void {
        if self.context.is_null() {
            return ptr::null();
        }
        let Ok(name) = CString::new(symbol) else {
            return ptr::null();
        };
        match unsafe { osmesa_sys::OSMesaGetProcAddress(name.as_ptr()) } {
            Some(f) => f as *const c_void,
            None => ptr::null(),
        }
    }

    fn is_created(&self) -> bool {
        !self.context.is_null()
    }

    fn destroy(&mut self) {
        if !self.context.is_null() {
            unsafe { osmesa_sys::OSMesaDestroyContext(self.context) };
            self.context = ptr::null_mut();
        }
        self.buffer = Vec::new();
    }

    fn host_framebuffer(&self) -> Option<&[u8]> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(&self.buffer)
        }
    }
}

/// Windowed hardware backend via glutin: a visible window with a core
/// profile 3.3 context.
pub(crate) struct WindowedBackend {
    title: String,
    event_loop: Option<EventLoop<()>>,
    context: Option<WindowedContext<PossiblyCurrent>>,
}

impl WindowedBackend {
    pub(crate) fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            event_loop: None,
            context: None,
        }
    }
}

impl Backend for WindowedBackend {
    fn create(&mut self, width: u32, height: u32) -> Result<(), Error> {
        // The event loop survives terminate/init cycles; winit only
        // supports creating it once, on the main thread.
        let event_loop = self.event_loop.get_or_insert_with(EventLoop::new);

        let window = WindowBuilder::new()
            .with_title(&self.title)
            .with_inner_size(PhysicalSize::new(width, height))
            .with_visible(true);

        let context = ContextBuilder::new()
            .with_gl(GlRequest::Specific(Api::OpenGl, (3, 3)))
            .with_gl_profile(GlProfile::Core)
            .with_depth_buffer(16)
            .with_stencil_buffer(8)
            .build_windowed(window, event_loop)
            .map_err(|err| Error::WindowCreation(err.to_string()))?;

        match unsafe { context.make_current() } {
            Ok(current) => {
                self.context = Some(current);
                Ok(())
            }
            Err((_, err)) => Err(Error::ContextInit(err.to_string())),
        }
    }

    fn load_symbol(&self, symbol: &str) -> *const c_void {
        self.context
            .as_ref()
            .map_or(ptr::null(), |context| context.get_proc_address(symbol))
    }

    fn is_created(&self) -> bool {
        self.context.is_some()
    }

    fn destroy(&mut self) {
        // Dropping the windowed context destroys the GL context and the
        // window with it.
        self.context = None;
    }

    fn host_framebuffer(&self) -> Option<&[u8]> {
        None
    }
}

/// # Panics
///
/// Panics if `value > i32::MAX`.
fn gl_int(value: u32) -> c_int {
    c_int::try_from(value).expect("dimension exceeds i32::MAX")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{Backend, OsmesaBackend};

    #[test]
    fn offscreen_host_buffer_allocated_up_front() {
        let backend = OsmesaBackend::new(4, 3);
        assert_eq!(backend.host_framebuffer().unwrap().len(), 4 * 3 * 4);
        assert!(!backend.is_created());
    }

    #[test]
    fn destroy_without_create_is_a_no_op() {
        let mut backend = OsmesaBackend::new(2, 2);
        backend.destroy();
        backend.destroy();
        assert!(backend.host_framebuffer().is_none());
        assert!(!backend.is_created());
    }

    #[test]
    fn symbols_resolve_to_null_without_a_context() {
        let backend = OsmesaBackend::new(2, 2);
        assert!(backend.load_symbol("glGetString").is_null());
    }
}
