//! Error type for context lifecycle and GL resource operations.
//!
//! The driver's error model is unified into a single enum: context
//! lifecycle failures carry a diagnostic message, and GL-call failures
//! carry the raw `glGetError` code plus the operation that triggered it.
//! Nothing in this crate terminates the process; every failure is
//! propagated so the caller decides what to do.

use thiserror::Error;

/// Any failure raised by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The native rendering context could not be created or made current.
    #[error("context initialization failed: {0}")]
    ContextInit(String),

    /// The native window could not be created (windowed backend only).
    #[error("window creation failed: {0}")]
    WindowCreation(String),

    /// The GL function loader could not be brought up, or loaded a
    /// context that reports no GL version.
    #[error("extension loader failed: {0}")]
    ExtensionLoader(String),

    /// The driver reported an error code after a GL call.
    ///
    /// `op` names the operation that was being performed; `code` is the
    /// raw `glGetError` value.
    #[error("GL error 0x{code:04X} during {op}")]
    Gl {
        /// The operation that was being performed.
        op: &'static str,
        /// The raw `glGetError` code.
        code: u32,
    },

    /// A GL object handle (buffer, texture, sampler, VAO, framebuffer)
    /// could not be allocated.
    #[error("failed to allocate GL object: {0}")]
    Allocate(String),

    /// An operation needed a GPU handle that was never uploaded.
    #[error("resource has not been uploaded to the GPU")]
    NotUploaded,
}
