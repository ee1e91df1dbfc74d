//! Framebuffer management: attaching textures as render targets,
//! declaring draw-buffer sets, and reading rendered pixels back to the
//! host.

use glow::{HasContext, PixelPackData};

use crate::error::Error;
use crate::state::GlState;
use crate::types::Texture;

impl GlState {
    /// Allocate a framebuffer object.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocate`] if the driver refuses the handle.
    pub unsafe fn create_framebuffer(&mut self) -> Result<glow::Framebuffer, Error> {
        unsafe { self.gl().create_framebuffer() }.map_err(Error::Allocate)
    }

    /// Release a framebuffer object.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    pub unsafe fn delete_framebuffer(&mut self, fbo: glow::Framebuffer) {
        unsafe { self.gl().delete_framebuffer(fbo) };
    }

    /// Attach an uploaded texture to a framebuffer at the given
    /// attachment point (e.g. `glow::COLOR_ATTACHMENT0`).
    ///
    /// The framebuffer is bound for the attachment call and unbound
    /// before returning.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotUploaded`] if the texture has no GPU handle,
    /// or [`Error::Gl`] if the driver flags the attachment.
    pub unsafe fn attach_texture(
        &mut self,
        fbo: glow::Framebuffer,
        texture: &Texture<'_>,
        attachment: u32,
    ) -> Result<(), Error> {
        let handle = texture.handle().ok_or(Error::NotUploaded)?;
        unsafe {
            self.set_bound_framebuffer(Some(fbo));
            self.gl().framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                attachment,
                glow::TEXTURE_2D,
                Some(handle),
                0,
            );
            self.set_bound_framebuffer(None);
            self.check_error("framebuffer attachment")
        }
    }

    /// Declare which attachment points of a framebuffer receive draw
    /// output.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Gl`] if the driver flags the declaration.
    pub unsafe fn register_draw_buffers(
        &mut self,
        fbo: glow::Framebuffer,
        attachments: &[u32],
    ) -> Result<(), Error> {
        unsafe {
            self.set_bound_framebuffer(Some(fbo));
            self.gl().draw_buffers(attachments);
            self.set_bound_framebuffer(None);
            self.check_error("draw buffer registration")
        }
    }

    /// Read a texture's pixels back into `dest`.
    ///
    /// Activates the texture's unit, binds the texture, copies the full
    /// mip level 0 into `dest` with the descriptor's format/type, and
    /// restores unit 0.
    ///
    /// Postcondition: [`active_unit`](Self::active_unit) is 0.
    ///
    /// # Safety
    ///
    /// Requires the owning context to be current.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotUploaded`] if the texture has no GPU handle,
    /// or [`Error::Gl`] if the driver flags the readback.
    ///
    /// # Panics
    ///
    /// Panics if `dest.len()` differs from the texture's byte length
    /// (`width × height × bytes_per_texel`).
    pub unsafe fn read_texture(
        &mut self,
        texture: &Texture<'_>,
        dest: &mut [u8],
    ) -> Result<(), Error> {
        assert_eq!(
            dest.len(),
            texture.byte_len(),
            "readback buffer is {} bytes, texture holds {}",
            dest.len(),
            texture.byte_len()
        );
        let handle = texture.handle().ok_or(Error::NotUploaded)?;
        unsafe {
            self.set_active_unit(texture.unit());
            self.gl().bind_texture(glow::TEXTURE_2D, Some(handle));
            self.gl().get_tex_image(
                glow::TEXTURE_2D,
                0,
                texture.format().gl_format(),
                texture.format().gl_type(),
                PixelPackData::Slice(Some(dest)),
            );
            self.set_active_unit(0);
            self.check_error("texture readback")
        }
    }
}
