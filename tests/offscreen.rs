//! Integration tests against a live headless context.
//!
//! These need `libOSMesa` loadable at runtime, so they are `#[ignore]`d
//! by default. Run them with:
//!
//! ```sh
//! cargo test --test offscreen -- --ignored --test-threads=1
//! ```

#![allow(clippy::unwrap_used)]

use glow::HasContext;
use mesh_raster_glow::{Error, Lifecycle, RenderContext, Texture, TexturedMesh};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn live_context(width: u32, height: u32) -> RenderContext {
    let mut context = RenderContext::offscreen(width, height);
    context.init().expect("offscreen init failed");
    context
}

/// A minimal one-triangle mesh over borrowed slices.
struct MeshData {
    vertices: [f32; 9],
    f3v: [f32; 9],
    tcoords: [f32; 6],
    trilist: [u32; 3],
    pixels: Vec<u8>,
}

impl MeshData {
    fn new() -> Self {
        Self {
            vertices: [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            f3v: [0.0; 9],
            tcoords: [0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            trilist: [0, 1, 2],
            pixels: vec![128; 8 * 8 * 3],
        }
    }

    fn mesh(&self) -> TexturedMesh<'_> {
        TexturedMesh::f3_rgb_u8(
            &self.vertices,
            &self.vertices,
            &self.f3v,
            &self.tcoords,
            &self.trilist,
            &self.pixels,
            1,
            8,
            8,
        )
    }
}

#[test]
#[ignore = "requires libOSMesa at runtime"]
fn offscreen_init_succeeds_at_256x256() {
    init_logging();
    let context = live_context(256, 256);
    assert_eq!(context.lifecycle(), Lifecycle::Created);
    assert!(context.state().is_some());
    assert_eq!(context.host_framebuffer().unwrap().len(), 256 * 256 * 4);
}

#[test]
#[ignore = "requires libOSMesa at runtime"]
fn double_init_recreates_without_leaking() {
    init_logging();
    let mut context = live_context(64, 64);
    context.init().expect("second init failed");
    assert_eq!(context.lifecycle(), Lifecycle::Created);
    assert_eq!(context.host_framebuffer().unwrap().len(), 64 * 64 * 4);
}

#[test]
#[ignore = "requires libOSMesa at runtime"]
fn clear_color_round_trips_through_the_driver() {
    init_logging();
    let mut context = live_context(32, 32);
    let state = context.state_mut().unwrap();
    unsafe {
        state.set_clear_color([0.25, 0.5, 0.75, 1.0]);
        let [r, g, b, a] = state.clear_color();
        assert!((r - 0.25).abs() < 1e-6);
        assert!((g - 0.5).abs() < 1e-6);
        assert!((b - 0.75).abs() < 1e-6);
        assert!((a - 1.0).abs() < 1e-6);
    }
}

#[test]
#[ignore = "requires libOSMesa at runtime"]
fn clearing_to_red_fills_the_host_framebuffer() {
    init_logging();
    let mut context = live_context(16, 16);
    {
        let state = context.state_mut().unwrap();
        unsafe {
            state.set_clear_color([1.0, 0.0, 0.0, 1.0]);
            state
                .gl()
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            state.gl().finish();
        }
    }
    let pixels = context.host_framebuffer().unwrap();
    for texel in pixels.chunks_exact(4) {
        assert_eq!(texel, [255, 0, 0, 255]);
    }
}

#[test]
#[ignore = "requires libOSMesa at runtime"]
fn mesh_assembly_allocates_handles_and_restores_bindings() {
    init_logging();
    let mut context = live_context(64, 64);
    let data = MeshData::new();
    let mut mesh = data.mesh();

    let state = context.state_mut().unwrap();
    unsafe {
        state.upload_mesh(&mut mesh).unwrap();
        state.upload_texture(&mut mesh.texture).unwrap();
    }

    assert!(mesh.vao().is_some());
    let buffers = [
        mesh.vertices.buffer().unwrap(),
        mesh.normals.buffer().unwrap(),
        mesh.f3v.buffer().unwrap(),
        mesh.tcoords.buffer().unwrap(),
        mesh.trilist.buffer().unwrap(),
    ];
    for (i, a) in buffers.iter().enumerate() {
        for b in &buffers[i + 1..] {
            assert_ne!(a, b, "buffer handles must be distinct");
        }
    }

    // Shadowed state and real driver state both show the postconditions.
    assert!(state.bound_vertex_array().is_none());
    assert_eq!(state.active_unit(), 0);
    unsafe {
        assert_eq!(state.gl().get_parameter_i32(glow::VERTEX_ARRAY_BINDING), 0);
        let active = state.gl().get_parameter_i32(glow::ACTIVE_TEXTURE);
        assert_eq!(u32::try_from(active).unwrap(), glow::TEXTURE0);
    }

    unsafe {
        state.destroy_texture(&mut mesh.texture);
        state.destroy_mesh(&mut mesh);
    }
    assert!(mesh.vao().is_none());
    assert!(mesh.vertices.buffer().is_none());
}

#[test]
#[ignore = "requires libOSMesa at runtime"]
fn texture_readback_returns_the_uploaded_pixels() {
    init_logging();
    let mut context = live_context(32, 32);
    let pixels: Vec<u8> = (0..u8::try_from(4 * 4 * 4).unwrap()).collect();
    let mut texture = Texture::rgba_u8(2, &pixels, 4, 4);

    let state = context.state_mut().unwrap();
    let mut read_back = vec![0_u8; pixels.len()];
    unsafe {
        state.upload_texture(&mut texture).unwrap();
        state.read_texture(&texture, &mut read_back).unwrap();
    }
    assert_eq!(read_back, pixels);
    assert_eq!(state.active_unit(), 0);

    unsafe { state.destroy_texture(&mut texture) };
}

#[test]
#[ignore = "requires libOSMesa at runtime"]
fn framebuffer_attachment_and_draw_buffers_pass_error_checks() {
    init_logging();
    let mut context = live_context(64, 64);
    let pixels = vec![0_u8; 64 * 64 * 4];
    let mut target = Texture::rgba_u8(3, &pixels, 64, 64);

    let state = context.state_mut().unwrap();
    unsafe {
        state.upload_texture(&mut target).unwrap();
        let fbo = state.create_framebuffer().unwrap();
        state
            .attach_texture(fbo, &target, glow::COLOR_ATTACHMENT0)
            .unwrap();
        state
            .register_draw_buffers(fbo, &[glow::COLOR_ATTACHMENT0])
            .unwrap();
        assert!(state.bound_framebuffer().is_none());
        state.delete_framebuffer(fbo);
        state.destroy_texture(&mut target);
    }
}

#[test]
#[ignore = "requires libOSMesa at runtime"]
fn clearing_an_attached_framebuffer_shows_up_in_readback() {
    init_logging();
    let mut context = live_context(32, 32);
    let pixels = vec![0_u8; 16 * 16 * 4];
    let mut target = Texture::rgba_u8(2, &pixels, 16, 16);

    let state = context.state_mut().unwrap();
    unsafe {
        state.upload_texture(&mut target).unwrap();
        let fbo = state.create_framebuffer().unwrap();
        state
            .attach_texture(fbo, &target, glow::COLOR_ATTACHMENT0)
            .unwrap();
        state
            .register_draw_buffers(fbo, &[glow::COLOR_ATTACHMENT0])
            .unwrap();

        state.gl().bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
        state.set_clear_color([0.0, 1.0, 0.0, 1.0]);
        state.gl().clear(glow::COLOR_BUFFER_BIT);
        state.gl().bind_framebuffer(glow::FRAMEBUFFER, None);
        state.gl().finish();

        let mut read_back = vec![0_u8; pixels.len()];
        state.read_texture(&target, &mut read_back).unwrap();
        for texel in read_back.chunks_exact(4) {
            assert_eq!(texel, [0, 255, 0, 255]);
        }

        state.delete_framebuffer(fbo);
        state.destroy_texture(&mut target);
    }
}

#[test]
#[ignore = "requires libOSMesa at runtime"]
fn failed_texture_upload_still_restores_unit_zero() {
    init_logging();
    let mut context = live_context(32, 32);
    let pixels = vec![0_u8; 4 * 4 * 4];
    let mut texture = Texture::rgba_u8(2, &pixels, 4, 4);

    let state = context.state_mut().unwrap();
    unsafe {
        // GL_TEXTURE_2D is not a valid glEnable cap in a core profile;
        // the stale GL_INVALID_ENUM makes the upload's error check bail.
        state.gl().enable(glow::TEXTURE_2D);
        let err = state.upload_texture(&mut texture).unwrap_err();
        assert!(matches!(
            err,
            Error::Gl {
                op: "texture upload",
                ..
            }
        ));
        assert_eq!(state.active_unit(), 0);
        let active = state.gl().get_parameter_i32(glow::ACTIVE_TEXTURE);
        assert_eq!(u32::try_from(active).unwrap(), glow::TEXTURE0);

        // The descriptor kept its handle; release it.
        state.destroy_texture(&mut texture);
    }
}

#[test]
#[ignore = "requires libOSMesa at runtime"]
fn terminate_is_idempotent_on_a_live_context() {
    init_logging();
    let mut context = live_context(32, 32);
    context.terminate();
    assert_eq!(context.lifecycle(), Lifecycle::Terminated);
    assert!(context.host_framebuffer().is_none());
    assert!(context.state().is_none());
    context.terminate();
    assert_eq!(context.lifecycle(), Lifecycle::Terminated);
}
