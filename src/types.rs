//! Resource descriptors: host-side records describing textures, vector
//! sets, and textured meshes before (and after) GPU upload.
//!
//! Descriptors borrow the caller's data; nothing is copied until the
//! corresponding upload call on [`GlState`](crate::GlState). Each
//! descriptor holds the GPU handles produced by its upload so that the
//! matching destroy call can release them.

use bytemuck::Pod;

/// Scalar element type of a [`VectorSet`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Scalar {
    /// 32-bit float (`GL_FLOAT`).
    F32,
    /// 64-bit float (`GL_DOUBLE`).
    F64,
    /// 32-bit unsigned integer (`GL_UNSIGNED_INT`).
    U32,
}

impl Scalar {
    /// Size of one scalar element in bytes.
    pub fn size(self) -> usize {
        match self {
            Scalar::F32 | Scalar::U32 => 4,
            Scalar::F64 => 8,
        }
    }

    /// The GL datatype tag for vertex attribute configuration.
    pub(crate) fn gl_type(self) -> u32 {
        match self {
            Scalar::F32 => glow::FLOAT,
            Scalar::F64 => glow::DOUBLE,
            Scalar::U32 => glow::UNSIGNED_INT,
        }
    }
}

/// Pixel layout of a [`Texture`]: channel count × element type.
///
/// Each variant fixes the full GL format triple (internal storage
/// format, channel format, element type) so the three can never drift
/// apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 3 × 8-bit unsigned channels (`GL_RGB8`).
    RgbU8,
    /// 4 × 8-bit unsigned channels (`GL_RGBA8`).
    RgbaU8,
    /// 3 × 32-bit float channels (`GL_RGB32F`).
    RgbF32,
    /// 4 × 32-bit float channels (`GL_RGBA32F`).
    RgbaF32,
}

impl PixelFormat {
    /// Number of channels per texel.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::RgbU8 | PixelFormat::RgbF32 => 3,
            PixelFormat::RgbaU8 | PixelFormat::RgbaF32 => 4,
        }
    }

    /// Bytes per channel element.
    pub fn bytes_per_channel(self) -> usize {
        match self {
            PixelFormat::RgbU8 | PixelFormat::RgbaU8 => 1,
            PixelFormat::RgbF32 | PixelFormat::RgbaF32 => 4,
        }
    }

    /// Bytes per texel (`channels × bytes_per_channel`).
    pub fn bytes_per_texel(self) -> usize {
        self.channels() * self.bytes_per_channel()
    }

    /// GL internal storage format, pre-cast to the `i32` that
    /// `tex_image_2d` expects.
    #[expect(clippy::cast_possible_wrap)]
    pub(crate) fn gl_internal_format(self) -> i32 {
        (match self {
            PixelFormat::RgbU8 => glow::RGB8,
            PixelFormat::RgbaU8 => glow::RGBA8,
            PixelFormat::RgbF32 => glow::RGB32F,
            PixelFormat::RgbaF32 => glow::RGBA32F,
        }) as i32
    }

    /// GL channel format.
    pub(crate) fn gl_format(self) -> u32 {
        match self {
            PixelFormat::RgbU8 | PixelFormat::RgbF32 => glow::RGB,
            PixelFormat::RgbaU8 | PixelFormat::RgbaF32 => glow::RGBA,
        }
    }

    /// GL element type.
    pub(crate) fn gl_type(self) -> u32 {
        match self {
            PixelFormat::RgbU8 | PixelFormat::RgbaU8 => glow::UNSIGNED_BYTE,
            PixelFormat::RgbF32 | PixelFormat::RgbaF32 => glow::FLOAT,
        }
    }
}

/// A homogeneous array of fixed-dimension vectors destined for a vertex
/// attribute or element buffer.
///
/// The host data is always tightly packed: the byte stride is exactly
/// `scalar.size() × n_dims`, no padding.
pub struct VectorSet<'a> {
    scalar: Scalar,
    n_dims: usize,
    n_vectors: usize,
    bytes: &'a [u8],
    /// GPU buffer handle, present after upload.
    pub(crate) buffer: Option<glow::Buffer>,
}

impl<'a> VectorSet<'a> {
    /// # Panics
    ///
    /// Panics if `data.len()` is not a multiple of `n_dims`.
    fn new<T: Pod>(scalar: Scalar, n_dims: usize, data: &'a [T]) -> Self {
        assert_eq!(
            data.len() % n_dims,
            0,
            "vector data length {} is not a multiple of {n_dims}",
            data.len()
        );
        Self {
            scalar,
            n_dims,
            n_vectors: data.len() / n_dims,
            bytes: bytemuck::cast_slice(data),
            buffer: None,
        }
    }

    /// 2-component `f32` vectors (e.g. texture coordinates).
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not a multiple of 2.
    pub fn f32x2(data: &'a [f32]) -> Self {
        Self::new(Scalar::F32, 2, data)
    }

    /// 3-component `f32` vectors.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not a multiple of 3.
    pub fn f32x3(data: &'a [f32]) -> Self {
        Self::new(Scalar::F32, 3, data)
    }

    /// 4-component `f32` vectors.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not a multiple of 4.
    pub fn f32x4(data: &'a [f32]) -> Self {
        Self::new(Scalar::F32, 4, data)
    }

    /// 3-component `f64` vectors.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not a multiple of 3.
    pub fn f64x3(data: &'a [f64]) -> Self {
        Self::new(Scalar::F64, 3, data)
    }

    /// 4-component `f64` vectors (homogeneous points).
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not a multiple of 4.
    pub fn f64x4(data: &'a [f64]) -> Self {
        Self::new(Scalar::F64, 4, data)
    }

    /// 3-component `u32` vectors (triangle index lists).
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not a multiple of 3.
    pub fn u32x3(data: &'a [u32]) -> Self {
        Self::new(Scalar::U32, 3, data)
    }

    /// Scalar element type.
    pub fn scalar(&self) -> Scalar {
        self.scalar
    }

    /// Components per vector.
    pub fn n_dims(&self) -> usize {
        self.n_dims
    }

    /// Number of vectors in the set.
    pub fn n_vectors(&self) -> usize {
        self.n_vectors
    }

    /// Byte stride of one vector: `scalar.size() × n_dims`.
    pub fn byte_stride(&self) -> usize {
        self.scalar.size() * self.n_dims
    }

    /// Total byte length of the host data.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// GPU buffer handle, if uploaded.
    pub fn buffer(&self) -> Option<glow::Buffer> {
        self.buffer
    }

    /// Host data as raw bytes.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.bytes
    }
}

/// A 2D pixel buffer and its GPU binding metadata.
///
/// The texture unit is a mandatory constructor argument: sampler and
/// bind state persist per-unit after upload, so the caller reactivates
/// the unit by index before drawing instead of re-specifying sampler
/// parameters.
pub struct Texture<'a> {
    unit: u32,
    format: PixelFormat,
    width: u32,
    height: u32,
    pixels: &'a [u8],
    /// GPU texture handle, present after upload.
    pub(crate) handle: Option<glow::Texture>,
    /// GPU sampler handle, present after upload.
    pub(crate) sampler: Option<glow::Sampler>,
}

impl<'a> Texture<'a> {
    /// # Panics
    ///
    /// Panics if `pixels` does not hold exactly
    /// `width × height × bytes_per_texel` bytes.
    fn new(unit: u32, format: PixelFormat, pixels: &'a [u8], width: u32, height: u32) -> Self {
        let expected = width as usize * height as usize * format.bytes_per_texel();
        assert_eq!(
            pixels.len(),
            expected,
            "pixel buffer is {} bytes, expected {expected} for {width}x{height} {format:?}",
            pixels.len()
        );
        Self {
            unit,
            format,
            width,
            height,
            pixels,
            handle: None,
            sampler: None,
        }
    }

    /// 8-bit RGB texture bound to `unit`.
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len() != width * height * 3`.
    pub fn rgb_u8(unit: u32, pixels: &'a [u8], width: u32, height: u32) -> Self {
        Self::new(unit, PixelFormat::RgbU8, pixels, width, height)
    }

    /// 8-bit RGBA texture bound to `unit`.
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len() != width * height * 4`.
    pub fn rgba_u8(unit: u32, pixels: &'a [u8], width: u32, height: u32) -> Self {
        Self::new(unit, PixelFormat::RgbaU8, pixels, width, height)
    }

    /// 32-bit float RGB texture bound to `unit`.
    ///
    /// # Panics
    ///
    /// Panics if `texels.len() != width * height * 3`.
    pub fn rgb_f32(unit: u32, texels: &'a [f32], width: u32, height: u32) -> Self {
        Self::new(
            unit,
            PixelFormat::RgbF32,
            bytemuck::cast_slice(texels),
            width,
            height,
        )
    }

    /// 32-bit float RGBA texture bound to `unit`.
    ///
    /// # Panics
    ///
    /// Panics if `texels.len() != width * height * 4`.
    pub fn rgba_f32(unit: u32, texels: &'a [f32], width: u32, height: u32) -> Self {
        Self::new(
            unit,
            PixelFormat::RgbaF32,
            bytemuck::cast_slice(texels),
            width,
            height,
        )
    }

    /// The texture unit this texture binds to.
    pub fn unit(&self) -> u32 {
        self.unit
    }

    /// Pixel layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total byte length of the pixel data
    /// (`width × height × bytes_per_texel`).
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    /// GPU texture handle, if uploaded.
    pub fn handle(&self) -> Option<glow::Texture> {
        self.handle
    }

    /// GPU sampler handle, if uploaded.
    pub fn sampler(&self) -> Option<glow::Sampler> {
        self.sampler
    }

    pub(crate) fn pixels(&self) -> &[u8] {
        self.pixels
    }
}

/// A drawable unit: per-vertex geometry, a triangle index list, and one
/// texture.
///
/// The `f3v` slot is an opaque per-vertex float3 attribute. It travels
/// through the pipeline and is interpolated like any other attribute,
/// but carries no fixed semantic meaning here.
pub struct TexturedMesh<'a> {
    /// Vertex positions.
    pub vertices: VectorSet<'a>,
    /// Per-vertex normals.
    pub normals: VectorSet<'a>,
    /// Opaque per-vertex float3 data.
    pub f3v: VectorSet<'a>,
    /// Per-vertex texture coordinates.
    pub tcoords: VectorSet<'a>,
    /// Triangle index list (element buffer).
    pub trilist: VectorSet<'a>,
    /// The mesh's texture.
    pub texture: Texture<'a>,
    /// Vertex array handle, present after assembly.
    pub(crate) vao: Option<glow::VertexArray>,
}

impl<'a> TexturedMesh<'a> {
    /// # Panics
    ///
    /// Panics if the per-vertex sets disagree on vector count.
    fn assemble(
        vertices: VectorSet<'a>,
        normals: VectorSet<'a>,
        f3v: VectorSet<'a>,
        tcoords: VectorSet<'a>,
        trilist: VectorSet<'a>,
        texture: Texture<'a>,
    ) -> Self {
        let n_points = vertices.n_vectors();
        for (name, set) in [("normals", &normals), ("f3v", &f3v), ("tcoords", &tcoords)] {
            assert_eq!(
                set.n_vectors(),
                n_points,
                "{name} has {} vectors, expected {n_points}",
                set.n_vectors()
            );
        }
        Self {
            vertices,
            normals,
            f3v,
            tcoords,
            trilist,
            texture,
            vao: None,
        }
    }

    /// Mesh with `f64` 4-vector positions/normals and an RGBA8 texture.
    ///
    /// # Panics
    ///
    /// Panics if any slice length is inconsistent with its
    /// dimensionality, the per-vertex sets disagree on vector count, or
    /// the texture buffer does not match its dimensions.
    #[expect(clippy::too_many_arguments, clippy::similar_names)]
    pub fn d4_rgba_u8(
        vertices: &'a [f64],
        normals: &'a [f64],
        f3v: &'a [f32],
        tcoords: &'a [f32],
        trilist: &'a [u32],
        texture: &'a [u8],
        tex_unit: u32,
        tex_width: u32,
        tex_height: u32,
    ) -> Self {
        Self::assemble(
            VectorSet::f64x4(vertices),
            VectorSet::f64x4(normals),
            VectorSet::f32x3(f3v),
            VectorSet::f32x2(tcoords),
            VectorSet::u32x3(trilist),
            Texture::rgba_u8(tex_unit, texture, tex_width, tex_height),
        )
    }

    /// Mesh with `f32` 3-vector positions/normals and an RGB8 texture.
    ///
    /// # Panics
    ///
    /// Panics if any slice length is inconsistent with its
    /// dimensionality, the per-vertex sets disagree on vector count, or
    /// the texture buffer does not match its dimensions.
    #[expect(clippy::too_many_arguments, clippy::similar_names)]
    pub fn f3_rgb_u8(
        vertices: &'a [f32],
        normals: &'a [f32],
        f3v: &'a [f32],
        tcoords: &'a [f32],
        trilist: &'a [u32],
        texture: &'a [u8],
        tex_unit: u32,
        tex_width: u32,
        tex_height: u32,
    ) -> Self {
        Self::assemble(
            VectorSet::f32x3(vertices),
            VectorSet::f32x3(normals),
            VectorSet::f32x3(f3v),
            VectorSet::f32x2(tcoords),
            VectorSet::u32x3(trilist),
            Texture::rgb_u8(tex_unit, texture, tex_width, tex_height),
        )
    }

    /// Mesh with `f32` 3-vector positions/normals and an RGB32F texture.
    ///
    /// # Panics
    ///
    /// Panics if any slice length is inconsistent with its
    /// dimensionality, the per-vertex sets disagree on vector count, or
    /// the texture buffer does not match its dimensions.
    #[expect(clippy::too_many_arguments, clippy::similar_names)]
    pub fn f3_rgb_f32(
        vertices: &'a [f32],
        normals: &'a [f32],
        f3v: &'a [f32],
        tcoords: &'a [f32],
        trilist: &'a [u32],
        texture: &'a [f32],
        tex_unit: u32,
        tex_width: u32,
        tex_height: u32,
    ) -> Self {
        Self::assemble(
            VectorSet::f32x3(vertices),
            VectorSet::f32x3(normals),
            VectorSet::f32x3(f3v),
            VectorSet::f32x2(tcoords),
            VectorSet::u32x3(trilist),
            Texture::rgb_f32(tex_unit, texture, tex_width, tex_height),
        )
    }

    /// Vertex array handle, if assembled.
    pub fn vao(&self) -> Option<glow::VertexArray> {
        self.vao
    }
}
