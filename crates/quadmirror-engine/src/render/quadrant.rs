use crate::gl::{ClearColor, GlContext, GlError, Primitive};
use crate::pipeline::LinkedProgram;

use super::{upload, AttributeSlot, GeometryBuffer, QuadGeometry, QUAD_VERTICES};

/// Axis-aligned rectangle in normalized device coordinates (+Y up).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NdcRect {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl NdcRect {
    #[inline]
    pub const fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self { left, right, bottom, top }
    }

    /// Corners in quad vertex order: TL, BL, BR, BR, TR, TL.
    pub fn vertices(self) -> [[f32; 2]; QUAD_VERTICES] {
        let tl = [self.left, self.top];
        let bl = [self.left, self.bottom];
        let br = [self.right, self.bottom];
        let tr = [self.right, self.top];
        [tl, bl, br, br, tr, tl]
    }
}

/// Texture-coordinate mirroring applied to a quad.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Mirror {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Mirror {
    pub const NONE: Mirror = Mirror { horizontal: false, vertical: false };
    pub const HORIZONTAL: Mirror = Mirror { horizontal: true, vertical: false };
    pub const VERTICAL: Mirror = Mirror { horizontal: false, vertical: true };
    pub const BOTH: Mirror = Mirror { horizontal: true, vertical: true };

    /// UVs for the quad vertex order, starting from the identity mapping
    /// where the top-left corner samples (0, 1).
    pub fn uvs(self) -> [[f32; 2]; QUAD_VERTICES] {
        let (u0, u1) = if self.horizontal { (1.0, 0.0) } else { (0.0, 1.0) };
        let (v_top, v_bottom) = if self.vertical { (0.0, 1.0) } else { (1.0, 0.0) };

        let tl = [u0, v_top];
        let bl = [u0, v_bottom];
        let br = [u1, v_bottom];
        let tr = [u1, v_top];
        [tl, bl, br, br, tr, tl]
    }
}

/// One of the four fixed canvas regions.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// Draw order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    pub fn rect(self) -> NdcRect {
        match self {
            Quadrant::TopLeft => NdcRect::new(-0.9, -0.1, 0.1, 0.9),
            Quadrant::TopRight => NdcRect::new(0.1, 0.9, 0.1, 0.9),
            Quadrant::BottomLeft => NdcRect::new(-0.9, -0.1, -0.9, -0.1),
            Quadrant::BottomRight => NdcRect::new(0.1, 0.9, -0.9, -0.1),
        }
    }

    pub fn mirror(self) -> Mirror {
        match self {
            Quadrant::TopLeft => Mirror::NONE,
            Quadrant::TopRight => Mirror::HORIZONTAL,
            Quadrant::BottomLeft => Mirror::VERTICAL,
            Quadrant::BottomRight => Mirror::BOTH,
        }
    }

    pub fn geometry(self) -> QuadGeometry {
        QuadGeometry {
            positions: self.rect().vertices(),
            uvs: self.mirror().uvs(),
        }
    }
}

/// Clears the canvas once, then draws every quadrant in [`Quadrant::ALL`] order.
///
/// `program` must be active and both slots enabled. The two buffers are reused
/// for every quadrant; each draw consumes what was uploaded just before it.
pub fn render_all(
    gl: &mut impl GlContext,
    program: &LinkedProgram,
    pos_slot: AttributeSlot,
    uv_slot: AttributeSlot,
    pos_buffer: GeometryBuffer,
    uv_buffer: GeometryBuffer,
) -> Result<(), GlError> {
    gl.clear_color(ClearColor::OPAQUE_BLACK);
    gl.clear()?;

    for quadrant in Quadrant::ALL {
        let geometry = quadrant.geometry();
        upload(gl, pos_slot, pos_buffer, &geometry.positions)?;
        upload(gl, uv_slot, uv_buffer, &geometry.uvs)?;
        gl.draw_arrays(Primitive::Triangles, 0, QUAD_VERTICES as u32)?;
        log::trace!("drew {quadrant:?} with program {}", program.id().0);
    }

    Ok(())
}
