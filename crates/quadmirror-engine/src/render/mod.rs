//! Per-draw resource wiring and the quadrant renderer.
//!
//! Everything here runs against a `GlContext` that already has an active
//! program. Geometry is in NDC (+Y up); no viewport transform is applied.

mod attrib;
mod geometry;
mod quadrant;
mod texture;

pub use attrib::{bind_attribute, AttributeSlot};
pub use geometry::{upload, GeometryBuffer, QuadGeometry, QUAD_VERTICES};
pub use quadrant::{render_all, Mirror, NdcRect, Quadrant};
pub use texture::upload_texture;
