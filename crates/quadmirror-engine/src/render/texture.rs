use crate::gl::{Filter, GlContext, GlError, TexParam, TextureId, Wrap};
use crate::image_source::ImageSource;

/// Sampler state every uploaded image gets.
const PARAMS: [TexParam; 4] = [
    TexParam::WrapS(Wrap::ClampToEdge),
    TexParam::WrapT(Wrap::ClampToEdge),
    TexParam::MinFilter(Filter::Linear),
    TexParam::MagFilter(Filter::Linear),
];

/// Creates a texture from `image` and leaves it bound.
///
/// Rows are flipped vertically during upload.
pub fn upload_texture(gl: &mut impl GlContext, image: &ImageSource) -> Result<TextureId, GlError> {
    let texture = gl.create_texture()?;
    gl.bind_texture(Some(texture));
    for param in PARAMS {
        gl.tex_parameter(param)?;
    }

    gl.set_unpack_flip_y(true);
    gl.tex_image_2d(image.width(), image.height(), image.pixels())?;

    log::debug!("uploaded {}x{} texture {}", image.width(), image.height(), texture.0);
    Ok(texture)
}
