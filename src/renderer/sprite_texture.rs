use std::path::{Path, PathBuf};

use image::{EncodableLayout, RgbaImage};
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindingResource, Extent3d,
    Origin3d, Sampler, TexelCopyBufferLayout, TexelCopyTextureInfo, TextureAspect,
    TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureViewDescriptor,
};

use crate::renderer::RenderContext;

/// A sprite image uploaded to the GPU, bound and ready to draw.
#[derive(Debug)]
pub struct SpriteTexture {
    pub(in crate::renderer) bind_group: BindGroup,
}

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("unable to load image `{}`", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl SpriteTexture {
    pub(in crate::renderer) fn load(
        path: &Path,
        layout: &BindGroupLayout,
        sampler: &Sampler,
        ctx: RenderContext,
    ) -> Result<Self, TextureError> {
        let image = image::open(path)
            .map_err(|source| TextureError::Load {
                path: path.to_owned(),
                source,
            })?
            .to_rgba8();

        let label = path.file_stem().and_then(|stem| stem.to_str());
        log::info!(
            "loaded sprite {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );

        Ok(Self::new(&image, label, layout, sampler, ctx))
    }

    fn new(
        image: &RgbaImage,
        label: Option<&str>,
        layout: &BindGroupLayout,
        sampler: &Sampler,
        ctx: RenderContext,
    ) -> Self {
        let texture = ctx.device.create_texture(&TextureDescriptor {
            label,
            size: Extent3d {
                width: image.width(),
                height: image.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: texel_format(ctx.surface_format),
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            TexelCopyTextureInfo {
                texture: &texture,
                aspect: TextureAspect::All,
                mip_level: 0,
                origin: Origin3d::ZERO,
            },
            image.as_bytes(),
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width() * 4),
                rows_per_image: Some(image.height()),
            },
            texture.size(),
        );

        let bind_group = ctx.device.create_bind_group(&BindGroupDescriptor {
            label: Some("renderer sprite bind group"),
            layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(
                        &texture.create_view(&TextureViewDescriptor::default()),
                    ),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::Sampler(sampler),
                },
            ],
        });

        Self { bind_group }
    }
}

/// Texels keep the surface's encoding, so a plain surface samples and blends
/// the stored bytes as they are.
fn texel_format(surface_format: TextureFormat) -> TextureFormat {
    if surface_format.is_srgb() {
        TextureFormat::Rgba8UnormSrgb
    } else {
        TextureFormat::Rgba8Unorm
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn load_error_names_the_path_and_keeps_the_cause() {
        let path = PathBuf::from("sprites/missing.png");
        let source = image::open(&path).expect_err("file should not exist");

        let err = TextureError::Load {
            path: path.clone(),
            source,
        };

        assert_eq!(err.to_string(), "unable to load image `sprites/missing.png`");
        assert!(err.source().is_some());
    }

    #[test]
    fn texels_follow_the_surface_encoding() {
        assert_eq!(texel_format(TextureFormat::Bgra8Unorm), TextureFormat::Rgba8Unorm);
        assert_eq!(texel_format(TextureFormat::Rgba8Unorm), TextureFormat::Rgba8Unorm);
        assert_eq!(
            texel_format(TextureFormat::Bgra8UnormSrgb),
            TextureFormat::Rgba8UnormSrgb
        );
    }
}
