use std::{mem::offset_of, path::Path};

use bytemuck::{NoUninit, bytes_of, cast_slice};
use glam::{Mat4, Vec2, vec2};
use wgpu::{
    AddressMode, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType, BlendState, Buffer,
    BufferBindingType, BufferDescriptor, BufferUsages, ColorTargetState, ColorWrites, Device,
    FilterMode, FragmentState, FrontFace, MultisampleState, PipelineCompilationOptions,
    PipelineLayoutDescriptor, PolygonMode, PrimitiveState, PrimitiveTopology, Queue,
    RenderPipeline, RenderPipelineDescriptor, Sampler, SamplerBindingType, SamplerDescriptor,
    ShaderStages, TextureFormat, TextureSampleType, TextureViewDimension, VertexAttribute,
    VertexBufferLayout, VertexFormat, VertexState, VertexStepMode, include_wgsl,
    util::{BufferInitDescriptor, DeviceExt},
};

use crate::{
    game::GameContext,
    renderer::{
        DrawQueue, MAX_SPRITES_PER_FLUSH, QUAD_HALF_EXTENT, RenderBuffer, SpriteTexture,
        TextureError,
    },
};

#[derive(Debug)]
pub struct Renderer {
    pub(in crate::renderer) vertex_buf: Buffer,
    pub(in crate::renderer) index_buf: Buffer,
    pub(in crate::renderer) camera_uniform_buf: Buffer,
    pub(in crate::renderer) camera_bind_group: BindGroup,
    pub(in crate::renderer) pipeline: RenderPipeline,
    pub(in crate::renderer) instance_buf: RenderBuffer,
    pub(in crate::renderer) draws: DrawQueue,
    pub(in crate::renderer) sprites: Vec<SpriteTexture>,
    sprite_bind_group_layout: BindGroupLayout,
    sampler: Sampler,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub device: &'a Device,
    pub queue: &'a Queue,
    pub surface_format: TextureFormat,
}

/// Handle to a texture owned by the [`Renderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(pub(in crate::renderer) usize);

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
pub(in crate::renderer) struct SpriteVertex {
    pub position: Vec2,
    pub uv: Vec2,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
pub struct SpriteInstance {
    pub model: Mat4,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
pub(in crate::renderer) struct CameraUniform {
    pub view_proj: Mat4,
}

/// Bottom-left, bottom-right, top-right, top-left. Texture rows run top to bottom.
pub(in crate::renderer) const QUAD_VERTICES: [SpriteVertex; 4] = [
    SpriteVertex {
        position: vec2(-QUAD_HALF_EXTENT, -QUAD_HALF_EXTENT),
        uv: vec2(0.0, 1.0),
    },
    SpriteVertex {
        position: vec2(QUAD_HALF_EXTENT, -QUAD_HALF_EXTENT),
        uv: vec2(1.0, 1.0),
    },
    SpriteVertex {
        position: vec2(QUAD_HALF_EXTENT, QUAD_HALF_EXTENT),
        uv: vec2(1.0, 0.0),
    },
    SpriteVertex {
        position: vec2(-QUAD_HALF_EXTENT, QUAD_HALF_EXTENT),
        uv: vec2(0.0, 0.0),
    },
];

pub(in crate::renderer) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

impl Renderer {
    pub fn new(ctx: RenderContext) -> Self {
        let vertex_buf = ctx.device.create_buffer_init(&BufferInitDescriptor {
            label: Some("renderer vertex buffer"),
            contents: cast_slice(&QUAD_VERTICES),
            usage: BufferUsages::VERTEX,
        });

        let index_buf = ctx.device.create_buffer_init(&BufferInitDescriptor {
            label: Some("renderer index buffer"),
            contents: cast_slice(&QUAD_INDICES),
            usage: BufferUsages::INDEX,
        });

        let camera_uniform_buf = ctx.device.create_buffer(&BufferDescriptor {
            label: Some("renderer camera uniform buffer"),
            size: size_of::<CameraUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sampler = ctx.device.create_sampler(&SamplerDescriptor {
            label: Some("renderer sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            anisotropy_clamp: 1,
            border_color: None,
            compare: None,
            lod_max_clamp: 1.0,
            lod_min_clamp: 1.0,
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            mipmap_filter: FilterMode::Nearest,
        });

        let shader = ctx
            .device
            .create_shader_module(include_wgsl!("sprite.wgsl"));

        let camera_bind_group_layout =
            ctx.device
                .create_bind_group_layout(&BindGroupLayoutDescriptor {
                    label: Some("renderer camera bind group layout"),
                    entries: &[BindGroupLayoutEntry {
                        binding: 0,
                        ty: BindingType::Buffer {
                            ty: BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                        visibility: ShaderStages::VERTEX,
                    }],
                });

        let sprite_bind_group_layout =
            ctx.device
                .create_bind_group_layout(&BindGroupLayoutDescriptor {
                    label: Some("renderer sprite bind group layout"),
                    entries: &[
                        BindGroupLayoutEntry {
                            binding: 0,
                            ty: BindingType::Texture {
                                sample_type: TextureSampleType::Float { filterable: false },
                                view_dimension: TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                            visibility: ShaderStages::FRAGMENT,
                        },
                        BindGroupLayoutEntry {
                            binding: 1,
                            ty: BindingType::Sampler(SamplerBindingType::NonFiltering),
                            count: None,
                            visibility: ShaderStages::FRAGMENT,
                        },
                    ],
                });

        let camera_bind_group = ctx.device.create_bind_group(&BindGroupDescriptor {
            label: Some("renderer camera bind group"),
            layout: &camera_bind_group_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: camera_uniform_buf.as_entire_binding(),
            }],
        });

        let pipeline = ctx
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("renderer sprite pipeline"),
                cache: None,
                depth_stencil: None,
                layout: Some(
                    &ctx.device
                        .create_pipeline_layout(&PipelineLayoutDescriptor {
                            label: Some("renderer sprite pipeline layout"),
                            bind_group_layouts: &[
                                &camera_bind_group_layout,
                                &sprite_bind_group_layout,
                            ],
                            push_constant_ranges: &[],
                        }),
                ),
                multiview: None,
                primitive: PrimitiveState {
                    front_face: FrontFace::Ccw,
                    conservative: false,
                    cull_mode: None,
                    polygon_mode: PolygonMode::Fill,
                    strip_index_format: None,
                    topology: PrimitiveTopology::TriangleList,
                    unclipped_depth: false,
                },
                vertex: VertexState {
                    module: &shader,
                    entry_point: None,
                    compilation_options: PipelineCompilationOptions::default(),
                    buffers: &[VERTEX_BUFFER_LAYOUT, INSTANCE_BUFFER_LAYOUT],
                },
                fragment: Some(FragmentState {
                    module: &shader,
                    targets: &[Some(ColorTargetState {
                        blend: Some(BlendState::ALPHA_BLENDING),
                        format: ctx.surface_format,
                        write_mask: ColorWrites::all(),
                    })],
                    entry_point: None,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                multisample: MultisampleState::default(),
            });

        Self {
            vertex_buf,
            index_buf,
            camera_uniform_buf,
            camera_bind_group,
            pipeline,
            instance_buf: RenderBuffer::new_uninit(MAX_SPRITES_PER_FLUSH, ctx),
            draws: DrawQueue::new(MAX_SPRITES_PER_FLUSH),
            sprites: Vec::new(),
            sprite_bind_group_layout,
            sampler,
        }
    }

    /// Decodes an image file and uploads it as a sprite texture.
    pub fn load_sprite(
        &mut self,
        path: impl AsRef<Path>,
        ctx: RenderContext,
    ) -> Result<SpriteId, TextureError> {
        let texture = SpriteTexture::load(
            path.as_ref(),
            &self.sprite_bind_group_layout,
            &self.sampler,
            ctx,
        )?;

        self.sprites.push(texture);

        Ok(SpriteId(self.sprites.len() - 1))
    }

    pub(in crate::renderer) fn write_camera(&self, view_proj: Mat4, ctx: RenderContext) {
        ctx.queue.write_buffer(
            &self.camera_uniform_buf,
            0,
            bytes_of(&CameraUniform { view_proj }),
        );
    }
}

impl<'a> From<GameContext<'a>> for RenderContext<'a> {
    fn from(value: GameContext<'a>) -> Self {
        Self {
            device: value.device,
            queue: value.queue,
            surface_format: value.surface_format,
        }
    }
}

const VERTEX_BUFFER_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: size_of::<SpriteVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &[
        VertexAttribute {
            format: VertexFormat::Float32x2,
            offset: offset_of!(SpriteVertex, position) as u64,
            shader_location: 0,
        },
        VertexAttribute {
            format: VertexFormat::Float32x2,
            offset: offset_of!(SpriteVertex, uv) as u64,
            shader_location: 1,
        },
    ],
};

// a mat4 goes through the vertex stage as four column vectors
const INSTANCE_BUFFER_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: size_of::<SpriteInstance>() as u64,
    step_mode: VertexStepMode::Instance,
    attributes: &[
        VertexAttribute {
            format: VertexFormat::Float32x4,
            offset: offset_of!(SpriteInstance, model) as u64,
            shader_location: 2,
        },
        VertexAttribute {
            format: VertexFormat::Float32x4,
            offset: (offset_of!(SpriteInstance, model) + 16) as u64,
            shader_location: 3,
        },
        VertexAttribute {
            format: VertexFormat::Float32x4,
            offset: (offset_of!(SpriteInstance, model) + 32) as u64,
            shader_location: 4,
        },
        VertexAttribute {
            format: VertexFormat::Float32x4,
            offset: (offset_of!(SpriteInstance, model) + 48) as u64,
            shader_location: 5,
        },
    ],
};

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use bytemuck::bytes_of;
    use glam::{Vec4, vec4};

    use super::*;

    #[test]
    fn quad_indices_rebuild_the_two_textured_triangles() {
        let triangles: Vec<(Vec2, Vec2)> = QUAD_INDICES
            .iter()
            .map(|&i| {
                let vertex = QUAD_VERTICES[i as usize];
                (vertex.position, vertex.uv)
            })
            .collect();

        assert_eq!(
            triangles,
            [
                (vec2(-0.7, -0.7), vec2(0.0, 1.0)),
                (vec2(0.7, -0.7), vec2(1.0, 1.0)),
                (vec2(0.7, 0.7), vec2(1.0, 0.0)),
                (vec2(-0.7, -0.7), vec2(0.0, 1.0)),
                (vec2(0.7, 0.7), vec2(1.0, 0.0)),
                (vec2(-0.7, 0.7), vec2(0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn instance_layout_covers_the_whole_matrix_column_major() {
        assert_eq!(size_of::<SpriteInstance>(), 64);
        assert_eq!(INSTANCE_BUFFER_LAYOUT.array_stride, 64);

        let model = Mat4::from_translation(glam::vec3(3.0, -2.0, 0.0));
        let instance = SpriteInstance { model };
        let bytes = bytes_of(&instance);

        // the fourth attribute is the translation column
        let column: &[f32] = bytemuck::cast_slice(&bytes[48..64]);
        let column = Vec4::from_slice(column);
        assert_eq!(column, vec4(3.0, -2.0, 0.0, 1.0));
        assert_eq!(INSTANCE_BUFFER_LAYOUT.attributes[3].offset, 48);
    }

    #[test]
    fn vertex_layout_matches_vertex_struct() {
        assert_eq!(VERTEX_BUFFER_LAYOUT.array_stride, 16);
        assert_eq!(VERTEX_BUFFER_LAYOUT.attributes[1].offset, 8);
        assert_relative_eq!(QUAD_VERTICES[2].position.x, QUAD_HALF_EXTENT);
    }
}
