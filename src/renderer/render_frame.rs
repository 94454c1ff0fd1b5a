use glam::Mat4;
use wgpu::{
    Color, CommandEncoderDescriptor, IndexFormat, LoadOp, Operations, RenderPassColorAttachment,
    RenderPassDescriptor, StoreOp, TextureView,
};

use crate::renderer::{Camera, QUAD_INDICES, RenderContext, Renderer, SpriteId, SpriteInstance};

/// Records sprite draws for one frame. Draws are submitted in batches and
/// whatever is left over is submitted when the frame is dropped.
pub struct RenderFrame<'a> {
    pub(in crate::renderer) renderer: &'a mut Renderer,
    pub(in crate::renderer) output: &'a TextureView,
    pub(in crate::renderer) ctx: &'a RenderContext<'a>,
    pub(in crate::renderer) clear_color: Color,
    pub(in crate::renderer) has_rendered: bool,
}

impl Renderer {
    pub fn render_frame(
        &mut self,
        camera: &Camera,
        f: impl FnOnce(&mut RenderFrame),
        output: &TextureView,
        ctx: RenderContext,
    ) {
        self.write_camera(camera.view_projection(), ctx);

        f(&mut RenderFrame {
            renderer: self,
            output,
            ctx: &ctx,
            clear_color: camera.clear_color_for(ctx.surface_format),
            has_rendered: false,
        })
    }
}

impl<'a> RenderFrame<'a> {
    pub fn draw_sprite(&mut self, sprite: SpriteId, model: Mat4) {
        assert!(
            sprite.0 < self.renderer.sprites.len(),
            "sprite {sprite:?} was not loaded by this renderer"
        );

        if self.renderer.draws.push(sprite, SpriteInstance { model }) {
            self.flush();
        }
    }

    fn flush(&mut self) {
        let renderer = &*self.renderer;
        let draws = &renderer.draws;

        if !draws.is_empty() {
            renderer.instance_buf.write(draws.instances(), *self.ctx);
        }

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&CommandEncoderDescriptor::default());

        let load_op = if self.has_rendered {
            LoadOp::Load
        } else {
            LoadOp::Clear(self.clear_color)
        };

        let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("renderer sprite pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: self.output,
                ops: Operations {
                    load: load_op,
                    store: StoreOp::Store,
                },
                depth_slice: None,
                resolve_target: None,
            })],
            timestamp_writes: None,
            occlusion_query_set: None,
            depth_stencil_attachment: None,
        });

        if !draws.is_empty() {
            let instances = renderer.instance_buf.slice(..draws.len());

            pass.set_pipeline(&renderer.pipeline);
            pass.set_bind_group(0, &renderer.camera_bind_group, &[]);
            pass.set_vertex_buffer(0, renderer.vertex_buf.slice(..));
            pass.set_vertex_buffer(1, instances.buf.slice(instances.byte_range()));
            pass.set_index_buffer(renderer.index_buf.slice(..), IndexFormat::Uint16);

            for (instance, sprite) in draws.sprites().iter().enumerate() {
                let instance = instance as u32;

                pass.set_bind_group(1, &renderer.sprites[sprite.0].bind_group, &[]);
                pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, instance..instance + 1);
            }

            debug_assert_eq!(instances.len(), draws.len());
        }

        drop(pass);

        self.ctx.queue.submit([encoder.finish()]);

        self.renderer.draws.clear();
        self.has_rendered = true;
    }
}

impl<'a> Drop for RenderFrame<'a> {
    fn drop(&mut self) {
        // an empty frame still has to clear the surface
        if !self.renderer.draws.is_empty() || !self.has_rendered {
            self.flush();
        }
    }
}
