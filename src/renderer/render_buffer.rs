use std::ops::{Bound, Range, RangeBounds};

use bytemuck::cast_slice;
use wgpu::{Buffer, BufferDescriptor, BufferUsages};

use crate::renderer::{RenderContext, SpriteInstance};

/// GPU-side array of sprite instances, fed to the pipeline's instance step.
#[derive(Debug, Clone)]
pub struct RenderBuffer(Buffer);

#[derive(Debug, Clone, Copy)]
pub struct RenderBufferSlice<'a> {
    pub(in crate::renderer) buf: &'a Buffer,
    pub(in crate::renderer) start: u64,
    pub(in crate::renderer) len: u64,
}

impl RenderBuffer {
    pub fn new_uninit(cap: usize, ctx: RenderContext) -> Self {
        Self(ctx.device.create_buffer(&BufferDescriptor {
            label: Some("renderer instance buffer"),
            size: (cap * size_of::<SpriteInstance>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }))
    }

    pub fn len(&self) -> usize {
        self.0.size() as usize / size_of::<SpriteInstance>()
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> RenderBufferSlice<'_> {
        let range = resolve_range(range, self.len());

        RenderBufferSlice {
            buf: &self.0,
            start: range.start as u64,
            len: (range.end - range.start) as u64,
        }
    }

    pub fn write(&self, instances: &[SpriteInstance], ctx: RenderContext) {
        self.slice(..).write(instances, ctx)
    }
}

impl<'a> RenderBufferSlice<'a> {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn write(&self, instances: &[SpriteInstance], ctx: RenderContext<'_>) {
        assert!(instances.len() <= self.len());

        ctx.queue.write_buffer(
            self.buf,
            self.start * size_of::<SpriteInstance>() as u64,
            cast_slice(instances),
        );
    }

    pub(in crate::renderer) fn byte_range(&self) -> Range<u64> {
        let stride = size_of::<SpriteInstance>() as u64;

        self.start * stride..(self.start + self.len) * stride
    }
}

fn resolve_range(range: impl RangeBounds<usize>, len: usize) -> Range<usize> {
    let start = match range.start_bound() {
        Bound::Included(start) => *start,
        Bound::Excluded(start) => *start + 1,
        Bound::Unbounded => 0,
    };

    let end = match range.end_bound() {
        Bound::Included(end) => *end + 1,
        Bound::Excluded(end) => *end,
        Bound::Unbounded => len,
    };

    assert!(start <= end);
    assert!(end <= len);

    start..end
}
