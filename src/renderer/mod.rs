mod camera;
mod draw_queue;
mod render_buffer;
mod render_frame;
mod renderer;
mod sprite_texture;
pub use camera::*;
pub use render_buffer::*;
pub use render_frame::*;
pub use renderer::*;
pub use sprite_texture::*;

use draw_queue::DrawQueue;

/// Half the side of the textured quad every sprite is drawn on.
const QUAD_HALF_EXTENT: f32 = 0.7;
const MAX_SPRITES_PER_FLUSH: usize = 64;
