use crate::renderer::{SpriteId, SpriteInstance};

/// Sprite draws waiting to be flushed, kept as parallel lists so the
/// instances can be uploaded in one write.
#[derive(Debug, Clone)]
pub(in crate::renderer) struct DrawQueue {
    cap: usize,
    sprites: Vec<SpriteId>,
    instances: Vec<SpriteInstance>,
}

impl DrawQueue {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            sprites: Vec::with_capacity(cap),
            instances: Vec::with_capacity(cap),
        }
    }

    /// Queues a draw and returns `true` once the queue has to be flushed.
    pub fn push(&mut self, sprite: SpriteId, instance: SpriteInstance) -> bool {
        assert!(!self.is_full(), "draw queue overflowed its {} slots", self.cap);

        self.sprites.push(sprite);
        self.instances.push(instance);

        self.is_full()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.cap
    }

    pub fn sprites(&self) -> &[SpriteId] {
        &self.sprites
    }

    pub fn instances(&self) -> &[SpriteInstance] {
        &self.instances
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
        self.instances.clear();
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, vec3};

    use super::*;

    fn instance(x: f32) -> SpriteInstance {
        SpriteInstance {
            model: Mat4::from_translation(vec3(x, 0.0, 0.0)),
        }
    }

    #[test]
    fn push_reports_full_on_the_last_slot() {
        let mut queue = DrawQueue::new(2);
        assert!(queue.is_empty());

        assert!(!queue.push(SpriteId(0), instance(1.0)));
        assert!(queue.push(SpriteId(1), instance(2.0)));
        assert!(queue.is_full());

        assert_eq!(queue.sprites(), [SpriteId(0), SpriteId(1)]);
        assert_eq!(queue.instances(), [instance(1.0), instance(2.0)]);
    }

    #[test]
    fn clear_makes_room_for_the_next_batch() {
        let mut queue = DrawQueue::new(2);
        queue.push(SpriteId(0), instance(1.0));
        queue.push(SpriteId(0), instance(2.0));

        queue.clear();
        assert!(queue.is_empty());
        assert!(!queue.push(SpriteId(1), instance(3.0)));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.instances(), [instance(3.0)]);
    }

    #[test]
    fn default_capacity_batches_many_frames_of_two_sprites() {
        let mut queue = DrawQueue::new(crate::renderer::MAX_SPRITES_PER_FLUSH);

        let mut flushes = 0;
        for i in 0..crate::renderer::MAX_SPRITES_PER_FLUSH * 3 {
            if queue.push(SpriteId(i % 2), instance(i as f32)) {
                flushes += 1;
                queue.clear();
            }
        }
        assert_eq!(flushes, 3);
        assert!(queue.is_empty());
    }

    #[test]
    #[should_panic]
    fn pushing_past_capacity_panics() {
        let mut queue = DrawQueue::new(1);
        queue.push(SpriteId(0), instance(0.0));
        queue.push(SpriteId(0), instance(0.0));
    }
}
