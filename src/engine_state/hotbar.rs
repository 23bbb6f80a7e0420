//! The block the player is holding, and its preview mesh.

use cgmath::Point3;

use super::rendering::face_renderer::{FaceBufferId, FaceData, FaceRenderer};
use super::voxels::block::block_side::BlockSide;
use super::voxels::block::{BlockId, BlockRegistry};

/// Selects which registered block gets placed.
///
/// The held id always lies in `1..=registry.registered_ids()`; stepping past
/// either end stays put. Every change reloads the preview buffer with the six
/// faces of the held block.
pub struct Hotbar {
    held: BlockId,
    buffer: Option<FaceBufferId>,
}

impl Hotbar {
    /// Creates a hotbar holding the first registered block.
    pub fn new() -> Self {
        Hotbar {
            held: 1,
            buffer: None,
        }
    }

    /// Allocates the preview buffer and fills it.
    pub fn init(&mut self, registry: &BlockRegistry, sink: &mut dyn FaceRenderer) {
        if self.buffer.is_none() {
            self.buffer = Some(sink.create_buffer());
        }
        self.prerender(registry, sink);
    }

    /// The id of the held block.
    pub fn held(&self) -> BlockId {
        self.held
    }

    /// Selects the previous block.
    pub fn previous(&mut self, registry: &BlockRegistry, sink: &mut dyn FaceRenderer) {
        if self.held > 1 {
            self.held -= 1;
        }
        self.prerender(registry, sink);
    }

    /// Selects the next block.
    pub fn next(&mut self, registry: &BlockRegistry, sink: &mut dyn FaceRenderer) {
        if (self.held as usize) < registry.registered_ids() {
            self.held += 1;
        }
        self.prerender(registry, sink);
    }

    /// Draws the preview.
    pub fn render(&self, sink: &mut dyn FaceRenderer) {
        if let Some(buffer) = self.buffer {
            sink.draw(buffer, Point3::new(0, 0, 0));
        }
    }

    /// Frees the preview buffer.
    pub fn destroy(&mut self, sink: &mut dyn FaceRenderer) {
        if let Some(buffer) = self.buffer.take() {
            sink.delete_buffer(buffer);
        }
    }

    fn prerender(&self, registry: &BlockRegistry, sink: &mut dyn FaceRenderer) {
        let Some(buffer) = self.buffer else {
            return;
        };
        let block = registry.from_id(self.held);
        let faces: Vec<FaceData> = BlockSide::all()
            .into_iter()
            .map(|side| FaceData::new(0, 0, 0, side, block.face_texture(side)))
            .collect();
        sink.load(buffer, &faces);
    }
}

impl Default for Hotbar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::face_renderer::MemoryFaceRenderer;
    use crate::engine_state::voxels::block::textures::texture;
    use crate::engine_state::voxels::block::{GRASS_ID, STONE_ID, WATER_ID};

    #[test]
    fn selection_is_clamped_to_registered_blocks() {
        let registry = BlockRegistry::register_all();
        let mut sink = MemoryFaceRenderer::new();
        let mut hotbar = Hotbar::new();
        hotbar.init(&registry, &mut sink);

        hotbar.previous(&registry, &mut sink);
        assert_eq!(hotbar.held(), STONE_ID);
        for _ in 0..20 {
            hotbar.next(&registry, &mut sink);
        }
        assert_eq!(hotbar.held(), WATER_ID);
    }

    #[test]
    fn default_holds_the_first_block_without_a_buffer() {
        let hotbar = Hotbar::default();
        assert_eq!(hotbar.held(), STONE_ID);
        assert!(hotbar.buffer.is_none());
    }

    #[test]
    fn preview_holds_the_six_faces() {
        let registry = BlockRegistry::register_all();
        let mut sink = MemoryFaceRenderer::new();
        let mut hotbar = Hotbar::new();
        hotbar.init(&registry, &mut sink);
        hotbar.next(&registry, &mut sink);
        hotbar.next(&registry, &mut sink);
        assert_eq!(hotbar.held(), GRASS_ID);

        let buffer = hotbar.buffer.unwrap();
        let faces = sink.faces(buffer).unwrap();
        assert_eq!(faces.len(), 6);
        assert_eq!(faces[5].texture, texture("grass_top"));
        assert_eq!(faces[4].texture, texture("dirt"));

        hotbar.render(&mut sink);
        assert_eq!(sink.take_draws()[0].face_count, 6);
        hotbar.destroy(&mut sink);
        assert_eq!(sink.buffer_count(), 0);
    }
}
