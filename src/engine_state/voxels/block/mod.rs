//! # Block Module
//!
//! This module provides the block registry: the immutable table of block
//! prototypes that every other part of the voxel core looks blocks up in.
//!
//! Chunks only store small integer [`BlockId`]s. Everything else about a block
//! (opacity, fluid behaviour, per-face textures) lives on its [`Block`]
//! prototype, which is owned by the [`BlockRegistry`] and never copied per
//! instance.
//!
//! ## Id Assignment
//!
//! Ids are handed out sequentially from 1 in registration order, with 0
//! reserved for air. Changing the registration order changes the meaning of
//! every stored chunk, so [`BlockRegistry::register_all`] is append-only.

use block_side::BlockSide;
use textures::{texture, TextureId, PLACEHOLDER_TEXTURE};

pub mod block_side;
pub mod textures;

/// The integer type blocks are stored as inside chunks.
pub type BlockId = u8;

/// Id of the empty block.
pub const AIR_ID: BlockId = 0;
/// Id of stone.
pub const STONE_ID: BlockId = 1;
/// Id of dirt.
pub const DIRT_ID: BlockId = 2;
/// Id of grass.
pub const GRASS_ID: BlockId = 3;
/// Id of tree trunks.
pub const TRUNK_ID: BlockId = 4;
/// Id of leaves.
pub const LEAVES_ID: BlockId = 5;
/// Id of water.
pub const WATER_ID: BlockId = 6;

/// The closed set of block behaviours that vary textures by face.
///
/// New kinds are added here rather than through dynamic dispatch, since the
/// set is fixed when the registry is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockKind {
    /// Same texture on all six faces.
    Plain,
    /// Dirt underneath, grass on top, grass-over-dirt on the sides.
    Grass,
    /// Bark on the sides, rings on top and bottom.
    Trunk,
}

/// An immutable block prototype.
#[derive(Clone, Debug)]
pub struct Block {
    id: BlockId,
    name: &'static str,
    kind: BlockKind,
    is_opaque_cube: bool,
    is_fluid: bool,
    main_texture: TextureId,
}

impl Block {
    fn new(id: BlockId, name: &'static str, kind: BlockKind) -> Self {
        Block {
            id,
            name,
            kind,
            is_opaque_cube: true,
            is_fluid: false,
            main_texture: PLACEHOLDER_TEXTURE,
        }
    }

    fn air() -> Self {
        Block {
            is_opaque_cube: false,
            ..Block::new(AIR_ID, "air", BlockKind::Plain)
        }
    }

    fn with_main_texture(mut self, texture_name: &str) -> Self {
        self.main_texture = texture(texture_name);
        self
    }

    fn with_opaque_cube(mut self, is_opaque_cube: bool) -> Self {
        self.is_opaque_cube = is_opaque_cube;
        self
    }

    fn with_fluid(mut self, is_fluid: bool) -> Self {
        self.is_fluid = is_fluid;
        self
    }

    /// The id chunks store for this block.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// The registry name of this block.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The behaviour variant of this block.
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Whether this is the empty block.
    pub fn is_air(&self) -> bool {
        self.id == AIR_ID
    }

    /// Whether this block fully hides whatever is behind it.
    ///
    /// Opaque cubes cull the faces of their neighbours and stop raycasts.
    pub fn is_opaque_cube(&self) -> bool {
        self.is_opaque_cube
    }

    /// Whether this block is a fluid (raycasts can opt in to hitting it).
    pub fn is_fluid(&self) -> bool {
        self.is_fluid
    }

    /// The texture used when a face has no override.
    pub fn main_texture(&self) -> TextureId {
        self.main_texture
    }

    /// The texture drawn on one face of this block.
    ///
    /// This is a pure function of the block and the face.
    pub fn face_texture(&self, side: BlockSide) -> TextureId {
        match self.kind {
            BlockKind::Plain => self.main_texture,
            BlockKind::Grass => match side {
                BlockSide::BOTTOM => texture("dirt"),
                BlockSide::TOP => texture("grass_top"),
                _ => texture("grass_side"),
            },
            BlockKind::Trunk => match side {
                BlockSide::BOTTOM | BlockSide::TOP => texture("trunk_inside"),
                _ => texture("trunk_side"),
            },
        }
    }
}

/// The table of every block prototype, indexed by id.
///
/// Built once with [`BlockRegistry::register_all`] and then shared read-only.
#[derive(Debug)]
pub struct BlockRegistry {
    /// Prototypes indexed by id; index 0 holds air.
    blocks: Vec<Block>,
}

impl BlockRegistry {
    /// Builds the registry with every block the game knows about.
    ///
    /// # Returns
    /// A registry whose ids match the `*_ID` constants of this module.
    pub fn register_all() -> Self {
        let mut registry = BlockRegistry {
            blocks: vec![Block::air()],
        };

        registry.register("stone", BlockKind::Plain, |b| b.with_main_texture("stone"));
        registry.register("dirt", BlockKind::Plain, |b| b.with_main_texture("dirt"));
        registry.register("grass", BlockKind::Grass, |b| b.with_main_texture("grass_side"));
        registry.register("trunk", BlockKind::Trunk, |b| b.with_main_texture("trunk_side"));
        registry.register("leaves", BlockKind::Plain, |b| b.with_main_texture("leaves"));
        registry.register("water", BlockKind::Plain, |b| {
            b.with_main_texture("water")
                .with_opaque_cube(false)
                .with_fluid(true)
        });

        log::info!("Registered {} block types", registry.registered_ids());
        registry
    }

    fn register(
        &mut self,
        name: &'static str,
        kind: BlockKind,
        configure: impl FnOnce(Block) -> Block,
    ) -> BlockId {
        let id = self.next_id();
        self.blocks.push(configure(Block::new(id, name, kind)));
        id
    }

    fn next_id(&self) -> BlockId {
        self.blocks.len() as BlockId
    }

    /// Looks up a prototype by id.
    ///
    /// Id 0 resolves to the air prototype.
    ///
    /// # Panics
    /// Panics if `id` is greater than [`registered_ids`](Self::registered_ids).
    /// Chunks only ever contain ids produced by this registry, so this is a
    /// caller bug rather than a runtime condition.
    pub fn from_id(&self, id: BlockId) -> &Block {
        &self.blocks[id as usize]
    }

    /// The air prototype.
    pub fn air(&self) -> &Block {
        &self.blocks[AIR_ID as usize]
    }

    /// Looks up a prototype by its registry name.
    pub fn by_name(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.name == name)
    }

    /// The number of registered (non-air) blocks; also the largest valid id.
    pub fn registered_ids(&self) -> usize {
        self.blocks.len() - 1
    }

    /// Iterates over every registered (non-air) block in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().skip(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_registration_order() {
        let registry = BlockRegistry::register_all();
        let names: Vec<&str> = registry.iter().map(Block::name).collect();
        assert_eq!(names, ["stone", "dirt", "grass", "trunk", "leaves", "water"]);
        for (index, block) in registry.iter().enumerate() {
            assert_eq!(block.id() as usize, index + 1);
        }
        assert_eq!(registry.by_name("water").map(Block::id), Some(WATER_ID));
    }

    #[test]
    fn face_textures_are_total_and_deterministic() {
        let registry = BlockRegistry::register_all();
        for block in registry.iter() {
            for side in BlockSide::all() {
                assert_eq!(block.face_texture(side), block.face_texture(side));
            }
        }
    }

    #[test]
    fn grass_varies_by_face() {
        let registry = BlockRegistry::register_all();
        let grass = registry.from_id(GRASS_ID);
        assert_eq!(grass.face_texture(BlockSide::BOTTOM), texture("dirt"));
        assert_eq!(grass.face_texture(BlockSide::TOP), texture("grass_top"));
        for side in [BlockSide::FRONT, BlockSide::RIGHT, BlockSide::BACK, BlockSide::LEFT] {
            assert_eq!(grass.face_texture(side), texture("grass_side"));
        }
    }

    #[test]
    fn water_is_a_see_through_fluid() {
        let registry = BlockRegistry::register_all();
        let water = registry.from_id(WATER_ID);
        assert!(water.is_fluid());
        assert!(!water.is_opaque_cube());
        assert!(registry.from_id(STONE_ID).is_opaque_cube());
        assert!(!registry.air().is_opaque_cube());
    }
}
