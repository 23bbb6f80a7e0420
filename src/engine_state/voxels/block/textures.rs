//! # Texture Table
//!
//! Maps texture names to their index in the texture atlas. The atlas itself is
//! owned by the renderer; the voxel core only ever hands out these indices.

/// Index of a texture in the renderer's texture atlas.
pub type TextureId = u8;

/// Texture index used for blocks that never set a texture of their own.
pub const PLACEHOLDER_TEXTURE: TextureId = 0;

/// Compile-time map of texture names to atlas indices.
pub static TEXTURES: phf::Map<&'static str, TextureId> = phf::phf_map! {
    "placeholder" => 0,
    "stone" => 1,
    "dirt" => 2,
    "grass_side" => 3,
    "grass_top" => 4,
    "trunk_side" => 5,
    "trunk_inside" => 6,
    "leaves" => 7,
    "water" => 8,
};

/// Looks up a texture by name, falling back to the placeholder texture.
///
/// A missing name is a programming error in the registry, so it is logged
/// rather than propagated.
pub fn texture(name: &str) -> TextureId {
    match TEXTURES.get(name) {
        Some(id) => *id,
        None => {
            log::warn!("Unknown texture {:?}, using placeholder", name);
            PLACEHOLDER_TEXTURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_indices_are_unique() {
        let mut seen: Vec<TextureId> = TEXTURES.values().copied().collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), TEXTURES.len());
    }

    #[test]
    fn unknown_texture_is_placeholder() {
        assert_eq!(texture("no_such_texture"), PLACEHOLDER_TEXTURE);
        assert_eq!(texture("stone"), 1);
    }
}
