//! C4: the per-kind resource registry (spec §3, §4.4).
//!
//! One map per resource kind, all owned by a single [`Registry`]. Resources
//! never get removed within a run (invariant 1) and are capped at
//! [`MAX_RESOURCES`] per kind.

use std::collections::HashMap;

use crate::descriptor::TextureDimension;
use crate::limits::MAX_RESOURCES;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferRecord {
    pub size: u32,
    pub usage: u8,
    pub created_at: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureRecord {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub format: u8,
    pub usage: u8,
    pub sample_count: u8,
    pub mip_level_count: u8,
    pub dimension: TextureDimension,
    pub created_at: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimpleRecord {
    pub created_at: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineKind {
    Render,
    Compute,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineRecord {
    pub kind: PipelineKind,
    pub created_at: u32,
}

/// The outcome of attempting to register a resource under an identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insert {
    Created,
    /// The identifier was already registered for this kind; per spec §3
    /// lifecycle rules the original record is left untouched.
    Duplicate,
    /// The per-kind cap ([`MAX_RESOURCES`]) would be exceeded.
    CapacityExceeded,
}

/// Nine keyed containers, one per resource kind (spec §3, §4.4).
#[derive(Default)]
pub struct Registry {
    pub buffers: HashMap<u16, BufferRecord>,
    pub textures: HashMap<u16, TextureRecord>,
    pub samplers: HashMap<u16, SimpleRecord>,
    pub shaders: HashMap<u16, SimpleRecord>,
    pub bind_groups: HashMap<u16, SimpleRecord>,
    pub texture_views: HashMap<u16, SimpleRecord>,
    pub image_bitmaps: HashMap<u16, SimpleRecord>,
    pub typed_arrays: HashMap<u16, SimpleRecord>,
    pub wasm_modules: HashMap<u16, SimpleRecord>,
    pub render_pipelines: HashMap<u16, PipelineRecord>,
    pub compute_pipelines: HashMap<u16, PipelineRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert into any `HashMap<u16, T>`-shaped map, enforcing duplicate-id
    /// and per-kind capacity rules uniformly.
    pub fn insert<T>(map: &mut HashMap<u16, T>, id: u16, record: T) -> Insert {
        if map.contains_key(&id) {
            return Insert::Duplicate;
        }
        if map.len() >= MAX_RESOURCES {
            return Insert::CapacityExceeded;
        }
        map.insert(id, record);
        Insert::Created
    }

    /// Snapshot of per-kind resource counts, for [`crate::validator::Validator::get_resource_counts`].
    pub fn counts(&self) -> ResourceCounts {
        ResourceCounts {
            buffers: self.buffers.len(),
            textures: self.textures.len(),
            samplers: self.samplers.len(),
            shaders: self.shaders.len(),
            bind_groups: self.bind_groups.len(),
            texture_views: self.texture_views.len(),
            image_bitmaps: self.image_bitmaps.len(),
            typed_arrays: self.typed_arrays.len(),
            wasm_modules: self.wasm_modules.len(),
            render_pipelines: self.render_pipelines.len(),
            compute_pipelines: self.compute_pipelines.len(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResourceCounts {
    pub buffers: usize,
    pub textures: usize,
    pub samplers: usize,
    pub shaders: usize,
    pub bind_groups: usize,
    pub texture_views: usize,
    pub image_bitmaps: usize,
    pub typed_arrays: usize,
    pub wasm_modules: usize,
    pub render_pipelines: usize,
    pub compute_pipelines: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_insert_leaves_original() {
        let mut map = HashMap::new();
        assert_eq!(
            Registry::insert(&mut map, 1, BufferRecord { size: 256, usage: 1, created_at: 0 }),
            Insert::Created
        );
        assert_eq!(
            Registry::insert(&mut map, 1, BufferRecord { size: 512, usage: 2, created_at: 1 }),
            Insert::Duplicate
        );
        assert_eq!(map[&1].size, 256);
    }

    #[test]
    fn capacity_exceeded_past_max_resources() {
        let mut map = HashMap::new();
        for id in 0..MAX_RESOURCES as u16 {
            assert_eq!(
                Registry::insert(&mut map, id, SimpleRecord { created_at: 0 }),
                Insert::Created
            );
        }
        assert_eq!(
            Registry::insert(&mut map, MAX_RESOURCES as u16, SimpleRecord { created_at: 0 }),
            Insert::CapacityExceeded
        );
    }
}
