//! C3: the embedded TLV descriptor parser (spec §4.3).
//!
//! Descriptors are indexed by `{desc_ptr, desc_len}` pairs that the command
//! stream never inlines; when the caller hands the validator a WASM memory
//! snapshot, [`parse_texture_descriptor`] decodes the bytes at that range
//! directly.

use crate::le::read_u32_le;

pub const DESC_TYPE_TEXTURE: u8 = 0x02;

const FIELD_WIDTH: u8 = 0x01;
const FIELD_HEIGHT: u8 = 0x02;
const FIELD_DEPTH: u8 = 0x03;
const FIELD_MIP_LEVEL_COUNT: u8 = 0x04;
const FIELD_SAMPLE_COUNT: u8 = 0x05;
const FIELD_DIMENSION: u8 = 0x06;
const FIELD_FORMAT: u8 = 0x07;
const FIELD_USAGE: u8 = 0x08;

const VALUE_U32: u8 = 0x01;
const VALUE_STRING_ID: u8 = 0x02;
const VALUE_ARRAY: u8 = 0x03;
const VALUE_NESTED: u8 = 0x04;
const VALUE_BOOL: u8 = 0x05;
const VALUE_U16: u8 = 0x06;
const VALUE_ENUM: u8 = 0x07;

const MAX_FIELDS: u8 = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureDimension {
    D1,
    D2,
    D3,
}

/// Texture properties decoded from a TLV descriptor blob, with defaults
/// applied for any field the blob omits (spec §4.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureDescriptor {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub format: u8,
    pub usage: u8,
    pub sample_count: u8,
    pub mip_level_count: u8,
    pub dimension: TextureDimension,
    /// Total bytes consumed by the TLV walk, including the 2-byte header.
    /// Used by the dispatcher's `W006 suspicious_descriptor` heuristic.
    pub byte_len: u32,
}

impl Default for TextureDescriptor {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            depth: 1,
            format: 0,
            usage: 0,
            sample_count: 1,
            mip_level_count: 1,
            dimension: TextureDimension::D2,
            byte_len: 0,
        }
    }
}

/// Decode a texture descriptor from `memory[ptr..ptr+len]`.
///
/// Unknown field ids are skipped (their value is still consumed so the
/// stream stays aligned) and an unrecognized `value_type` aborts the walk,
/// returning whatever fields were already accumulated (spec §4.3).
pub fn parse_texture_descriptor(memory: &[u8], ptr: u32, len: u32) -> TextureDescriptor {
    let mut desc = TextureDescriptor::default();

    let start = ptr as usize;
    let end = match (ptr as u64).checked_add(len as u64) {
        Some(e) if e <= memory.len() as u64 => e as usize,
        _ => return desc,
    };
    if end < start + 2 {
        return desc;
    }

    // byte 0: descriptor type tag (ignored here, caller already knows it's
    // a texture descriptor); byte 1: field count.
    let field_count = memory[start + 1].min(MAX_FIELDS);
    let mut pos = start + 2;

    for _ in 0..field_count {
        if pos + 2 > end {
            break;
        }
        let field_id = memory[pos];
        let value_type = memory[pos + 1];
        pos += 2;

        let value_len = match value_type {
            VALUE_U32 => 4,
            VALUE_ENUM | VALUE_BOOL => 1,
            VALUE_U16 => 2,
            VALUE_STRING_ID | VALUE_ARRAY | VALUE_NESTED => {
                // Not used by texture descriptors in this validator; the
                // original format doesn't fix a width for these, so there
                // is nothing safe to skip past. Stop accumulating here.
                break;
            }
            _ => break,
        };
        if pos + value_len > end {
            break;
        }

        match (field_id, value_type) {
            (FIELD_WIDTH, VALUE_U32) => desc.width = read_u32_le(memory, pos),
            (FIELD_HEIGHT, VALUE_U32) => desc.height = read_u32_le(memory, pos),
            (FIELD_DEPTH, VALUE_U32) => desc.depth = read_u32_le(memory, pos),
            (FIELD_MIP_LEVEL_COUNT, VALUE_U32) => desc.mip_level_count = read_u32_le(memory, pos) as u8,
            (FIELD_SAMPLE_COUNT, VALUE_U32) => desc.sample_count = read_u32_le(memory, pos) as u8,
            (FIELD_DIMENSION, VALUE_ENUM) => {
                desc.dimension = match memory[pos] {
                    0 => TextureDimension::D1,
                    2 => TextureDimension::D2,
                    3 => TextureDimension::D3,
                    _ => desc.dimension,
                }
            }
            (FIELD_FORMAT, VALUE_ENUM) => desc.format = memory[pos],
            (FIELD_USAGE, VALUE_U32) => desc.usage = read_u32_le(memory, pos) as u8,
            // unrecognized field id: value already skipped below, ignore.
            _ => {}
        }
        pos += value_len;
    }

    desc.byte_len = (pos - start) as u32;
    desc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_field(buf: &mut Vec<u8>, field_id: u8, value_type: u8, value: &[u8]) {
        buf.push(field_id);
        buf.push(value_type);
        buf.extend_from_slice(value);
    }

    #[test]
    fn defaults_when_len_zero() {
        let memory = vec![0u8; 16];
        let desc = parse_texture_descriptor(&memory, 0, 0);
        assert_eq!(desc, TextureDescriptor::default());
    }

    #[test]
    fn decodes_width_height_format_usage() {
        let mut body = vec![DESC_TYPE_TEXTURE, 3u8];
        push_field(&mut body, FIELD_WIDTH, VALUE_U32, &64u32.to_le_bytes());
        push_field(&mut body, FIELD_HEIGHT, VALUE_U32, &32u32.to_le_bytes());
        push_field(&mut body, FIELD_USAGE, VALUE_U32, &0x10u32.to_le_bytes());

        let desc = parse_texture_descriptor(&body, 0, body.len() as u32);
        assert_eq!(desc.width, 64);
        assert_eq!(desc.height, 32);
        assert_eq!(desc.usage, 0x10);
        assert_eq!(desc.depth, 1);
    }

    #[test]
    fn overflowing_range_returns_defaults() {
        let memory = vec![0u8; 8];
        let desc = parse_texture_descriptor(&memory, u32::MAX, 10);
        assert_eq!(desc, TextureDescriptor::default());
    }
}
