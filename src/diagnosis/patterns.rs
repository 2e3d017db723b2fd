//! Pattern detection (spec §4.7): recognizable authoring idioms inferred
//! from the registry and counters, each carrying a fixed confidence score.

use super::{PatternMatch, MAX_PATTERNS};
use crate::command::BufferUsage;
use crate::validator::Validator;

pub(super) fn detect(v: &Validator) -> Vec<PatternMatch> {
    let mut out = Vec::new();

    if v.draw_count() > 0 && !v.has_bound_vertex_buffer() {
        out.push(PatternMatch {
            name: "fullscreen_quad",
            description: "draws issued with no vertex buffer ever bound, typical of a fullscreen triangle/quad technique",
            confidence: 85,
        });
    }

    let has_render_pipeline = !v.registry().render_pipelines.is_empty();
    let has_compute_pipeline = !v.registry().compute_pipelines.is_empty();

    let storage_buffers: Vec<(u16, u32)> = v
        .registry()
        .buffers
        .iter()
        .filter(|(_, b)| BufferUsage::from_bits_truncate(b.usage).contains(BufferUsage::STORAGE))
        .map(|(id, b)| (*id, b.size))
        .collect();

    if !storage_buffers.is_empty() && has_render_pipeline {
        out.push(PatternMatch {
            name: "instanced_rendering",
            description: "a storage buffer and a render pipeline coexist, typical of instance-data-driven rendering",
            confidence: 60,
        });
    }

    if has_duplicate_size(&storage_buffers) {
        out.push(PatternMatch {
            name: "ping_pong_buffers",
            description: "two storage buffers of identical size exist, typical of a double-buffered compute pass",
            confidence: 75,
        });
    }

    if has_compute_pipeline && v.dispatch_count() > 0 {
        let confidence = if has_render_pipeline && v.draw_count() > 0 { 80 } else { 50 };
        out.push(PatternMatch {
            name: "compute_simulation",
            description: "a compute pipeline is dispatched, typical of a GPU-driven simulation step",
            confidence,
        });
    }

    let has_storage_vertex_buffer = v.registry().buffers.values().any(|b| {
        let bits = BufferUsage::from_bits_truncate(b.usage);
        bits.contains(BufferUsage::STORAGE) && bits.contains(BufferUsage::VERTEX)
    });
    if has_compute_pipeline && v.dispatch_count() > 0 && has_storage_vertex_buffer && v.draw_count() > 0 {
        out.push(PatternMatch {
            name: "particle_system",
            description: "a compute-updated buffer is also bound as vertex input and drawn, typical of a GPU particle system",
            confidence: 75,
        });
    }

    out.truncate(MAX_PATTERNS);
    out
}

fn has_duplicate_size(buffers: &[(u16, u32)]) -> bool {
    let mut sizes: Vec<u32> = buffers.iter().map(|(_, size)| *size).collect();
    sizes.sort_unstable();
    sizes.windows(2).any(|w| w[0] == w[1])
}
