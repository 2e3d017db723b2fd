//! C5: pass/pipeline state machine (spec §3 invariants 2–4).

use crate::registry::PipelineKind;

/// Current pass kind. Legal transitions: `None -> Render`, `None ->
/// Compute` on `begin_*`, and `_ -> None` on `end_pass`; no others.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassState {
    None,
    Render,
    Compute,
}

/// The currently-bound pipeline identifier and kind, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundPipeline {
    pub id: Option<u16>,
    pub kind: Option<PipelineKind>,
}

/// The fixed-size slot arrays cleared on every pass boundary (spec
/// invariant 4): 8 vertex-buffer slots, 4 bind-group slots.
#[derive(Clone, Copy, Debug)]
pub struct BoundSlots {
    pub vertex_buffers: [Option<u16>; 8],
    pub bind_groups: [Option<u16>; 4],
}

impl Default for BoundSlots {
    fn default() -> Self {
        Self {
            vertex_buffers: [None; 8],
            bind_groups: [None; 4],
        }
    }
}

impl BoundSlots {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearing_slots_resets_all() {
        let mut slots = BoundSlots::default();
        slots.vertex_buffers[0] = Some(1);
        slots.bind_groups[0] = Some(2);
        slots.clear();
        assert_eq!(slots.vertex_buffers, [None; 8]);
        assert_eq!(slots.bind_groups, [None; 4]);
    }
}
