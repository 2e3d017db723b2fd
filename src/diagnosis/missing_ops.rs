//! Missing-operation detection (spec §4.7). Scans the registry and
//! counters; never reads or appends to the issue list.

use super::{MissingOperation, MAX_MISSING_OPERATIONS};
use crate::command::BufferUsage;
use crate::issue::Severity;
use crate::validator::Validator;

pub(super) fn detect(v: &Validator) -> Vec<MissingOperation> {
    let mut out = Vec::new();

    let has_shader = !v.registry().shaders.is_empty();
    let has_render_pipeline = !v.registry().render_pipelines.is_empty();
    let has_compute_pipeline = !v.registry().compute_pipelines.is_empty();

    if has_render_pipeline || v.draw_count() > 0 {
        if !has_shader {
            out.push(op("shader", Severity::Error, "no shader module was created for the render path", None));
        }
        if !has_render_pipeline {
            out.push(op("render_pipeline", Severity::Error, "no render pipeline was created", None));
        }
        if v.draw_count() == 0 {
            out.push(op("draw", Severity::Error, "a render pipeline exists but no draw was issued", None));
        } else if v.render_pass_count() == 0 {
            out.push(op(
                "render_pass",
                Severity::Error,
                "draws were issued but no render pass was ever opened",
                None,
            ));
        }
    }

    if has_compute_pipeline || v.dispatch_count() > 0 {
        if !has_shader {
            out.push(op("compute_shader", Severity::Error, "no shader module was created for the compute path", None));
        }
        if !has_compute_pipeline {
            out.push(op("compute_pipeline", Severity::Error, "no compute pipeline was created", None));
        }
        if v.dispatch_count() == 0 {
            out.push(op("dispatch", Severity::Error, "a compute pipeline exists but no dispatch was issued", None));
        } else if v.compute_pass_count() == 0 {
            out.push(op(
                "compute_pass",
                Severity::Error,
                "dispatches were issued but no compute pass was ever opened",
                None,
            ));
        }
    }

    let mut bind_group_ids: Vec<u16> = v.registry().bind_groups.keys().copied().collect();
    bind_group_ids.sort_unstable();
    for id in bind_group_ids {
        if !v.bind_groups_bound().contains(&id) {
            out.push(op(
                "bind_group_slot",
                Severity::Warning,
                "a bind group was created but no slot ever referenced it",
                Some("bind it with set_bind_group, or remove it if unused"),
            ));
        }
    }

    let mut uniform_buffer_ids: Vec<u16> = v
        .registry()
        .buffers
        .iter()
        .filter(|(_, b)| BufferUsage::from_bits_truncate(b.usage).contains(BufferUsage::UNIFORM))
        .map(|(id, _)| *id)
        .collect();
    uniform_buffer_ids.sort_unstable();
    for id in uniform_buffer_ids {
        if !v.buffers_written().contains(&id) {
            out.push(op(
                "uniform_buffer_write",
                Severity::Warning,
                "a uniform buffer was created but never written",
                Some("write it with write_buffer before the pass that reads it"),
            ));
        }
    }

    out.truncate(MAX_MISSING_OPERATIONS);
    out
}

fn op(
    operation: &'static str,
    severity: Severity,
    message: &'static str,
    context: Option<&'static str>,
) -> MissingOperation {
    MissingOperation { operation, severity, message, context }
}
