//! The six symptom routines (spec §4.7). Each is a pure function over the
//! validator's final state, selecting a small fixed-order check list and
//! deriving `likely_cause` + `probability` by a deterministic cascade over
//! the same conditions the checks report on.

use super::{Check, Symptom, SymptomReport};
use crate::issue::Severity;
use crate::validator::Validator;

pub(super) fn diagnose(validator: &Validator, symptom: Symptom) -> SymptomReport {
    match symptom {
        Symptom::BlackScreen => black_screen(validator),
        Symptom::WrongColors => wrong_colors(validator),
        Symptom::BlendIssues => blend_issues(validator),
        Symptom::TransparentOutput => transparent_output(validator),
        Symptom::Flickering => flickering(validator),
        Symptom::GeometryIssues => geometry_issues(validator),
    }
}

fn check(name: &'static str, passed: bool, message: &'static str, suggestion: Option<&'static str>) -> Check {
    Check {
        name,
        passed,
        severity: if passed { Severity::Warning } else { Severity::Error },
        message,
        suggestion,
    }
}

/// spec §4.7 worked example, reproduced exactly: "if `draw_count = 0` →
/// cause 'No draws' probability 95; else if no render pass → probability
/// 90; else if no render pipeline → 85; else if no shader → 80; else none".
fn black_screen(v: &Validator) -> SymptomReport {
    let has_draws = v.draw_count() > 0;
    let had_render_pass = v.render_pass_count() > 0;
    let has_render_pipeline = !v.registry().render_pipelines.is_empty();
    let has_shader = !v.registry().shaders.is_empty();

    let checks = vec![
        check("draw_issued", has_draws, "at least one draw command was issued", Some("issue a draw call inside a render pass")),
        check("render_pass_opened", had_render_pass, "a render pass was opened", Some("wrap draws in begin_render_pass/end_pass")),
        check("render_pipeline_created", has_render_pipeline, "a render pipeline was created", Some("create a render pipeline before drawing")),
        check("shader_created", has_shader, "a shader module was created", Some("create the shader the pipeline references")),
    ];

    let (likely_cause, probability) = if !has_draws {
        (Some("No draws"), 95)
    } else if !had_render_pass {
        (Some("No render pass"), 90)
    } else if !has_render_pipeline {
        (Some("No render pipeline"), 85)
    } else if !has_shader {
        (Some("No shader"), 80)
    } else {
        (None, 0)
    };

    SymptomReport { symptom: Symptom::BlackScreen, checks, likely_cause, probability }
}

fn wrong_colors(v: &Validator) -> SymptomReport {
    let has_shader = !v.registry().shaders.is_empty();
    let has_render_pipeline = !v.registry().render_pipelines.is_empty();
    let has_texture = !v.registry().textures.is_empty();

    let checks = vec![
        check("shader_created", has_shader, "a shader module was created", Some("create the shader that computes output color")),
        check("render_pipeline_created", has_render_pipeline, "a render pipeline was created", Some("create a render pipeline before drawing")),
        check("color_texture_created", has_texture, "a texture exists for the color target", Some("create a texture to render into")),
    ];

    let (likely_cause, probability) = if !has_shader {
        (Some("No shader"), 90)
    } else if !has_render_pipeline {
        (Some("No render pipeline"), 85)
    } else if !has_texture {
        (Some("No color target texture"), 70)
    } else {
        (None, 0)
    };

    SymptomReport { symptom: Symptom::WrongColors, checks, likely_cause, probability }
}

fn blend_issues(v: &Validator) -> SymptomReport {
    let has_render_pipeline = !v.registry().render_pipelines.is_empty();
    let has_draws = v.draw_count() > 0;
    let has_render_attachment_texture = v
        .registry()
        .textures
        .values()
        .any(|t| crate::command::TextureUsage::from_bits_truncate(t.usage).contains(crate::command::TextureUsage::RENDER_ATTACHMENT));

    let checks = vec![
        check("render_pipeline_created", has_render_pipeline, "a render pipeline was created", Some("create a render pipeline with the desired blend state")),
        check("draw_issued", has_draws, "at least one draw command was issued", Some("issue a draw call to exercise blending")),
        check("render_attachment_texture_created", has_render_attachment_texture, "a texture with RENDER_ATTACHMENT usage exists", Some("create the texture with RENDER_ATTACHMENT usage")),
    ];

    let (likely_cause, probability) = if !has_render_pipeline {
        (Some("No render pipeline"), 85)
    } else if !has_draws {
        (Some("No draws"), 80)
    } else if !has_render_attachment_texture {
        (Some("No render-attachment texture"), 60)
    } else {
        (None, 0)
    };

    SymptomReport { symptom: Symptom::BlendIssues, checks, likely_cause, probability }
}

fn transparent_output(v: &Validator) -> SymptomReport {
    let has_render_pipeline = !v.registry().render_pipelines.is_empty();
    let has_draws = v.draw_count() > 0;
    let has_bind_group = !v.registry().bind_groups.is_empty() && !v.bind_groups_bound().is_empty();

    let checks = vec![
        check("render_pipeline_created", has_render_pipeline, "a render pipeline was created", Some("create a render pipeline before drawing")),
        check("draw_issued", has_draws, "at least one draw command was issued", Some("issue a draw call")),
        check("bind_group_bound", has_bind_group, "a bind group was created and bound", Some("bind the texture/sampler bind group before drawing")),
    ];

    let (likely_cause, probability) = if !has_render_pipeline {
        (Some("No render pipeline"), 85)
    } else if !has_draws {
        (Some("No draws"), 80)
    } else if !has_bind_group {
        (Some("No bind group bound for texture sampling"), 65)
    } else {
        (None, 0)
    };

    SymptomReport { symptom: Symptom::TransparentOutput, checks, likely_cause, probability }
}

fn flickering(v: &Validator) -> SymptomReport {
    let had_render_pass = v.render_pass_count() > 0;
    let multiple_passes = v.render_pass_count() > 1;

    let checks = vec![
        check("render_pass_opened", had_render_pass, "a render pass was opened", Some("wrap draws in begin_render_pass/end_pass")),
        check("single_render_pass_per_frame", !multiple_passes, "exactly one render pass was opened", Some("consolidate multiple render passes per frame if unintended")),
    ];

    let (likely_cause, probability) = if !had_render_pass {
        (Some("No render pass"), 85)
    } else if multiple_passes {
        (Some("Multiple render passes without synchronization"), 55)
    } else {
        (None, 0)
    };

    SymptomReport { symptom: Symptom::Flickering, checks, likely_cause, probability }
}

fn geometry_issues(v: &Validator) -> SymptomReport {
    let has_vertex_buffer = v.has_bound_vertex_buffer();
    let has_draws = v.draw_count() > 0;
    let has_render_pipeline = !v.registry().render_pipelines.is_empty();

    let checks = vec![
        check("vertex_buffer_bound", has_vertex_buffer, "a vertex buffer was bound before drawing", Some("bind a vertex buffer, or confirm a vertex-pulling technique is intended")),
        check("draw_issued", has_draws, "at least one draw command was issued", Some("issue a draw call")),
        check("render_pipeline_created", has_render_pipeline, "a render pipeline was created", Some("create a render pipeline before drawing")),
    ];

    let (likely_cause, probability) = if !has_vertex_buffer {
        (Some("No vertex buffer bound"), 75)
    } else if !has_draws {
        (Some("No draws"), 80)
    } else if !has_render_pipeline {
        (Some("No render pipeline"), 85)
    } else {
        (None, 0)
    };

    SymptomReport { symptom: Symptom::GeometryIssues, checks, likely_cause, probability }
}
