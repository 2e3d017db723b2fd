//! Universally-quantified invariants from spec §8, checked over small
//! representative sweeps rather than a full proptest harness (the
//! dependency stack this crate draws from doesn't carry one).

mod common;

use common::StreamBuilder;
use gpu_trace_validator::command::Opcode;
use gpu_trace_validator::issue::codes;
use gpu_trace_validator::{parser, ParseError, Validator};

#[test]
fn truncated_header_always_yields_empty_sequence() {
    for len in 0..8 {
        let data = vec![0xAAu8; len];
        assert_eq!(parser::parse(&data).unwrap(), Vec::new(), "len={len}");
    }
}

#[test]
fn declared_length_over_buffer_always_fails() {
    for declared in [9u32, 100, 1000, u32::MAX] {
        let mut data = declared.to_le_bytes().to_vec();
        data.extend_from_slice(&0u32.to_le_bytes());
        let err = parser::parse(&data).unwrap_err();
        assert_eq!(err, ParseError::InvalidFormat { declared, actual: data.len() });
    }
}

#[test]
fn issue_count_is_bounded_by_four_times_command_count() {
    // each duplicate create_buffer contributes at most one issue; repeat
    // enough times to exercise the bound without hand-picking a single case.
    for n in [1usize, 5, 20, 100] {
        let mut builder = StreamBuilder::new().create_buffer(0, 256, 0x20);
        for _ in 0..n {
            builder = builder.create_buffer(0, 256, 0x20);
        }
        let stream = builder.end().finish();
        let commands = parser::parse(&stream).unwrap();
        let mut v = Validator::new();
        v.validate(&commands);
        assert!(v.issues().len() <= 4 * commands.len(), "n={n}");
    }
}

#[test]
fn e004_fires_iff_overflow_or_past_memory_size() {
    let mem_size = 1_000u32;
    let cases: &[(u32, u32, bool)] = &[
        (0, 0, false),
        (500, 500, false),
        (500, 500, true),  // ptr+len == mem_size, passes
        (500, 501, true),  // ptr+len == mem_size+1, fails
        (u32::MAX, 1, true), // overflow
        (u32::MAX - 10, 20, true), // overflow
    ];

    for &(ptr, len, configured) in cases {
        let overflowed = ptr.checked_add(len).is_none();
        let over_size = ptr.checked_add(len).map(|e| e > mem_size).unwrap_or(false);
        let expect_e004 = overflowed || (configured && over_size);

        let stream = StreamBuilder::new().create_shader(0, ptr, len).end().finish();
        let commands = parser::parse(&stream).unwrap();
        let mut v = Validator::new();
        if configured {
            v.set_wasm_memory_size(mem_size);
        }
        v.validate(&commands);

        let has_e004 = v.issues().iter().any(|i| i.code == codes::MEMORY_BOUNDS);
        assert_eq!(has_e004, expect_e004, "ptr={ptr} len={len} configured={configured}");
    }
}

#[test]
fn e006_from_usage_and_size_is_a_deterministic_function() {
    // a representative sweep over usage bytes and sizes; every run is
    // independent so determinism shows as "same inputs, same issue shape".
    for usage in 0u8..=255 {
        for size in [0u32, 1, 256] {
            let stream = StreamBuilder::new().create_buffer(0, size, usage).end().finish();
            let commands = parser::parse(&stream).unwrap();

            let mut first = Validator::new();
            first.validate(&commands);
            let mut second = Validator::new();
            second.validate(&commands);

            let codes_a: Vec<_> = first.issues().iter().map(|i| i.code).collect();
            let codes_b: Vec<_> = second.issues().iter().map(|i| i.code).collect();
            assert_eq!(codes_a, codes_b, "usage={usage:#04x} size={size}");
        }
    }
}

#[test]
fn unclosed_pass_emits_exactly_one_trailing_e007() {
    for opcode in [Opcode::BeginRenderPass, Opcode::BeginComputePass] {
        let stream = match opcode {
            Opcode::BeginRenderPass => StreamBuilder::new()
                .begin_render_pass(gpu_trace_validator::command::CANVAS_SENTINEL, 1, 1, gpu_trace_validator::command::CANVAS_SENTINEL)
                .end()
                .finish(),
            _ => StreamBuilder::new().begin_compute_pass().end().finish(),
        };
        let commands = parser::parse(&stream).unwrap();
        let mut v = Validator::new();
        v.validate(&commands);

        let trailing: Vec<_> = v
            .issues()
            .iter()
            .filter(|i| i.code == codes::PASS_MISMATCH && i.command_index == commands.len() as u32)
            .collect();
        assert_eq!(trailing.len(), 1, "{opcode:?}");
    }
}

#[test]
fn validate_is_repeatable_across_fresh_validators() {
    let stream = StreamBuilder::new()
        .create_buffer(0, 256, 0x20)
        .create_shader(0, 4, 100)
        .create_resource(Opcode::CreateRenderPipeline, 0, 0, 0)
        .begin_render_pass(gpu_trace_validator::command::CANVAS_SENTINEL, 1, 1, gpu_trace_validator::command::CANVAS_SENTINEL)
        .set_pipeline(0)
        .draw(3, 1, 0, 0)
        .end_pass()
        .submit()
        .end()
        .finish();
    let commands = parser::parse(&stream).unwrap();

    let mut a = Validator::new();
    a.validate(&commands);
    let mut b = Validator::new();
    b.validate(&commands);

    assert_eq!(a.issues(), b.issues());
    assert_eq!(a.draw_count(), b.draw_count());
}
