//! C2: the binary command parser (spec §4.2).

use crate::command::{Command, MemRef, Opcode, Params};
use crate::error::ParseError;
use crate::le::{read_u16_le, read_u32_le};
use crate::limits::MAX_COMMANDS;

const HEADER_LEN: usize = 8;

/// Parse a length-prefixed command-buffer byte stream into an ordered
/// sequence of typed commands.
///
/// Tolerates trivial truncation (`data.len() < 8`) by returning an empty
/// sequence rather than an error. Fails with [`ParseError::InvalidFormat`]
/// when the header disagrees with the buffer length, and with
/// [`ParseError::Truncated`] when a payload would run past `total_len`.
pub fn parse(data: &[u8]) -> Result<Vec<Command>, ParseError> {
    if data.len() < HEADER_LEN {
        return Ok(Vec::new());
    }

    let total_len = read_u32_le(data, 0) as usize;
    // bytes 4..8 are `frame_count`, reserved and opaque to the core.
    if total_len > data.len() {
        log::warn!(
            "rejecting command stream: declared length {total_len} exceeds buffer length {}",
            data.len()
        );
        return Err(ParseError::InvalidFormat {
            declared: total_len as u32,
            actual: data.len(),
        });
    }

    let mut commands = Vec::new();
    let mut pos = HEADER_LEN;
    let mut loop_counter: u32 = 0;

    while (loop_counter as usize) < MAX_COMMANDS {
        if pos >= total_len {
            log::warn!("rejecting command stream: no terminal `end` opcode within declared length");
            return Err(ParseError::InvalidFormat {
                declared: total_len as u32,
                actual: data.len(),
            });
        }

        let tag_offset = pos;
        let tag = data[pos];
        pos += 1;

        let opcode = match Opcode::from_tag(tag) {
            Some(op) => op,
            None => {
                log::warn!("rejecting command stream: unknown opcode tag {tag} at offset {tag_offset}");
                return Err(ParseError::Truncated { offset: tag_offset });
            }
        };

        let params = if opcode == Opcode::ExecuteBundles {
            require_bytes(data, pos, 1, total_len)?;
            let count = data[pos] as usize;
            let payload_len = 1 + 2 * count;
            require_bytes(data, pos, payload_len, total_len)?;
            let mut bundle_ids = Vec::with_capacity(count);
            let mut cursor = pos + 1;
            for _ in 0..count {
                bundle_ids.push(read_u16_le(data, cursor));
                cursor += 2;
            }
            pos += payload_len;
            Params::ExecuteBundles { bundle_ids }
        } else {
            let payload_len = opcode.fixed_payload_len();
            require_bytes(data, pos, payload_len, total_len)?;
            let params = decode_payload(opcode, data, pos);
            pos += payload_len;
            params
        };

        commands.push(Command {
            index: loop_counter,
            opcode,
            params,
        });
        loop_counter += 1;

        if opcode == Opcode::End {
            return Ok(commands);
        }
    }

    log::warn!("rejecting command stream: exceeded MAX_COMMANDS ({MAX_COMMANDS}) without a terminal `end`");
    Err(ParseError::InvalidFormat {
        declared: total_len as u32,
        actual: data.len(),
    })
}

fn require_bytes(data: &[u8], pos: usize, len: usize, total_len: usize) -> Result<(), ParseError> {
    if pos + len > total_len || pos + len > data.len() {
        return Err(ParseError::Truncated { offset: pos });
    }
    Ok(())
}

fn mem_ref(data: &[u8], offset: usize) -> MemRef {
    MemRef {
        ptr: read_u32_le(data, offset),
        len: read_u32_le(data, offset + 4),
    }
}

fn decode_payload(opcode: Opcode, data: &[u8], p: usize) -> Params {
    use Opcode::*;
    match opcode {
        CreateBuffer => Params::CreateBuffer {
            id: read_u16_le(data, p),
            size: read_u32_le(data, p + 2),
            usage: data[p + 6],
        },
        CreateTexture | CreateSampler | CreateBindGroupLayout | CreatePipelineLayout
        | CreateQuerySet | CreateRenderBundle | CreateRenderPipeline | CreateComputePipeline
        | CreateImageBitmap => Params::CreateResource {
            id: read_u16_le(data, p),
            desc: mem_ref(data, p + 2),
        },
        CreateShader => Params::CreateShader {
            id: read_u16_le(data, p),
            code: mem_ref(data, p + 2),
        },
        CreateBindGroup => Params::CreateBindGroup {
            id: read_u16_le(data, p),
            layout_id: read_u16_le(data, p + 2),
            entries: mem_ref(data, p + 4),
        },
        CreateTextureView => Params::CreateTextureView {
            id: read_u16_le(data, p),
            texture_id: read_u16_le(data, p + 2),
            desc: mem_ref(data, p + 4),
        },
        BeginRenderPass => Params::BeginRenderPass {
            color_id: read_u16_le(data, p),
            load_op: data[p + 2],
            store_op: data[p + 3],
            depth_id: read_u16_le(data, p + 4),
        },
        BeginComputePass | EndPass | Submit | End => Params::Empty,
        SetPipeline => Params::SetPipeline {
            id: read_u16_le(data, p),
        },
        SetBindGroup | SetVertexBuffer => Params::SetSlot {
            slot: data[p],
            id: read_u16_le(data, p + 1),
        },
        SetIndexBuffer => Params::SetIndexBuffer {
            id: read_u16_le(data, p),
            format: data[p + 2],
        },
        Draw => Params::Draw {
            vertex_count: read_u32_le(data, p),
            instance_count: read_u32_le(data, p + 4),
            first_vertex: read_u32_le(data, p + 8),
            first_instance: read_u32_le(data, p + 12),
        },
        DrawIndexed => Params::DrawIndexed {
            index_count: read_u32_le(data, p),
            instance_count: read_u32_le(data, p + 4),
            first_index: read_u32_le(data, p + 8),
            base_vertex: read_u32_le(data, p + 12),
            first_instance: read_u32_le(data, p + 16),
        },
        Dispatch => Params::Dispatch {
            x: read_u32_le(data, p),
            y: read_u32_le(data, p + 4),
            z: read_u32_le(data, p + 8),
        },
        ExecuteBundles => unreachable!("handled by variable-length path"),
        WriteBuffer => Params::WriteBuffer {
            id: read_u16_le(data, p),
            offset: read_u32_le(data, p + 2),
            data: mem_ref(data, p + 6),
        },
        WriteTimeUniform => Params::WriteTimeUniform {
            id: read_u16_le(data, p),
            offset: read_u32_le(data, p + 2),
            size: read_u16_le(data, p + 6),
        },
        CopyBufferToBuffer => Params::CopyBufferToBuffer {
            src_id: read_u16_le(data, p),
            src_offset: read_u32_le(data, p + 2),
            dst_id: read_u16_le(data, p + 6),
            dst_offset: read_u32_le(data, p + 8),
            size: read_u32_le(data, p + 12),
        },
        CopyTextureToTexture => Params::CopyTextureToTexture {
            src_id: read_u16_le(data, p),
            dst_id: read_u16_le(data, p + 2),
            width: read_u16_le(data, p + 4),
            height: read_u16_le(data, p + 6),
        },
        CopyExternalImageToTexture => Params::CopyExternalImageToTexture {
            bitmap_id: read_u16_le(data, p),
            texture_id: read_u16_le(data, p + 2),
            mip_level: data[p + 4],
            origin_x: read_u16_le(data, p + 5),
            origin_y: read_u16_le(data, p + 7),
        },
        WriteBufferFromWasm => Params::WriteBufferFromWasm {
            buffer_id: read_u16_le(data, p),
            buffer_offset: read_u32_le(data, p + 2),
            wasm: mem_ref(data, p + 6),
        },
        InitWasmModule => Params::InitWasmModule {
            module_id: read_u16_le(data, p),
            data: mem_ref(data, p + 2),
        },
        CallWasmFunc => Params::CallWasmFunc {
            call_id: read_u16_le(data, p),
            module_id: read_u16_le(data, p + 2),
            func: mem_ref(data, p + 4),
            args: mem_ref(data, p + 12),
        },
        CreateTypedArray => Params::CreateTypedArray {
            id: read_u16_le(data, p),
            array_type: data[p + 2],
            size: read_u32_le(data, p + 3),
        },
        FillRandom | FillConstant => Params::Fill {
            array_id: read_u16_le(data, p),
            offset: read_u32_le(data, p + 2),
            count: read_u32_le(data, p + 6),
            stride: data[p + 10],
            data_ptr: read_u32_le(data, p + 11),
        },
        FillExpression => Params::FillExpression {
            array_id: read_u16_le(data, p),
            offset: read_u32_le(data, p + 2),
            count: read_u32_le(data, p + 6),
            stride: data[p + 10],
            expr_ptr: read_u32_le(data, p + 11),
            expr_len: read_u16_le(data, p + 15),
        },
        WriteBufferFromArray => Params::WriteBufferFromArray {
            buffer_id: read_u16_le(data, p),
            buffer_offset: read_u32_le(data, p + 2),
            array_id: read_u16_le(data, p + 6),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(total_len: u32) -> Vec<u8> {
        let mut v = total_len.to_le_bytes().to_vec();
        v.extend_from_slice(&0u32.to_le_bytes());
        v
    }

    #[test]
    fn truncated_buffer_under_header_is_empty_not_error() {
        assert_eq!(parse(&[1, 2, 3]).unwrap(), Vec::new());
    }

    #[test]
    fn declared_length_over_buffer_fails() {
        let mut data = header(100);
        data.push(Opcode::End as u8);
        let err = parse(&data).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidFormat {
                declared: 100,
                actual: data.len(),
            }
        );
    }

    #[test]
    fn minimal_end_parses() {
        let mut data = header(9);
        data.push(Opcode::End as u8);
        let commands = parse(&data).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].opcode, Opcode::End);
        assert_eq!(commands[0].index, 0);
    }

    #[test]
    fn missing_terminal_end_fails() {
        let mut data = header(9);
        data.push(Opcode::Submit as u8);
        let err = parse(&data).unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat { .. }));
    }

    #[test]
    fn create_buffer_roundtrips_fields() {
        let mut data = header(16 + 8);
        data.push(Opcode::CreateBuffer as u8);
        data.extend_from_slice(&7u16.to_le_bytes());
        data.extend_from_slice(&256u32.to_le_bytes());
        data.push(0x20);
        data.push(Opcode::End as u8);
        let commands = parse(&data).unwrap();
        assert_eq!(
            commands[0].params,
            Params::CreateBuffer {
                id: 7,
                size: 256,
                usage: 0x20,
            }
        );
    }

    #[test]
    fn execute_bundles_skips_variable_payload() {
        let mut data = header(0); // patched below
        data.push(Opcode::ExecuteBundles as u8);
        data.push(2u8);
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&2u16.to_le_bytes());
        data.push(Opcode::End as u8);
        let total_len = data.len() as u32;
        data[0..4].copy_from_slice(&total_len.to_le_bytes());

        let commands = parse(&data).unwrap();
        assert_eq!(
            commands[0].params,
            Params::ExecuteBundles {
                bundle_ids: vec![1, 2]
            }
        );
        assert_eq!(commands[1].opcode, Opcode::End);
    }

    #[test]
    fn truncated_payload_fails() {
        let mut data = header(10);
        data.push(Opcode::CreateBuffer as u8);
        data.push(0); // only one byte of the 7-byte payload
        let err = parse(&data).unwrap_err();
        assert!(matches!(err, ParseError::Truncated { .. }));
    }
}
